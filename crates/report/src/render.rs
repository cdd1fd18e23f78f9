//! Plain-text table rendering for reports.
//!
//! Column width behaviour is a parameter of each call ([`RenderConfig`]);
//! there is no process-wide display setting.

use crate::types::FormattedReport;
use prettytable::{format, Cell, Row, Table};

const TITLE_HEADER: &str = "title";
const SCORE_HEADER: &str = "predicted score";
const ELLIPSIS: &str = "...";

/// How a report table is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Show titles in full regardless of length
    pub full_width: bool,
    /// Longest title shown when `full_width` is off, ellipsis included
    pub max_title_width: usize,
    /// Digits after the decimal point for scores
    pub score_precision: usize,
}

impl RenderConfig {
    /// Never truncate titles
    pub fn full_width() -> Self {
        Self {
            full_width: true,
            ..Self::default()
        }
    }

    /// Truncate titles to `width` characters
    pub fn with_max_title_width(mut self, width: usize) -> Self {
        self.max_title_width = width;
        self
    }

    pub fn with_score_precision(mut self, precision: usize) -> Self {
        self.score_precision = precision;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            full_width: false,
            max_title_width: 50,
            score_precision: 4,
        }
    }
}

/// Shorten `title` to at most `width` characters, marking the cut with an
/// ellipsis. Counts chars, not bytes. Widths too narrow for the ellipsis
/// get a plain cut.
fn truncate_title(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    if width < ELLIPSIS.len() {
        return title.chars().take(width).collect();
    }
    let mut out: String = title.chars().take(width - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Render a report as a two-column table (title, predicted score).
///
/// ```text
/// +----------------+-----------------+
/// | title          | predicted score |
/// +----------------+-----------------+
/// | Jumanji (1995) |          9.5000 |
/// +----------------+-----------------+
/// ```
pub fn render_report(report: &FormattedReport, config: &RenderConfig) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![Cell::new(TITLE_HEADER), Cell::new(SCORE_HEADER)]));

    for row in &report.rows {
        let title = if config.full_width {
            row.title.clone()
        } else {
            truncate_title(&row.title, config.max_title_width)
        };
        let score = format!("{:.*}", config.score_precision, row.predicted_score);
        table.add_row(Row::new(vec![
            Cell::new(&title),
            Cell::new(&score).style_spec("r"),
        ]));
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportRow;

    fn report() -> FormattedReport {
        FormattedReport {
            user_id: 42,
            rows: vec![
                ReportRow {
                    title: "Jumanji (1995)".to_string(),
                    predicted_score: 9.5,
                },
                ReportRow {
                    title: "Dr. Strangelove or: How I Learned to Stop Worrying and Love the Bomb (1964)"
                        .to_string(),
                    predicted_score: 8.125,
                },
            ],
        }
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Heat (1995)", 20), "Heat (1995)");
        assert_eq!(truncate_title("Sabrina (1995)", 10), "Sabrina...");
        assert_eq!(truncate_title("Amélie (2001)", 8), "Améli...");
    }

    #[test]
    fn test_truncate_title_narrow_widths() {
        for width in 0..=3 {
            let title = truncate_title("Heat (1995)", width);
            assert!(title.chars().count() <= width, "width {} gave {:?}", width, title);
        }
        assert_eq!(truncate_title("Heat (1995)", 0), "");
        assert_eq!(truncate_title("Heat (1995)", 2), "He");
        assert_eq!(truncate_title("Heat (1995)", 3), "...");
    }

    #[test]
    fn test_render_default_truncates() {
        let table = render_report(&report(), &RenderConfig::default());

        assert!(table.contains("Jumanji (1995)"));
        assert!(table.contains("9.5000"));
        assert!(table.contains("8.1250"));
        assert!(!table.contains("Love the Bomb (1964)"));
        assert!(table.contains("..."));
    }

    #[test]
    fn test_render_full_width() {
        let table = render_report(&report(), &RenderConfig::full_width().with_score_precision(1));

        assert!(table.contains("Love the Bomb (1964)"));
        assert!(table.contains("9.5"));
        assert!(!table.contains("9.50"));
    }

    #[test]
    fn test_render_rows_in_order() {
        let table = render_report(&report(), &RenderConfig::full_width());

        let header = table.find(SCORE_HEADER).unwrap();
        let first = table.find("Jumanji").unwrap();
        let second = table.find("Strangelove").unwrap();
        assert!(header < first);
        assert!(first < second);

        let jumanji = table.lines().find(|l| l.contains("Jumanji")).unwrap();
        assert!(jumanji.find("Jumanji").unwrap() < jumanji.find("9.5000").unwrap());
    }

    #[test]
    fn test_render_empty_report() {
        let empty = FormattedReport {
            user_id: 1,
            rows: vec![],
        };
        let table = render_report(&empty, &RenderConfig::default());

        assert!(table.contains(TITLE_HEADER));
        assert!(table.contains(SCORE_HEADER));
    }
}
