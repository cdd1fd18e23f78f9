//! Report types.

use crate::error::ReportError;
use data_loader::UserId;

/// One display line: a resolved title and the model's predicted score
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub title: String,
    pub predicted_score: f32,
}

/// Top-N recommendations for one user, ready for display.
///
/// `rows` has the same length and order as the user's recommendation set.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedReport {
    pub user_id: UserId,
    pub rows: Vec<ReportRow>,
}

impl FormattedReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of one user's report in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct UserReport {
    pub user_id: UserId,
    pub outcome: Result<FormattedReport, ReportError>,
}

impl UserReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
