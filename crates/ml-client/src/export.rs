//! Offline collaborator backed by files a training job exported.
//!
//! An export directory holds:
//! - `recommendations.csv`: `userId,movieId,score`, grouped by user, ranked
//! - `evaluation.json`: `{"metric": "rmse", "value": 0.87}`
//!
//! The metric is reported exactly as recorded; nothing is recomputed here.

use crate::error::MLClientError;
use crate::{Metric, Recommender};
use data_loader::BulkRecommendations;
use data_loader::parser::parse_recommendations;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RECOMMENDATIONS_FILE: &str = "recommendations.csv";
pub const EVALUATION_FILE: &str = "evaluation.json";

#[derive(Debug, Deserialize)]
struct EvaluationRecord {
    metric: String,
    value: f64,
}

/// Recommendations and evaluation read from an export directory
#[derive(Debug, Clone)]
pub struct ExportedRecommendations {
    bulk: BulkRecommendations,
    evaluation_path: PathBuf,
}

impl ExportedRecommendations {
    /// Read `recommendations.csv` from `dir`. `evaluation.json` is read
    /// on demand by [`Recommender::evaluate`].
    pub fn open(dir: &Path) -> Result<Self, MLClientError> {
        let bulk = parse_recommendations(&dir.join(RECOMMENDATIONS_FILE))?;
        info!("Loaded exported recommendations for {} users", bulk.len());
        Ok(Self {
            bulk,
            evaluation_path: dir.join(EVALUATION_FILE),
        })
    }

    fn read_evaluation(&self) -> Result<EvaluationRecord, MLClientError> {
        let evaluation_error = |reason: String| MLClientError::Evaluation {
            path: self.evaluation_path.display().to_string(),
            reason,
        };
        let text = fs::read_to_string(&self.evaluation_path)
            .map_err(|e| evaluation_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| evaluation_error(e.to_string()))
    }
}

impl Recommender for ExportedRecommendations {
    async fn recommend_for_all_users(
        &mut self,
        num_items: usize,
    ) -> Result<BulkRecommendations, MLClientError> {
        let mut bulk = self.bulk.clone();
        bulk.truncate_each(num_items);
        Ok(bulk)
    }

    async fn evaluate(&mut self, metric: Metric) -> Result<f64, MLClientError> {
        let record = self.read_evaluation()?;
        if !record.metric.eq_ignore_ascii_case(metric.name()) {
            return Err(MLClientError::MetricMismatch {
                expected: metric.name().to_string(),
                found: record.metric,
            });
        }
        metric.check(record.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_dir(evaluation: Option<&str>) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(RECOMMENDATIONS_FILE),
            "userId,movieId,score\n42,2,9.5\n42,1,8.1\n42,3,7.7\n7,1,4.0\n",
        )
        .unwrap();
        if let Some(json) = evaluation {
            fs::write(dir.path().join(EVALUATION_FILE), json).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_recommend_truncates_to_n() {
        let dir = export_dir(None);
        let mut export = ExportedRecommendations::open(dir.path()).unwrap();

        let bulk = export.recommend_for_all_users(2).await.unwrap();

        let items: Vec<u32> = bulk.for_user(42).unwrap().items.iter().map(|i| i.movie_id).collect();
        assert_eq!(items, vec![2, 1]);
        assert_eq!(bulk.for_user(7).unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_reads_recorded_metric() {
        let dir = export_dir(Some(r#"{"metric": "RMSE", "value": 0.8731}"#));
        let mut export = ExportedRecommendations::open(dir.path()).unwrap();

        let rmse = export.evaluate(Metric::Rmse).await.unwrap();

        assert!((rmse - 0.8731).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_other_metric() {
        let dir = export_dir(Some(r#"{"metric": "mae", "value": 0.7}"#));
        let mut export = ExportedRecommendations::open(dir.path()).unwrap();

        let err = export.evaluate(Metric::Rmse).await.unwrap_err();

        assert!(matches!(err, MLClientError::MetricMismatch { .. }));
    }

    #[tokio::test]
    async fn test_evaluate_missing_file() {
        let dir = export_dir(None);
        let mut export = ExportedRecommendations::open(dir.path()).unwrap();

        let err = export.evaluate(Metric::Rmse).await.unwrap_err();

        assert!(matches!(err, MLClientError::Evaluation { .. }));
    }

    #[test]
    fn test_open_without_recommendations() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportedRecommendations::open(dir.path()).unwrap_err();
        assert!(matches!(err, MLClientError::Export(_)));
    }
}
