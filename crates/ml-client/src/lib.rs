//! Client side of the external recommender collaborator.
//!
//! Model training, the train/test split and evaluation all happen in an
//! external ALS service. This crate gives the rest of the workspace a
//! narrow view of that service:
//! - the [`Recommender`] capability (bulk top-N and a scalar error metric)
//! - [`RecommenderClient`], which speaks gRPC to a running service
//! - [`ExportedRecommendations`], which reads a finished run from disk

pub mod client;
pub mod error;
pub mod export;

// Generated from proto/recommender.proto
pub mod proto {
    tonic::include_proto!("recommender");
}

use data_loader::BulkRecommendations;
use std::fmt;

pub use client::{AlsParams, COLD_START_DROP, FitSummary, RecommenderClient};
pub use error::MLClientError;
pub use export::ExportedRecommendations;

/// Regression metric the collaborator evaluates predictions with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Root-mean-square error
    Rmse,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Rmse => "rmse",
        }
    }

    /// Reject values the metric cannot take
    pub(crate) fn check(&self, value: f64) -> Result<f64, MLClientError> {
        match self {
            Metric::Rmse if value.is_finite() && value >= 0.0 => Ok(value),
            Metric::Rmse => Err(MLClientError::InvalidResponse(format!(
                "rmse must be a non-negative number, got {}",
                value
            ))),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

/// What the report pipeline needs from a trained model.
///
/// Both operations are opaque: the implementation decides how predictions
/// and the metric are produced.
#[allow(async_fn_in_trait)]
pub trait Recommender {
    /// Top `num_items` movies for every user the model can score, each list
    /// ranked by predicted score (highest first). Users dropped by the
    /// cold-start policy are absent.
    async fn recommend_for_all_users(
        &mut self,
        num_items: usize,
    ) -> Result<BulkRecommendations, MLClientError>;

    /// Error metric of the model's predictions on held-out ratings
    async fn evaluate(&mut self, metric: Metric) -> Result<f64, MLClientError>;
}
