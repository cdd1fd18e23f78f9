//! gRPC client for the external ALS service.

use crate::error::MLClientError;
use crate::proto::{self, recommender_client::RecommenderClient as GrpcRecommenderClient};
use crate::{Metric, Recommender};
use data_loader::{BulkRecommendations, Rating, ScoredRecommendation, UserRecommendationSet};
use tonic::transport::Channel;
use tracing::{debug, error, info};

/// Policy that drops predictions for users or items unseen in training
pub const COLD_START_DROP: &str = "drop";

/// Training parameters for the ALS model
#[derive(Debug, Clone, PartialEq)]
pub struct AlsParams {
    /// Number of latent factors
    pub rank: u32,
    pub max_iter: u32,
    /// Regularization strength
    pub reg_param: f64,
    pub cold_start_strategy: String,
    /// Share of ratings used for training; the rest is held out for evaluation
    pub train_fraction: f64,
    /// Seed for the random train/test split
    pub seed: u64,
}

impl Default for AlsParams {
    fn default() -> Self {
        Self {
            rank: 10,
            max_iter: 5,
            reg_param: 0.01,
            cold_start_strategy: COLD_START_DROP.to_string(),
            train_fraction: 0.8,
            seed: 42,
        }
    }
}

impl AlsParams {
    pub fn validate(&self) -> Result<(), MLClientError> {
        if self.rank == 0 {
            return Err(MLClientError::InvalidParams("rank must be positive".into()));
        }
        if self.max_iter == 0 {
            return Err(MLClientError::InvalidParams("max_iter must be positive".into()));
        }
        if !self.reg_param.is_finite() || self.reg_param < 0.0 {
            return Err(MLClientError::InvalidParams(format!(
                "reg_param must be non-negative, got {}",
                self.reg_param
            )));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(MLClientError::InvalidParams(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }

    fn to_proto(&self) -> proto::AlsParams {
        proto::AlsParams {
            rank: self.rank,
            max_iter: self.max_iter,
            reg_param: self.reg_param,
            cold_start_strategy: self.cold_start_strategy.clone(),
            train_fraction: self.train_fraction,
            seed: self.seed,
        }
    }
}

/// Sizes of the split the service trained and evaluates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitSummary {
    pub train_count: u64,
    pub test_count: u64,
}

/// Client for the ALS recommender service.
#[derive(Debug, Clone)]
pub struct RecommenderClient {
    client: GrpcRecommenderClient<Channel>,
    service_addr: String,
}

impl RecommenderClient {
    /// Connect to the service (e.g., "http://localhost:50051")
    pub async fn connect(addr: impl Into<String>) -> Result<Self, MLClientError> {
        let addr = addr.into();
        info!("Connecting to ML service at {}", addr);

        let channel = Channel::from_shared(addr.clone())
            .map_err(|e| MLClientError::ConnectionError(format!("invalid address {}: {}", addr, e)))?
            .connect()
            .await
            .map_err(|e| MLClientError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client: GrpcRecommenderClient::new(channel),
            service_addr: addr,
        })
    }

    /// Upload ratings and train a model on the service.
    pub async fn fit(
        &mut self,
        ratings: &[Rating],
        params: &AlsParams,
    ) -> Result<FitSummary, MLClientError> {
        params.validate()?;
        info!(
            "Training ALS (rank {}, {} iterations) on {} ratings",
            params.rank,
            params.max_iter,
            ratings.len()
        );

        let request = proto::FitRequest {
            ratings: ratings
                .iter()
                .map(|r| proto::RatingRecord {
                    user_id: r.user_id,
                    movie_id: r.movie_id,
                    rating: r.rating,
                    timestamp: r.timestamp,
                })
                .collect(),
            params: Some(params.to_proto()),
        };

        let response = self
            .client
            .fit(tonic::Request::new(request))
            .await
            .map_err(|e| {
                error!("gRPC error while training: {}", e);
                MLClientError::from(e)
            })?
            .into_inner();

        Ok(FitSummary {
            train_count: response.train_count,
            test_count: response.test_count,
        })
    }

    /// Get the address of the ML service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

impl Recommender for RecommenderClient {
    async fn recommend_for_all_users(
        &mut self,
        num_items: usize,
    ) -> Result<BulkRecommendations, MLClientError> {
        let request = proto::RecommendRequest {
            num_items: u32::try_from(num_items).map_err(|_| {
                MLClientError::InvalidParams(format!("num_items {} is too large", num_items))
            })?,
        };

        let response = self
            .client
            .recommend_for_all_users(tonic::Request::new(request))
            .await
            .map_err(|e| {
                error!("gRPC error while fetching recommendations: {}", e);
                MLClientError::from(e)
            })?
            .into_inner();
        debug!("Received recommendations for {} users", response.users.len());

        into_bulk(response, num_items)
    }

    async fn evaluate(&mut self, metric: Metric) -> Result<f64, MLClientError> {
        let request = proto::EvaluateRequest {
            metric_name: metric.name().to_string(),
        };

        let response = self
            .client
            .evaluate(tonic::Request::new(request))
            .await?
            .into_inner();
        if !response.metric_name.eq_ignore_ascii_case(metric.name()) {
            return Err(MLClientError::MetricMismatch {
                expected: metric.name().to_string(),
                found: response.metric_name,
            });
        }
        metric.check(response.value)
    }
}

/// Convert the service's response, checking it honours the requested top-N
/// and carries usable scores. Rank order is taken as-is.
pub(crate) fn into_bulk(
    response: proto::RecommendResponse,
    num_items: usize,
) -> Result<BulkRecommendations, MLClientError> {
    response
        .users
        .into_iter()
        .map(|user| {
            if user.items.len() > num_items {
                return Err(MLClientError::InvalidResponse(format!(
                    "user {} has {} items, requested {}",
                    user.user_id,
                    user.items.len(),
                    num_items
                )));
            }
            let items = user
                .items
                .into_iter()
                .map(|item| {
                    if item.score.is_finite() {
                        Ok(ScoredRecommendation::new(item.movie_id, item.score))
                    } else {
                        Err(MLClientError::InvalidResponse(format!(
                            "non-finite score for user {} movie {}",
                            user.user_id, item.movie_id
                        )))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UserRecommendationSet::new(user.user_id, items))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(BulkRecommendations::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(users: Vec<(u32, Vec<(u32, f32)>)>) -> proto::RecommendResponse {
        proto::RecommendResponse {
            users: users
                .into_iter()
                .map(|(user_id, items)| proto::UserRecommendations {
                    user_id,
                    items: items
                        .into_iter()
                        .map(|(movie_id, score)| proto::ScoredItem { movie_id, score })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_into_bulk_keeps_order() {
        let bulk = into_bulk(response(vec![(42, vec![(2, 9.5), (1, 8.1)])]), 10).unwrap();

        let set = bulk.for_user(42).unwrap();
        assert_eq!(set.items[0], ScoredRecommendation::new(2, 9.5));
        assert_eq!(set.items[1], ScoredRecommendation::new(1, 8.1));
    }

    #[test]
    fn test_into_bulk_rejects_oversized_set() {
        let err = into_bulk(response(vec![(1, vec![(1, 3.0), (2, 2.0)])]), 1).unwrap_err();
        assert!(matches!(err, MLClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_into_bulk_rejects_nan_score() {
        let err = into_bulk(response(vec![(1, vec![(1, f32::NAN)])]), 10).unwrap_err();
        assert!(matches!(err, MLClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_fit_request_round_trip() {
        use prost::Message;

        let request = proto::FitRequest {
            ratings: vec![proto::RatingRecord {
                user_id: 1,
                movie_id: 1,
                rating: 4.0,
                timestamp: 964982703,
            }],
            params: Some(AlsParams::default().to_proto()),
        };

        let decoded = proto::FitRequest::decode(request.encode_to_vec().as_slice()).unwrap();

        assert_eq!(decoded, request);
        assert_eq!(decoded.params.unwrap().cold_start_strategy, COLD_START_DROP);
    }

    #[test]
    fn test_default_params_are_valid() {
        let params = AlsParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.to_proto().cold_start_strategy, COLD_START_DROP);
    }

    #[test]
    fn test_invalid_params() {
        let params = AlsParams {
            train_fraction: 1.0,
            ..AlsParams::default()
        };
        assert!(matches!(params.validate(), Err(MLClientError::InvalidParams(_))));

        let params = AlsParams {
            rank: 0,
            ..AlsParams::default()
        };
        assert!(params.validate().is_err());
    }

    // Needs an ALS service listening on localhost:50051
    #[tokio::test]
    #[ignore]
    async fn test_recommend_integration() {
        let mut client = RecommenderClient::connect("http://localhost:50051")
            .await
            .expect("Failed to connect");

        let bulk = client
            .recommend_for_all_users(10)
            .await
            .expect("Failed to fetch recommendations");

        assert!(bulk.sets().iter().all(|set| set.items.len() <= 10));
    }
}
