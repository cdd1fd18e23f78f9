//! Turns a user's recommendation set into ordered (movie id, score) pairs.

use data_loader::{MovieId, UserRecommendationSet};

/// Extract the ranked pairs of a recommendation set.
///
/// Order is kept exactly as the model produced it. Re-sorting here would
/// hide tie-break differences in the model's ranking. An empty set gives
/// an empty result.
pub fn extract_pairs(set: &UserRecommendationSet) -> Vec<(MovieId, f32)> {
    set.items
        .iter()
        .map(|item| (item.movie_id, item.predicted_score))
        .collect()
}
