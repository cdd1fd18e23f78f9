//! # Data Loader Crate
//!
//! Loads the movie catalog and the ratings table (MovieLens CSV layout) and
//! holds them in a read-only [`DataIndex`]. Also home to the types that
//! describe a trained model's output, so every other crate speaks the same
//! vocabulary.
//!
//! ## Main Components
//!
//! - **types**: `CatalogEntry`, `Rating`, `DataIndex`, and the recommendation relation
//! - **parser**: CSV parsing for movies, ratings and exported recommendations
//! - **index**: building and validating the `DataIndex`
//! - **error**: error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-latest-small"))?;
//! let movie = index.get_movie(1).unwrap();
//! println!("{} has {} ratings", movie.title, index.get_movie_ratings(1).len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use index::{MAX_RATING, MIN_RATING};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Input tables
    CatalogEntry,
    Rating,
    DataIndex,
    // Model output
    ScoredRecommendation,
    UserRecommendationSet,
    BulkRecommendations,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
    }

    #[test]
    fn test_insert_movie() {
        let mut index = DataIndex::new();

        let movie = CatalogEntry {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            year: Some(1995),
            genres: vec!["Adventure".to_string(), "Animation".to_string()],
        };

        assert!(index.insert_movie(movie.clone()).is_none());
        let replaced = index.insert_movie(movie);
        assert_eq!(replaced.map(|m| m.id), Some(1));

        let retrieved = index.get_movie(1).unwrap();
        assert_eq!(retrieved.year, Some(1995));
        assert_eq!(retrieved.genres.len(), 2);
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();

        index.insert_rating(Rating {
            user_id: 1,
            movie_id: 31,
            rating: 2.5,
            timestamp: 1260759144,
        });

        let user_ratings = index.get_user_ratings(1);
        assert_eq!(user_ratings.len(), 1);
        assert_eq!(user_ratings[0].rating, 2.5);
        assert_eq!(index.get_movie_ratings(31).len(), 1);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_movie(999).is_none());
        assert!(index.get_user_ratings(999).is_empty());
        assert!(index.get_movie_ratings(999).is_empty());
        assert!(index.user_ids().is_empty());
    }

    #[test]
    fn test_bulk_recommendations_selection() {
        let mut bulk: BulkRecommendations = vec![
            UserRecommendationSet::new(1, vec![ScoredRecommendation::new(5, 4.0)]),
            UserRecommendationSet::new(
                2,
                vec![ScoredRecommendation::new(7, 4.9), ScoredRecommendation::new(3, 4.1)],
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(bulk.for_user(2).unwrap().items.len(), 2);
        assert!(bulk.for_user(3).is_none());

        bulk.truncate_each(1);
        assert_eq!(bulk.for_user(2).unwrap().items, vec![ScoredRecommendation::new(7, 4.9)]);
    }
}
