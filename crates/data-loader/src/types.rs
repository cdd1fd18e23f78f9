//! Core domain types for the ratings dataset and the model's output.
//!
//! Two groups live here:
//! - input tables loaded from disk (`CatalogEntry`, `Rating`) and the
//!   `DataIndex` that owns them for the duration of a run
//! - the recommendation relation produced by the trained model
//!   (`ScoredRecommendation`, `UserRecommendationSet`, `BulkRecommendations`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie (the "item" of the recommender)
pub type MovieId = u32;

// =============================================================================
// Catalog
// =============================================================================

/// One row of the movie catalog (`movies.csv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    /// Pipe-separated genres split into a list. Empty when the source says
    /// "(no genres listed)".
    pub genres: Vec<String>,
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0 in half-star steps
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

// =============================================================================
// Model output
// =============================================================================

/// A single predicted item for a user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub movie_id: MovieId,
    pub predicted_score: f32,
}

impl ScoredRecommendation {
    pub fn new(movie_id: MovieId, predicted_score: f32) -> Self {
        Self {
            movie_id,
            predicted_score,
        }
    }
}

/// The ranked top-N list the model produced for one user.
///
/// `items` is kept in the order the model delivered it (highest score
/// first). Nothing in this workspace re-sorts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendationSet {
    pub user_id: UserId,
    pub items: Vec<ScoredRecommendation>,
}

impl UserRecommendationSet {
    pub fn new(user_id: UserId, items: Vec<ScoredRecommendation>) -> Self {
        Self { user_id, items }
    }
}

/// Full output of "recommend for all users": one set per user.
///
/// Users dropped by the model's cold-start policy simply have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkRecommendations {
    sets: Vec<UserRecommendationSet>,
}

impl BulkRecommendations {
    pub fn new(sets: Vec<UserRecommendationSet>) -> Self {
        Self { sets }
    }

    /// Select the set for `user_id`. Equality scan, first match wins.
    pub fn for_user(&self, user_id: UserId) -> Option<&UserRecommendationSet> {
        self.sets.iter().find(|set| set.user_id == user_id)
    }

    pub fn sets(&self) -> &[UserRecommendationSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Keep at most `n` items per user, preserving rank order
    pub fn truncate_each(&mut self, n: usize) {
        for set in &mut self.sets {
            set.items.truncate(n);
        }
    }

    pub fn into_sets(self) -> Vec<UserRecommendationSet> {
        self.sets
    }
}

impl FromIterator<UserRecommendationSet> for BulkRecommendations {
    fn from_iter<I: IntoIterator<Item = UserRecommendationSet>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// =============================================================================
// DataIndex - read-only tables for one run
// =============================================================================

/// Holds the catalog and the ratings, with per-user and per-movie indices.
///
/// Loaded once per run and never mutated afterwards; query methods hand out
/// borrows.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) movies: HashMap<MovieId, CatalogEntry>,
    /// Ratings in file order
    pub(crate) ratings: Vec<Rating>,
    /// Positions into `ratings`, grouped by user
    pub(crate) user_ratings: HashMap<UserId, Vec<usize>>,
    /// Positions into `ratings`, grouped by movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<usize>>,
}

impl DataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a catalog entry by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&CatalogEntry> {
        self.movies.get(&id)
    }

    /// All ratings, in load order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get all ratings made by a user. Empty if the user has none.
    pub fn get_user_ratings(&self, user_id: UserId) -> Vec<&Rating> {
        self.positions(self.user_ratings.get(&user_id))
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> Vec<&Rating> {
        self.positions(self.movie_ratings.get(&movie_id))
    }

    fn positions(&self, positions: Option<&Vec<usize>>) -> Vec<&Rating> {
        positions
            .map(|p| p.iter().map(|&i| &self.ratings[i]).collect())
            .unwrap_or_default()
    }

    /// Every user that rated at least one movie, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The ratings ⋈ movies join on movie id.
    ///
    /// Ratings whose movie is missing from the catalog are skipped here;
    /// `validate` rejects such datasets at load time.
    pub fn joined_ratings(&self) -> impl Iterator<Item = (&Rating, &CatalogEntry)> + '_ {
        self.ratings
            .iter()
            .filter_map(|r| self.movies.get(&r.movie_id).map(|m| (r, m)))
    }

    /// Insert a catalog entry, returning the entry it replaced (if any)
    pub fn insert_movie(&mut self, movie: CatalogEntry) -> Option<CatalogEntry> {
        self.movies.insert(movie.id, movie)
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        let position = self.ratings.len();
        self.ratings.push(rating);
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(position);
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(position);
    }

    /// (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.movies.len(), self.ratings.len())
    }
}
