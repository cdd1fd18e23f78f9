//! Catalog lookup: movie id -> title.
//!
//! The generator only needs "title for this id", so the catalog is reached
//! through the small [`TitleCatalog`] trait. `DataIndex` implements it for
//! real runs; a plain `HashMap` implements it for tests and ad-hoc use.

use crate::error::{ReportError, Result};
use data_loader::{DataIndex, MovieId};
use std::collections::HashMap;

/// Read-only access to catalog titles.
///
/// `Sync` so reports for different users can be built in parallel over the
/// same catalog.
pub trait TitleCatalog: Sync {
    /// Title of `movie_id`, or `None` when the catalog has no such entry
    fn title(&self, movie_id: MovieId) -> Option<&str>;
}

impl TitleCatalog for DataIndex {
    fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.get_movie(movie_id).map(|m| m.title.as_str())
    }
}

impl TitleCatalog for HashMap<MovieId, String> {
    fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.get(&movie_id).map(String::as_str)
    }
}

/// Resolve a movie id to its canonical title.
///
/// A missing entry is an error, never an empty title: a silent default
/// would put a blank row in the report.
pub fn resolve_title<C: TitleCatalog + ?Sized>(movie_id: MovieId, catalog: &C) -> Result<&str> {
    catalog
        .title(movie_id)
        .ok_or(ReportError::NotFound { movie_id })
}
