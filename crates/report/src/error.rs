//! Errors raised while building a report.
//!
//! Both variants are per-user failures: a batch keeps going when one user's
//! report cannot be built.

use data_loader::{MovieId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A recommended movie has no catalog entry. The catalog and the model
    /// output disagree, so the report cannot be trusted.
    #[error("Movie {movie_id} is not in the catalog")]
    NotFound { movie_id: MovieId },

    /// The model produced no recommendations for this user (unknown user,
    /// or dropped by the cold-start policy).
    #[error("No recommendations for user {user_id}")]
    UserNotFound { user_id: UserId },
}

pub type Result<T> = std::result::Result<T, ReportError>;
