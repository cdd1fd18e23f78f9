//! Report Generator
//!
//! Builds display-ready reports from the model's bulk output:
//! 1. Select the requested user's recommendation set
//! 2. Extract the ranked (movie id, score) pairs
//! 3. Resolve each movie id to its title
//! 4. Zip titles with scores in rank order
//!
//! Every step is a pure function of its inputs. Nothing is cached and the
//! inputs are never modified, so reports for different users can be built
//! concurrently over the same catalog and bulk output.

use crate::error::{ReportError, Result};
use crate::formatter::extract_pairs;
use crate::lookup::{TitleCatalog, resolve_title};
use crate::types::{FormattedReport, ReportRow, UserReport};
use data_loader::{BulkRecommendations, UserId};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

/// Build the report for a single user.
///
/// Fails with [`ReportError::UserNotFound`] when the bulk output has no set
/// for `user_id`, and with [`ReportError::NotFound`] on the first movie the
/// catalog cannot resolve. No partial report is returned in either case.
#[instrument(skip(bulk, catalog))]
pub fn build_report<C>(
    user_id: UserId,
    bulk: &BulkRecommendations,
    catalog: &C,
) -> Result<FormattedReport>
where
    C: TitleCatalog + ?Sized,
{
    let set = bulk
        .for_user(user_id)
        .ok_or(ReportError::UserNotFound { user_id })?;

    let rows = extract_pairs(set)
        .into_iter()
        .map(|(movie_id, predicted_score)| {
            let title = resolve_title(movie_id, catalog)?;
            Ok(ReportRow {
                title: title.to_string(),
                predicted_score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Built report with {} rows", rows.len());
    Ok(FormattedReport { user_id, rows })
}

/// Build one report per requested user.
///
/// The result has one entry per requested id, in request order. A failure
/// for one user is recorded in that user's entry and does not stop the
/// others.
pub fn build_reports<C>(
    user_ids: &[UserId],
    bulk: &BulkRecommendations,
    catalog: &C,
) -> Vec<UserReport>
where
    C: TitleCatalog + ?Sized,
{
    user_ids
        .par_iter()
        .map(|&user_id| {
            let outcome = build_report(user_id, bulk, catalog);
            if let Err(e) = &outcome {
                warn!(user_id, "Report failed: {}", e);
            }
            UserReport { user_id, outcome }
        })
        .collect()
}
