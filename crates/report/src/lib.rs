//! # Report Crate
//!
//! Turns a trained model's bulk recommendation output into per-user,
//! human-readable top-N tables.
//!
//! ## Components
//!
//! - **lookup**: Catalog Lookup, movie id to title (`resolve_title`)
//! - **formatter**: Recommendation Formatter, a user's ranked (id, score) pairs (`extract_pairs`)
//! - **generator**: Report Generator, one `FormattedReport` per requested user
//! - **render**: text tables with explicit `RenderConfig`
//!
//! ## Example Usage
//!
//! ```ignore
//! use report::{build_reports, render_report, RenderConfig};
//!
//! let reports = build_reports(&[1, 42], &bulk, &data_index);
//! for r in &reports {
//!     match &r.outcome {
//!         Ok(report) => print!("{}", render_report(report, &RenderConfig::default())),
//!         Err(e) => eprintln!("user {}: {}", r.user_id, e),
//!     }
//! }
//! ```

pub mod error;
pub mod types;
pub mod lookup;
pub mod formatter;
pub mod generator;
pub mod render;

pub use error::ReportError;
pub use formatter::extract_pairs;
pub use generator::{build_report, build_reports};
pub use lookup::{TitleCatalog, resolve_title};
pub use render::{RenderConfig, render_report};
pub use types::{FormattedReport, ReportRow, UserReport};
