//! Derived values for presentation.
//!
//! Score aggregation for analyzer reports and pagination/statistics for
//! audit history.

pub mod history;
pub mod scores;

pub use history::{AuditStats, Pagination};
pub use scores::{overall_score, Metric, OverallRating, ScoreBand, ScoreSummary};
