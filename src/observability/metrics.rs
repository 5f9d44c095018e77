//! Metrics collection.
//!
//! # Metrics
//! - `path_rewrite_requests_total` (counter): requests seen by the rewrite
//!   layer, labelled by `outcome` (`rewritten`, `unchanged`, `skipped`)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs the exporter
//! - Without an installed recorder every call is a no-op

use crate::rewrite::Rewrite;

pub const REQUESTS_TOTAL: &str = "path_rewrite_requests_total";

/// Record the outcome of one rewrite evaluation.
pub fn record_rewrite(outcome: &Rewrite) {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome.outcome()).increment(1);
}
