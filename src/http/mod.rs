//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (from the host server)
//!     → layer.rs (RewriteService: skip? rules? replace URI path)
//!     → wrapped axum Router (route matching on the rewritten path)
//!     → handler (path params extracted from the rewritten path)
//! ```

pub mod layer;

pub use layer::{OriginalPath, RewriteLayer, RewriteService};
