//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Rewrite engine and layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (outcome counters)
//!
//! Consumers:
//!     → Log output (stderr)
//!     → Whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
