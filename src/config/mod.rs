//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (compile rules, semantic checks)
//!     → PathRewriter (validated, immutable)
//!     → shared via Arc by every RewriteService clone
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rules live for the process lifetime
//! - All fields have defaults; an empty file is a no-op rewriter
//! - Rules are an ordered list, never an unordered map
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_rewriter, parse_config, read_config, ConfigError};
pub use schema::{ObservabilityConfig, RewriteConfig, RuleConfig, RuleList, SkipConfig};
pub use validation::{compile_config, validate_config, ValidationError};
