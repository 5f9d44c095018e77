//! Path rewrite engine.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, headers)
//!     → skip.rs (bypass? → Skipped)
//!     → rule.rs (ordered scan, first match wins)
//!         → pattern.rs (segment match, wildcard captures)
//!         → template.rs (substitute $N)
//!     → Return: Rewritten(path) or Unchanged
//!
//! Rule Compilation (at startup):
//!     (pattern, replacement)[]
//!     → Parse patterns and templates
//!     → Check every $N has a wildcard
//!     → Freeze as immutable RuleSet
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex: segment comparison only
//! - Configuration errors surface at construction, never per request
//! - A rewritten path is not fed back through the rules

pub mod pattern;
pub mod rewriter;
pub mod rule;
pub mod skip;
pub mod template;

pub use pattern::{Pattern, PatternError};
pub use rewriter::{PathRewriter, PathRewriterBuilder, Rewrite};
pub use rule::{RewriteRule, RuleError, RuleErrorKind, RuleSet};
pub use skip::{RequestContext, Skip, SkipConditions, SkipError};
pub use template::{Template, TemplateError};
