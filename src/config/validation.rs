//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every rule and skip condition
//! - Validate the log filter directive
//! - Detect unreachable duplicate patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RewriteConfig → Result<PathRewriter, Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::schema::RewriteConfig;
use crate::rewrite::{PathRewriter, RuleError, RuleSet, Skip, SkipConditions, SkipError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A rewrite rule failed to compile.
    Rule(RuleError),
    /// A `[skip]` entry is invalid.
    Skip(SkipError),
    /// `observability.log_level` is not a valid filter directive.
    LogLevel { value: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Rule(e) => write!(f, "{}", e),
            ValidationError::Skip(e) => write!(f, "skip: {}", e),
            ValidationError::LogLevel { value, reason } => {
                write!(f, "observability.log_level '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the configuration and compile it into a [`PathRewriter`].
pub fn compile_config(config: &RewriteConfig) -> Result<PathRewriter, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rules = RuleSet::compile_all(
        config
            .rules
            .iter()
            .map(|r| (r.pattern.as_str(), r.replacement.as_str())),
    )
    .unwrap_or_else(|rule_errors| {
        errors.extend(rule_errors.into_iter().map(ValidationError::Rule));
        RuleSet::default()
    });

    let conditions = SkipConditions::new(
        &config.skip.methods,
        &config.skip.path_prefixes,
        &config.skip.headers,
    )
    .unwrap_or_else(|skip_errors| {
        errors.extend(skip_errors.into_iter().map(ValidationError::Skip));
        SkipConditions::default()
    });

    if let Err(e) = EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::LogLevel {
            value: config.observability.log_level.clone(),
            reason: e.to_string(),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    warn_duplicate_patterns(config);

    Ok(PathRewriter::new(
        rules,
        Skip::default().with_conditions(conditions),
    ))
}

/// Validate the configuration without keeping the compiled rewriter.
pub fn validate_config(config: &RewriteConfig) -> Result<(), Vec<ValidationError>> {
    compile_config(config).map(|_| ())
}

/// Duplicate patterns are legal but every copy after the first is dead.
fn warn_duplicate_patterns(config: &RewriteConfig) {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (index, rule) in config.rules.iter().enumerate() {
        if let Some(first) = first_seen.get(rule.pattern.as_str()) {
            tracing::warn!(
                pattern = %rule.pattern,
                rule = index,
                shadowed_by = *first,
                "Rewrite rule is unreachable: an earlier rule has the same pattern"
            );
        } else {
            first_seen.insert(&rule.pattern, index);
        }
    }
}
