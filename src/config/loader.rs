//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use crate::config::schema::RewriteConfig;
use crate::config::validation::{compile_config, ValidationError};
use crate::rewrite::PathRewriter;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<RewriteConfig, ConfigError> {
    let config: RewriteConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    compile_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RewriteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Read and deserialize a TOML file without semantic validation.
///
/// Callers compile the result with [`compile_config`] exactly once, e.g.
/// after logging has been set up from `config.observability`.
pub fn read_config(path: &Path) -> Result<RewriteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load a TOML file and compile it into a ready-to-use rewriter.
pub fn load_rewriter(path: &Path) -> Result<(RewriteConfig, PathRewriter), ConfigError> {
    let config = read_config(path)?;
    let rewriter = compile_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        path = %path.display(),
        rules = rewriter.rules().len(),
        "Rewrite configuration loaded"
    );
    Ok((config, rewriter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_rejects_invalid_rules() {
        let err = parse_config(
            r#"
            [rules]
            "/users/*" = "/user/$1/$2"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_parse_config_syntax_error() {
        let err = parse_config("[rules").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn test_validation_display_joins_errors() {
        let err = parse_config(
            r#"
            [[rules]]
            pattern = "a"
            replacement = "/b"

            [[rules]]
            pattern = "/c"
            replacement = "d"
            "#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Validation failed: rule #0"));
        assert!(message.contains(", rule #1"));
    }
}
