//! Loading rewrite configuration from disk.

use std::io::Write;
use std::path::Path;

use path_rewrite::config::{
    compile_config, load_config, load_rewriter, read_config, ConfigError, ValidationError,
};
use path_rewrite::Rewrite;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        [[rules]]
        pattern = "/users/*/orders/*"
        replacement = "/user/$1/order/$2"

        [[rules]]
        pattern = "/old"
        replacement = "/new"

        [skip]
        path_prefixes = ["/internal"]

        [observability]
        log_level = "debug"
        metrics_enabled = false
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.skip.path_prefixes, vec!["/internal"]);
    assert_eq!(config.observability.log_level, "debug");
    assert!(!config.observability.metrics_enabled);
}

#[test]
fn test_load_rewriter_rewrites() {
    let file = write_config(
        r#"
        [rules]
        "/users/*/orders/*" = "/user/$1/order/$2"
        "/users/*" = "/user/$1"
        "#,
    );

    let (config, rewriter) = load_rewriter(file.path()).unwrap();
    assert_eq!(config.rules.len(), 2);
    assert_eq!(
        rewriter.rewrite_path("/users/123/orders/456"),
        Rewrite::Rewritten {
            path: "/user/123/order/456".into(),
            rule: 0
        }
    );
    assert_eq!(
        rewriter.rewrite_path("/users/123"),
        Rewrite::Rewritten {
            path: "/user/123".into(),
            rule: 1
        }
    );
}

#[test]
fn test_empty_file_is_noop_rewriter() {
    let file = write_config("");
    let (_, rewriter) = load_rewriter(file.path()).unwrap();
    assert!(rewriter.rules().is_empty());
    assert_eq!(rewriter.rewrite_path("/anything"), Rewrite::Unchanged);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config(Path::new("/nonexistent/path-rewrite.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_rules_fail_at_load() {
    let file = write_config(
        r#"
        [[rules]]
        pattern = "/users/*"
        replacement = "/user/$1/order/$2"

        [skip]
        headers = ["not a header"]
        "#,
    );

    match load_rewriter(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], ValidationError::Rule(_)));
            assert!(matches!(errors[1], ValidationError::Skip(_)));
        }
        Err(other) => panic!("expected validation errors, got {}", other),
        Ok(_) => panic!("invalid configuration was accepted"),
    }
}

#[test]
fn test_read_config_defers_validation() {
    let file = write_config(
        r#"
        [rules]
        "/old" = "/new/$1"
        "#,
    );

    let config = read_config(file.path()).unwrap();
    assert_eq!(config.rules.len(), 1);
    assert_eq!(compile_config(&config).unwrap_err().len(), 1);

    let broken = write_config("[rules");
    assert!(matches!(read_config(broken.path()), Err(ConfigError::Parse(_))));
}
