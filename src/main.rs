use std::path::{Path, PathBuf};
use std::process::ExitCode;

use axum::http::method::InvalidMethod;
use axum::http::uri::InvalidUri;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use clap::{Parser, Subcommand};
use serde::Serialize;

use path_rewrite::config::{compile_config, read_config, ConfigError};
use path_rewrite::observability::init_logging;
use path_rewrite::{PathRewriter, RequestContext, Rewrite};

#[derive(Parser)]
#[command(name = "path-rewrite")]
#[command(about = "Validate and dry-run path rewrite rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a rule file
    Check {
        /// Path to the TOML configuration
        config: PathBuf,
    },
    /// Run request paths through the rules and print the result
    Test {
        /// Path to the TOML configuration
        config: PathBuf,

        /// Request paths, optionally with a query string
        #[arg(required = true)]
        paths: Vec<String>,

        /// Request method seen by the skip conditions
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request header as NAME:VALUE, repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct TestResult<'a> {
    path: &'a str,
    outcome: &'static str,
    rewritten: Option<&'a str>,
    rule: Option<usize>,
}

impl<'a> TestResult<'a> {
    fn new(path: &'a str, outcome: &'a Rewrite) -> Self {
        let (rewritten, rule) = match outcome {
            Rewrite::Rewritten { path, rule } => (Some(path.as_str()), Some(*rule)),
            Rewrite::Unchanged | Rewrite::Skipped => (None, None),
        };
        Self {
            path,
            outcome: outcome.outcome(),
            rewritten,
            rule,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check { config } => {
            let rewriter = load(&config)?;
            println!("{}", check_summary(&config, &rewriter));
        }
        Commands::Test {
            config,
            paths,
            method,
            headers,
            json,
        } => {
            let rewriter = load(&config)?;
            let method = parse_method(&method)?;
            let headers = parse_headers(&headers)?;
            let outcomes = dry_run(&rewriter, &method, &headers, &paths)?;

            if json {
                println!("{}", render_json(&outcomes)?);
            } else {
                println!("{}", render_text(&outcomes));
            }
        }
    }

    Ok(())
}

/// Read the rule file, start logging with its configured level, then
/// validate and compile it.
fn load(path: &Path) -> Result<PathRewriter, ConfigError> {
    let config = read_config(path)?;
    if let Err(e) = init_logging(&config.observability) {
        tracing::debug!(error = %e, "Keeping the installed tracing subscriber");
    }

    let rewriter = compile_config(&config).map_err(ConfigError::Validation)?;
    tracing::info!(
        path = %path.display(),
        rules = rewriter.rules().len(),
        "Rewrite configuration loaded"
    );
    Ok(rewriter)
}

fn check_summary(path: &Path, rewriter: &PathRewriter) -> String {
    format!(
        "{}: OK ({} rule(s){})",
        path.display(),
        rewriter.rules().len(),
        if rewriter.skip().is_noop() { "" } else { ", skip conditions set" }
    )
}

/// Method names are accepted in any case.
fn parse_method(raw: &str) -> Result<Method, InvalidMethod> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected NAME:VALUE", entry))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}

fn dry_run<'a>(
    rewriter: &PathRewriter,
    method: &Method,
    headers: &HeaderMap,
    paths: &'a [String],
) -> Result<Vec<(&'a str, Rewrite)>, InvalidUri> {
    paths
        .iter()
        .map(|path| {
            let uri = path.parse::<Uri>()?;
            let outcome = rewriter.rewrite(&RequestContext::new(method, &uri, headers));
            Ok::<_, InvalidUri>((path.as_str(), outcome))
        })
        .collect()
}

fn render_text(outcomes: &[(&str, Rewrite)]) -> String {
    outcomes
        .iter()
        .map(|(path, outcome)| match outcome {
            Rewrite::Rewritten { path: to, rule } => format!("{} -> {} (rule #{})", path, to, rule),
            _ => format!("{} ({})", path, outcome.outcome()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json(outcomes: &[(&str, Rewrite)]) -> serde_json::Result<String> {
    let results: Vec<TestResult<'_>> = outcomes
        .iter()
        .map(|(path, outcome)| TestResult::new(path, outcome))
        .collect();
    serde_json::to_string_pretty(&results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rewriter() -> PathRewriter {
        PathRewriter::builder()
            .rule("/users/*/orders/*", "/user/$1/order/$2")
            .skip(|ctx| ctx.method == Method::DELETE || ctx.headers.contains_key("x-raw"))
            .build()
            .unwrap()
    }

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_parse_method_any_case() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method("Delete").unwrap(), Method::DELETE);
        assert!(parse_method("BAD METHOD").is_err());
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(&paths(&["X-Raw: 1", "accept:text/plain"])).unwrap();
        assert_eq!(headers.get("x-raw").unwrap(), "1");
        assert_eq!(headers.get("accept").unwrap(), "text/plain");
    }

    #[test]
    fn test_parse_headers_rejects_bad_entries() {
        let err = parse_headers(&paths(&["no-colon"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid header 'no-colon', expected NAME:VALUE");
        assert!(parse_headers(&paths(&["bad name: 1"])).is_err());
    }

    #[test]
    fn test_text_output() {
        let input = paths(&["/users/1/orders/2?x=1", "/other"]);
        let outcomes = dry_run(&rewriter(), &Method::GET, &HeaderMap::new(), &input).unwrap();
        assert_eq!(
            render_text(&outcomes),
            "/users/1/orders/2?x=1 -> /user/1/order/2 (rule #0)\n/other (unchanged)"
        );
    }

    #[test]
    fn test_skip_sees_method_and_headers() {
        let input = paths(&["/users/1/orders/2"]);
        let deleted = dry_run(&rewriter(), &Method::DELETE, &HeaderMap::new(), &input).unwrap();
        assert_eq!(render_text(&deleted), "/users/1/orders/2 (skipped)");

        let headers = parse_headers(&paths(&["x-raw: yes"])).unwrap();
        let flagged = dry_run(&rewriter(), &Method::GET, &headers, &input).unwrap();
        assert_eq!(flagged[0].1, Rewrite::Skipped);
    }

    #[test]
    fn test_json_output() {
        let input = paths(&["/users/7/orders/8", "/other"]);
        let outcomes = dry_run(&rewriter(), &Method::GET, &HeaderMap::new(), &input).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&outcomes).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {
                    "path": "/users/7/orders/8",
                    "outcome": "rewritten",
                    "rewritten": "/user/7/order/8",
                    "rule": 0
                },
                {
                    "path": "/other",
                    "outcome": "unchanged",
                    "rewritten": null,
                    "rule": null
                }
            ])
        );
    }

    #[test]
    fn test_dry_run_rejects_invalid_uri() {
        let input = paths(&["/bad path"]);
        assert!(dry_run(&rewriter(), &Method::GET, &HeaderMap::new(), &input).is_err());
    }

    #[test]
    fn test_check_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
            [rules]
            "/old" = "/new"
            "/old/*" = "/new/$1"

            [skip]
            methods = ["POST"]
            "#,
        )
        .unwrap();

        let rewriter = load(file.path()).unwrap();
        assert_eq!(
            check_summary(file.path(), &rewriter),
            format!("{}: OK (2 rule(s), skip conditions set)", file.path().display())
        );
    }

    #[test]
    fn test_check_reports_invalid_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[rules]\n\"/old\" = \"/new/$1\"\n").unwrap();

        match load(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            Err(other) => panic!("expected validation error, got {}", other),
            Ok(_) => panic!("invalid rule was accepted"),
        }
    }
}
