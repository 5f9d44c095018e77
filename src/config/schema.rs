//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the rewriter.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the path rewriter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Ordered rewrite rules. The first matching rule wins.
    pub rules: RuleList,

    /// Declarative conditions that bypass rewriting.
    pub skip: SkipConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single (pattern, replacement) rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleConfig {
    /// Path pattern, `*` matches one segment (e.g. "/users/*/orders/*").
    pub pattern: String,

    /// Replacement template, `$N` is the N-th capture (e.g. "/user/$1/order/$2").
    pub replacement: String,
}

impl RuleConfig {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordered list of rules.
///
/// Accepts either an array of tables:
/// ```toml
/// [[rules]]
/// pattern = "/old"
/// replacement = "/new"
/// ```
/// or a table of `pattern = replacement` entries, read in document order:
/// ```toml
/// [rules]
/// "/old" = "/new"
/// ```
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RuleList(pub Vec<RuleConfig>);

impl RuleList {
    pub fn iter(&self) -> impl Iterator<Item = &RuleConfig> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RuleConfig>> for RuleList {
    fn from(rules: Vec<RuleConfig>) -> Self {
        Self(rules)
    }
}

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleListVisitor;

        impl<'de> Visitor<'de> for RuleListVisitor {
            type Value = RuleList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of {pattern, replacement} tables or a table of pattern = replacement")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(rule) = seq.next_element::<RuleConfig>()? {
                    rules.push(rule);
                }
                Ok(RuleList(rules))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((pattern, replacement)) = map.next_entry::<String, String>()? {
                    rules.push(RuleConfig { pattern, replacement });
                }
                Ok(RuleList(rules))
            }
        }

        deserializer.deserialize_any(RuleListVisitor)
    }
}

/// Declarative skip conditions. Any condition being true bypasses rewriting.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SkipConfig {
    /// HTTP methods to leave untouched (case-insensitive).
    pub methods: Vec<String>,

    /// Path prefixes to leave untouched, matched on segment boundaries:
    /// "/internal" covers "/internal/x" but not "/internalize".
    pub path_prefixes: Vec<String>,

    /// Header names whose presence bypasses rewriting.
    pub headers: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive, used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Record `path_rewrite_requests_total` through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
