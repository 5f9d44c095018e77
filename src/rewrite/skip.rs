//! Skip predicates: per-request bypass of the rewrite step.
//!
//! # Responsibilities
//! - Expose a borrowed, framework-agnostic view of the request
//! - Hold an injected closure predicate
//! - Evaluate declarative conditions loaded from configuration
//!
//! # Design Decisions
//! - A predicate is a plain `Fn`, shared via `Arc`; no trait hierarchy
//! - Declarative conditions are OR-ed with each other and with the closure

use std::fmt;
use std::sync::Arc;

use axum::http::{header::HeaderName, HeaderMap, Method, Request, Uri};

/// Read-only view of the request the rewriter is evaluating.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: &'a Method, uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            path: uri.path(),
            query: uri.query(),
            headers,
        }
    }

    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self::new(req.method(), req.uri(), req.headers())
    }
}

/// Signature of a skip closure: `true` bypasses rewriting.
pub type SkipFn = dyn Fn(&RequestContext<'_>) -> bool + Send + Sync;

/// Error building declarative skip conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipError {
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header name '{0}'")]
    InvalidHeader(String),

    #[error("path prefix '{0}' must start with '/'")]
    InvalidPathPrefix(String),
}

/// Declarative skip conditions. Any single condition being true skips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipConditions {
    methods: Vec<Method>,
    path_prefixes: Vec<String>,
    headers: Vec<HeaderName>,
}

impl SkipConditions {
    /// Build conditions from raw configuration strings.
    ///
    /// Method names are case-insensitive. Every invalid entry is reported.
    pub fn new<S: AsRef<str>>(
        methods: &[S],
        path_prefixes: &[S],
        headers: &[S],
    ) -> Result<Self, Vec<SkipError>> {
        let mut errors = Vec::new();

        let methods: Vec<Method> = methods
            .iter()
            .filter_map(|m| {
                let m = m.as_ref();
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| errors.push(SkipError::InvalidMethod(m.to_string())))
                    .ok()
            })
            .collect();

        let path_prefixes: Vec<String> = path_prefixes
            .iter()
            .filter_map(|p| {
                let p = p.as_ref();
                if p.starts_with('/') {
                    Some(p.to_string())
                } else {
                    errors.push(SkipError::InvalidPathPrefix(p.to_string()));
                    None
                }
            })
            .collect();

        let headers: Vec<HeaderName> = headers
            .iter()
            .filter_map(|h| {
                let h = h.as_ref();
                HeaderName::from_bytes(h.as_bytes())
                    .map_err(|_| errors.push(SkipError::InvalidHeader(h.to_string())))
                    .ok()
            })
            .collect();

        if errors.is_empty() {
            Ok(Self {
                methods,
                path_prefixes,
                headers,
            })
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.path_prefixes.is_empty() && self.headers.is_empty()
    }

    pub fn matches(&self, ctx: &RequestContext<'_>) -> bool {
        self.methods.iter().any(|m| m == ctx.method)
            || self.path_prefixes.iter().any(|p| has_path_prefix(ctx.path, p))
            || self.headers.iter().any(|h| ctx.headers.contains_key(h))
    }
}

/// Segment-aware prefix test: `/internal` covers `/internal` and
/// `/internal/...` but not `/internalize`.
fn has_path_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// The skip step of the rewriter: an optional closure plus optional
/// declarative conditions.
#[derive(Clone, Default)]
pub struct Skip {
    predicate: Option<Arc<SkipFn>>,
    conditions: SkipConditions,
}

impl Skip {
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn with_conditions(mut self, conditions: SkipConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// True when nothing is configured; every request is considered.
    pub fn is_noop(&self) -> bool {
        self.predicate.is_none() && self.conditions.is_empty()
    }

    pub fn should_skip(&self, ctx: &RequestContext<'_>) -> bool {
        self.conditions.matches(ctx) || self.predicate.as_ref().is_some_and(|p| p(ctx))
    }
}

impl fmt::Debug for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skip")
            .field("predicate", &self.predicate.as_ref().map(|_| "Fn(&RequestContext) -> bool"))
            .field("conditions", &self.conditions)
            .finish()
    }
}
