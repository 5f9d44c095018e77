//! Tower middleware that rewrites the request path before dispatch.
//!
//! # Responsibilities
//! - Run the skip predicate and rule set once per request
//! - Replace the URI path, keeping scheme, authority and query
//! - Record the pre-rewrite path for handlers
//!
//! # Design Decisions
//! - Axum routes before route-level layers run, so this layer must wrap
//!   the `Router` itself (`RewriteLayer::layer(router)`), not be added with
//!   `Router::layer`
//! - The rewriter is shared via `Arc`; cloning the service is cheap
//! - A rewritten URI that fails to build falls back to the original request

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use tower::{Layer, Service};

use crate::config::{compile_config, RewriteConfig, ValidationError};
use crate::observability::metrics;
use crate::rewrite::{PathRewriter, RequestContext, Rewrite};

/// The request path as it arrived, before any rewrite.
///
/// Inserted into request extensions only when a rule matched. As an
/// extractor it falls back to the current path when nothing was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPath(pub String);

impl<S: Send + Sync> FromRequestParts<S> for OriginalPath {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<OriginalPath>()
            .cloned()
            .unwrap_or_else(|| OriginalPath(parts.uri.path().to_string())))
    }
}

/// Layer applying a [`PathRewriter`] to every request.
///
/// `RewriteLayer::default()` wraps an empty rewriter and is a pass-through.
#[derive(Debug, Clone, Default)]
pub struct RewriteLayer {
    rewriter: Arc<PathRewriter>,
    metrics_enabled: bool,
}

impl RewriteLayer {
    pub fn new(rewriter: PathRewriter) -> Self {
        Self::from_shared(Arc::new(rewriter))
    }

    pub fn from_shared(rewriter: Arc<PathRewriter>) -> Self {
        Self {
            rewriter,
            metrics_enabled: false,
        }
    }

    /// Validate `config` and build a layer from it.
    pub fn from_config(config: &RewriteConfig) -> Result<Self, Vec<ValidationError>> {
        let rewriter = compile_config(config)?;
        Ok(Self::new(rewriter).with_metrics(config.observability.metrics_enabled))
    }

    /// Record `path_rewrite_requests_total` for every request.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn rewriter(&self) -> &PathRewriter {
        &self.rewriter
    }
}

impl<S> Layer<S> for RewriteLayer {
    type Service = RewriteService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RewriteService {
            inner,
            rewriter: self.rewriter.clone(),
            metrics_enabled: self.metrics_enabled,
        }
    }
}

/// Service produced by [`RewriteLayer`].
#[derive(Debug, Clone)]
pub struct RewriteService<S> {
    inner: S,
    rewriter: Arc<PathRewriter>,
    metrics_enabled: bool,
}

impl<S, B> Service<Request<B>> for RewriteService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let outcome = self.rewriter.rewrite(&RequestContext::from_request(&req));
        if self.metrics_enabled {
            metrics::record_rewrite(&outcome);
        }

        if let Rewrite::Rewritten { path, rule } = outcome {
            match rewritten_uri(req.uri(), &path) {
                Ok(uri) => {
                    let original = std::mem::replace(req.uri_mut(), uri);
                    let extensions = req.extensions_mut();
                    extensions.insert(OriginalPath(original.path().to_string()));
                    if extensions.get::<OriginalUri>().is_none() {
                        extensions.insert(OriginalUri(original));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %req.uri().path(),
                        rewritten = %path,
                        rule,
                        error = %e,
                        "Rewritten path is not a valid URI; dispatching original path"
                    );
                }
            }
        }

        self.inner.call(req)
    }
}

/// Build `uri` with its path replaced by `path`, keeping the query string.
fn rewritten_uri(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
