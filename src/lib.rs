//! Path rewrite middleware.
//!
//! Rewrites incoming request paths with wildcard rules before the request
//! reaches the router.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                  RewriteLayer                     │
//!   Client Request  │  ┌──────────┐    ┌───────────┐    ┌───────────┐  │
//!   ────────────────┼─▶│   skip   │───▶│  RuleSet  │───▶│ URI path  │──┼──▶ axum Router
//!                   │  │predicate │    │first match│    │  replace  │  │    (routes see
//!                   │  └──────────┘    └─────┬─────┘    └───────────┘  │     rewritten
//!                   │                        │                          │     path)
//!                   │              ┌─────────┴─────────┐                │
//!                   │              │ pattern  template │                │
//!                   │              │ /users/* /user/$1 │                │
//!                   │              └───────────────────┘                │
//!                   └──────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use axum::{extract::Path, routing::get, Router};
//! use path_rewrite::{PathRewriter, RewriteLayer};
//! use tower::Layer;
//!
//! let rewriter = PathRewriter::builder()
//!     .rule("/users/*/orders/*", "/user/$1/order/$2")
//!     .build()
//!     .unwrap();
//!
//! let router: Router = Router::new().route(
//!     "/user/{user_id}/order/{order_id}",
//!     get(|Path((user, order)): Path<(String, String)>| async move {
//!         format!("User ID: {user}, Order ID: {order}")
//!     }),
//! );
//!
//! // Wrap the router so routing happens on the rewritten path.
//! let app = RewriteLayer::new(rewriter).layer(router);
//! # let _ = app;
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod rewrite;

// Cross-cutting concerns
pub mod observability;

pub use config::RewriteConfig;
pub use http::{OriginalPath, RewriteLayer, RewriteService};
pub use rewrite::{PathRewriter, RequestContext, Rewrite, RuleSet};
