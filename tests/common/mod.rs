//! Shared utilities for integration tests.

use axum::{
    body::Body,
    extract::Path,
    http::{Request, Response, StatusCode},
    routing,
    Router,
};
use tower::ServiceExt;

pub const REWRITE_SUCCESSFUL: &str = "Rewrite Successful";
pub const ORDERS_PATTERN: &str = "/users/*/orders/*";
pub const ORDERS_REPLACEMENT: &str = "/user/$1/order/$2";

/// Router with the `/user/{userID}/order/{orderID}` route.
pub fn orders_router() -> Router {
    Router::new().route(
        "/user/{userID}/order/{orderID}",
        routing::get(|Path((user_id, order_id)): Path<(String, String)>| async move {
            format!("User ID: {}, Order ID: {}", user_id, order_id)
        }),
    )
}

/// Send a GET request through `app` and return status and body.
#[allow(dead_code)]
pub async fn get<S>(app: S, uri: &str) -> (StatusCode, String)
where
    S: tower::Service<Request<Body>, Response = Response<Body>, Error = std::convert::Infallible>,
{
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Send `request` through `app` and return status and body.
pub async fn send<S>(app: S, request: Request<Body>) -> (StatusCode, String)
where
    S: tower::Service<Request<Body>, Response = Response<Body>, Error = std::convert::Infallible>,
{
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
