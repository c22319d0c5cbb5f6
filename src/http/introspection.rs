//! Route listing endpoint.

use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::resource::RouteInfo;

/// A router serving `routes` as JSON at `path`.
pub fn routes_router(path: &str, routes: Vec<RouteInfo>) -> Router {
    let routes = Arc::new(routes);
    Router::new().route(
        path,
        get(move || {
            let routes = routes.clone();
            async move { Json(routes.as_ref().clone()) }
        }),
    )
}
