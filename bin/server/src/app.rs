//! Router assembly.

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};

/// Builds the application router with all `/oauth2/*` routes.
///
/// Every route is also reachable with a trailing slash.
pub fn router(state: Arc<AppState>) -> Router {
    let routes: [(&str, MethodRouter<Arc<AppState>>); 7] = [
        ("/oauth2/login", get(auth::login)),
        ("/oauth2/token", get(auth::token)),
        ("/oauth2/callback", get(auth::callback)),
        ("/oauth2/refresh", post(auth::refresh)),
        ("/oauth2/revoke", post(auth::revoke)),
        ("/oauth2/logout", post(auth::logout)),
        ("/oauth2/me", get(auth::me)),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            router
                .route(path, handler.clone())
                .route(&format!("{path}/"), handler)
        })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
