//! Route handlers: the HTML pages at the root and the JSON API under `/api`.

pub mod api;
pub mod health;
pub mod pages;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Query string accepted by the listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
}

/// `302 Found` back to the listing page.
pub(crate) fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

pub fn router(cors_permissive: bool) -> Router<AppState> {
    let mut api = api::router().merge(health::router::<AppState>());
    if cors_permissive {
        api = api.layer(CorsLayer::permissive());
    }

    Router::new().merge(pages::router()).nest("/api", api)
}
