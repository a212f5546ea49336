mod health;
mod parse;

use axum::{extract::DefaultBodyLimit, http::Request, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().merge(health::router()).merge(parse::router())
}

/// The complete application with middleware applied.
pub fn app(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .nest("/api", router())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
