use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{domains::verification::rest::verification_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .merge(verification_routes())
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
    .with_state(state)
}
