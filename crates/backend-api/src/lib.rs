mod error;
mod state;

pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    http::header::CONTENT_TYPE,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/emotion", post(routes::emotion::suggest_for_emotion))
        .route("/agent/inbox", post(routes::agent::deliver))
        // Room routes
        .route("/room/blend", post(routes::rooms::blend_room))
        .route("/room/join", post(routes::rooms::join_room))
        .route("/room/mood", post(routes::rooms::update_mood))
        .route("/room/policy", get(routes::rooms::room_policy))
        .with_state(state)
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}
