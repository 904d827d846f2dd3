use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::ApplicationSettings, routes, routes::ApiError};

pub fn create(app_state: AppState, config: &ApplicationSettings) -> Router<()> {
    let app = Router::new()
        .route("/", get(|| async { "Hello, glossary!" }))
        .route("/health", get(health))
        .nest("/search", routes::search::router());

    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, err);
                None
            }
        })
        .collect::<Vec<_>>();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(AllowOrigin::list(origins));

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

async fn health(State(app_state): State<AppState>) -> Result<&'static str, ApiError> {
    app_state.search.health().await?;
    Ok("ok")
}
