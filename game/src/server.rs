use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::settings::ServeSettings;

/// `GET /` serves the entry page; every other path is looked up under the
/// configured web root and served as-is.
pub fn router(settings: &ServeSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(settings.web_root.join("index.html")))
        .fallback_service(ServeDir::new(&settings.web_root))
        .layer(cors)
}
