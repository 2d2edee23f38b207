pub mod auth;
pub mod catalog;
pub mod error;
pub mod models;
pub mod ratings;
pub mod routes;
pub mod state;
pub mod stats;
pub mod store;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};

/// Builds the full application router around shared state.
///
/// Split out of `main` so integration tests can drive the service without
/// binding a socket.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let admin_routes = Router::new()
        .route("/", get(routes::admin::admin_panel))
        .route("/add-app", post(routes::admin::add_app))
        .route("/upload-file", post(routes::admin::upload_file))
        .route("/analytics", get(routes::admin::analytics))
        .route("/update-config", post(routes::admin::update_config))
        .route(
            "/reply-rating/:app_id/:rating_id",
            post(routes::admin::reply_rating),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/", get(routes::public::api_index))
        .route("/api/apps", get(routes::public::list_apps))
        .route("/api/apps/featured", get(routes::public::get_featured))
        .route("/api/apps/:app_id", get(routes::public::get_app))
        .route("/api/search", get(routes::public::search_apps))
        .route("/api/categories", get(routes::public::get_categories))
        .route("/api/rate/:app_id", post(routes::public::rate_app))
        .route("/api/download/:app_id", get(routes::public::download_app))
        .route("/api/files/:filename", get(routes::files::serve_file))
        .route("/api/icon/:app_id", get(routes::files::serve_icon))
        .nest("/admin", admin_routes)
        // Uploads may be large; the default 2 MB body limit is far too small
        .layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
