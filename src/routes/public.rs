use crate::catalog::{featured_apps, find_app, search, sort_apps};
use crate::error::ApiError;
use crate::ratings::add_rating;
use crate::routes::files::stream_file;
use crate::state::AppState;
use crate::stats::record_download;
use crate::uploads::content_type_for;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use std::path::Path as FsPath;

/// API index for discovery
pub async fn api_index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "App Store Backend API",
        "version": "1.0.0",
        "endpoints": {
            "get_apps": "/api/apps",
            "get_featured": "/api/apps/featured",
            "search_apps": "/api/search?q=query",
            "rate_app": "/api/rate/[id] (POST)",
            "get_categories": "/api/categories"
        },
        "admin_panel": "/admin"
    }))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    sort: Option<String>,
}

/// Lists all apps, sorted by the requested key (newest by default)
pub async fn list_apps(
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    let doc = state.store.load();
    let mut apps = doc.apps.clone();
    sort_apps(&mut apps, query.sort.as_deref().unwrap_or("newest"));
    let total = apps.len();

    Json(json!({
        "apps": apps,
        "total": total,
        "categories": doc.categories,
        "config": doc.config,
    }))
}

/// Featured apps, or a random sample of up to 3 when none are flagged
pub async fn get_featured(State(state): State<AppState>) -> Json<serde_json::Value> {
    let doc = state.store.load();
    let featured = featured_apps(&doc, &mut rand::thread_rng());
    let count = featured.len();

    Json(json!({
        "featured_apps": featured,
        "count": count,
    }))
}

/// Single app by id
pub async fn get_app(
    Path(app_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let doc = state.store.load();
    let app = find_app(&doc, app_id)
        .ok_or_else(|| ApiError::NotFound("App not found".to_string()))?;
    Ok(Json(serde_json::to_value(app).map_err(ApiError::internal)?))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Substring search over name, description, and tags
pub async fn search_apps(
    Query(query): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    let doc = state.store.load();
    let q = query.q.as_deref().unwrap_or("");
    // Empty category string means "no filter", matching query-string semantics
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let results = search(&doc, q, category);
    let count = results.len();

    Json(json!({
        "results": results,
        "query": q.to_lowercase(),
        "count": count,
    }))
}

/// Category list as stored
pub async fn get_categories(State(state): State<AppState>) -> Json<serde_json::Value> {
    let doc = state.store.load();
    let count = doc.categories.len();
    Json(json!({
        "categories": doc.categories,
        "count": count,
    }))
}

#[derive(Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    rating: i64,
    #[serde(default)]
    review: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

/// Submits a rating for an app and persists the updated document
pub async fn rate_app(
    Path(app_id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<RateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut doc = state.store.load();
    let outcome = add_rating(&mut doc, app_id, body.rating, body.review, body.user)?;
    state.store.save(&doc).map_err(ApiError::internal)?;

    tracing::info!(
        "Rating submitted for app {}: average now {}",
        app_id,
        outcome.average
    );

    Ok(Json(json!({
        "message": "Rating submitted successfully",
        "app_id": app_id,
        "new_rating": outcome.average,
        "total_ratings": outcome.total,
    })))
}

/// Records a download, then streams the APK if present or returns the
/// external link. The counters are bumped even when no file is served.
pub async fn download_app(
    Path(app_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let today = Local::now().format("%Y-%m-%d").to_string();

    let mut doc = state.store.load();
    let app = record_download(&mut doc, app_id, &today)?;
    state.store.save(&doc).map_err(ApiError::internal)?;

    // apk_path may carry a directory prefix from older documents; only its
    // final component is looked up under the configured uploads directory
    let apk_name = FsPath::new(&app.apk_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("app_{}.apk", app_id));
    let apk_path = state.uploads_dir.join(&apk_name);

    if apk_path.is_file() {
        tracing::info!("Serving APK for app {}: {}", app_id, apk_path.display());
        return stream_file(&apk_path, content_type_for(&apk_name), Some(&apk_name)).await;
    }

    Ok(Json(json!({
        "message": "App found but APK not available",
        "download_link": app.external_link,
    }))
    .into_response())
}
