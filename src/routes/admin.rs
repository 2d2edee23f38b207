use crate::auth::AdminUser;
use crate::catalog::next_app_id;
use crate::error::ApiError;
use crate::models::App;
use crate::ratings::reply_to_rating;
use crate::state::AppState;
use crate::stats::{analytics_report, AnalyticsReport};
use crate::uploads::store_upload;
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

/// Admin summary view
pub async fn admin_panel(State(state): State<AppState>) -> Json<serde_json::Value> {
    let doc = state.store.load();
    Json(json!({
        "admin_panel": true,
        "total_apps": doc.apps.len(),
        "total_downloads": doc.analytics.total_downloads,
        "total_ratings": doc.analytics.total_ratings,
        "available_endpoints": [
            "/admin/add-app",
            "/admin/analytics",
            "/admin/upload-file",
            "/admin/update-config",
            "/admin/reply-rating/[appId]/[ratingId]",
        ],
    }))
}

#[derive(Deserialize)]
pub struct AddAppRequest {
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    privacy_policy: Option<String>,
    #[serde(default)]
    support_email: Option<String>,
    #[serde(default)]
    developer: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    whats_new: Option<String>,
    #[serde(default)]
    requirements: Option<String>,
    #[serde(default)]
    screenshots: Option<Vec<String>>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    external_link: Option<String>,
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::Validation(format!(
            "Missing required field: {}",
            name
        ))),
    }
}

/// Creates a new app with a fresh id and defaults for all optional fields.
///
/// Id assignment is max existing + 1; with no locking two concurrent adds can
/// compute the same id (known limitation of the whole-document store).
pub async fn add_app(
    State(state): State<AppState>,
    Json(body): Json<AddAppRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = required(body.name, "name")?;
    let description = required(body.description, "description")?;
    let category = required(body.category, "category")?;

    let mut doc = state.store.load();
    let id = next_app_id(&doc);
    let now = Local::now();

    let app = App {
        id,
        name,
        description,
        category: category.clone(),
        downloads: 0,
        rating: 0.0,
        ratings: Vec::new(),
        featured: body.featured.unwrap_or(false),
        release_date: body
            .release_date
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        last_update: now.to_rfc3339(),
        version: body.version.unwrap_or_else(|| "1.0.0".to_string()),
        size: body.size.unwrap_or_else(|| "0 MB".to_string()),
        privacy_policy: body
            .privacy_policy
            .unwrap_or_else(|| doc.config.privacy_policy.clone()),
        support_email: body
            .support_email
            .unwrap_or_else(|| doc.config.support_email.clone()),
        developer: body.developer.unwrap_or_else(|| "Unknown".to_string()),
        tags: body.tags.unwrap_or_default(),
        whats_new: body.whats_new.unwrap_or_default(),
        requirements: body
            .requirements
            .unwrap_or_else(|| "Android 5.0+".to_string()),
        icon_url: format!("/api/icon/{}", id),
        screenshot_urls: body.screenshots.unwrap_or_default(),
        video_url: body.video_url.unwrap_or_default(),
        // Filename only; the download route resolves it under the uploads dir
        apk_path: format!("app_{}.apk", id),
        external_link: body.external_link.unwrap_or_default(),
    };

    doc.apps.push(app.clone());
    doc.add_category(&category);
    doc.analytics.category_entry(&category).apps += 1;

    state.store.save(&doc).map_err(ApiError::internal)?;
    tracing::info!("Added app {} ({}) in category {}", id, app.name, category);

    Ok(Json(json!({
        "message": "App added successfully",
        "app_id": id,
        "app": app,
    })))
}

/// Accepts a multipart upload under the `file` field and stores it
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(format!("Invalid multipart body: {}", err)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(ApiError::internal)?;
        let stored = store_upload(&state.uploads_dir, &filename, &data)?;

        return Ok(Json(json!({
            "message": "File uploaded successfully",
            "filename": stored.filename,
            "filepath": stored.filepath,
            "url": stored.url,
            "size": stored.size,
        })));
    }

    Err(ApiError::Validation("No file part".to_string()))
}

/// Aggregated stats for the last 7 days
pub async fn analytics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let doc = state.store.load();
    let report: AnalyticsReport = analytics_report(&doc, Local::now().date_naive());
    Json(json!({ "analytics": report }))
}

/// Patches known config keys; unknown keys are silently ignored
pub async fn update_config(
    State(state): State<AppState>,
    Json(patch): Json<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut doc = state.store.load();
    for (key, value) in &patch {
        if !doc.config.apply(key, value) {
            tracing::debug!("Ignoring unknown config key: {}", key);
        }
    }
    state.store.save(&doc).map_err(ApiError::internal)?;

    Ok(Json(json!({
        "message": "Config updated successfully",
        "config": doc.config,
    })))
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Attaches the authenticated admin's reply to a rating
pub async fn reply_rating(
    Path((app_id, rating_id)): Path<(u64, String)>,
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Json(body): Json<ReplyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut doc = state.store.load();
    let rating = reply_to_rating(
        &mut doc,
        app_id,
        &rating_id,
        &admin,
        body.message.as_deref().unwrap_or(""),
    )?;
    state.store.save(&doc).map_err(ApiError::internal)?;

    Ok(Json(json!({
        "message": "Reply added successfully",
        "rating": rating,
    })))
}
