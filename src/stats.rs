use crate::catalog::find_app_mut;
use crate::error::ApiError;
use crate::models::{App, Document};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Records one download of an app across all counters.
///
/// Increments the app's counter, the global total, today's daily bucket, and
/// the app's category bucket (created on demand). Returns a snapshot of the
/// app so the caller can locate its binary after persisting. Counting happens
/// whether or not a file ends up being served.
pub fn record_download(doc: &mut Document, app_id: u64, today: &str) -> Result<App, ApiError> {
    let app = find_app_mut(doc, app_id)
        .ok_or_else(|| ApiError::NotFound("App not found".to_string()))?;

    app.downloads += 1;
    let category = app.category.clone();
    let snapshot = app.clone();

    doc.analytics.total_downloads += 1;
    doc.analytics.daily_entry(today).downloads += 1;
    doc.analytics.category_entry(&category).downloads += 1;

    Ok(snapshot)
}

/// Aggregated analytics payload for the admin dashboard
#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub total_downloads: u64,
    pub total_ratings: u64,
    pub total_apps: usize,
    /// Today first, going back 7 calendar days
    pub daily_stats: Vec<DailyEntry>,
    /// Top 5 apps by downloads, ties kept in stored order
    pub top_apps: Vec<App>,
    pub category_distribution: Vec<CategoryEntry>,
    /// Mean of all apps' average ratings, 0 on an empty catalog
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub downloads: u64,
    pub ratings: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub apps: u64,
    pub downloads: u64,
}

/// Assembles the admin analytics view for the 7 days ending at `today`
pub fn analytics_report(doc: &Document, today: NaiveDate) -> AnalyticsReport {
    let daily_stats = (0..7)
        .map(|i| {
            let date = (today - Duration::days(i)).format("%Y-%m-%d").to_string();
            let stats = doc.analytics.daily_stats.get(&date).copied().unwrap_or_default();
            DailyEntry {
                date,
                downloads: stats.downloads,
                ratings: stats.ratings,
            }
        })
        .collect();

    let mut top_apps = doc.apps.clone();
    top_apps.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    top_apps.truncate(5);

    let category_distribution = doc
        .analytics
        .category_stats
        .iter()
        .map(|(category, stats)| CategoryEntry {
            category: category.clone(),
            apps: stats.apps,
            downloads: stats.downloads,
        })
        .collect();

    let average_rating = if doc.apps.is_empty() {
        0.0
    } else {
        doc.apps.iter().map(|app| app.rating).sum::<f64>() / doc.apps.len() as f64
    };

    AnalyticsReport {
        total_downloads: doc.analytics.total_downloads,
        total_ratings: doc.analytics.total_ratings,
        total_apps: doc.apps.len(),
        daily_stats,
        top_apps,
        category_distribution,
        average_rating,
    }
}
