use crate::models::{App, Document};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// How many apps to sample when nothing is explicitly featured
const FEATURED_FALLBACK_COUNT: usize = 3;

/// Sorts apps in place according to the requested key.
///
/// Unrecognized keys leave the stored (insertion) order unchanged. All sorts
/// are stable so ties keep their original relative order.
pub fn sort_apps(apps: &mut [App], sort: &str) {
    match sort {
        // release_date is compared as a string; YYYY-MM-DD makes that
        // equivalent to a date comparison
        "newest" => apps.sort_by(|a, b| b.release_date.cmp(&a.release_date)),
        "popular" => apps.sort_by(|a, b| b.downloads.cmp(&a.downloads)),
        "rating" => apps.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
        }),
        "name" => apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        _ => {}
    }
}

/// Looks up an app by id
pub fn find_app(doc: &Document, id: u64) -> Option<&App> {
    doc.apps.iter().find(|app| app.id == id)
}

pub fn find_app_mut(doc: &mut Document, id: u64) -> Option<&mut App> {
    doc.apps.iter_mut().find(|app| app.id == id)
}

/// Next id for a newly added app: max existing + 1, or 1 on an empty catalog
pub fn next_app_id(doc: &Document) -> u64 {
    doc.apps.iter().map(|app| app.id).max().map_or(1, |id| id + 1)
}

/// Case-insensitive substring search over name, description, and tags,
/// optionally narrowed to an exact category. An empty query matches everything.
pub fn search<'a>(doc: &'a Document, query: &str, category: Option<&str>) -> Vec<&'a App> {
    let query = query.to_lowercase();
    doc.apps
        .iter()
        .filter(|app| {
            app.name.to_lowercase().contains(&query)
                || app.description.to_lowercase().contains(&query)
                || app.tags.join(" ").to_lowercase().contains(&query)
        })
        .filter(|app| category.map_or(true, |c| app.category == c))
        .collect()
}

/// Apps flagged as featured, or a random sample of up to 3 when none are.
///
/// The RNG is passed in so the fallback can be made deterministic in tests.
pub fn featured_apps<R: Rng + ?Sized>(doc: &Document, rng: &mut R) -> Vec<App> {
    let flagged: Vec<App> = doc
        .apps
        .iter()
        .filter(|app| app.featured)
        .cloned()
        .collect();

    if !flagged.is_empty() || doc.apps.is_empty() {
        return flagged;
    }

    doc.apps
        .choose_multiple(rng, FEATURED_FALLBACK_COUNT.min(doc.apps.len()))
        .cloned()
        .collect()
}
