use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root document persisted as a single JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub apps: Vec<App>,
    /// Category names in insertion order, deduplicated on add
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub analytics: Analytics,
    #[serde(default)]
    pub config: StoreConfig,
}

impl Document {
    /// Adds a category if it is not already present
    pub fn add_category(&mut self, category: &str) {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
    }
}

/// One catalog entry representing a distributable application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub downloads: u64,
    /// Derived: rounded mean of all rating values, 0 when there are none
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub privacy_policy: String,
    #[serde(default)]
    pub support_email: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub whats_new: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub screenshot_urls: Vec<String>,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub apk_path: String,
    #[serde(default)]
    pub external_link: String,
}

impl App {
    /// Recomputes the derived average from the rating list, rounded to 1 decimal
    pub fn recompute_rating(&mut self) {
        if self.ratings.is_empty() {
            self.rating = 0.0;
            return;
        }
        let sum: u64 = self.ratings.iter().map(|r| u64::from(r.rating)).sum();
        let mean = sum as f64 / self.ratings.len() as f64;
        self.rating = (mean * 10.0).round() / 10.0;
    }
}

/// A user-submitted score/review attached to an app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub user: String,
    pub rating: u8,
    pub review: String,
    pub date: String,
    #[serde(default)]
    pub reply: Option<Reply>,
}

/// Admin answer to a rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub admin: String,
    pub message: String,
    pub date: String,
}

/// Aggregate counters maintained incrementally by download and rating events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub total_ratings: u64,
    /// Calendar date (YYYY-MM-DD, server local time) -> per-day counters
    #[serde(default)]
    pub daily_stats: BTreeMap<String, DayStats>,
    /// Category name -> per-category counters
    #[serde(default)]
    pub category_stats: BTreeMap<String, CategoryStats>,
}

impl Analytics {
    pub fn daily_entry(&mut self, date: &str) -> &mut DayStats {
        self.daily_stats.entry(date.to_string()).or_default()
    }

    pub fn category_entry(&mut self, category: &str) -> &mut CategoryStats {
        self.category_stats.entry(category.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DayStats {
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub ratings: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub apps: u64,
}

/// Store-wide configuration values, patched via the admin surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_privacy_policy")]
    pub privacy_policy: String,
    #[serde(default = "default_support_email")]
    pub support_email: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_website_url")]
    pub website_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            privacy_policy: default_privacy_policy(),
            support_email: default_support_email(),
            admin_email: default_admin_email(),
            website_url: default_website_url(),
        }
    }
}

impl StoreConfig {
    /// Overwrites a known key; unknown keys are ignored and reported as false
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "privacy_policy" => self.privacy_policy = value.to_string(),
            "support_email" => self.support_email = value.to_string(),
            "admin_email" => self.admin_email = value.to_string(),
            "website_url" => self.website_url = value.to_string(),
            _ => return false,
        }
        true
    }
}

fn default_privacy_policy() -> String {
    "https://yourdomain.com/privacy".to_string()
}

fn default_support_email() -> String {
    "support@yourdomain.com".to_string()
}

fn default_admin_email() -> String {
    "admin@yourdomain.com".to_string()
}

fn default_website_url() -> String {
    "https://yourdomain.com".to_string()
}
