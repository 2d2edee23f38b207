use crate::catalog::find_app_mut;
use crate::error::ApiError;
use crate::models::{Document, Rating, Reply};
use chrono::Local;
use uuid::Uuid;

/// Result of a successful rating submission
#[derive(Debug, Clone, Copy)]
pub struct RatingOutcome {
    /// New average for the app, rounded to 1 decimal
    pub average: f64,
    /// Total number of ratings the app now has
    pub total: usize,
}

/// Appends a rating to an app and recomputes its average.
///
/// Also bumps the global rating counter and today's daily bucket. The caller
/// is responsible for persisting the document afterwards.
pub fn add_rating(
    doc: &mut Document,
    app_id: u64,
    value: i64,
    review: Option<String>,
    user: Option<String>,
) -> Result<RatingOutcome, ApiError> {
    if !(1..=5).contains(&value) {
        return Err(ApiError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let now = Local::now();
    let today = now.format("%Y-%m-%d").to_string();

    let app = find_app_mut(doc, app_id)
        .ok_or_else(|| ApiError::NotFound("App not found".to_string()))?;

    app.ratings.push(Rating {
        id: Uuid::new_v4().to_string(),
        user: user.unwrap_or_else(|| "Anonymous".to_string()),
        rating: value as u8,
        review: review.unwrap_or_default(),
        date: now.to_rfc3339(),
        reply: None,
    });
    app.recompute_rating();

    let outcome = RatingOutcome {
        average: app.rating,
        total: app.ratings.len(),
    };

    doc.analytics.total_ratings += 1;
    doc.analytics.daily_entry(&today).ratings += 1;

    Ok(outcome)
}

/// Attaches (or overwrites) an admin reply on a rating
pub fn reply_to_rating(
    doc: &mut Document,
    app_id: u64,
    rating_id: &str,
    admin: &str,
    message: &str,
) -> Result<Rating, ApiError> {
    let app = find_app_mut(doc, app_id)
        .ok_or_else(|| ApiError::NotFound("Rating not found".to_string()))?;

    let rating = app
        .ratings
        .iter_mut()
        .find(|r| r.id == rating_id)
        .ok_or_else(|| ApiError::NotFound("Rating not found".to_string()))?;

    rating.reply = Some(Reply {
        admin: admin.to_string(),
        message: message.to_string(),
        date: Local::now().to_rfc3339(),
    });

    Ok(rating.clone())
}
