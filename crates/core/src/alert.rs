//! Alert lifecycle rules: input validation, archival comment policy and the
//! dwell-time expiry check used by the sweeper.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Longest comment accepted when archiving an alert, in characters.
pub const COMMENT_MAX_CHARS: usize = 120;

/// Comment stored on a completed alert when none is supplied.
pub const DEFAULT_COMMENT: &str = "no comment";

/// How long an alert may stay active before the sweeper archives it.
pub const DEFAULT_MAX_AGE_MINS: i64 = 40;

/// How often the sweeper scans active alerts.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Validate a latitude/longitude pair.
///
/// Both values must be finite and inside the WGS84 ranges
/// (`-90..=90`, `-180..=180`).
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoreError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(CoreError::Validation(
            "lat and lng must be finite numbers".into(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoreError::Validation(format!(
            "lat must be between -90 and 90, got {lat}"
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoreError::Validation(format!(
            "lng must be between -180 and 180, got {lng}"
        )));
    }
    Ok(())
}

/// Resolve the comment to store on a completed alert.
///
/// `None` or a whitespace-only comment yields [`DEFAULT_COMMENT`]. Length is
/// counted in Unicode scalar values, not bytes.
pub fn resolve_comment(comment: Option<&str>) -> Result<String, CoreError> {
    let Some(raw) = comment else {
        return Ok(DEFAULT_COMMENT.to_string());
    };

    let count = raw.chars().count();
    if count > COMMENT_MAX_CHARS {
        return Err(CoreError::Validation(format!(
            "comment must be at most {COMMENT_MAX_CHARS} characters, got {count}"
        )));
    }

    if raw.trim().is_empty() {
        Ok(DEFAULT_COMMENT.to_string())
    } else {
        Ok(raw.to_string())
    }
}

/// Whether an alert created at `created_at` has outlived `max_age` at `now`.
///
/// The comparison is strict: an alert exactly `max_age` old is still active.
pub fn is_expired(created_at: Timestamp, now: Timestamp, max_age: Duration) -> bool {
    now - created_at > max_age
}
