//! Profile photo upload rules: allowed formats, size limit and stored file
//! naming.

use crate::error::CoreError;

/// Accepted photo extensions (lowercase, without the dot).
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Default upper bound on an uploaded photo (2 MiB).
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Validate a photo upload by original file name and payload size.
///
/// Returns the lowercase extension on success.
pub fn validate_photo(file_name: &str, size: usize, max_bytes: usize) -> Result<String, CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(
            "Only JPG, JPEG or PNG images are allowed".into(),
        ));
    }

    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Photo exceeds the maximum size of {max_bytes} bytes"
        )));
    }

    Ok(ext)
}

/// Build the stored file name: `{millis}-{original}` with whitespace replaced
/// by underscores and any path components stripped.
pub fn stored_photo_name(original: &str, millis: i64) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{millis}-{cleaned}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        assert_eq!(validate_photo("me.PNG", 10, 100).unwrap(), "png");
        assert_eq!(validate_photo("me.jpeg", 10, 100).unwrap(), "jpeg");
    }

    #[test]
    fn rejects_other_formats() {
        assert_matches!(
            validate_photo("me.gif", 10, 100),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_photo("no_extension", 10, 100),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_oversized_photos() {
        assert_matches!(
            validate_photo("me.jpg", DEFAULT_MAX_PHOTO_BYTES + 1, DEFAULT_MAX_PHOTO_BYTES),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn stored_name_replaces_spaces_and_strips_directories() {
        assert_eq!(
            stored_photo_name("my profile pic.png", 1700000000000),
            "1700000000000-my_profile_pic.png"
        );
        assert_eq!(
            stored_photo_name("../../etc/passwd.png", 1),
            "1-passwd.png"
        );
    }
}
