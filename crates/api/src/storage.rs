//! Local disk storage for profile photos.

use beacon_core::upload::{stored_photo_name, validate_photo};
use chrono::Utc;

use crate::config::UploadConfig;
use crate::error::{AppError, AppResult};

/// URL prefix uploaded files are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Validate and write a photo, returning the path recorded on the user
/// (`uploads/<stored name>`).
pub async fn save_photo(
    config: &UploadConfig,
    original_name: &str,
    data: &[u8],
) -> AppResult<String> {
    validate_photo(original_name, data.len(), config.max_bytes)?;

    let stored_name = stored_photo_name(original_name, Utc::now().timestamp_millis());

    tokio::fs::create_dir_all(&config.dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(config.dir.join(&stored_name), data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store photo: {e}")))?;

    tracing::debug!(file = %stored_name, bytes = data.len(), "Stored profile photo");
    Ok(format!("{}/{stored_name}", UPLOADS_ROUTE.trim_start_matches('/')))
}

/// Remove a photo previously written by [`save_photo`], given the path it
/// returned. Failures are logged, not returned.
pub async fn discard_photo(config: &UploadConfig, stored_path: &str) {
    let prefix = format!("{}/", UPLOADS_ROUTE.trim_start_matches('/'));
    let Some(stored_name) = stored_path.strip_prefix(&prefix) else {
        tracing::warn!(path = %stored_path, "Not an upload path, leaving file in place");
        return;
    };

    match tokio::fs::remove_file(config.dir.join(stored_name)).await {
        Ok(()) => tracing::debug!(file = %stored_name, "Discarded profile photo"),
        Err(e) => tracing::warn!(file = %stored_name, error = %e, "Failed to discard profile photo"),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use beacon_core::error::CoreError;

    use super::*;

    fn temp_config(max_bytes: usize) -> UploadConfig {
        UploadConfig {
            dir: std::env::temp_dir().join(format!("beacon-uploads-{}", uuid::Uuid::new_v4())),
            max_bytes,
        }
    }

    #[tokio::test]
    async fn saves_photo_under_upload_dir() {
        let config = temp_config(1024);

        let path = save_photo(&config, "my face.png", b"png-bytes").await.unwrap();

        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with("-my_face.png"));
        let file_name = path.trim_start_matches("uploads/");
        let stored = tokio::fs::read(config.dir.join(file_name)).await.unwrap();
        assert_eq!(stored, b"png-bytes");

        tokio::fs::remove_dir_all(&config.dir).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_disallowed_format_without_writing() {
        let config = temp_config(1024);

        assert_matches!(
            save_photo(&config, "anim.gif", b"gif").await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert!(!config.dir.exists());
    }

    #[tokio::test]
    async fn discard_removes_saved_photo() {
        let config = temp_config(1024);
        let path = save_photo(&config, "me.jpg", b"jpg-bytes").await.unwrap();

        discard_photo(&config, &path).await;

        let mut entries = tokio::fs::read_dir(&config.dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        tokio::fs::remove_dir_all(&config.dir).await.unwrap();
    }
}
