//! Application Configuration
//!
//! Domain tunables for the Learning application layer.

use crate::error::{LearningError, LearningResult};

/// Learning application configuration
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Hex characters kept from the serial digest
    pub serial_hash_len: usize,
    /// Grade printed on certificates
    pub certificate_grade: String,
    /// Upper bound on thumbnail uploads (bytes)
    pub thumbnail_max_bytes: usize,
    /// Accepted thumbnail content types
    pub thumbnail_content_types: Vec<String>,
    /// Max characters in a course or lesson title
    pub max_title_len: usize,
    /// Max characters in a rejection reason
    pub max_reason_len: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            serial_hash_len: 16,
            certificate_grade: "Pass".to_string(),
            thumbnail_max_bytes: 5 * 1024 * 1024, // 5 MiB
            thumbnail_content_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
            ],
            max_title_len: 200,
            max_reason_len: 1000,
        }
    }
}

impl LearningConfig {
    /// Create config for development (accepts GIF thumbnails up to 10 MiB)
    pub fn development() -> Self {
        let mut config = Self::default();
        config.thumbnail_max_bytes = 10 * 1024 * 1024;
        config.thumbnail_content_types.push("image/gif".to_string());
        config
    }

    /// Trimmed, non-empty title within the length limit
    pub fn check_title(&self, title: &str) -> LearningResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LearningError::Validation("title must not be empty".to_string()));
        }
        if title.chars().count() > self.max_title_len {
            return Err(LearningError::Validation(format!(
                "title must be at most {} characters",
                self.max_title_len
            )));
        }
        Ok(title.to_string())
    }

    /// Trimmed, non-empty rejection reason within the length limit
    pub fn check_reason(&self, reason: Option<&str>) -> LearningResult<String> {
        let reason = reason.map(str::trim).unwrap_or_default();
        if reason.is_empty() {
            return Err(LearningError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        if reason.chars().count() > self.max_reason_len {
            return Err(LearningError::Validation(format!(
                "reason must be at most {} characters",
                self.max_reason_len
            )));
        }
        Ok(reason.to_string())
    }

    /// File extension for an accepted thumbnail content type
    pub fn thumbnail_extension(&self, content_type: &str) -> LearningResult<&'static str> {
        let content_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !self.thumbnail_content_types.iter().any(|t| *t == content_type) {
            return Err(LearningError::Validation(format!(
                "unsupported thumbnail type `{content_type}`"
            )));
        }

        Ok(match content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        })
    }
}
