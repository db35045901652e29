//! Application configuration and constants

use std::time::Duration;

// === API ===
pub const DEFAULT_API_URL: &str = "http://localhost:1234";
pub const API_URL_ENV: &str = "CAPTIONER_API_URL";
pub const API_VERSION_SEGMENT: &str = "/v1";

pub const LIST_TIMEOUT: Duration = Duration::from_secs(10);
pub const CAPTION_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_TOKENS: u32 = 300;
pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

// === Prompting ===
pub const DEFAULT_PROMPT: &str = "Describe this image in detail.";

/// Substrings that mark a model id as vision-capable.
pub const VISION_KEYWORDS: &[&str] = &["vision", "llava", "image", "clip", "blip", "img"];

// === File Extensions ===
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];
pub const CAPTION_EXT: &str = "txt";

/// Connection settings for the inference service.
///
/// Built once and copied into every [`crate::api::ApiClient`]; changing the
/// endpoint means building a new config, never mutating a shared one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub list_timeout: Duration,
    pub caption_timeout: Duration,
    pub max_tokens: u32,
    pub retries: u32,
}

impl ApiConfig {
    pub fn new(url: &str) -> Self {
        Self {
            base_url: normalize_base_url(url),
            list_timeout: LIST_TIMEOUT,
            caption_timeout: CAPTION_TIMEOUT,
            max_tokens: MAX_TOKENS,
            retries: 0,
        }
    }

    /// Resolve the base URL: explicit value, then `CAPTIONER_API_URL`, then the default.
    pub fn resolve(explicit: Option<&str>) -> Self {
        if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
            return Self::new(url);
        }

        if let Ok(env_url) = std::env::var(API_URL_ENV) {
            if !env_url.trim().is_empty() {
                crate::ui::debug(&format!("Using {}: {}", API_URL_ENV, env_url));
                return Self::new(&env_url);
            }
        }

        Self::new(DEFAULT_API_URL)
    }

    /// Same settings against a different endpoint.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = normalize_base_url(url);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Make sure the URL ends with exactly one `/v1` segment.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with(API_VERSION_SEGMENT) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_VERSION_SEGMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_version_segment() {
        assert_eq!(normalize_base_url("http://localhost:1234"), "http://localhost:1234/v1");
        assert_eq!(normalize_base_url("http://localhost:1234/"), "http://localhost:1234/v1");
    }

    #[test]
    fn keeps_existing_version_segment() {
        assert_eq!(normalize_base_url("https://api.example.com/v1"), "https://api.example.com/v1");
        assert_eq!(normalize_base_url("https://api.example.com/v1/"), "https://api.example.com/v1");
    }

    #[test]
    fn endpoint_joins_paths() {
        let config = ApiConfig::new("http://host:8080");
        assert_eq!(config.endpoint("models"), "http://host:8080/v1/models");
        assert_eq!(config.endpoint("/chat/completions"), "http://host:8080/v1/chat/completions");
    }

    #[test]
    fn changing_url_keeps_other_settings() {
        let config = ApiConfig::new("http://a").with_retries(3).with_base_url("http://b/");
        assert_eq!(config.base_url(), "http://b/v1");
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn explicit_url_wins() {
        let config = ApiConfig::resolve(Some("http://explicit:1"));
        assert_eq!(config.base_url(), "http://explicit:1/v1");
        assert_eq!(config.retries, 0);
        assert_eq!(config.max_tokens, MAX_TOKENS);
    }
}
