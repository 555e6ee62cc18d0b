//! Remote API endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Validated base URL of the journal backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Validate and normalize the backend base URL. Trailing slashes are
    /// stripped so endpoint paths can be appended uniformly.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_text_option(Some(base_url.into())).ok_or_else(|| {
            Error::InvalidConfiguration("API base URL must not be empty".to_string())
        })?;
        if !is_http_url(&base_url) {
            return Err(Error::InvalidConfiguration(
                "API base URL must include http:// or https://".to_string(),
            ));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_values() {
        assert!(ApiConfig::new("").is_err());
        assert!(ApiConfig::new("api.example.com").is_err());
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = ApiConfig::new("https://api.example.com/").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(
            config.endpoint("/journal/getAllEntries"),
            "https://api.example.com/journal/getAllEntries"
        );
    }
}
