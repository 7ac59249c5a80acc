#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::importer::PREVIEW_ROW_LIMIT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use toml_config::TomlConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Connection and session settings, passed explicitly to whatever needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub preview_rows: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            preview_rows: PREVIEW_ROW_LIMIT,
        }
    }
}

impl ClientSettings {
    /// Explicit values win over the file, the file wins over defaults.
    pub fn resolve(
        api_url: Option<String>,
        token: Option<String>,
        file: Option<&TomlConfig>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            base_url: api_url
                .or_else(|| file.and_then(|f| f.base_url().map(str::to_string)))
                .unwrap_or(defaults.base_url),
            token: token.or_else(|| file.and_then(|f| f.token().map(str::to_string))),
            preview_rows: file
                .and_then(TomlConfig::preview_rows)
                .unwrap_or(defaults.preview_rows),
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn api_base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.base_url)?;
        if let Some(token) = &self.token {
            validate_non_empty_string("token", token)?;
        }
        validate_positive_number("preview_rows", self.preview_rows, 1)?;
        Ok(())
    }
}
