#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::fmt;
use toml_config::TomlConfig;

/// Connection settings for the generative-content service.
#[derive(Clone)]
pub struct ServiceConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ServiceConfig {
    /// Explicit values win over the file; the file wins over built-in
    /// defaults. The key has no default.
    pub fn resolve(
        api_base: Option<&str>,
        api_key: Option<&str>,
        model: Option<&str>,
        file: Option<&TomlConfig>,
    ) -> Result<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| file.and_then(TomlConfig::api_key))
            .map(str::to_string);
        let api_key = validation::validate_required_field("api_key", &api_key)?.clone();

        let config = Self {
            api_base: api_base
                .or_else(|| file.and_then(|f| f.service.api_base.as_deref()))
                .unwrap_or(DEFAULT_API_BASE)
                .to_string(),
            api_key,
            model: model
                .or_else(|| file.and_then(|f| f.service.model.as_deref()))
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl ConfigProvider for ServiceConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base", &self.api_base)?;
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_model_id("model", &self.model)?;
        Ok(())
    }
}

/// Raw user selection before validation into a `SearchQuery`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub country: Option<String>,
    pub city: Option<String>,
    pub grocery_list: Option<String>,
}

impl Selection {
    /// Fills whatever the user left out from the config file.
    pub fn or_file(self, file: Option<&TomlConfig>) -> Self {
        let Some(file) = file else {
            return self;
        };
        Self {
            country: self.country.or_else(|| file.location.country.clone()),
            city: self.city.or_else(|| file.location.city.clone()),
            grocery_list: self.grocery_list.or_else(|| file.grocery_list()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ShopError;

    #[test]
    fn test_resolve_uses_defaults() {
        let config = ServiceConfig::resolve(None, Some("k"), None, None).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_resolve_requires_key() {
        let err = ServiceConfig::resolve(None, Some("  "), None, None).unwrap_err();
        assert!(matches!(err, ShopError::MissingConfigError { ref field } if field == "api_key"));
    }

    #[test]
    fn test_explicit_values_beat_file() {
        let file = TomlConfig::from_toml_str(
            "[service]\napi_key = \"file-key\"\nmodel = \"file-model\"\napi_base = \"http://file.example\"\n",
        )
        .unwrap();

        let config =
            ServiceConfig::resolve(None, Some("cli-key"), Some("cli-model"), Some(&file)).unwrap();

        assert_eq!(config.api_key, "cli-key");
        assert_eq!(config.model, "cli-model");
        assert_eq!(config.api_base, "http://file.example");
        assert!(!format!("{:?}", config).contains("cli-key"));
    }

    #[test]
    fn test_selection_falls_back_to_file() {
        let file = TomlConfig::from_toml_str(
            "[location]\ncountry = \"USA\"\ncity = \"Houston\"\n[search]\nitems = [\"Rice\"]\n",
        )
        .unwrap();

        let selection = Selection {
            country: None,
            city: Some("Phoenix".to_string()),
            grocery_list: None,
        }
        .or_file(Some(&file));

        assert_eq!(selection.country.as_deref(), Some("USA"));
        assert_eq!(selection.city.as_deref(), Some("Phoenix"));
        assert_eq!(selection.grocery_list.as_deref(), Some("Rice"));
    }
}
