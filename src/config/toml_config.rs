use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub location: LocationSection,
    #[serde(default)]
    pub search: SearchSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSection {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSection {
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSection {
    /// Items to compare. Empty means the general staples search.
    #[serde(default)]
    pub items: Vec<String>,
}

impl TomlConfig {
    /// Loads a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShopError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text, expanding `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables stay
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key, unless it is missing or still an unexpanded `${VAR}`.
    pub fn api_key(&self) -> Option<&str> {
        self.service
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
    }

    /// Items joined the way a user would type them.
    pub fn grocery_list(&self) -> Option<String> {
        let items: Vec<&str> = self
            .search
            .items
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .collect();

        (!items.is_empty()).then(|| items.join(", "))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(api_base) = &self.service.api_base {
            validation::validate_url("service.api_base", api_base)?;
        }
        if let Some(model) = &self.service.model {
            validation::validate_model_id("service.model", model)?;
        }
        if let Some(country) = &self.location.country {
            country.parse::<crate::domain::model::Country>()?;
        }
        Ok(())
    }
}
