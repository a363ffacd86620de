use crate::config::toml_config::TomlConfig;
use crate::config::{Selection, ServiceConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Cards for the terminal
    #[default]
    Text,
    /// The parsed response as JSON
    Json,
}

#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "smart-shop")]
#[command(about = "Compare live grocery prices in your city")]
pub struct CliConfig {
    /// Country to search in (see --list-locations)
    #[arg(long)]
    pub country: Option<String>,

    /// City to search in
    #[arg(long)]
    pub city: Option<String>,

    /// Items to compare, e.g. "Bananas, Milk, Cage-free Eggs". Omit for the
    /// most affordable staples.
    #[arg(short, long)]
    pub items: Option<String>,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the generative language API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Model id
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the supported countries and cities and exit
    #[arg(long)]
    pub list_locations: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("country", &self.country)
            .field("city", &self.city)
            .field("items", &self.items)
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("format", &self.format)
            .finish()
    }
}

impl CliConfig {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        let Some(path) = &self.config else {
            return Ok(None);
        };
        tracing::info!("📁 Loading configuration from: {}", path.display());
        let file = TomlConfig::from_file(path)?;
        file.validate()?;
        Ok(Some(file))
    }

    pub fn service_config(&self, file: Option<&TomlConfig>) -> Result<ServiceConfig> {
        ServiceConfig::resolve(
            self.api_base.as_deref(),
            self.api_key.as_deref(),
            self.model.as_deref(),
            file,
        )
    }

    pub fn selection(&self, file: Option<&TomlConfig>) -> Selection {
        Selection {
            country: self.country.clone(),
            city: self.city.clone(),
            grocery_list: self.items.clone(),
        }
        .or_file(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::try_parse_from([
            "smart-shop",
            "--country",
            "USA",
            "--city",
            "New York",
            "-i",
            "Milk, Eggs",
            "--api-key",
            "k",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        let selection = config.selection(None);
        assert_eq!(selection.city.as_deref(), Some("New York"));
        assert_eq!(selection.grocery_list.as_deref(), Some("Milk, Eggs"));

        let service = config.service_config(None).unwrap();
        assert_eq!(service.api_key, "k");
        assert!(!format!("{:?}", config).contains("\"k\""));
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["smart-shop", "--list-locations"]).unwrap();
        assert!(config.list_locations);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.load_file().unwrap().is_none());
    }
}
