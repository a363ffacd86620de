pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::cli::{CliConfig, OutputFormat};

pub use self::adapters::gemini::GeminiClient;
pub use self::config::{Selection, ServiceConfig};
pub use self::core::search::{PriceFinder, SearchQuery};
pub use self::core::session::{SearchSession, SearchView};
pub use self::domain::model::{
    BudgetRating, Country, GroceryItem, GroceryResponse, Source, StoreComparison,
};
pub use self::utils::error::{Result, ShopError};
