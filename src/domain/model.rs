use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price text a store reports for an item that it does not stock.
pub const NOT_CARRIED: &str = "Not carried";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BudgetRating {
    Low,
    #[default]
    Mid,
    High,
}

impl BudgetRating {
    /// Lenient parse used on model output: anything unrecognised is `Mid`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => BudgetRating::Low,
            "high" => BudgetRating::High,
            _ => BudgetRating::Mid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetRating::Low => "Low",
            BudgetRating::Mid => "Mid",
            BudgetRating::High => "High",
        }
    }
}

impl fmt::Display for BudgetRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePrice {
    pub store: String,
    pub price: String,
}

impl StorePrice {
    pub fn is_not_carried(&self) -> bool {
        self.price
            .to_lowercase()
            .contains(&NOT_CARRIED.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePrice {
    pub item: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub name: String,
    pub best_store: String,
    pub best_price: String,
    pub comparison: Vec<StorePrice>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreComparison {
    pub name: String,
    pub budget_rating: BudgetRating,
    pub best_for: String,
    pub note: String,
    pub example_prices: Vec<ExamplePrice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryResponse {
    pub intro: String,
    pub items: Vec<GroceryItem>,
    pub stores: Vec<StoreComparison>,
    pub sources: Vec<Source>,
}

impl GroceryResponse {
    pub fn has_listings(&self) -> bool {
        !self.items.is_empty() || !self.stores.is_empty()
    }
}

/// Citation as it arrives from the grounding metadata, before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingCitation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// What the model is asked for: one prompt, one system instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub search_grounding: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    pub text: String,
    pub citations: Vec<GroundingCitation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    Canada,
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    Australia,
    Germany,
    India,
    France,
}

impl Country {
    pub const ALL: [Country; 7] = [
        Country::Usa,
        Country::Canada,
        Country::UnitedKingdom,
        Country::Australia,
        Country::Germany,
        Country::India,
        Country::France,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Canada => "Canada",
            Country::UnitedKingdom => "United Kingdom",
            Country::Australia => "Australia",
            Country::Germany => "Germany",
            Country::India => "India",
            Country::France => "France",
        }
    }

    pub fn cities(&self) -> &'static [&'static str] {
        match self {
            Country::Usa => &[
                "New York",
                "Los Angeles",
                "Chicago",
                "Houston",
                "Phoenix",
                "Philadelphia",
                "San Antonio",
                "San Diego",
            ],
            Country::Canada => &[
                "Toronto", "Montreal", "Vancouver", "Calgary", "Edmonton", "Ottawa", "Winnipeg",
            ],
            Country::UnitedKingdom => &[
                "London",
                "Birmingham",
                "Manchester",
                "Glasgow",
                "Liverpool",
                "Leeds",
                "Sheffield",
            ],
            Country::Australia => &[
                "Sydney",
                "Melbourne",
                "Brisbane",
                "Perth",
                "Adelaide",
                "Gold Coast",
            ],
            Country::Germany => &["Berlin", "Hamburg", "Munich", "Cologne", "Frankfurt"],
            Country::India => &[
                "Mumbai",
                "Delhi",
                "Bangalore",
                "Hyderabad",
                "Ahmedabad",
                "Chennai",
            ],
            Country::France => &["Paris", "Marseille", "Lyon", "Toulouse", "Nice"],
        }
    }

    pub fn has_city(&self, city: &str) -> bool {
        let city = city.trim();
        self.cities().iter().any(|c| c.eq_ignore_ascii_case(city))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Country {
    type Err = crate::utils::error::ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let alias = match wanted.to_ascii_lowercase().as_str() {
            "us" | "united states" | "united states of america" => Some(Country::Usa),
            "uk" | "great britain" => Some(Country::UnitedKingdom),
            _ => None,
        };

        alias
            .or_else(|| {
                Country::ALL
                    .into_iter()
                    .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| crate::utils::error::ShopError::UnknownCountry {
                value: wanted.to_string(),
            })
    }
}
