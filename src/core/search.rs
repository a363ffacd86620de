use crate::core::{parser, prompt};
use crate::domain::model::{Country, GroceryResponse};
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{Result, ShopError};

/// A validated search: a catalog country, a non-empty city and an
/// optional free-text grocery list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    country: Country,
    city: String,
    grocery_list: String,
}

impl SearchQuery {
    pub fn new(country: Country, city: &str, grocery_list: &str) -> Result<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ShopError::MissingSelection {
                field: "city".to_string(),
            });
        }

        if !country.has_city(city) {
            tracing::warn!(
                "City '{}' is not in the {} catalog, searching anyway",
                city,
                country
            );
        }

        Ok(Self {
            country,
            city: city.to_string(),
            grocery_list: grocery_list.to_string(),
        })
    }

    /// Builds a query from raw user selections, as typed on the command line.
    pub fn from_selection(
        country: Option<&str>,
        city: Option<&str>,
        grocery_list: Option<&str>,
    ) -> Result<Self> {
        let country = country.map(str::trim).filter(|c| !c.is_empty());
        let city = city.map(str::trim).filter(|c| !c.is_empty());

        let (country, city) = match (country, city) {
            (Some(country), Some(city)) => (country, city),
            (None, _) => {
                return Err(ShopError::MissingSelection {
                    field: "country".to_string(),
                })
            }
            (_, None) => {
                return Err(ShopError::MissingSelection {
                    field: "city".to_string(),
                })
            }
        };

        Self::new(country.parse()?, city, grocery_list.unwrap_or_default())
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn grocery_list(&self) -> &str {
        &self.grocery_list
    }
}

/// One prompt, one model call, one parse.
pub struct PriceFinder<M: GenerativeModel> {
    model: M,
}

impl<M: GenerativeModel> PriceFinder<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Any failure from the model is logged with its cause and returned as
    /// [`ShopError::LivePricesUnavailable`].
    pub async fn find_prices(&self, query: &SearchQuery) -> Result<GroceryResponse> {
        let request = prompt::build_request(query);
        tracing::info!(
            "🔎 Requesting prices for {}, {} ({:?} mode)",
            query.city(),
            query.country(),
            prompt::PromptMode::for_list(query.grocery_list())
        );

        let output = match self.model.generate(&request).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("❌ Generative service call failed: {}", e);
                return Err(e.into_live_prices_unavailable());
            }
        };

        let response = parser::parse_output(&output);
        if !output.text.trim().is_empty() && !response.has_listings() {
            tracing::warn!(
                "Reply did not match the STORE/ITEM grammar; showing intro only"
            );
        }

        tracing::info!(
            "✅ Parsed {} stores, {} items, {} sources",
            response.stores.len(),
            response.items.len(),
            response.sources.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GenerationOutput, GenerationRequest, GroundingCitation};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedModel {
        reply: std::result::Result<GenerationOutput, u16>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedModel {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(GenerationOutput {
                    text: text.to_string(),
                    citations: vec![GroundingCitation {
                        title: Some("Flyer".to_string()),
                        uri: Some("https://flyers.example/1".to_string()),
                    }],
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(output) => Ok(output.clone()),
                Err(status) => Err(ShopError::ServiceError {
                    status: *status,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_selection_requires_country_and_city() {
        let missing_country = SearchQuery::from_selection(None, Some("Paris"), None);
        assert!(matches!(
            missing_country,
            Err(ShopError::MissingSelection { ref field }) if field == "country"
        ));

        let blank_city = SearchQuery::from_selection(Some("France"), Some("  "), None);
        assert!(matches!(
            blank_city,
            Err(ShopError::MissingSelection { ref field }) if field == "city"
        ));

        let unknown = SearchQuery::from_selection(Some("Narnia"), Some("Cair"), None);
        assert!(matches!(unknown, Err(ShopError::UnknownCountry { .. })));
    }

    #[test]
    fn test_city_outside_catalog_is_accepted() {
        let query = SearchQuery::from_selection(Some("Germany"), Some("Dresden"), None).unwrap();
        assert_eq!(query.city(), "Dresden");
        assert_eq!(query.grocery_list(), "");
    }

    #[tokio::test]
    async fn test_find_prices_parses_reply_and_sources() {
        let finder = PriceFinder::new(CannedModel::ok(
            "Intro\n### ITEM: Milk\nSTORE: Acme\nPRICE: $2\n---",
        ));
        let query = SearchQuery::new(Country::Usa, "Chicago", "Milk").unwrap();

        let response = finder.find_prices(&query).await.unwrap();

        assert_eq!(response.intro, "Intro");
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.sources.len(), 1);

        let seen = finder.model().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("Milk"));
    }

    #[tokio::test]
    async fn test_find_prices_collapses_service_errors() {
        let finder = PriceFinder::new(CannedModel::failing(503));
        let query = SearchQuery::new(Country::Usa, "Chicago", "").unwrap();

        let err = finder.find_prices(&query).await.unwrap_err();

        assert!(matches!(err, ShopError::LivePricesUnavailable { .. }));
        assert_eq!(
            err.user_friendly_message(),
            crate::utils::error::LIVE_PRICES_UNAVAILABLE
        );
    }
}
