//! Text and JSON rendering of a search session.

use crate::core::search::SearchQuery;
use crate::core::session::SearchView;
use crate::domain::model::{Country, GroceryItem, GroceryResponse, StoreComparison};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

const NO_ITEMS_HEADLINE: &str = "Searching for specifics...";
const NO_ITEMS_BODY: &str = "We found general store data but specific item tags are still being verified. Check the summary above for immediate insights.";

pub fn render_view(view: &SearchView<'_>) -> String {
    match view {
        SearchView::Welcome => render_welcome(),
        SearchView::Loading => "⏳ Crawling Live Inventories...".to_string(),
        SearchView::Error(message) => format!("❌ {}", message),
        SearchView::Results {
            query,
            response,
            searched_at,
        } => render_results(query, response, *searched_at),
    }
}

pub fn render_welcome() -> String {
    [
        "Local Price Intelligence.",
        "Pick a country and city to see where staples are cheapest,",
        "or add --items to compare your own list at major retailers.",
    ]
    .join("\n")
}

pub fn render_json(response: &GroceryResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

pub fn render_results(
    query: &SearchQuery,
    response: &GroceryResponse,
    searched_at: Option<DateTime<Utc>>,
) -> String {
    let mut lines = vec![format!("🛒 Shopping in {}, {}", query.city(), query.country())];
    if let Some(at) = searched_at {
        lines.push(format!("   as of {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.push(String::new());
    lines.push(response.intro.clone());

    if !response.stores.is_empty() {
        lines.push(String::new());
        lines.push("🏪 Market Leaderboard".to_string());
        for store in &response.stores {
            lines.push(String::new());
            lines.extend(store_card(store));
        }
    }

    lines.push(String::new());
    lines.push("🧾 Item Price Comparison".to_string());
    if response.items.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", NO_ITEMS_HEADLINE));
        lines.push(format!("  {}", NO_ITEMS_BODY));
    }
    for item in &response.items {
        lines.push(String::new());
        lines.extend(item_card(item));
    }

    if !response.sources.is_empty() {
        lines.push(String::new());
        lines.push("🔗 Source Verification".to_string());
        for source in &response.sources {
            lines.push(format!("  - {} <{}>", source.title, source.uri));
        }
    }

    lines.join("\n")
}

fn store_card(store: &StoreComparison) -> Vec<String> {
    let mut lines = vec![
        format!("  {}  [{} Budget]", store.name, store.budget_rating),
        format!("    🏆 {}", store.best_for),
    ];

    if !store.example_prices.is_empty() {
        lines.push("    Typical pricing:".to_string());
        let width = store
            .example_prices
            .iter()
            .map(|ex| ex.item.chars().count())
            .max()
            .unwrap_or(0);
        for ex in &store.example_prices {
            lines.push(format!("      {:<width$}  {}", ex.item, ex.price, width = width));
        }
    }

    if !store.note.is_empty() {
        lines.push(format!("    \"{}\"", store.note));
    }
    lines
}

fn item_card(item: &GroceryItem) -> Vec<String> {
    let mut lines = vec![format!("  {}", item.name)];
    if !item.description.is_empty() {
        lines.push(format!("    {}", item.description));
    }
    lines.push(format!(
        "    ✨ Market winner: {}  {}",
        item.best_store.to_uppercase(),
        item.best_price
    ));

    if !item.comparison.is_empty() {
        lines.push("    Full comparison:".to_string());
        let width = item
            .comparison
            .iter()
            .map(|c| c.store.chars().count())
            .max()
            .unwrap_or(0);
        for entry in &item.comparison {
            let marker = if entry.is_not_carried() { "✗" } else { "•" };
            lines.push(format!(
                "      {} {:<width$}  {}",
                marker,
                entry.store,
                entry.price,
                width = width
            ));
        }
    }
    lines
}

pub fn render_locations() -> String {
    Country::ALL
        .iter()
        .map(|country| format!("{}: {}", country, country.cities().join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
