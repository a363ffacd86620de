//! Turns the model's delimiter-formatted answer into a [`GroceryResponse`].
//!
//! The grammar is the one requested by [`crate::core::prompt::SYSTEM_INSTRUCTION`]:
//! sections separated by `---`, each opened by a `### STORE:` or `### ITEM:`
//! header and followed by `KEY: value` lines. Nothing here fails; fields that
//! cannot be found fall back to defaults and unusable entries are skipped.

use crate::domain::model::{
    BudgetRating, ExamplePrice, GenerationOutput, GroceryItem, GroceryResponse,
    GroundingCitation, Source, StoreComparison, StorePrice,
};
use std::collections::HashSet;

pub const SECTION_DELIMITER: &str = "---";
pub const STORE_MARKER: &str = "### STORE:";
pub const ITEM_MARKER: &str = "### ITEM:";

pub const DEFAULT_INTRO: &str = "Live market analysis for your location:";
pub const DEFAULT_BEST_FOR: &str = "General Groceries";
pub const DEFAULT_BEST_STORE: &str = "Local Grocer";
pub const DEFAULT_BEST_PRICE: &str = "Check store";
pub const DEFAULT_EXAMPLE_ITEM: &str = "Item";
pub const DEFAULT_SOURCE_TITLE: &str = "Source";

/// Price value that marks a pair as unusable.
pub const MISSING_PRICE: &str = "N/A";

pub fn parse_output(output: &GenerationOutput) -> GroceryResponse {
    let mut response = parse_response_text(&output.text);
    response.sources = collect_sources(&output.citations);
    response
}

/// Parses the free-text body. `sources` is left empty; citations live in
/// the grounding metadata, see [`collect_sources`].
pub fn parse_response_text(text: &str) -> GroceryResponse {
    let mut items = Vec::new();
    let mut stores = Vec::new();

    for section in text
        .split(SECTION_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let lines: Vec<&str> = section
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if section.contains(STORE_MARKER) {
            stores.push(parse_store(&lines));
        }

        if section.contains(ITEM_MARKER) {
            match parse_item(&lines) {
                Some(item) => items.push(item),
                None => tracing::debug!("Skipping item section without a name"),
            }
        }
    }

    tracing::debug!(
        "Parsed {} stores and {} items from {} bytes of text",
        stores.len(),
        items.len(),
        text.len()
    );

    GroceryResponse {
        intro: extract_intro(text),
        items,
        stores,
        sources: Vec::new(),
    }
}

pub fn extract_intro(text: &str) -> String {
    let before_store = text.split(STORE_MARKER).next().unwrap_or_default();
    let intro = before_store.split(ITEM_MARKER).next().unwrap_or_default().trim();

    if intro.is_empty() {
        DEFAULT_INTRO.to_string()
    } else {
        intro.to_string()
    }
}

fn parse_store(lines: &[&str]) -> StoreComparison {
    let name = header_value(lines, STORE_MARKER).unwrap_or_default();
    let budget_rating = field(lines, "BUDGET:")
        .map(BudgetRating::parse_or_default)
        .unwrap_or_default();
    let best_for = field(lines, "BEST_FOR:").unwrap_or(DEFAULT_BEST_FOR);
    let note = field(lines, "NOTE:").unwrap_or_default();

    let example_prices = split_pairs(field(lines, "EXAMPLES:").unwrap_or_default())
        .filter_map(|(item, price)| {
            let price = price?;
            Some(ExamplePrice {
                item: if item.is_empty() {
                    DEFAULT_EXAMPLE_ITEM.to_string()
                } else {
                    item.to_string()
                },
                price: price.to_string(),
            })
        })
        .collect();

    StoreComparison {
        name,
        budget_rating,
        best_for: best_for.to_string(),
        note: note.to_string(),
        example_prices,
    }
}

fn parse_item(lines: &[&str]) -> Option<GroceryItem> {
    let name = header_value(lines, ITEM_MARKER).filter(|n| !n.is_empty())?;

    let comparison = split_pairs(field(lines, "COMPARISON:").unwrap_or_default())
        .filter_map(|(store, price)| {
            if store.is_empty() {
                return None;
            }
            Some(StorePrice {
                store: store.to_string(),
                price: price?.to_string(),
            })
        })
        .collect();

    Some(GroceryItem {
        name,
        best_store: field(lines, "STORE:")
            .unwrap_or(DEFAULT_BEST_STORE)
            .to_string(),
        best_price: field(lines, "PRICE:")
            .unwrap_or(DEFAULT_BEST_PRICE)
            .to_string(),
        comparison,
        description: field(lines, "TIP:").unwrap_or_default().to_string(),
    })
}

/// Text after `marker` on the first line that contains it.
fn header_value(lines: &[&str], marker: &str) -> Option<String> {
    lines
        .iter()
        .find_map(|line| line.split_once(marker))
        .map(|(_, rest)| rest.trim().to_string())
}

/// Value of the first line starting with `key`. Empty values count as absent.
fn field<'a>(lines: &[&'a str], key: &str) -> Option<&'a str> {
    lines
        .iter()
        .copied()
        .find_map(|line| line.strip_prefix(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Splits `a: 1, b: 2` into `(label, price)` pairs on the first colon.
/// The price is `None` when missing, empty or the `N/A` sentinel.
fn split_pairs(value: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    value.split(',').map(|entry| match entry.split_once(':') {
        Some((label, price)) => {
            let price = price.trim();
            let price = (!price.is_empty() && price != MISSING_PRICE).then_some(price);
            (label.trim(), price)
        }
        None => (entry.trim(), None),
    })
}

/// Keeps citations that carry a web uri, deduplicated by uri. The first
/// title seen for a uri wins.
pub fn collect_sources(citations: &[GroundingCitation]) -> Vec<Source> {
    let sources = citations.iter().filter_map(|citation| {
        let uri = citation.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let title = citation
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SOURCE_TITLE);
        Some(Source {
            title: title.to_string(),
            uri: uri.to_string(),
        })
    });

    dedupe_sources(sources)
}

pub fn dedupe_sources(sources: impl IntoIterator<Item = Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}
