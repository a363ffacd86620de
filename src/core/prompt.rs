use crate::core::search::SearchQuery;
use crate::domain::model::GenerationRequest;

/// Output grammar the parser in `core::parser` depends on. Any change here
/// must be mirrored there.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a professional local grocery price analyst with access to live Google Search data.
Retrieve current prices and store reputations at major retailers in the specified area.

CRITICAL: Format your response as a list of sections separated by "---".
Start with a brief "Intro" paragraph.

Then, for each major store analyzed (e.g. Walmart, Tesco, etc.), use this structure:
### STORE: [Store Name]
BUDGET: [Low/Mid/High]
BEST_FOR: [e.g., Organic Produce, Bulk Items]
EXAMPLES: [Item 1]: [Price 1], [Item 2]: [Price 2]
NOTE: [One sentence about their current deals]
---

Then for each grocery item (the ones the user requested or top staples), use this structure:
### ITEM: [Item Name]
STORE: [Best Store Name]
PRICE: [Best Price]
COMPARISON: [Store A]: [Price or "Not carried"], [Store B]: [Price or "Not carried"], [Store C]: [Price or "Not carried"]
TIP: [One short tip about this item's availability or quality]
---

Ensure the COMPARISON line lists as many major local stores as possible for a complete picture."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// No list given: top affordable staples plus a store overview.
    Staples,
    /// Compare the user's own list across retailers.
    ListComparison,
}

impl PromptMode {
    pub fn for_list(grocery_list: &str) -> Self {
        if grocery_list.trim().is_empty() {
            PromptMode::Staples
        } else {
            PromptMode::ListComparison
        }
    }
}

pub fn build_prompt(query: &SearchQuery) -> String {
    let city = query.city();
    let country = query.country();

    match PromptMode::for_list(query.grocery_list()) {
        PromptMode::Staples => format!(
            "Analyze the major grocery retailers in {city}, {country}.\n\
             1. Identify the top 6 most affordable staple foods right now with exact estimated prices.\n\
             2. Compare the major grocery stores themselves, their budget levels, and provide 2-3 specific price examples of common items at each store to justify their rating."
        ),
        PromptMode::ListComparison => format!(
            "Compare prices for these specific items in {city}, {country}:\n\
             {list}\n\n\
             1. For EACH item in the list, retrieve the current price at EVERY major grocery retailer in {city}.\n\
             2. If a specific retailer does not carry the item, explicitly state \"Not carried\".\n\
             3. Compare the major grocery stores in {city} generally and provide 2-3 specific price examples for common staples (bread, milk, eggs) at those stores for context.",
            list = query.grocery_list().trim()
        ),
    }
}

pub fn build_request(query: &SearchQuery) -> GenerationRequest {
    GenerationRequest {
        prompt: build_prompt(query),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        search_grounding: true,
    }
}
