//! Prompt text and declared response schema for the lead search.

use serde_json::json;

/// Fields every listing must carry, in schema order.
pub const LISTING_FIELDS: [&str; 5] = ["name", "phone", "address", "cuisine", "mapsUrl"];

/// Natural-language instructions for one exhaustive no-website search.
#[must_use]
pub fn build_prompt(location: &str) -> String {
    format!(
        r#"Perform an EXHAUSTIVE lead generation search for restaurants in "{location}" that DO NOT have an official, dedicated website (no .com, .net or restaurant-specific domain).

Search rules:
1. Only include restaurants that rely on Google Maps, Facebook or Instagram instead of a professional website.
2. Find as many as possible: aim for 15-20 leads if the area supports it.
3. Every result MUST include a direct Google Maps URL so the business profile can be checked for a missing 'Website' button.
4. Format phone numbers so they can be dialed directly.

Return only a JSON array of objects with exactly these keys:
- "name": full business name.
- "phone": contact number.
- "address": full physical address.
- "cuisine": primary type of food served.
- "mapsUrl": direct link to the Google Maps business profile."#
    )
}

/// `responseSchema` for `generationConfig`: an array of objects with five
/// required string properties.
#[must_use]
pub fn listing_response_schema() -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = LISTING_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": LISTING_FIELDS,
        }
    })
}
