use serde::{Deserialize, Serialize};

use crate::domain::Suggestion;

/// Body of the suggestion endpoint: `{ "data": [ ... ] }`.
///
/// A missing or `null` `data` member means no suggestions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub data: Option<Vec<Suggestion>>,
}

impl SuggestResponse {
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.data.unwrap_or_default()
    }
}

/// Posted to the normalization endpoint when a suggestion is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeRequest {
    pub provider_ref: String,
    pub selected_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// The full normalized field set the normalization layer hands back.
///
/// Every member is optional on the wire; an absent member clears the
/// corresponding form field when applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_json: Option<String>,
}

impl NormalizedLocation {
    /// Display text: the selected suggestion text, falling back to the
    /// search value the lookup ran with.
    pub fn display_name(&self) -> Option<&str> {
        self.selected_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.search_value.as_deref().filter(|text| !text.is_empty()))
    }
}
