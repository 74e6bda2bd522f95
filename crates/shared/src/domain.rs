use serde::{Deserialize, Serialize};

/// Minimum number of trimmed characters before a lookup is issued.
pub const MIN_QUERY_LEN: usize = 3;

/// Label shown for a suggestion that carries neither text nor a provider ref.
pub const UNKNOWN_ADDRESS_LABEL: &str = "Unknown address";

/// A validated search query: trimmed and at least `min_len` characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str, min_len: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < min_len {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single candidate location offered to the user for selection.
///
/// Returned by the suggestion endpoint; unknown members are ignored and the
/// raw payload echo, when present, is carried through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Suggestion {
    /// Display label: text, falling back to the provider ref, then a
    /// fixed placeholder.
    pub fn label(&self) -> &str {
        if !self.text.is_empty() {
            &self.text
        } else if !self.provider_ref.is_empty() {
            &self.provider_ref
        } else {
            UNKNOWN_ADDRESS_LABEL
        }
    }
}

/// Names of the bound form fields a selection projects into.
pub mod fields {
    pub const STREET: &str = "street";
    pub const NUMBER: &str = "number";
    pub const UNIT: &str = "unit";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const COUNTRY: &str = "country";
    pub const LOCATION_PROVIDER: &str = "location_provider";
    pub const LOCATION_PROVIDER_REF: &str = "location_provider_ref";
    pub const LOCATION_PROVIDER_URL: &str = "location_provider_url";
    pub const LOCATION_LATITUDE: &str = "location_latitude";
    pub const LOCATION_LONGITUDE: &str = "location_longitude";
    pub const LOCATION_RAW: &str = "location_raw";
    pub const LOCATION_DISPLAY_NAME: &str = "location_display_name";

    /// Fields derived from a provider lookup. Reset on every keystroke so a
    /// half-typed query never sits next to stale provider data.
    pub const PROVIDER_DERIVED: [&str; 7] = [
        LOCATION_PROVIDER,
        LOCATION_PROVIDER_REF,
        LOCATION_PROVIDER_URL,
        LOCATION_LATITUDE,
        LOCATION_LONGITUDE,
        LOCATION_RAW,
        LOCATION_DISPLAY_NAME,
    ];

    /// Address component fields owned by the normalization flow.
    pub const ADDRESS: [&str; 7] = [
        STREET,
        NUMBER,
        UNIT,
        CITY,
        STATE,
        POSTAL_CODE,
        COUNTRY,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_short_or_blank_input() {
        assert!(Query::parse("", MIN_QUERY_LEN).is_none());
        assert!(Query::parse("  ab  ", MIN_QUERY_LEN).is_none());
        assert!(Query::parse(" \t ", MIN_QUERY_LEN).is_none());
    }

    #[test]
    fn query_trims_surrounding_whitespace() {
        let query = Query::parse("  123 Main  ", MIN_QUERY_LEN).expect("query");
        assert_eq!(query.as_str(), "123 Main");
    }

    #[test]
    fn query_counts_characters_not_bytes() {
        assert!(Query::parse("äöü", MIN_QUERY_LEN).is_some());
    }

    #[test]
    fn label_falls_back_to_provider_ref_then_placeholder() {
        let mut suggestion = Suggestion {
            text: String::new(),
            provider: None,
            provider_ref: "node/42".into(),
            latitude: None,
            longitude: None,
            raw: None,
        };
        assert_eq!(suggestion.label(), "node/42");

        suggestion.provider_ref.clear();
        assert_eq!(suggestion.label(), UNKNOWN_ADDRESS_LABEL);

        suggestion.text = "123 Main St".into();
        assert_eq!(suggestion.label(), "123 Main St");
    }
}
