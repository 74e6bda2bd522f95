use shared::{
    domain::{fields, Suggestion},
    protocol::NormalizedLocation,
};

use crate::FormBinding;

/// A chosen suggestion's data projected into named form-field values.
///
/// Created on selection, applied field-by-field, then discarded. Every
/// mapped field is either set or cleared; none is left stale.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    fields: Vec<(&'static str, Option<String>)>,
}

impl SelectionResult {
    /// Projection of a raw suggestion: the provider-derived fields.
    ///
    /// Address components stay untouched here; they belong to the
    /// normalization flow and arrive via [`Self::from_normalized`].
    pub fn from_suggestion(suggestion: &Suggestion, query: &str) -> Self {
        let display = if suggestion.text.is_empty() {
            query
        } else {
            &suggestion.text
        };

        Self {
            fields: vec![
                (fields::LOCATION_DISPLAY_NAME, non_empty(display)),
                (
                    fields::LOCATION_PROVIDER,
                    suggestion.provider.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_PROVIDER_REF,
                    non_empty(&suggestion.provider_ref),
                ),
                (fields::LOCATION_PROVIDER_URL, None),
                (
                    fields::LOCATION_LATITUDE,
                    suggestion.latitude.map(format_coordinate),
                ),
                (
                    fields::LOCATION_LONGITUDE,
                    suggestion.longitude.map(format_coordinate),
                ),
                (
                    fields::LOCATION_RAW,
                    suggestion.raw.as_ref().map(|value| value.to_string()),
                ),
            ],
        }
    }

    /// Projection of a fully normalized location: every bound field.
    pub fn from_normalized(location: &NormalizedLocation) -> Self {
        Self {
            fields: vec![
                (fields::STREET, location.street.as_deref().and_then(non_empty)),
                (fields::NUMBER, location.number.as_deref().and_then(non_empty)),
                (fields::UNIT, location.unit.as_deref().and_then(non_empty)),
                (fields::CITY, location.city.as_deref().and_then(non_empty)),
                (fields::STATE, location.state.as_deref().and_then(non_empty)),
                (
                    fields::POSTAL_CODE,
                    location.postal_code.as_deref().and_then(non_empty),
                ),
                (
                    fields::COUNTRY,
                    location.country.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_PROVIDER,
                    location.provider.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_PROVIDER_REF,
                    location.provider_ref.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_PROVIDER_URL,
                    location.provider_url.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_LATITUDE,
                    location.latitude.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_LONGITUDE,
                    location.longitude.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_RAW,
                    location.raw_json.as_deref().and_then(non_empty),
                ),
                (
                    fields::LOCATION_DISPLAY_NAME,
                    location.display_name().and_then(non_empty),
                ),
            ],
        }
    }

    /// Writes every mapped field: set when a value is present, cleared
    /// otherwise.
    pub fn apply(&self, form: &dyn FormBinding) {
        for (name, value) in &self.fields {
            match value {
                Some(value) => form.set_field(name, value),
                None => form.clear_field(name),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn fields(&self) -> &[(&'static str, Option<String>)] {
        &self.fields
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn format_coordinate(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::fields;

    use super::*;

    fn sample_suggestion() -> Suggestion {
        Suggestion {
            text: "123 Main St".into(),
            provider: Some("osm".into()),
            provider_ref: "42".into(),
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            raw: Some(json!({"display_name": "123 Main St"})),
        }
    }

    #[test]
    fn suggestion_projection_maps_every_provider_field() {
        let result = SelectionResult::from_suggestion(&sample_suggestion(), "123 main");

        assert_eq!(result.get(fields::LOCATION_DISPLAY_NAME), Some("123 Main St"));
        assert_eq!(result.get(fields::LOCATION_PROVIDER), Some("osm"));
        assert_eq!(result.get(fields::LOCATION_PROVIDER_REF), Some("42"));
        assert_eq!(result.get(fields::LOCATION_LATITUDE), Some("40.7128"));
        assert_eq!(result.get(fields::LOCATION_LONGITUDE), Some("-74.006"));
        // Not carried by a suggestion, so it must be cleared rather than kept.
        assert_eq!(result.get(fields::LOCATION_PROVIDER_URL), None);
    }

    #[test]
    fn suggestion_without_text_falls_back_to_query() {
        let mut suggestion = sample_suggestion();
        suggestion.text.clear();
        let result = SelectionResult::from_suggestion(&suggestion, "123 main");
        assert_eq!(result.get(fields::LOCATION_DISPLAY_NAME), Some("123 main"));
    }

    #[test]
    fn normalized_projection_covers_address_and_provider_fields() {
        let location = NormalizedLocation {
            provider: Some("osm".into()),
            provider_ref: Some("42".into()),
            street: Some("Main St".into()),
            number: Some("123".into()),
            city: Some("Springfield".into()),
            selected_text: Some("123 Main St".into()),
            ..Default::default()
        };
        let result = SelectionResult::from_normalized(&location);

        assert_eq!(result.get(fields::STREET), Some("Main St"));
        assert_eq!(result.get(fields::NUMBER), Some("123"));
        assert_eq!(result.get(fields::CITY), Some("Springfield"));
        assert_eq!(result.get(fields::LOCATION_DISPLAY_NAME), Some("123 Main St"));
        // Absent members clear their fields.
        assert_eq!(result.get(fields::UNIT), None);
        assert_eq!(result.get(fields::COUNTRY), None);
        assert_eq!(result.fields().len(), 14);
    }
}
