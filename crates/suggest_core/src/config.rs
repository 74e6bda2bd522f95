use std::{collections::HashMap, fs};

/// Controller settings: endpoint urls plus debounce tuning.
#[derive(Debug, Clone)]
pub struct Settings {
    pub suggest_url: String,
    pub normalize_url: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suggest_url: "http://127.0.0.1:8080/properties/locations/suggest".into(),
            normalize_url: "http://127.0.0.1:8080/properties/locations/normalize".into(),
            debounce_ms: 250,
            min_query_len: shared::domain::MIN_QUERY_LEN,
        }
    }
}

/// Defaults, overridden by an optional `suggest.toml`, overridden by env vars.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("suggest.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SUGGEST_URL") {
        settings.suggest_url = v;
    }
    if let Ok(v) = std::env::var("NORMALIZE_URL") {
        settings.normalize_url = v;
    }
    if let Ok(v) = std::env::var("SUGGEST_DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.debounce_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("SUGGEST_MIN_QUERY_LEN") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.min_query_len = parsed;
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("suggest_url").and_then(|v| v.as_str()) {
        settings.suggest_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("normalize_url").and_then(|v| v.as_str()) {
        settings.normalize_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("debounce_ms").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = u64::try_from(v) {
            settings.debounce_ms = parsed;
        }
    }
    if let Some(v) = file_cfg.get("min_query_len").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = usize::try_from(v) {
            settings.min_query_len = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_interaction_contract() {
        let settings = Settings::default();
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.min_query_len, 3);
    }

    #[test]
    fn file_settings_override_defaults() {
        let mut settings = Settings::default();
        apply_file_settings(
            &mut settings,
            r#"
suggest_url = "http://geo.example/suggest"
debounce_ms = 100
"#,
        );
        assert_eq!(settings.suggest_url, "http://geo.example/suggest");
        assert_eq!(settings.debounce_ms, 100);
        assert_eq!(settings.normalize_url, Settings::default().normalize_url);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file_settings(&mut settings, "not [valid toml");
        assert_eq!(settings.suggest_url, Settings::default().suggest_url);
    }
}
