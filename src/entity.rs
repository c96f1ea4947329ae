use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entity state as returned by the Home Assistant REST API.
///
/// The payload is taken verbatim from `/api/states`; nothing here is owned or
/// mutated by this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
    #[serde(default)]
    pub last_changed: Option<String>,
}

impl EntityState {
    /// The entity-id prefix before the first `.`, e.g. `light` or `sensor`.
    pub fn domain(&self) -> &str {
        self.entity_id.split('.').next().unwrap_or("")
    }

    pub fn friendly_name(&self) -> &str {
        self.attributes
            .get("friendly_name")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// True when the query is shaped like a full entity id (`domain.object_id`)
/// rather than a free-text search term.
pub fn looks_like_entity_id(query: &str) -> bool {
    query.contains('.') && !query.contains(' ')
}

/// Fuzzy-rank entities against a free-text query, best matches first.
///
/// Scores both the entity id and the friendly name and keeps whichever is
/// higher, so "porch light" finds `light.front_porch` either way.
pub fn find_matches<'a>(states: &'a [EntityState], query: &str) -> Vec<&'a EntityState> {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(&EntityState, i64)> = states
        .iter()
        .filter_map(|s| {
            let id_score = matcher.fuzzy_match(&s.entity_id, query);
            let name_score = matcher.fuzzy_match(s.friendly_name(), query);
            id_score.max(name_score).map(|score| (s, score))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(s, _)| s).collect()
}

/// All entities in a domain, sorted by entity id.
pub fn by_domain<'a>(states: &'a [EntityState], domain: &str) -> Vec<&'a EntityState> {
    let prefix = format!("{domain}.");
    let mut matches: Vec<&EntityState> = states
        .iter()
        .filter(|s| s.entity_id.starts_with(&prefix))
        .collect();
    matches.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
    matches
}

// Attributes that add noise rather than signal in a state dump.
const SKIPPED_ATTRIBUTES: [&str; 6] = [
    "friendly_name",
    "supported_features",
    "supported_color_modes",
    "icon",
    "entity_picture",
    "attribution",
];

/// Render one entity state as readable Markdown.
pub fn format_state(state: &EntityState) -> String {
    let mut lines = vec![
        format!("**{}** (`{}`)", state.friendly_name(), state.entity_id),
        format!("State: **{}**", state.state),
    ];

    let mut attrs: Vec<(&String, &Value)> = state
        .attributes
        .iter()
        .filter(|(k, _)| !SKIPPED_ATTRIBUTES.contains(&k.as_str()) && !k.starts_with('_'))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));

    for (key, value) in attrs {
        match (key.as_str(), value) {
            ("brightness", Value::Number(n)) => {
                if let Some(raw) = n.as_f64() {
                    lines.push(format!("  brightness: {}%", (raw / 255.0 * 100.0).round()));
                }
            }
            ("color_temp_kelvin", v) => lines.push(format!("  color_temp: {}K", render_value(v))),
            (k, v) => lines.push(format!("  {}: {}", k, render_value(v))),
        }
    }

    if let Some(last_changed) = &state.last_changed {
        lines.push(format!("  last_changed: {last_changed}"));
    }

    lines.join("\n")
}

/// Short inline detail for area listings: brightness, color temp, temperature.
pub fn detail_suffix(state: &EntityState) -> String {
    let mut detail = String::new();
    if let Some(raw) = state.attributes.get("brightness").and_then(Value::as_f64) {
        detail.push_str(&format!(", brightness: {}%", (raw / 255.0 * 100.0).round()));
    }
    if let Some(kelvin) = state.attributes.get("color_temp_kelvin") {
        detail.push_str(&format!(", {}K", render_value(kelvin)));
    }
    if let Some(temp) = state.attributes.get("temperature") {
        detail.push_str(&format!(", temp: {}", render_value(temp)));
    }
    detail
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(entity_id: &str, state: &str, attributes: Value) -> EntityState {
        serde_json::from_value(json!({
            "entity_id": entity_id,
            "state": state,
            "attributes": attributes,
            "last_changed": "2026-08-06T07:00:00+00:00",
        }))
        .unwrap()
    }

    #[test]
    fn domain_is_the_id_prefix() {
        let e = entity("light.front_porch", "on", json!({}));
        assert_eq!(e.domain(), "light");
    }

    #[test]
    fn format_state_converts_brightness_to_percent() {
        let e = entity(
            "light.front_porch",
            "on",
            json!({"friendly_name": "Front Porch", "brightness": 128, "icon": "mdi:bulb"}),
        );
        let rendered = format_state(&e);
        assert!(rendered.contains("**Front Porch** (`light.front_porch`)"));
        assert!(rendered.contains("brightness: 50%"));
        // Skipped attributes stay out of the dump.
        assert!(!rendered.contains("mdi:bulb"));
        assert!(rendered.contains("last_changed: 2026-08-06"));
    }

    #[test]
    fn fuzzy_match_finds_by_friendly_name() {
        let states = vec![
            entity("light.front_porch", "on", json!({"friendly_name": "Front Porch Light"})),
            entity("sensor.kitchen_temp", "21.5", json!({"friendly_name": "Kitchen Temperature"})),
        ];
        let matches = find_matches(&states, "porch light");
        assert_eq!(matches[0].entity_id, "light.front_porch");
    }

    #[test]
    fn unknown_query_matches_nothing() {
        let states = vec![entity("light.front_porch", "on", json!({}))];
        assert!(find_matches(&states, "zzzzqqqq").is_empty());
    }

    #[test]
    fn by_domain_filters_on_full_prefix() {
        let states = vec![
            entity("light.a", "on", json!({})),
            entity("light.b", "off", json!({})),
            entity("lightning.sensor", "3", json!({})),
        ];
        let lights = by_domain(&states, "light");
        assert_eq!(lights.len(), 2);
    }

    #[test]
    fn entity_id_shape_detection() {
        assert!(looks_like_entity_id("light.front_porch"));
        assert!(!looks_like_entity_id("porch light"));
        assert!(!looks_like_entity_id("porch"));
    }
}
