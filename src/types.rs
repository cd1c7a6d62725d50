//! Shared data types for the wardrobe assistant.
//!
//! Wire names use camelCase (and `"type"` for the clothing category) so the
//! stored wardrobe array and the JSON API stay compatible with the browser UI.

use serde::{Deserialize, Serialize};

/// A single item of clothing in the user's wardrobe.
///
/// Created by the add-item flow (manually filled or auto-filled from image
/// classification), deleted by user action, never otherwise mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    /// Opaque unique id (UUID v4, assigned at add time)
    pub id: String,
    /// Image as a base64 data URI (or a plain URL for the demo seed items)
    pub image_data: String,
    pub name: String,
    /// Free-text category, e.g. "Hoodie", "T-Shirt"
    #[serde(rename = "type")]
    pub kind: String,
    /// Subjective warmth rating, nominally 1-10.
    ///
    /// Not validated locally: a classifier value outside the range is stored
    /// as-is.
    pub insulation: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Weather conditions for one recommendation request. Transient, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInfo {
    pub summary: String,
    pub temperature: String,
    pub is_sweater_weather: bool,
    pub location: String,
    /// Grounding citation URIs from the weather lookup (may be empty)
    #[serde(default)]
    pub sources: Vec<String>,
}

/// An outfit recommendation synthesized from live weather plus the wardrobe.
///
/// `selected_item_ids` should reference existing wardrobe items, but dangling
/// ids are tolerated; [`resolve_outfit`] silently skips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub weather: WeatherInfo,
    pub selected_item_ids: Vec<String>,
    pub reasoning: String,
}

/// Structured attributes extracted from a clothing photo by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub name: String,
    pub insulation: i64,
    pub tags: Vec<String>,
    pub color: String,
}

/// Resolve a recommendation's selected ids against the wardrobe.
///
/// Ids with no matching wardrobe item are silently omitted; selection order
/// is preserved.
pub fn resolve_outfit(wardrobe: &[ClothingItem], selected_ids: &[String]) -> Vec<ClothingItem> {
    selected_ids
        .iter()
        .filter_map(|id| wardrobe.iter().find(|item| &item.id == id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, insulation: i64) -> ClothingItem {
        ClothingItem {
            id: id.to_string(),
            image_data: String::new(),
            name: format!("Item {}", id),
            kind: "Jacket".to_string(),
            insulation,
            tags: vec!["test".to_string()],
        }
    }

    #[test]
    fn test_resolve_outfit_matches_in_selection_order() {
        let wardrobe = vec![item("a", 3), item("b", 7), item("c", 9)];
        let selected = vec!["c".to_string(), "a".to_string()];

        let outfit = resolve_outfit(&wardrobe, &selected);
        let ids: Vec<&str> = outfit.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_resolve_outfit_omits_dangling_ids() {
        let wardrobe = vec![item("a", 9)];
        let selected = vec!["a".to_string(), "ghost".to_string()];

        let outfit = resolve_outfit(&wardrobe, &selected);
        assert_eq!(outfit.len(), 1);
        assert_eq!(outfit[0].id, "a");
    }

    #[test]
    fn test_resolve_outfit_empty_selection() {
        let wardrobe = vec![item("a", 5)];
        assert!(resolve_outfit(&wardrobe, &[]).is_empty());
    }

    #[test]
    fn test_clothing_item_wire_names() {
        let parsed: ClothingItem = serde_json::from_str(
            r#"{"id":"1","imageData":"data:x","name":"Tee","type":"T-Shirt","insulation":2,"tags":["basic"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, "T-Shirt");
        assert_eq!(parsed.image_data, "data:x");

        let json = serde_json::to_value(&parsed).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("imageData").is_some());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_recommendation_wire_names() {
        let rec = Recommendation {
            weather: WeatherInfo {
                summary: "Cloudy".to_string(),
                temperature: "12°C".to_string(),
                is_sweater_weather: true,
                location: "Oslo".to_string(),
                sources: vec![],
            },
            selected_item_ids: vec!["a".to_string()],
            reasoning: "Chilly".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["weather"]["isSweaterWeather"], true);
        assert_eq!(json["selectedItemIds"][0], "a");
    }
}
