//! Gemini client for the AI gateway
//!
//! Single round-trips to the Google Generative Language REST API
//! (`models/{model}:generateContent`). The classification and recommendation
//! calls declare a response schema and require strict JSON conformance; a
//! payload that does not parse into the declared shape is rejected rather
//! than coerced. The weather call is unconstrained free text plus optional
//! grounding citations.

use super::{GatewayError, OutfitAdvisor, WeatherText};
use crate::types::{AnalysisResult, ClothingItem, Recommendation, WeatherInfo};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for model requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Placeholder used when the weather call returns no text (non-fatal)
const WEATHER_UNAVAILABLE: &str = "Weather information unavailable.";

/// Gemini-backed [`OutfitAdvisor`]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key and model name
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key: api_key.trim().to_string(),
            model,
        }
    }

    /// Execute one generateContent round-trip
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api(format!(
                "Gemini API returned error {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse Gemini response: {}", e)))
    }
}

#[async_trait]
impl OutfitAdvisor for GeminiClient {
    async fn classify_image(
        &self,
        image_data_uri: &str,
    ) -> Result<AnalysisResult, GatewayError> {
        let (mime_type, data) = split_data_uri(image_data_uri);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        }),
                    },
                    Part {
                        text: Some(CLASSIFY_PROMPT.to_string()),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(analysis_schema()),
            }),
            tools: None,
        };

        let response = self.generate(&request).await?;
        let text = extract_text(&response)
            .ok_or_else(|| GatewayError::EmptyResponse("image classification".to_string()))?;

        debug!(model = %self.model, "Image classification complete");
        parse_analysis(&text)
    }

    async fn fetch_weather_text(&self, location: &str) -> Result<WeatherText, GatewayError> {
        // The current date helps the model search for relevant current info
        let today = chrono::Local::now().format("%a %b %d %Y");
        let prompt = format!(
            "Today is {}. What is the current temperature and weather condition in {}? Be specific.",
            today, location
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt),
                    inline_data: None,
                }],
            }],
            generation_config: None,
            tools: Some(vec![Tool {
                google_search: json!({}),
            }]),
        };

        let response = self.generate(&request).await?;

        // No text payload is non-fatal here: fall back to a fixed placeholder
        let text =
            extract_text(&response).unwrap_or_else(|| WEATHER_UNAVAILABLE.to_string());
        let sources = extract_sources(&response);

        debug!(location = %location, source_count = sources.len(), "Weather lookup complete");
        Ok(WeatherText { text, sources })
    }

    async fn recommend(
        &self,
        location: &str,
        wardrobe: &[ClothingItem],
    ) -> Result<Recommendation, GatewayError> {
        let weather = self.fetch_weather_text(location).await?;

        // Reduced wardrobe representation: no image bytes, to bound request size
        let simplified: Vec<SimplifiedItem> = wardrobe
            .iter()
            .map(|item| SimplifiedItem {
                id: &item.id,
                name: &item.name,
                insulation: item.insulation,
                tags: &item.tags,
            })
            .collect();
        let wardrobe_json = serde_json::to_string(&simplified)
            .map_err(|e| GatewayError::Parse(format!("Serialize wardrobe failed: {}", e)))?;

        let prompt = recommend_prompt(location, &weather.text, &wardrobe_json);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(recommendation_schema()),
            }),
            tools: None,
        };

        let response = self.generate(&request).await?;
        let text = extract_text(&response)
            .ok_or_else(|| GatewayError::EmptyResponse("outfit recommendation".to_string()))?;

        debug!(location = %location, "Recommendation synthesis complete");
        parse_recommendation(&text, location, weather.sources)
    }
}

// ============================================================================
// Prompts and response schemas
// ============================================================================

const CLASSIFY_PROMPT: &str = "Analyze this clothing item. Provide a JSON object with:\n\
    - name: A short descriptive name (e.g. \"Blue Denim Jacket\").\n\
    - insulation: An integer 1-10 where 1 is a thin t-shirt/tank top and 10 is a heavy winter expedition parka.\n\
    - tags: An array of 3-5 keywords describing style, material, and usage.\n\
    - color: The primary color.";

fn recommend_prompt(location: &str, weather_text: &str, wardrobe_json: &str) -> String {
    format!(
        "Context:\n\
         Current Weather in {location}: \"{weather_text}\"\n\
         \n\
         User's Wardrobe (JSON):\n\
         {wardrobe_json}\n\
         \n\
         Task:\n\
         1. Determine if it is \"sweater weather\" (generally below 20\u{b0}C/68\u{b0}F but above 10\u{b0}C/50\u{b0}F, or just chilly enough for layers).\n\
         2. Select the best combination of items from the wardrobe for this weather. You can select multiple items for layering.\n\
         3. Provide a reasoning summary.\n\
         4. Extract the temperature and short summary from the weather text.\n\
         \n\
         Output JSON format."
    )
}

fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "insulation": { "type": "INTEGER" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "color": { "type": "STRING" }
        },
        "required": ["name", "insulation", "tags", "color"]
    })
}

fn recommendation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "weather": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "temperature": { "type": "STRING" },
                    "isSweaterWeather": { "type": "BOOLEAN" },
                    "location": { "type": "STRING" }
                },
                "required": ["summary", "temperature", "isSweaterWeather"]
            },
            "selectedItemIds": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "reasoning": { "type": "STRING" }
        },
        "required": ["weather", "selectedItemIds", "reasoning"]
    })
}

// ============================================================================
// Response text extraction and strict parsing
// ============================================================================

/// Strip the `data:<mime>;base64,` header from a data URI.
///
/// Returns the declared mime type and the base64 payload. Input without a
/// recognizable header is passed through as JPEG bytes.
fn split_data_uri(uri: &str) -> (&str, &str) {
    if let Some(rest) = uri.strip_prefix("data:") {
        if let Some((header, payload)) = rest.split_once(',') {
            if let Some(mime) = header.strip_suffix(";base64") {
                return (mime, payload);
            }
        }
    }
    ("image/jpeg", uri)
}

/// First text part of the first candidate, if any
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.text.clone())
}

/// Unique grounding citation URIs in first-seen order
fn extract_sources(response: &GenerateContentResponse) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    let chunks = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.as_slice())
        .unwrap_or(&[]);

    for chunk in chunks {
        if let Some(uri) = chunk.web.as_ref().and_then(|w| w.uri.as_ref()) {
            if !sources.contains(uri) {
                sources.push(uri.clone());
            }
        }
    }
    sources
}

/// Parse the classification payload, rejecting non-conforming JSON
fn parse_analysis(text: &str) -> Result<AnalysisResult, GatewayError> {
    serde_json::from_str(text)
        .map_err(|e| GatewayError::Parse(format!("Classification payload did not conform: {}", e)))
}

/// Parse the recommendation payload, then overwrite the model's location with
/// the caller-supplied one and attach the weather step's sources
fn parse_recommendation(
    text: &str,
    location: &str,
    sources: Vec<String>,
) -> Result<Recommendation, GatewayError> {
    let payload: RecommendationPayload = serde_json::from_str(text)
        .map_err(|e| GatewayError::Parse(format!("Recommendation payload did not conform: {}", e)))?;

    Ok(Recommendation {
        weather: WeatherInfo {
            summary: payload.weather.summary,
            temperature: payload.weather.temperature,
            is_sweater_weather: payload.weather.is_sweater_weather,
            // The model sometimes omits or mangles the location it was given
            location: location.to_string(),
            sources,
        },
        selected_item_ids: payload.selected_item_ids,
        reasoning: payload.reasoning,
    })
}

// ============================================================================
// Wire types (generateContent request/response)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
}

/// Reduced wardrobe representation sent to the model (no image bytes)
#[derive(Debug, Serialize)]
struct SimplifiedItem<'a> {
    id: &'a str,
    name: &'a str,
    insulation: i64,
    tags: &'a [String],
}

/// Wire shape of the recommendation payload; the model's location field is
/// replaced by the caller's, so it is optional here
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationPayload {
    weather: WeatherPayload,
    selected_item_ids: Vec<String>,
    reasoning: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherPayload {
    summary: String,
    temperature: String,
    is_sweater_weather: bool,
    #[serde(default)]
    #[allow(dead_code)] // Deserialized from the wire but always overwritten
    location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_text(text: &str) -> GenerateContentResponse {
        serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ] } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_split_data_uri_strips_header() {
        let (mime, payload) = split_data_uri("data:image/png;base64,AAAA");
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "AAAA");
    }

    #[test]
    fn test_split_data_uri_headerless_falls_back_to_jpeg() {
        let (mime, payload) = split_data_uri("AAAA");
        assert_eq!(mime, "image/jpeg");
        assert_eq!(payload, "AAAA");
    }

    #[test]
    fn test_extract_text_first_part() {
        let response = response_with_text("hello");
        assert_eq!(extract_text(&response).as_deref(), Some("hello"));
    }

    #[test]
    fn test_extract_text_none_when_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_extract_sources_deduplicates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [ { "text": "cold" } ] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.example/w" } },
                        { "web": { "uri": "https://b.example/w" } },
                        { "web": { "uri": "https://a.example/w" } },
                        { "web": {} }
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            extract_sources(&response),
            vec!["https://a.example/w", "https://b.example/w"]
        );
    }

    #[test]
    fn test_extract_sources_empty_without_metadata() {
        let response = response_with_text("no grounding");
        assert!(extract_sources(&response).is_empty());
    }

    #[test]
    fn test_parse_analysis_conforming() {
        let result = parse_analysis(
            r#"{"name":"Blue Denim Jacket","insulation":6,"tags":["denim","casual","layer"],"color":"blue"}"#,
        )
        .unwrap();
        assert_eq!(result.name, "Blue Denim Jacket");
        assert_eq!(result.insulation, 6);
    }

    #[test]
    fn test_parse_analysis_out_of_range_insulation_passes_through() {
        // No local validation: an out-of-range rating is stored as-is
        let result = parse_analysis(
            r#"{"name":"Lava Suit","insulation":11,"tags":["hot"],"color":"red"}"#,
        )
        .unwrap();
        assert_eq!(result.insulation, 11);
    }

    #[test]
    fn test_parse_analysis_rejects_missing_field() {
        let err = parse_analysis(r#"{"name":"Mystery Garment","insulation":5}"#).unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn test_parse_recommendation_overwrites_location_and_attaches_sources() {
        let text = r#"{
            "weather": {
                "summary": "Cold and clear",
                "temperature": "5°C",
                "isSweaterWeather": true,
                "location": "Somewhere Else"
            },
            "selectedItemIds": ["a"],
            "reasoning": "Layer up."
        }"#;
        let sources = vec!["https://a.example/w".to_string()];

        let rec = parse_recommendation(text, "Oslo", sources.clone()).unwrap();
        assert_eq!(rec.weather.location, "Oslo");
        assert_eq!(rec.weather.sources, sources);
        assert!(rec.weather.is_sweater_weather);
        assert_eq!(rec.selected_item_ids, vec!["a"]);
    }

    #[test]
    fn test_parse_recommendation_rejects_malformed_payload() {
        let err = parse_recommendation("sure! here is your outfit", "Oslo", vec![]).unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn test_request_wire_names() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/jpeg".to_string(),
                        data: "AAAA".to_string(),
                    }),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(analysis_schema()),
            }),
            tools: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json.get("tools").is_none());
    }
}
