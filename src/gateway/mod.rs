//! AI gateway for the wardrobe assistant
//!
//! Three request/response operations against a hosted generative model:
//! classify a clothing photo, fetch search-grounded weather text, and
//! synthesize an outfit recommendation. Behind the [`OutfitAdvisor`] trait so
//! HTTP handlers can be tested against a stub.
//!
//! No retries, no backoff: any transport or parse failure propagates to the
//! caller as a failed operation.

use crate::types::{AnalysisResult, ClothingItem, Recommendation};
use async_trait::async_trait;
use thiserror::Error;

mod gemini;
pub use gemini::GeminiClient;

/// Gateway error taxonomy
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Hosted model API returned an error status
    #[error("API error: {0}")]
    Api(String),

    /// Response carried no text payload
    #[error("Empty model response: {0}")]
    EmptyResponse(String),

    /// Response text did not conform to the declared shape
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Free-text weather description plus its grounding citations
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherText {
    pub text: String,
    /// Unique citation URIs, in first-seen order (empty when ungrounded)
    pub sources: Vec<String>,
}

/// Model-backed operations the wardrobe assistant depends on
#[async_trait]
pub trait OutfitAdvisor: Send + Sync {
    /// Classify a clothing photo (data URI) into structured attributes
    async fn classify_image(&self, image_data_uri: &str)
        -> Result<AnalysisResult, GatewayError>;

    /// Fetch current weather for a location as search-grounded free text
    async fn fetch_weather_text(&self, location: &str) -> Result<WeatherText, GatewayError>;

    /// Synthesize an outfit recommendation from live weather and the wardrobe
    async fn recommend(
        &self,
        location: &str,
        wardrobe: &[ClothingItem],
    ) -> Result<Recommendation, GatewayError>;
}
