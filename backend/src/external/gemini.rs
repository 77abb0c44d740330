//! Gemini client for generating advisories
//!
//! Talks to the Generative Language `generateContent` endpoint with a JSON
//! response schema, so the model answers in a shape we can parse directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{
    normalize_alert_message, validate_advisory_content, validate_weekly_plan_content,
    AdvisoryContent, FarmerContext, Language, WeatherSnapshot, WeeklyPlanContent,
};

use super::AdvisoryClient;
use crate::config::GeminiConfig;
use crate::error::{AdvisoryError, WorkflowResult};

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    advisory_temperature: f32,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` if the model returned nothing
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    /// Create a new GeminiClient from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            advisory_temperature: config.advisory_temperature,
        })
    }

    /// Create a new GeminiClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, reqwest::Error> {
        Self::new(&GeminiConfig {
            api_key,
            base_url,
            ..GeminiConfig::default()
        })
    }

    /// Send one prompt and parse the model's JSON answer into `T`
    async fn generate<T: DeserializeOwned>(
        &self,
        prompt: &str,
        response_schema: Value,
        temperature: Option<f32>,
    ) -> WorkflowResult<T> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
                temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisoryError::RemoteUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisoryError::RemoteUnavailable(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            AdvisoryError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = envelope
            .text()
            .ok_or_else(|| AdvisoryError::MalformedResponse("No response from AI".to_string()))?;

        parse_model_json(&text)
    }
}

#[async_trait]
impl AdvisoryClient for GeminiClient {
    async fn fetch_advisory(
        &self,
        context: &FarmerContext,
        weather: &WeatherSnapshot,
        language: Language,
    ) -> WorkflowResult<AdvisoryContent> {
        tracing::info!(
            crop = %context.crop,
            location = %context.location,
            %language,
            "Requesting crop advisory"
        );

        let prompt = advisory_prompt(context, weather, language);
        let mut content: AdvisoryContent = self
            .generate(&prompt, advisory_schema(), Some(self.advisory_temperature))
            .await?;

        validate_advisory_content(&content)
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
        content.alert_message = normalize_alert_message(content.alert_message.take());

        Ok(content)
    }

    async fn fetch_weekly_plan(
        &self,
        context: &FarmerContext,
        language: Language,
    ) -> WorkflowResult<WeeklyPlanContent> {
        tracing::info!(crop = %context.crop, %language, "Requesting weekly plan");

        let prompt = weekly_plan_prompt(context, language);
        let plan: WeeklyPlanContent = self.generate(&prompt, weekly_plan_schema(), None).await?;

        validate_weekly_plan_content(&plan)
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
        if !plan.covers_full_week() {
            tracing::warn!(days = plan.days.len(), "Weekly plan does not cover seven days");
        }

        Ok(plan)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Parse the model's text as JSON, tolerating a Markdown code fence around it
fn parse_model_json<T: DeserializeOwned>(text: &str) -> WorkflowResult<T> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(|e| {
        AdvisoryError::MalformedResponse(format!("Response does not match schema: {}", e))
    })
}

/// Prompt asking for a single advisory in `language`
pub fn advisory_prompt(
    context: &FarmerContext,
    weather: &WeatherSnapshot,
    language: Language,
) -> String {
    let mut priorities = String::new();
    if weather.condition.is_severe() {
        priorities.push_str(
            "- The weather is rainy or stormy: prioritize drainage and crop protection.\n",
        );
    }
    if weather.needs_irrigation_focus() {
        priorities.push_str("- It is sunny and hot: prioritize irrigation management.\n");
    }

    format!(
        "You are a friendly, expert agricultural advisor for a smallholder farmer in India.\n\
         \n\
         Farmer Context:\n\
         - Location: {location}\n\
         - Crop: {crop}\n\
         - Growth Stage: {stage}\n\
         \n\
         Current Local Weather:\n\
         - Condition: {condition}\n\
         - Temperature: {temp}°C\n\
         - Humidity: {humidity}%\n\
         - Forecast: {forecast}\n\
         \n\
         Task:\n\
         Provide hyper-local, practical farming advice: a short encouraging title, \
         exactly 3 simple actionable steps, an urgency level (LOW, MEDIUM or HIGH), \
         a specific warning if the urgency is MEDIUM or HIGH, and a simple scientific \
         explanation for the advice.\n\
         Output language must be: {language}.\n\
         \n\
         Constraints:\n\
         - Keep language extremely simple (5th-grade level).\n\
         - No jargon.\n\
         - Focus on immediate actions.\n\
         {priorities}",
        location = context.location,
        crop = context.crop,
        stage = context.growth_stage,
        condition = weather.condition,
        temp = weather.temperature_celsius,
        humidity = weather.humidity_percent,
        forecast = weather.forecast,
        language = language,
        priorities = priorities,
    )
}

/// Prompt asking for a seven-day plan in `language`
pub fn weekly_plan_prompt(context: &FarmerContext, language: Language) -> String {
    format!(
        "Generate a 7-day simplified farming plan for {crop} in {stage} stage. \
         Location: {location}. Language: {language}. Focus on resilience. \
         Give one entry per day with the day name, a short activity and the risk \
         level (Low, Medium or High), plus a one-sentence summary for the week.",
        crop = context.crop,
        stage = context.growth_stage,
        location = context.location,
        language = language,
    )
}

/// Response schema for an advisory
pub fn advisory_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, encouraging title for the advice."
            },
            "actionItems": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3 distinct, simple, actionable steps for the farmer."
            },
            "alertLevel": {
                "type": "STRING",
                "enum": ["LOW", "MEDIUM", "HIGH"],
                "description": "Urgency level based on weather and crop stage."
            },
            "alertMessage": {
                "type": "STRING",
                "description": "If HIGH or MEDIUM, a specific warning. Empty if LOW."
            },
            "reasoning": {
                "type": "STRING",
                "description": "Simple scientific explanation for the advice."
            }
        },
        "required": ["title", "actionItems", "alertLevel", "reasoning"]
    })
}

/// Response schema for a weekly plan
pub fn weekly_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "dayLabel": { "type": "STRING", "description": "Day name (e.g., Monday)" },
                        "activity": { "type": "STRING", "description": "Short farming activity" },
                        "riskLevel": {
                            "type": "STRING",
                            "description": "Potential risk (Low/Medium/High)"
                        }
                    },
                    "required": ["dayLabel", "activity", "riskLevel"]
                }
            },
            "generalAdvice": {
                "type": "STRING",
                "description": "One sentence summary for the week"
            }
        },
        "required": ["days", "generalAdvice"]
    })
}
