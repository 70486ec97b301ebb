//! Gemini `generateContent` client

use super::{AdvisoryProvider, Analysis, StrategyReview};
use derive_more::{Display, Error, From};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Failure talking to the advisory service
#[derive(Debug, Display, Error, From)]
pub enum AdvisoryError {
    #[display("Advisory request failed: {_0}")]
    Http(reqwest::Error),
    #[display("Advisory service returned {status}: {body}")]
    #[from(ignore)]
    Status { status: u16, body: String },
    #[display("Advisory response is malformed: {_0}")]
    Json(serde_json::Error),
    #[display("Advisory response has no text")]
    #[from(ignore)]
    EmptyResponse,
}

#[derive(Deserialize)]
struct RawAnalysis {
    feedback: String,
    rating: f64,
}

/// Blocking client for one Gemini model
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiAdvisor {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AdvisoryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    fn generate(&self, prompt: &str, schema: Option<Value>) -> Result<String, AdvisoryError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        debug!("Sending advisory request");
        let response = self
            .client
            .post(format!("{API_BASE}/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        let content = extract_text(&value)?;
        debug!(length = content.len(), "Advisory response received");
        Ok(content)
    }
}

impl AdvisoryProvider for GeminiAdvisor {
    fn analyze_strategy(&self, review: &StrategyReview) -> Option<Analysis> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "feedback": { "type": "STRING" },
                "rating": { "type": "NUMBER" },
            },
        });
        self.generate(&analysis_prompt(review), Some(schema))
            .and_then(|text| parse_analysis(&text))
            .map_err(|e| warn!(error = %e, "Strategy analysis failed"))
            .ok()
    }

    fn fun_fact(&self, number: i64) -> Option<String> {
        self.generate(&fun_fact_prompt(number), None)
            .map(|text| text.trim().to_string())
            .map_err(|e| warn!(error = %e, "Fun fact request failed"))
            .ok()
            .filter(|text| !text.is_empty())
    }
}

fn analysis_prompt(review: &StrategyReview) -> String {
    let guesses = review
        .guesses
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a strict but encouraging math teacher reviewing a student's number guessing strategy.\n\
         The secret number was {secret}.\n\
         The range was {min} to {max}.\n\
         The student guessed, in order: {guesses}.\n\
         Judge whether they followed an optimal binary search and point out wasted guesses, \
         such as guessing 50 after already learning the number is above 60.\n\
         Give short constructive feedback of at most 3 sentences.\n\
         Rate the strategy from 1 to 5 stars.",
        secret = review.secret,
        min = review.range_min,
        max = review.range_max,
    )
}

fn fun_fact_prompt(number: i64) -> String {
    format!(
        "Give me one fascinating, obscure mathematical property or fun fact about the number {number}. \
         Keep it strictly under 20 words."
    )
}

/// First text part of the first candidate
fn extract_text(response: &Value) -> Result<String, AdvisoryError> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(AdvisoryError::EmptyResponse)
}

fn parse_analysis(text: &str) -> Result<Analysis, AdvisoryError> {
    let raw: RawAnalysis = serde_json::from_str(text)?;
    Ok(Analysis::new(raw.feedback, raw.rating))
}
