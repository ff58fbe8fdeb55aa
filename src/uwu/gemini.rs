use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Uwuifier;
use crate::error::TransformError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delegates the rewrite to Google's Gemini API.
pub struct GeminiUwuifier {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiUwuifier {
    pub fn new(api_key: String, model: String) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, model, API_BASE.to_string())
    }

    /// Talks to `base_url` instead of Google's public endpoint.
    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Uwuifier for GeminiUwuifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn uwuify(&self, text: &str) -> Result<String, TransformError> {
        let prompt = build_prompt(text);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        debug!(model = %self.model, chars = text.chars().count(), "asking gemini to uwuify");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransformError::Status { status, body });
        }

        extract_text(response.json().await?)
    }
}

/// Instruction template. Tone is kept as-is, hostile included.
pub fn build_prompt(text: &str) -> String {
    format!(
        "Rewrite the following message in a cute, anime \"uwu\" style.\n\
         Keep the SAME MEANING, SAME EMOTION, SAME INTENT.\n\
         If it's angry, keep it angry. If it's threatening, keep it threatening. \
         If it's normal, keep it normal.\n\
         Just rewrite the language into uwu/anime style.\n\
         \n\
         Message:\n\
         {text}\n"
    )
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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

/// Joins the first candidate's text parts. Blank output is an error.
fn extract_text(response: GenerateResponse) -> Result<String, TransformError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(TransformError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}
