use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSettings;
use crate::generation::{GenerationError, GenerationResult, TextGenerator};

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| GenerationError::transport(err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.expose().to_string(),
            http,
        })
    }

    /// Names of every model that accepts `generateContent`, following
    /// pagination until the listing is exhausted.
    pub async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|err| GenerationError::transport(err.to_string()))?;
            let page = check_status(response)
                .await?
                .json::<ListModelsResponse>()
                .await
                .map_err(|err| GenerationError::format(err.to_string()))?;

            names.extend(
                page.models
                    .into_iter()
                    .filter(|model| {
                        model
                            .supported_generation_methods
                            .iter()
                            .any(|method| method == "generateContent")
                    })
                    .map(|model| model.name),
            );

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    fn endpoint(&self) -> String {
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/v1beta/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Pass successful responses through; turn anything else into `Upstream`,
/// preferring the provider's `error.message` over the raw body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&raw)
        .map(|envelope| envelope.error.message)
        .unwrap_or(raw);
    Err(GenerationError::upstream(status.as_u16(), message))
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> GenerationResult {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::transport(err.to_string()))?;

        let response = check_status(response).await?;

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| GenerationError::format(err.to_string()))?;

        parsed.into_text().ok_or(GenerationError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
