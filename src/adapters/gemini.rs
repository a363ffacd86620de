use crate::domain::model::{GenerationOutput, GenerationRequest, GroundingCitation};
use crate::domain::ports::{ConfigProvider, GenerativeModel};
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize, Default)]
pub struct GoogleSearch {}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateContentRequest {
    pub fn from_generation(request: &GenerationRequest) -> Self {
        let system_instruction = (!request.system_instruction.trim().is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: Some(request.system_instruction.clone()),
            }],
        });

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            system_instruction,
            tools: if request.search_grounding {
                vec![Tool {
                    google_search: GoogleSearch::default(),
                }]
            } else {
                Vec::new()
            },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Web citations of the first candidate. Chunks that are not web
    /// results, or are malformed, are skipped.
    pub fn citations(&self) -> Vec<GroundingCitation> {
        let Some(metadata) = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
        else {
            return Vec::new();
        };

        metadata
            .grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.get("web").cloned())
            .filter_map(|web| serde_json::from_value::<WebChunk>(web).ok())
            .map(|web| GroundingCitation {
                title: web.title,
                uri: web.uri,
            })
            .collect()
    }
}

pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
            model,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.api_base().to_string(),
            config.api_key().to_string(),
            config.model().to_string(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let url = self.endpoint();
        let body = GenerateContentRequest::from_generation(request);

        tracing::debug!(
            "Calling model {} (grounding: {})",
            self.model,
            request.search_grounding
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Model response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopError::ServiceError {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let response_text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)?;

        let output = GenerationOutput {
            text: parsed.text(),
            citations: parsed.citations(),
        };
        tracing::debug!(
            "Model returned {} chars of text and {} citations",
            output.text.len(),
            output.citations.len()
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest {
            prompt: "Compare milk".to_string(),
            system_instruction: "Use ### ITEM:".to_string(),
            search_grounding: true,
        };

        let body = serde_json::to_value(GenerateContentRequest::from_generation(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Compare milk"}]}],
                "systemInstruction": {"parts": [{"text": "Use ### ITEM:"}]},
                "tools": [{"googleSearch": {}}]
            })
        );
    }

    #[test]
    fn test_request_without_grounding_omits_tools() {
        let request = GenerationRequest {
            prompt: "hi".to_string(),
            system_instruction: String::new(),
            search_grounding: false,
        };

        let body = serde_json::to_value(GenerateContentRequest::from_generation(&request)).unwrap();

        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_text_and_citations() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Intro "}, {"text": "text"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"retrievedContext": {"uri": "gs://bucket"}},
                        {"web": {"title": "No uri"}},
                        {"web": "garbage"}
                    ]
                }
            }]
        });

        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(parsed.text(), "Intro text");
        let citations = parsed.citations();
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].uri.as_deref(), Some("https://a.example"));
        assert_eq!(citations[1].uri, None);
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed.text(), "");
        assert!(parsed.citations().is_empty());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            "http://localhost:9999/".to_string(),
            "key".to_string(),
            "gemini-test".to_string(),
        );
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }
}
