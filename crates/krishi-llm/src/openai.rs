use async_trait::async_trait;
use krishi_core::error::{KrishiError, Result};
use krishi_core::models::{ClassifiedIntent, FarmerProfile, SchemeGuidance};
use serde::{Deserialize, Serialize};

use crate::ports::{IntentClassifier, SchemeGuide, TextRefiner};
use crate::prompts;

/// OpenAI-compatible chat-completions client implementing the LLM ports
pub struct OpenAiClient {
    /// Base URL for the API (e.g., "https://api.openai.com/v1")
    base_url: String,

    /// Model name used for all three flows
    model: String,

    /// API key sent as a bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client reading the API key from OPENAI_API_KEY
    pub fn from_env(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| KrishiError::ConfigMissing { key: "OPENAI_API_KEY".to_string() })?;
        Ok(Self::new(base_url, model, api_key))
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        system: &str,
        user: String,
        temperature: f32,
        json_output: bool,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system.to_string() },
                ChatMessage { role: "user".to_string(), content: user },
            ],
            temperature,
            response_format: json_output
                .then(|| ResponseFormat { format_type: "json_object".to_string() }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KrishiError::LlmUnavailable {
                reason: format!("Failed to reach the language model: {}", e),
                remediation: format!(
                    "Check that {} is reachable and OPENAI_API_KEY is valid",
                    self.base_url
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KrishiError::LlmUnavailable {
                reason: format!("Language model API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that the model '{}' is available to your API key",
                    self.model
                ),
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| KrishiError::LlmUnavailable {
                reason: format!("Failed to parse chat response: {}", e),
                remediation: "Check API compatibility of the configured endpoint".to_string(),
            })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| KrishiError::LlmUnavailable {
                reason: "Chat response contained no choices".to_string(),
                remediation: "Check API compatibility of the configured endpoint".to_string(),
            })
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClient {
    async fn classify(&self, query: &str) -> Result<ClassifiedIntent> {
        let content = self
            .chat(prompts::CLASSIFICATION_PROMPT, query.to_string(), 0.0, true)
            .await?;
        parse_classification(&content)
    }
}

#[async_trait]
impl TextRefiner for OpenAiClient {
    async fn refine(&self, query: &str, draft: &str) -> Result<String> {
        let user = format!(
            "User Query: {}\n\nDraft Message: {}\n\nRefined Farmer Response:",
            query, draft
        );
        let refined = self.chat(prompts::REFINE_PROMPT, user, 0.4, false).await?;
        Ok(refined.trim().to_string())
    }
}

#[async_trait]
impl SchemeGuide for OpenAiClient {
    async fn guide(
        &self,
        query: &str,
        profile: Option<&FarmerProfile>,
    ) -> Result<SchemeGuidance> {
        let user = match profile {
            Some(profile) => format!(
                "Farmer profile: {}\n\nQuery: {}",
                serde_json::to_string(profile)
                    .map_err(|e| KrishiError::Serialization(e.to_string()))?,
                query
            ),
            None => format!("No farmer profile available.\n\nQuery: {}", query),
        };

        let content = self.chat(prompts::SCHEME_PROMPT, user, 0.3, true).await?;
        parse_scheme_guidance(&content)
    }
}

/// Parse the structured classification output.
///
/// The label is kept verbatim; an out-of-vocabulary label is not an error
/// here, the router coerces it downstream.
fn parse_classification(content: &str) -> Result<ClassifiedIntent> {
    serde_json::from_str::<ClassificationWire>(content)
        .map(|wire| ClassifiedIntent { label: wire.intent, crop_name: wire.crop_name })
        .map_err(|e| KrishiError::LlmUnavailable {
            reason: format!("Classifier returned malformed output: {}", e),
            remediation: "The model must return {\"intent\": ..., \"crop_name\": ...}".to_string(),
        })
}

fn parse_scheme_guidance(content: &str) -> Result<SchemeGuidance> {
    serde_json::from_str(content).map_err(|e| KrishiError::LlmUnavailable {
        reason: format!("Scheme guidance was malformed: {}", e),
        remediation: "The model must return the documented schemes JSON shape".to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ClassificationWire {
    intent: String,
    #[serde(default)]
    crop_name: Option<String>,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiClient::new("https://api.openai.com/v1", "gpt-4o-mini", "sk-test");
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_parse_classification() {
        let parsed =
            parse_classification(r#"{"intent": "sowing", "crop_name": "wheat"}"#).unwrap();
        assert_eq!(parsed.label, "sowing");
        assert_eq!(parsed.crop_name.as_deref(), Some("wheat"));
    }

    #[test]
    fn test_parse_classification_keeps_unknown_labels() {
        // Coercion to "general" happens in the router, not here
        let parsed = parse_classification(r#"{"intent": "banter", "crop_name": null}"#).unwrap();
        assert_eq!(parsed.label, "banter");
        assert!(parsed.crop_name.is_none());
    }

    #[test]
    fn test_parse_classification_rejects_malformed_output() {
        assert!(parse_classification("not json").is_err());
        assert!(parse_classification(r#"{"crop_name": "wheat"}"#).is_err());
    }

    #[test]
    fn test_parse_scheme_guidance() {
        let content = r#"{
            "schemes": [{
                "name": "PM-KISAN",
                "eligibility": "needs_more_information",
                "required_documents": ["Aadhaar", "land records"],
                "application_method": "https://pmkisan.gov.in",
                "further_help": "Landholding size is needed to decide."
            }],
            "missing_fields": ["landholding_ha"]
        }"#;

        let guidance = parse_scheme_guidance(content).unwrap();
        assert_eq!(guidance.schemes.len(), 1);
        assert_eq!(guidance.missing_fields, vec!["landholding_ha"]);
    }

    #[test]
    fn test_parse_chat_response() {
        let payload = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        }"#;
        let response: ChatResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
    }
}
