use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use theograph_config::LlmConfig;

use super::{LanguageModel, LlmError, LlmResult, Prompt};

/// Client for a locally hosted Ollama runtime (`/api/generate`, non-streaming).
pub struct OllamaClient {
    endpoint: String,
    model: String,
    http: Client,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            endpoint: format!("{}/api/generate", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &Prompt) -> LlmResult<String> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt: &prompt.text,
            system: &prompt.system,
            stream: false,
            format: prompt.expects_json.then_some("json"),
        };

        tracing::debug!(
            model = %self.model,
            template = prompt.kind.as_str(),
            prompt_chars = prompt.text.len(),
            "Calling model"
        );

        let response = self.http.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(raw.response.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PromptKind;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(&LlmConfig {
            base_url: format!("{}/", server.uri()),
            model: "llama3".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn prompt(expects_json: bool) -> Prompt {
        Prompt {
            kind: PromptKind::ParseQuestion,
            system: "system".to_string(),
            text: "What is the Pythagorean theorem?".to_string(),
            expects_json,
        }
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = OllamaClient::new(&LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            model: "llama3".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(client.endpoint(), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn test_generate_requests_json_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "llama3",
                "stream": false,
                "format": "json"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "response": "  {\"theorems\": [\"Pythagorean Theorem\"]}\n",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let text = client.generate(&prompt(true)).await.unwrap();

        assert_eq!(text, "{\"theorems\": [\"Pythagorean Theorem\"]}");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model 'llama3' not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate(&prompt(false)).await.unwrap_err();

        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate(&prompt(false)).await.unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }
}
