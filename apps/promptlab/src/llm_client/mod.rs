/// LLM Client: the single point of entry for all chat-completion calls in promptlab.
///
/// ARCHITECTURAL RULE: the experiment runner never builds HTTP requests itself.
/// It talks to the completion API through the `CompletionService` trait defined here,
/// which lets tests substitute a scripted service.
///
/// Wire format: OpenAI chat completions (`POST {base_url}/chat/completions`).
/// No retries: one request per iteration, failures are reported to the caller.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used when `PROMPTLAB_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No choice, or a choice whose content is null. An empty string is a
    /// valid completion and is scored like any other text.
    #[error("LLM returned no content")]
    EmptyContent,
}

impl LlmError {
    /// Transport failures, rate limiting (429) and 5xx responses may succeed on a
    /// later call. Auth, quota-exhausted 4xx and malformed payloads will not.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Parse(_) | LlmError::EmptyContent => false,
        }
    }
}

/// One role/content pair in the ordered message list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Everything the completion service needs for a single call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Generated text plus the usage metadata reported by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The completion collaborator. Implement this to swap the backend without
/// touching the runner.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

/// Chat-completions client over reqwest. The credential is supplied at
/// construction; nothing in here reads the environment.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let usage = parsed.usage.unwrap_or_default();
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        debug!(
            "Completion succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );

        Ok(Completion { text, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".to_string(),
            messages: vec![
                ChatMessage::system("You are an expert technical interviewer."),
                ChatMessage::user("Generate 5 questions"),
            ],
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    async fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new("test-key".to_string(), format!("{}/v1/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_text_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "max_tokens": 1000,
                "messages": [
                    {"role": "system", "content": "You are an expert technical interviewer."},
                    {"role": "user", "content": "Generate 5 questions"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "1. What is REST?"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server).await.complete(&request()).await.unwrap();
        assert_eq!(completion.text, "1. What is REST?");
        assert_eq!(completion.usage.total_tokens, 19);
    }

    #[tokio::test]
    async fn test_auth_failure_is_permanent_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .complete(&request())
            .await
            .unwrap_err();
        match &err {
            LlmError::Api { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_rate_limit_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("slow down"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_empty_string_content_is_a_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server).await.complete(&request()).await.unwrap();
        assert_eq!(completion.text, "");
        assert_eq!(completion.usage.total_tokens, 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_server_error_is_transient() {
        let err = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(err.is_transient());
    }
}
