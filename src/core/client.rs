//! Chat-completion client with async support and cancellation
//!
//! Performs exactly one request/response exchange per lookup. There are no
//! retries; the full response is awaited before resolving.

use crate::core::config::ApiSettings;
use crate::core::constants::header::JSON;
use crate::core::prompt::PromptTemplate;
use crate::core::source::{CompanyInfoSource, CompletionError};
use crate::models::completion::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Async client for the completion endpoint
pub struct CompletionClient {
    client: Client,
    api_key: String,
    url: String,
    model: String,
}

impl CompletionClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `settings` - Endpoint, model and timeout settings
    /// * `api_key` - Bearer credential, resolved by the caller
    pub fn new(settings: &ApiSettings, api_key: String) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()
            .map_err(|e| CompletionError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            url: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
        })
    }

    /// Classify server error bodies and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("invalid_api_key")
            || error_lower.contains("unauthorized")
            || error_lower.contains("authorization required")
        {
            return "Invalid API key. Please check the configured API key variable.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again.".to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found")
                || error_lower.contains("does not exist")
                || error_lower.contains("invalid model"))
        {
            return "Model not found. Please check the api.model setting.".to_string();
        }

        if error_lower.contains("billing") || error_lower.contains("payment") {
            return "Billing issue. Please check the account billing status.".to_string();
        }

        error_detail.to_string()
    }

    /// Send the request and decode the first choice
    async fn exchange(&self, subject: &str) -> Result<String, CompletionError> {
        let prompt = PromptTemplate::new(subject).render();
        let request = CompletionRequest::for_prompt(&self.model, prompt);

        debug!(model = %self.model, url = %self.url, "Sending completion request");

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion endpoint returned an error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: Self::classify_error(&String::from_utf8_lossy(&body)),
            });
        }

        if body.is_empty() {
            return Err(CompletionError::EmptyBody);
        }

        let completion: CompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        completion
            .first_content()
            .ok_or_else(|| CompletionError::Decode("response contained no choices".to_string()))
    }
}

#[async_trait]
impl CompanyInfoSource for CompletionClient {
    async fn fetch_company_info(
        &self,
        subject: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, CompletionError> {
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(CompletionError::Cancelled),
                result = self.exchange(subject) => result,
            },
            None => self.exchange(subject).await,
        }
    }

    fn source_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str, timeout: u64) -> ApiSettings {
        ApiSettings {
            base_url: base_url.to_string(),
            model: "sonar".to_string(),
            request_timeout: timeout,
            ..ApiSettings::default()
        }
    }

    fn client_for(server: &MockServer) -> CompletionClient {
        CompletionClient::new(&settings(&server.uri(), 10), "test-key".to_string()).unwrap()
    }

    fn answer(content: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "model": "sonar",
            "choices": [
                {"index": 0, "finish_reason": "stop", "message": {"role": "assistant", "content": content}}
            ]
        })
    }

    #[tokio::test]
    async fn test_returns_first_choice_verbatim() {
        let server = MockServer::start().await;
        let expected = CompletionRequest::for_prompt("sonar", PromptTemplate::new("Acme").render());
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("  **Name:** Acme\n")))
            .expect(1)
            .mount(&server)
            .await;

        let content = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap();
        assert_eq!(content, "  **Name:** Acme\n");
    }

    #[tokio::test]
    async fn test_empty_subject_is_still_sent() {
        let server = MockServer::start().await;
        let expected = CompletionRequest::for_prompt("sonar", PromptTemplate::new("").render());
        Mock::given(method("POST"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Unknown")))
            .expect(1)
            .mount(&server)
            .await;

        let content = client_for(&server).fetch_company_info("", None).await.unwrap();
        assert_eq!(content, "Unknown");
    }

    #[tokio::test]
    async fn test_empty_choices_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_truncated_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"choices": [{"message": {"cont"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_is_decode_error() {
        let server = MockServer::start().await;
        let mut body = br#"{"choices":[{"message":{"content":"Acme "#.to_vec();
        body.push(0xFF);
        body.extend_from_slice(br#""}}]}"#);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        // A well-formed body must not rescue a failed status.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(answer("invalid_api_key")))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        match err {
            CompletionError::Status { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_company_info("Acme", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::EmptyBody));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            CompletionClient::new(&settings(&format!("http://{}", addr), 10), String::new())
                .unwrap();
        let err = client.fetch_company_info("Acme", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(answer("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = CompletionClient::new(&settings(&server.uri(), 1), "k".to_string()).unwrap();
        let err = client.fetch_company_info("Acme", None).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(answer("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = client
            .fetch_company_info("Acme", Some(&token))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_classify_auth_error() {
        let result = CompletionClient::classify_error("401 Authorization Required");
        assert!(result.contains("API key"));
    }

    #[test]
    fn test_classify_passthrough() {
        let result = CompletionClient::classify_error("upstream exploded");
        assert_eq!(result, "upstream exploded");
    }

    #[test]
    fn test_url_joins_base() {
        let client =
            CompletionClient::new(&settings("https://api.example.com/", 10), String::new())
                .unwrap();
        assert_eq!(client.url, "https://api.example.com/chat/completions");
    }
}
