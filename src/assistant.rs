use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize)]
struct AskRequest {
    message: String,
}

#[derive(Deserialize)]
struct AskResponse {
    response: String,
}

/// Why a request to the assistant failed. All variants collapse to the
/// same fallback reply in the UI; the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("could not reach the assistant: {0}")]
    Network(#[source] reqwest::Error),
    #[error("assistant returned status {0}")]
    Status(StatusCode),
    #[error("assistant reply was malformed: {0}")]
    Malformed(#[source] reqwest::Error),
}

/// HTTP client for the booking assistant's single `/ask` endpoint.
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one user message and return the assistant's reply. One attempt,
    /// no retry; a non-2xx status or a body without a `response` field is
    /// an error like any other.
    pub async fn ask(&self, message: &str) -> Result<String, AskError> {
        let url = format!("{}/ask", self.base_url);

        let request = AskRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(AskError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::Status(status));
        }

        let reply: AskResponse = response.json().await.map_err(AskError::Malformed)?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ask_returns_reply_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(serde_json::json!({"message": "hello"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "response": "hi there"
                })),
            )
            .mount(&server)
            .await;

        let client = AssistantClient::new(&server.uri());
        let reply = client.ask("hello").await.expect("request should succeed");

        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_ask_maps_server_error_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AssistantClient::new(&server.uri());
        let err = client.ask("hello").await.unwrap_err();

        assert!(matches!(
            err,
            AskError::Status(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[tokio::test]
    async fn test_ask_rejects_body_without_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = AssistantClient::new(&server.uri());
        let err = client.ask("hello").await.unwrap_err();

        assert!(matches!(err, AskError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_ask_reports_unreachable_server_as_network_error() {
        // Discard port: nothing listens there.
        let client = AssistantClient::new("http://127.0.0.1:9");
        let err = client.ask("hello").await.unwrap_err();

        assert!(matches!(err, AskError::Network(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = AssistantClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
