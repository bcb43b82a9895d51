//! HTTP plumbing behind the client
//!
//! [`Transport`] is the seam between the task lifecycle logic and the network.
//! [`HttpTransport`] is the reqwest-backed implementation used in production.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use std::time::Duration;
use crate::error::Result;

/// Timeout applied to every request, API calls and file downloads alike
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of a plain GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    pub status: u16,
    pub body: String,
}

/// Raw HTTP operations the client needs
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts a JSON body and returns the response text
    ///
    /// Connection failures and non-2xx statuses must surface as
    /// [`SdkError::Transport`](crate::SdkError::Transport).
    async fn post(&self, url: &str, body: String) -> Result<String>;

    /// Fetches a URL; the status is returned as-is for the caller to judge
    async fn get(&self, url: &str) -> Result<FileResponse>;
}

/// [`Transport`] over a shared reqwest client
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http_client })
    }

    /// Wraps an existing client, keeping whatever timeout it was built with
    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: String) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    async fn get(&self, url: &str) -> Result<FileResponse> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FileResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/API"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"password": "p", "action": "ping"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":1,"data":"pong"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/API", mock_server.uri());
        let body = transport
            .post(&url, r#"{"password":"p","action":"ping"}"#.to_string())
            .await
            .unwrap();

        assert_eq!(body, r#"{"success":1,"data":"pong"}"#);
    }

    #[tokio::test]
    async fn test_post_server_error_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .post(&format!("{}/API", mock_server.uri()), "{}".to_string())
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1
        let transport = HttpTransport::new().unwrap();
        let err = transport.get("http://127.0.0.1:1/file.txt").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_get_reports_status_without_failing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing.txt"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .get(&format!("{}/missing.txt", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "not found");
    }
}
