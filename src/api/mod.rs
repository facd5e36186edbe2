//! Remote sync client for the settings service
//!
//! Two calls against the backend:
//! - `GET  {base}/getSettings/{userId}`
//! - `PUT  {base}/updateSettings/{userId}` with a JSON body
//!
//! Any non-2xx status is a failure, even when the body would parse.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::config::settings::SettingsPatch;
use crate::constants::api;

mod error;
pub use error::{SyncError, SyncResult};

/// Seam between the store and the remote settings service
pub trait SettingsApi {
    /// Read the stored settings for a user
    fn get_settings(&self, user_id: &str) -> impl Future<Output = SyncResult<SettingsPatch>>;

    /// Write a partial or complete settings object, returning the stored result
    fn update_settings(
        &self,
        user_id: &str,
        patch: &SettingsPatch,
    ) -> impl Future<Output = SyncResult<SettingsPatch>>;
}

/// HTTP implementation backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpSettingsApi {
    client: Client,
    base: Url,
}

impl HttpSettingsApi {
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// `{base}/{action}/{user_id}` with the user id encoded as one segment
    fn endpoint(&self, action: &str, user_id: &str) -> SyncResult<Url> {
        // Dot segments are dropped by the URL encoder and would leave the id off the path
        if user_id == "." || user_id == ".." {
            return Err(SyncError::InvalidUrl(format!("user id '{user_id}' is not a valid path segment")));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(action)
            .push(user_id);
        Ok(url)
    }

    async fn read_body(response: reqwest::Response) -> SyncResult<SettingsPatch> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Settings service rejected request");
            return Err(SyncError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl SettingsApi for HttpSettingsApi {
    async fn get_settings(&self, user_id: &str) -> SyncResult<SettingsPatch> {
        let url = self.endpoint(api::GET_SETTINGS, user_id)?;
        debug!(%url, "Fetching settings");

        let response = self.client.get(url).send().await?;
        Self::read_body(response).await
    }

    async fn update_settings(&self, user_id: &str, patch: &SettingsPatch) -> SyncResult<SettingsPatch> {
        let url = self.endpoint(api::UPDATE_SETTINGS, user_id)?;
        debug!(%url, "Updating settings");

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .json(patch)
            .send()
            .await?;
        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Theme;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Request as seen by the one-shot test server
    struct Captured {
        request_line: String,
        headers: Vec<String>,
        body: String,
    }

    /// Serve exactly one canned HTTP response on a loopback port
    fn serve_once(status: &str, body: &str) -> (Url, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                headers.push(line);
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            Captured {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body).unwrap(),
            }
        });

        let base = Url::parse(&format!("http://{addr}/api")).unwrap();
        (base, handle)
    }

    #[tokio::test]
    async fn test_get_settings_success() {
        let (base, server) = serve_once("200 OK", r#"{"theme":"dark","compact_mode":true}"#);
        let api = HttpSettingsApi::new(base);

        let patch = api.get_settings("u1").await.unwrap();
        assert_eq!(patch.theme, Some(Theme::Dark));
        assert_eq!(patch.compact_mode, Some(true));
        assert_eq!(patch.font_size, None);

        let captured = server.join().unwrap();
        assert_eq!(captured.request_line, "GET /api/getSettings/u1 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_update_settings_sends_json_body() {
        let (base, server) = serve_once("200 OK", r#"{"theme":"light","compact_mode":true}"#);
        let api = HttpSettingsApi::new(base);
        let patch = SettingsPatch {
            compact_mode: Some(true),
            ..SettingsPatch::default()
        };

        let stored = api.update_settings("u1", &patch).await.unwrap();
        assert_eq!(stored.compact_mode, Some(true));

        let captured = server.join().unwrap();
        assert_eq!(captured.request_line, "PUT /api/updateSettings/u1 HTTP/1.1");
        assert!(
            captured
                .headers
                .iter()
                .any(|h| h.to_lowercase() == "content-type: application/json")
        );
        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent, serde_json::json!({ "compact_mode": true }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error_even_with_json_body() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"theme":"dark"}"#);
        let api = HttpSettingsApi::new(base);

        let err = api.get_settings("u1").await.unwrap_err();
        match err {
            SyncError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"theme":"dark"}"#);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_body_is_error() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let api = HttpSettingsApi::new(base);

        let err = api.get_settings("u1").await.unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let api = HttpSettingsApi::new(Url::parse(&format!("http://127.0.0.1:{port}/api")).unwrap());

        let err = api.get_settings("u1").await.unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
    }

    #[test]
    fn test_endpoint_encodes_user_id() {
        let client = HttpSettingsApi::new(Url::parse("http://localhost:5000/api/").unwrap());
        let url = client.endpoint(api::GET_SETTINGS, "a b/c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/getSettings/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let client = HttpSettingsApi::new(Url::parse("http://localhost:5000/api").unwrap());

        for user_id in [".", ".."] {
            let err = client.endpoint(api::UPDATE_SETTINGS, user_id).unwrap_err();
            assert!(matches!(err, SyncError::InvalidUrl(_)), "user id {user_id:?} gave {err:?}");
        }

        // Dots inside an id are ordinary characters
        let url = client.endpoint(api::GET_SETTINGS, "..u1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/getSettings/..u1");
    }

    #[tokio::test]
    async fn test_dot_user_id_sends_no_request() {
        let client = HttpSettingsApi::new(Url::parse("http://127.0.0.1:9/api").unwrap());
        let err = client.get_settings("..").await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidUrl(_)));
    }
}
