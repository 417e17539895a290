//! Telemetry API Client
//!
//! HTTP client for the sensor channel feed. One request per fetch, asking for
//! exactly the most recent entry.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use super::reading::{parse_feed_body, Reading};
use crate::logic::config::Config;

/// Fetch errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Response carried no usable feed entry (empty or malformed)
    #[error("no feed entry in telemetry response")]
    NoFeed,

    /// Timeout, non-2xx status or network failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Anything that can produce the latest reading
pub trait TelemetrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Reading, FetchError>> + Send;
}

/// Feed endpoint configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub channel_id: String,
    pub read_api_key: String,
    pub timeout: Duration,
}

impl From<&Config> for FeedConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            channel_id: config.channel_id.clone(),
            read_api_key: config.read_api_key.clone(),
            timeout: config.fetch_timeout,
        }
    }
}

/// ThingSpeak channel client
pub struct ThingSpeakClient {
    config: FeedConfig,
    http_client: reqwest::Client,
}

impl ThingSpeakClient {
    /// Create new client; the timeout bounds every fetch
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }

    /// Feed URL for the configured channel
    pub fn feed_url(&self) -> String {
        format!(
            "{}/channels/{}/feeds.json",
            self.config.base_url, self.config.channel_id
        )
    }

    pub fn channel_id(&self) -> &str {
        &self.config.channel_id
    }
}

impl TelemetrySource for ThingSpeakClient {
    async fn fetch(&self) -> Result<Reading, FetchError> {
        let url = self.feed_url();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.config.read_api_key.as_str()),
                ("results", "1"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Telemetry feed returned HTTP {}", status.as_u16());
            return Err(FetchError::Transport(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let reading = parse_feed_body(&body)?;
        log::info!(
            "Data fetched from channel {}: amplitude={} pattern={} flame={} motion={}",
            self.config.channel_id,
            reading.amplitude,
            reading.pattern_id,
            reading.flame_detected,
            reading.motion_detected
        );
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn config(base_url: &str) -> FeedConfig {
        FeedConfig {
            base_url: base_url.to_string(),
            channel_id: "123456".to_string(),
            read_api_key: "KEY".to_string(),
            timeout: Duration::from_millis(500),
        }
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// One-shot HTTP server; yields the raw request head. `None` never replies.
    async fn stub_server(response: Option<String>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }

            match response {
                Some(response) => {
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
            String::from_utf8_lossy(&head).into_owned()
        });

        (base_url, handle)
    }

    #[test]
    fn feed_url_uses_channel() {
        let client = ThingSpeakClient::new(config("https://api.thingspeak.com")).unwrap();
        assert_eq!(
            client.feed_url(),
            "https://api.thingspeak.com/channels/123456/feeds.json"
        );
        assert_eq!(client.channel_id(), "123456");
    }

    #[tokio::test]
    async fn fetch_sends_key_and_single_result_query() {
        let body = r#"{"channel":{"id":123456},"feeds":[{"created_at":"2024-03-01T10:00:00Z","field1":"850","field2":"0","field3":"1","field4":"8"}]}"#;
        let (base_url, server) = stub_server(Some(http_response("200 OK", body))).await;
        let client = ThingSpeakClient::new(config(&base_url)).unwrap();

        let reading = client.fetch().await.unwrap();
        let head = server.await.unwrap();

        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /channels/123456/feeds.json?"), "{}", request_line);
        assert!(request_line.contains("api_key=KEY"), "{}", request_line);
        assert!(request_line.contains("results=1"), "{}", request_line);

        assert_eq!(reading.timestamp, "2024-03-01T10:00:00Z");
        assert_eq!(reading.amplitude, 850.0);
        assert_eq!(reading.pattern_id, 8);
        assert!(!reading.flame_detected);
        assert!(reading.motion_detected);
    }

    #[tokio::test]
    async fn empty_feed_is_no_feed() {
        let (base_url, server) = stub_server(Some(http_response("200 OK", r#"{"feeds":[]}"#))).await;
        let client = ThingSpeakClient::new(config(&base_url)).unwrap();

        assert_eq!(client.fetch().await, Err(FetchError::NoFeed));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_error_is_transport_error() {
        let (base_url, server) =
            stub_server(Some(http_response("500 Internal Server Error", "{}"))).await;
        let client = ThingSpeakClient::new(config(&base_url)).unwrap();

        assert_eq!(
            client.fetch().await,
            Err(FetchError::Transport("HTTP 500".to_string()))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let (base_url, server) = stub_server(None).await;
        let client = ThingSpeakClient::new(FeedConfig {
            timeout: Duration::from_millis(200),
            ..config(&base_url)
        })
        .unwrap();

        let started = Instant::now();
        let result = client.fetch().await;
        let elapsed = started.elapsed();
        server.abort();

        assert!(matches!(result, Err(FetchError::Transport(_))), "{:?}", result);
        assert!(elapsed < Duration::from_secs(5), "fetch took {:?}", elapsed);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments
        let client = ThingSpeakClient::new(config("http://127.0.0.1:9")).unwrap();
        match client.fetch().await {
            Err(FetchError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
