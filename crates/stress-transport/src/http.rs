//! HTTP transport: one `POST` per batch to the data-load endpoint.

use crate::error::TransportError;
use crate::factory::TransportSettings;
use crate::handler::Handler;
use crate::outcome::Statistician;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use stress_generator::DataFormat;
use tracing::{debug, error};

/// Path of the data-load API on the endpoint.
pub const DATALOAD_PATH: &str = "dataload";

/// How long an idle pooled connection is kept around.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Uploads batches with HTTP `POST`.
///
/// Connections are pooled by the underlying client and reused between
/// batches of the same topic.
pub struct HttpHandler {
    client: Client,
    url: Url,
    topic: String,
    format: DataFormat,
    user: String,
    password: String,
}

impl HttpHandler {
    /// Create a handler posting to `http://{endpoint}/dataload?topic={topic}`.
    pub fn new(topic: &str, settings: &TransportSettings) -> Result<Self, TransportError> {
        let endpoint = settings.endpoint.trim_end_matches('/');
        let url = Url::parse_with_params(
            &format!("http://{endpoint}/{DATALOAD_PATH}"),
            &[("topic", topic)],
        )
        .map_err(|e| TransportError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url,
            topic: topic.to_string(),
            format: settings.data_format,
            user: settings.user.clone(),
            password: settings.password.clone(),
        })
    }

    /// Target URL for this topic.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Handler for HttpHandler {
    fn name(&self) -> &'static str {
        "http"
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    async fn send(&self, batch: Bytes) -> Statistician {
        let batch_len = batch.len() as u64;

        let request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, self.format.content_type())
            .header("Context-Type", self.format.as_str())
            .header(CONNECTION, "keep-alive")
            .header("User", self.user.as_str())
            .header("Password", self.password.as_str())
            .body(batch);

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Sent http request to topic '{}' with error: {}", self.topic, e);
                return Statistician::failed(&self.topic, start.elapsed());
            }
        };
        let elapsed = start.elapsed();

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            debug!("Failed to read response body: {}", e);
            String::new()
        });

        // Any 2xx is accepted, not only 200.
        if status.is_success() {
            debug!("Response code: {}, {}", status, body);
            Statistician::succeeded(&self.topic, batch_len, elapsed)
        } else {
            error!(
                "Topic '{}' rejected batch. Response code: {}, {}",
                self.topic, status, body
            );
            Statistician::failed(&self.topic, elapsed)
        }
    }
}
