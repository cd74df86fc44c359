//! Measurement sink posting SenML packs to an HTTP ingestion endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, instrument};

use fillbridge_core::{
    ports::{MeasurementSink, PortError},
    senml,
};

/// Sink that POSTs each pack and expects `201 Created`.
pub struct HttpSink {
    client: Client,
}

impl HttpSink {
    /// Create a new sink bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn request(&self, destination: &str, payload: Vec<u8>) -> RequestBuilder {
        self.client
            .post(destination)
            .header(CONTENT_TYPE, senml::CONTENT_TYPE)
            .body(payload)
    }
}

#[async_trait]
impl MeasurementSink for HttpSink {
    #[instrument(name = "send-fillingLevel", skip(self, payload), fields(bytes = payload.len()))]
    async fn send(&self, destination: &str, payload: Vec<u8>) -> Result<(), PortError> {
        let resp = self
            .request(destination, payload)
            .send()
            .await
            .map_err(PortError::Delivery)?;

        check_delivery(resp.status())?;
        debug!("measurement accepted");
        Ok(())
    }
}

/// The ingestion endpoint answers `201 Created` for every accepted pack.
///
/// # Errors
///
/// Returns [`PortError::DeliveryStatus`] for any other status, including other 2xx codes.
pub fn check_delivery(status: StatusCode) -> Result<(), PortError> {
    match status {
        StatusCode::CREATED => Ok(()),
        other => Err(PortError::DeliveryStatus(other.as_u16())),
    }
}

/// Build a shared HTTP sink.
#[must_use]
pub fn sink(client: Client) -> Arc<dyn MeasurementSink> {
    Arc::new(HttpSink::new(client))
}
