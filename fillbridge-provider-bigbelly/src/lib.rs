//! Asset source for the BigBelly fleet management API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, instrument, warn};

use fillbridge_core::{
    model::{Asset, AssetsResponse},
    ports::{AssetPort, PortError},
};

/// Header carrying the BigBelly API key.
pub const TOKEN_HEADER: &str = "X-Token";

/// Asset list loader for one BigBelly account.
pub struct BigBellyAssetPort {
    client: Client,
    api_url: String,
    x_token: String,
}

impl BigBellyAssetPort {
    /// Create a new asset port bound to the given HTTP client.
    #[must_use]
    pub fn new<U: Into<String>, T: Into<String>>(client: Client, api_url: U, x_token: T) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            x_token: x_token.into(),
        }
    }

    // The API multiplexes object types and actions over one endpoint.
    fn request(&self) -> RequestBuilder {
        self.client
            .get(&self.api_url)
            .query(&[("action", "load"), ("objectType", "assets")])
            .header(ACCEPT, "application/json")
            .header(TOKEN_HEADER, &self.x_token)
    }
}

#[async_trait]
impl AssetPort for BigBellyAssetPort {
    #[instrument(name = "get-assets", skip(self))]
    async fn assets(&self) -> Result<Vec<Asset>, PortError> {
        let resp = self.request().send().await.map_err(PortError::Fetch)?;

        check_fetch(resp.status())?;

        let body = resp.bytes().await.map_err(PortError::Fetch)?;
        debug!(bytes = body.len(), "received asset list");

        parse_assets(&body)
    }
}

/// Build a shared asset port for the BigBelly API.
#[must_use]
pub fn asset_port<U: Into<String>, T: Into<String>>(
    client: Client,
    api_url: U,
    x_token: T,
) -> Arc<dyn AssetPort> {
    Arc::new(BigBellyAssetPort::new(client, api_url, x_token))
}

/// Accept any 2xx answer from the asset list endpoint.
///
/// # Errors
///
/// Returns [`PortError::FetchStatus`] for any other status.
pub fn check_fetch(status: StatusCode) -> Result<(), PortError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PortError::FetchStatus(status.as_u16()))
    }
}

/// Decode an asset list response body.
///
/// # Errors
///
/// Returns [`PortError::Deserialization`] when the body is not an asset list.
pub fn parse_assets(body: &[u8]) -> Result<Vec<Asset>, PortError> {
    let response: AssetsResponse =
        serde_json::from_slice(body).map_err(PortError::Deserialization)?;

    if response.has_error_code() {
        warn!(
            error_code = %response.error_code,
            assets = response.assets.len(),
            "asset list reported an error code"
        );
    }

    Ok(response.assets)
}
