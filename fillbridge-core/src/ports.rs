//! Traits describing the asset source and measurement sink, plus the shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::Asset;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while fetching assets or forwarding readings.
pub enum PortError {
    /// The asset request failed at the transport layer.
    #[error("Failed to get assets: {0}")]
    Fetch(#[source] ReqwestError),
    /// The asset source answered with a non-success status.
    #[error("Failed to get assets: unexpected response code {0}")]
    FetchStatus(u16),
    /// The asset payload could not be decoded.
    #[error("Failed to decode response body: {0}")]
    Deserialization(#[source] JsonError),
    /// A reading could not be encoded.
    #[error("Failed to encode fill level: {0}")]
    Serialization(#[source] JsonError),
    /// The reading could not be delivered at the transport layer.
    #[error("Failed to send fill level: {0}")]
    Delivery(#[source] ReqwestError),
    /// The ingestion endpoint answered with an unexpected status.
    #[error("Failed to send fill level: unexpected response code {0}")]
    DeliveryStatus(u16),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
/// Source of vendor asset snapshots.
pub trait AssetPort: Send + Sync {
    /// Load the current asset list.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Fetch`], [`PortError::FetchStatus`] or
    /// [`PortError::Deserialization`] when the vendor request fails.
    async fn assets(&self) -> Result<Vec<Asset>, PortError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
/// Destination for encoded measurement packs.
pub trait MeasurementSink: Send + Sync {
    /// Deliver one encoded payload to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Delivery`] or [`PortError::DeliveryStatus`] when delivery fails.
    async fn send(&self, destination: &str, payload: Vec<u8>) -> Result<(), PortError>;
}
