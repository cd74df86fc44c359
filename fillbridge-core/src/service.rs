//! High-level service facade running the fetch, classify, and send pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::classify;
use crate::model::{Asset, FillLevel};
use crate::ports::{AssetPort, MeasurementSink, PortError};
use crate::senml;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Counters describing one pipeline run.
pub struct RunSummary {
    /// Assets returned by the source.
    pub fetched: usize,
    /// Assets dropped as out of service.
    pub excluded: usize,
    /// Readings delivered to the sink.
    pub sent: usize,
}

/// Public entry point for forwarding fill levels.
pub struct FillLevelService {
    assets: Arc<dyn AssetPort>,
    sink: Arc<dyn MeasurementSink>,
    destination: String,
}

impl FillLevelService {
    /// Create a new service delivering readings to `destination`.
    #[must_use]
    pub fn new<S: Into<String>>(
        assets: Arc<dyn AssetPort>,
        sink: Arc<dyn MeasurementSink>,
        destination: S,
    ) -> Self {
        Self {
            assets,
            sink,
            destination: destination.into(),
        }
    }

    /// Load the current asset list from the source.
    ///
    /// # Errors
    ///
    /// Returns the source's [`PortError`] unchanged.
    pub async fn fetch_assets(&self) -> Result<Vec<Asset>, PortError> {
        let assets = self.assets.assets().await?;
        debug!(count = assets.len(), "fetched assets");
        Ok(assets)
    }

    /// Encode and deliver readings in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Serialization`] when a reading cannot be encoded, or the
    /// sink's delivery error. Readings after the failing one are not sent.
    pub async fn send(&self, fill_levels: &[FillLevel]) -> Result<usize, PortError> {
        for (sent, level) in fill_levels.iter().enumerate() {
            let payload = senml::to_json(level)?;

            if let Err(err) = self.sink.send(&self.destination, payload).await {
                warn!(
                    device_id = %level.device_id,
                    remaining = fill_levels.len() - sent,
                    "delivery failed, aborting batch"
                );
                return Err(err);
            }

            debug!(device_id = %level.device_id, "sent fill level");
        }

        Ok(fill_levels.len())
    }

    /// Run the full pipeline once.
    ///
    /// # Errors
    ///
    /// Returns the first [`PortError`] raised while fetching, encoding, or sending.
    #[instrument(skip(self), fields(destination = %self.destination))]
    pub async fn run(&self, captured_at: DateTime<Utc>) -> Result<RunSummary, PortError> {
        let assets = self.fetch_assets().await?;
        let fill_levels = classify::fill_levels(&assets, captured_at);

        let summary = RunSummary {
            fetched: assets.len(),
            excluded: assets.len() - fill_levels.len(),
            sent: self.send(&fill_levels).await?,
        };

        info!(
            fetched = summary.fetched,
            excluded = summary.excluded,
            sent = summary.sent,
            "forwarded fill levels"
        );

        Ok(summary)
    }
}
