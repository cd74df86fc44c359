//! Domain data structures for vendor assets and normalized fill-level readings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::senml::{Field, Lwm2mObject};

// The vendor sends `null` for unset fields as often as it leaves them out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Status code the vendor reports when the asset list was loaded without problems.
pub const STATUS_OK: &str = "STATUS_OK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Operational status of a container as reported by the vendor.
pub enum AssetStatus {
    /// Container is deployed and reporting.
    InService,
    /// Container is taken out of service; its readings are not forwarded.
    OutOfService,
    /// Any other vendor status, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::InService => write!(formatter, "IN_SERVICE"),
            AssetStatus::OutOfService => write!(formatter, "OUT_OF_SERVICE"),
            AssetStatus::Other(raw) => write!(formatter, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Most recent collection recorded for a container.
pub struct LastCollection {
    /// Fullness in percent when the container was emptied.
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent_full: i32,
    /// Collection time in epoch milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One container snapshot from the vendor asset list.
pub struct Asset {
    /// Current fullness on the vendor's 0-10 scale.
    pub latest_fullness: i32,
    /// Fullness on the vendor's 0-10 scale at which the container counts as full.
    pub fullness_threshold: i32,
    /// Operational status.
    pub status: AssetStatus,
    /// Serial number, unique per container.
    pub serial_number: i64,
    /// Longitude of the container position.
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    /// Latitude of the container position.
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    /// Vendor disposition such as `OPERATIONAL`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub disposition: String,
    /// Vendor reason code such as `NOT_READY`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    /// Free-text placement description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Last time the container was emptied.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_collection: LastCollection,
}

impl Asset {
    /// Device identifier used downstream, the decimal form of the serial number.
    #[must_use]
    pub fn device_id(&self) -> String {
        self.serial_number.to_string()
    }

    /// Whether the container is out of service.
    #[must_use]
    pub fn is_out_of_service(&self) -> bool {
        self.status == AssetStatus::OutOfService
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Envelope returned by the vendor's asset list endpoint.
pub struct AssetsResponse {
    /// Reported containers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<Asset>,
    /// Vendor status code, `STATUS_OK` on success.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_code: String,
}

impl AssetsResponse {
    /// Whether the vendor flagged the response with a non-OK status code.
    #[must_use]
    pub fn has_error_code(&self) -> bool {
        !self.error_code.is_empty() && self.error_code != STATUS_OK
    }
}

/// LwM2M object type for fill-level readings.
pub const FILL_LEVEL_OBJECT_ID: &str = "3435";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Normalized fill-level reading for one container.
pub struct FillLevel {
    /// Device identifier.
    pub device_id: String,
    /// Capture time of the reading.
    pub timestamp: DateTime<Utc>,
    /// Fullness in percent.
    pub actual_filling_percentage: f64,
    /// Fullness has reached the high threshold.
    pub container_full: bool,
    /// Container reports no fill at all.
    pub container_empty: bool,
    /// Percentage at or above which the container counts as full.
    pub high_threshold: f64,
}

impl FillLevel {
    /// Build a reading; the high threshold is set separately.
    #[must_use]
    pub fn new<S: Into<String>>(
        device_id: S,
        actual_filling_percentage: f64,
        container_full: bool,
        container_empty: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            actual_filling_percentage,
            container_full,
            container_empty,
            high_threshold: 0.0,
        }
    }

    /// Set the high threshold.
    #[must_use]
    pub fn with_high_threshold(mut self, high_threshold: f64) -> Self {
        self.high_threshold = high_threshold;
        self
    }
}

impl Lwm2mObject for FillLevel {
    fn id(&self) -> &str {
        &self.device_id
    }

    fn object_id(&self) -> &str {
        FILL_LEVEL_OBJECT_ID
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("2", self.actual_filling_percentage),
            Field::new("5", self.container_full),
            Field::new("7", self.container_empty),
            Field::new("4", self.high_threshold),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET_JSON: &str = r#"
    {
        "latestFullness": 0,
        "reason": "NOT_READY",
        "serialNumber": 1,
        "accountName": "Test kommun",
        "latitude": 61.39204040369734,
        "stationSerialNumber": 1,
        "description": "Torget",
        "ageThreshold": 0,
        "fullnessThreshold": 6,
        "lastCall": 1704949151000,
        "accountId": 1,
        "disposition": "OPERATIONAL",
        "streamType": "TRASH",
        "groupIds": [10157],
        "lastCollection": {
            "percentFull": 0,
            "timestamp": 1704872214000
        },
        "position": "center",
        "longitude": 18.30680549824277,
        "status": "IN_SERVICE"
    }"#;

    #[test]
    fn deserializes_vendor_asset() {
        let asset: Asset = serde_json::from_str(ASSET_JSON).expect("valid asset");

        assert_eq!(asset.description, "Torget");
        assert_eq!(asset.status, AssetStatus::InService);
        assert_eq!(asset.fullness_threshold, 6);
        assert_eq!(asset.last_collection.timestamp, 1_704_872_214_000);
        assert_eq!(asset.device_id(), "1");
    }

    #[test]
    fn keeps_unknown_status_verbatim() {
        let json = r#"{"latestFullness":1,"fullnessThreshold":6,"status":"IN_REPAIR","serialNumber":9}"#;
        let asset: Asset = serde_json::from_str(json).expect("valid asset");

        assert_eq!(asset.status, AssetStatus::Other("IN_REPAIR".to_owned()));
        assert_eq!(asset.status.to_string(), "IN_REPAIR");
        assert!(!asset.is_out_of_service());
        assert_eq!(asset.last_collection, LastCollection::default());
    }

    #[test]
    fn rejects_asset_without_serial_number() {
        let json = r#"{"latestFullness":1,"fullnessThreshold":6,"status":"IN_SERVICE"}"#;
        assert!(serde_json::from_str::<Asset>(json).is_err());
    }

    #[test]
    fn large_serial_numbers_keep_every_digit() {
        let json = r#"{"latestFullness":1,"fullnessThreshold":6,"status":"OUT_OF_SERVICE","serialNumber":9007199254740993}"#;
        let asset: Asset = serde_json::from_str(json).expect("valid asset");

        assert!(asset.is_out_of_service());
        assert_eq!(asset.device_id(), "9007199254740993");
    }

    #[test]
    fn null_descriptive_fields_fall_back_to_defaults() {
        let json = r#"{
            "latestFullness": 3,
            "fullnessThreshold": 6,
            "status": "IN_SERVICE",
            "serialNumber": 12,
            "longitude": null,
            "latitude": null,
            "disposition": null,
            "reason": null,
            "description": null,
            "lastCollection": null
        }"#;
        let asset: Asset = serde_json::from_str(json).expect("nulls are tolerated");

        assert_eq!(asset.longitude, 0.0);
        assert_eq!(asset.latitude, 0.0);
        assert!(asset.disposition.is_empty());
        assert!(asset.reason.is_empty());
        assert!(asset.description.is_empty());
        assert_eq!(asset.last_collection, LastCollection::default());

        let collection: LastCollection =
            serde_json::from_str(r#"{"percentFull":null,"timestamp":null}"#).expect("nulls are tolerated");
        assert_eq!(collection, LastCollection::default());
    }

    #[test]
    fn one_null_field_keeps_the_whole_batch() {
        let json = r#"{
            "assets": [
                {"latestFullness":8,"fullnessThreshold":6,"status":"IN_SERVICE","serialNumber":1,"latitude":61.39},
                {"latestFullness":6,"fullnessThreshold":6,"status":"IN_SERVICE","serialNumber":2,"latitude":null}
            ],
            "errorCode": null
        }"#;
        let response: AssetsResponse = serde_json::from_str(json).expect("valid response");

        assert_eq!(response.assets.len(), 2);
        assert!(!response.has_error_code());
    }

    #[test]
    fn null_core_fields_are_still_rejected() {
        let json = r#"{"latestFullness":null,"fullnessThreshold":6,"status":"IN_SERVICE","serialNumber":1}"#;
        assert!(serde_json::from_str::<Asset>(json).is_err());
    }

    #[test]
    fn flags_vendor_error_codes() {
        let ok: AssetsResponse =
            serde_json::from_str(r#"{"assets":[],"errorCode":"STATUS_OK"}"#).expect("valid");
        let failed: AssetsResponse =
            serde_json::from_str(r#"{"assets":[],"errorCode":"INVALID_TOKEN"}"#).expect("valid");

        assert!(!ok.has_error_code());
        assert!(failed.has_error_code());
    }
}
