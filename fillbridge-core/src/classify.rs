//! Mapping of vendor asset snapshots to fill-level readings.

use chrono::{DateTime, Utc};

use crate::model::{Asset, FillLevel};

/// Factor from the vendor's 0-10 scale to percent.
pub const PERCENT_PER_VENDOR_STEP: f64 = 10.0;

/// Map one asset to a reading captured at `captured_at`.
///
/// Returns `None` for containers that are out of service.
#[must_use]
pub fn fill_level(asset: &Asset, captured_at: DateTime<Utc>) -> Option<FillLevel> {
    if asset.is_out_of_service() {
        return None;
    }

    let actual_filling_percentage = f64::from(asset.latest_fullness) * PERCENT_PER_VENDOR_STEP;
    let high_threshold = f64::from(asset.fullness_threshold) * PERCENT_PER_VENDOR_STEP;

    // Only a positive reading makes the container non-empty; full and empty
    // can both hold when the threshold is zero or negative.
    let container_full = actual_filling_percentage >= high_threshold;
    let container_empty = actual_filling_percentage <= 0.0;

    Some(
        FillLevel::new(
            asset.device_id(),
            actual_filling_percentage,
            container_full,
            container_empty,
            captured_at,
        )
        .with_high_threshold(high_threshold),
    )
}

/// Map a batch of assets, dropping out-of-service containers and keeping input order.
#[must_use]
pub fn fill_levels(assets: &[Asset], captured_at: DateTime<Utc>) -> Vec<FillLevel> {
    assets
        .iter()
        .filter_map(|asset| fill_level(asset, captured_at))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::{AssetStatus, LastCollection};

    fn asset(serial_number: i64, latest_fullness: i32, fullness_threshold: i32) -> Asset {
        Asset {
            latest_fullness,
            fullness_threshold,
            status: AssetStatus::InService,
            serial_number,
            longitude: 18.3,
            latitude: 61.39,
            disposition: "OPERATIONAL".to_owned(),
            reason: "NOT_READY".to_owned(),
            description: "Torget".to_owned(),
            last_collection: LastCollection {
                percent_full: 8,
                timestamp: 1_700_644_191_000,
            },
        }
    }

    fn out_of_service(mut asset: Asset) -> Asset {
        asset.status = AssetStatus::OutOfService;
        asset
    }

    fn captured_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 11, 6, 0, 0).single().expect("valid time")
    }

    #[test]
    fn full_container_above_threshold() {
        let level = fill_level(&asset(1, 8, 6), captured_at()).expect("in service");

        assert_eq!(level.device_id, "1");
        assert_eq!(level.actual_filling_percentage, 80.0);
        assert_eq!(level.high_threshold, 60.0);
        assert!(level.container_full);
        assert!(!level.container_empty);
    }

    #[test]
    fn reading_at_threshold_counts_as_full() {
        let level = fill_level(&asset(2, 6, 6), captured_at()).expect("in service");

        assert_eq!(level.actual_filling_percentage, 60.0);
        assert!(level.container_full);
    }

    #[test]
    fn zero_reading_is_empty() {
        let level = fill_level(&asset(3, 0, 6), captured_at()).expect("in service");

        assert_eq!(level.actual_filling_percentage, 0.0);
        assert_eq!(level.high_threshold, 60.0);
        assert!(!level.container_full);
        assert!(level.container_empty);
    }

    #[test]
    fn zero_threshold_is_both_full_and_empty() {
        let level = fill_level(&asset(4, 0, 0), captured_at()).expect("in service");

        assert!(level.container_full);
        assert!(level.container_empty);
    }

    #[test]
    fn uses_capture_time_not_vendor_time() {
        let level = fill_level(&asset(5, 2, 6), captured_at()).expect("in service");

        assert_eq!(level.timestamp, captured_at());
    }

    #[test]
    fn unknown_status_is_still_classified() {
        let mut unknown = asset(6, 2, 6);
        unknown.status = AssetStatus::Other("IN_REPAIR".to_owned());

        assert!(fill_level(&unknown, captured_at()).is_some());
    }

    #[test]
    fn maps_every_in_service_asset() {
        let assets = vec![asset(1, 8, 6), asset(2, 6, 6), asset(3, 0, 6)];
        let levels = fill_levels(&assets, captured_at());

        assert_eq!(levels.len(), 3);
        assert_eq!(levels.get(1).map(|level| level.actual_filling_percentage), Some(60.0));
    }

    #[test]
    fn drops_out_of_service_and_keeps_order() {
        let assets = vec![asset(1, 8, 6), out_of_service(asset(2, 6, 6)), asset(3, 0, 6)];
        let levels = fill_levels(&assets, captured_at());

        let ids: Vec<&str> = levels.iter().map(|level| level.device_id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn empty_batch_yields_nothing() {
        assert!(fill_levels(&[], captured_at()).is_empty());
    }

    #[test]
    fn flags_follow_threshold_rules() {
        for fullness in -1..=10 {
            for threshold in -1..=10 {
                let level = fill_level(&asset(7, fullness, threshold), captured_at())
                    .expect("in service");

                assert_eq!(level.actual_filling_percentage, f64::from(fullness) * 10.0);
                assert_eq!(level.high_threshold, f64::from(threshold) * 10.0);
                assert_eq!(
                    level.container_full,
                    level.actual_filling_percentage >= level.high_threshold
                );
                assert_eq!(level.container_empty, level.actual_filling_percentage <= 0.0);
                if level.container_full && level.container_empty {
                    assert!(level.high_threshold <= 0.0);
                }
            }
        }
    }
}
