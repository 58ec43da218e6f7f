//! Tests for configuration validation

use area_miner::config::{DuplicateSessionPolicy, MinerConfig};
use area_miner::core::EmptyAllowList;

#[test]
fn test_default_config_validation() {
    let config = MinerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.max_items_per_session, 100_000);
    assert_eq!(config.max_region_volume, 1_000_000);
    assert_eq!(config.max_session_duration_ticks, 72_000);
    assert_eq!(config.duplicate_policy, DuplicateSessionPolicy::ReturnExisting);
}

#[test]
fn test_invalid_max_items() {
    let invalid = MinerConfig {
        max_items_per_session: 0,
        ..MinerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_invalid_speed_range() {
    let inverted = MinerConfig {
        min_speed: 2.0,
        max_speed: 1.0,
        ..MinerConfig::default()
    };
    assert!(inverted.validate().is_err());

    let negative = MinerConfig {
        min_speed: -0.5,
        ..MinerConfig::default()
    };
    assert!(negative.validate().is_err());

    let nan = MinerConfig {
        max_speed: f64::NAN,
        ..MinerConfig::default()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn test_invalid_reporting_interval() {
    let invalid = MinerConfig {
        reporting_interval_ticks: 0,
        ..MinerConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json_partial() {
    let json = r#"{
        "max_items_per_session": 500,
        "duplicate_policy": "reject",
        "default_empty_allow_list": "everything_eligible"
    }"#;

    let config = MinerConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_items_per_session, 500);
    assert_eq!(config.duplicate_policy, DuplicateSessionPolicy::Reject);
    assert_eq!(config.default_empty_allow_list, EmptyAllowList::EverythingEligible);
    assert_eq!(config.reporting_interval_ticks, 20);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(MinerConfig::from_json_str(r#"{"max_region_volume": 0}"#).is_err());
    assert!(MinerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_json_round_trip_keeps_values() {
    let config = MinerConfig {
        tick_interval_ms: 10,
        ..MinerConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(MinerConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_speed_limits_follow_config() {
    let config = MinerConfig {
        min_speed: 0.5,
        max_speed: 2.0,
        ..MinerConfig::default()
    };
    let limits = config.speed_limits();
    assert!((limits.clamp(100.0).unwrap() - 2.0).abs() < f64::EPSILON);
    assert!((limits.clamp(0.01).unwrap() - 0.5).abs() < f64::EPSILON);
}
