//! Tests for utility functions

use area_miner::util::{now_ms, OwnerId, DEFAULT_LOG_FILTER};
use uuid::Uuid;

#[test]
fn test_owner_id_serializes_as_plain_uuid() {
    let uuid = Uuid::new_v4();
    let owner = OwnerId::from(uuid);
    let json = serde_json::to_string(&owner).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));

    let back: OwnerId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, owner);
    assert_eq!(back.as_uuid(), &uuid);
    assert_eq!(owner.to_string(), uuid.to_string());
}

#[test]
fn test_random_owners_differ() {
    assert_ne!(OwnerId::new_random(), OwnerId::new_random());
}

#[test]
fn test_clock_moves_forward() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    area_miner::util::init_tracing();
    area_miner::util::init_tracing();
    assert!(DEFAULT_LOG_FILTER.starts_with("area_miner"));
}
