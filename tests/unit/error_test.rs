//! Tests for error types

use area_miner::core::MiningError;
use area_miner::util::serde::OwnerId;

#[test]
fn test_error_display() {
    let owner = OwnerId::new_random();
    assert_eq!(
        MiningError::NotFound(owner).to_string(),
        format!("no session for owner {owner}")
    );
    assert_eq!(
        MiningError::SessionAlreadyActive(owner).to_string(),
        format!("session already active for owner {owner}")
    );
    assert_eq!(
        MiningError::InvalidConfig("bad".into()).to_string(),
        "invalid configuration: bad"
    );
}

#[test]
fn test_error_into_anyhow() {
    let err: anyhow::Error = MiningError::OversizedRegion { volume: 8, max: 4 }.into();
    assert!(err.downcast_ref::<MiningError>().is_some());
    assert_eq!(err.to_string(), "region volume 8 exceeds maximum 4");
}
