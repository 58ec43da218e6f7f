//! Tests for the request/response control surface

use std::sync::Arc;

use area_miner::builders::SchedulerBuilder;
use area_miner::config::MinerConfig;
use area_miner::core::{CellKind, Coordinate, MiningError, Region, Scheduler, SessionStatus};
use area_miner::infra::InMemoryWorld;
use area_miner::runtime::{fetch_status, handle_json, handle_request, ControlRequest, ControlResponse};
use area_miner::util::serde::OwnerId;
use serde_json::json;

fn setup() -> (Arc<InMemoryWorld>, Scheduler<InMemoryWorld, InMemoryWorld>) {
    let world = Arc::new(InMemoryWorld::new());
    world.fill(
        &Region::new(Coordinate::new(0, 0, 0), Coordinate::new(1, 0, 1)),
        &CellKind::material("stone"),
    );
    world.set(Coordinate::new(0, 1, 0), CellKind::material("dirt"));
    let scheduler = SchedulerBuilder::new(MinerConfig::default())
        .build_shared(Arc::clone(&world))
        .unwrap();
    (world, scheduler)
}

fn start_json(owner: OwnerId, extra: &serde_json::Value) -> String {
    let mut req = json!({
        "op": "start",
        "owner": owner,
        "region": {
            "corner_a": {"x": 1, "y": 1, "z": 1},
            "corner_b": {"x": 0, "y": 0, "z": 0}
        },
        "speed": 1.0
    });
    if let (Some(obj), Some(more)) = (req.as_object_mut(), extra.as_object()) {
        obj.extend(more.clone());
    }
    req.to_string()
}

#[test]
fn test_start_via_json_with_deny_list() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let raw = handle_json(
        &scheduler,
        &start_json(owner, &json!({"mode": "deny", "deny": [{"material": "stone"}]})),
    )
    .unwrap();

    let resp: ControlResponse = serde_json::from_str(&raw).unwrap();
    assert!(resp.ok);
    assert!(resp.created);
    assert_eq!(resp.status, Some(SessionStatus::Active));
    assert_eq!(resp.snapshot.unwrap().total, 1);
}

#[test]
fn test_start_twice_returns_existing() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let body = start_json(owner, &json!({}));

    let first: ControlResponse = serde_json::from_str(&handle_json(&scheduler, &body).unwrap()).unwrap();
    let second: ControlResponse = serde_json::from_str(&handle_json(&scheduler, &body).unwrap()).unwrap();
    assert!(first.created);
    assert!(second.ok);
    assert!(!second.created);
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_empty_allow_list_defaults_to_nothing() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let raw = handle_json(&scheduler, &start_json(owner, &json!({"mode": "allow"}))).unwrap();
    let resp: ControlResponse = serde_json::from_str(&raw).unwrap();
    assert_eq!(resp.snapshot.unwrap().total, 0);

    let other = OwnerId::new_random();
    let raw = handle_json(
        &scheduler,
        &start_json(other, &json!({"mode": "allow", "empty_allow_list": "everything_eligible"})),
    )
    .unwrap();
    let resp: ControlResponse = serde_json::from_str(&raw).unwrap();
    assert_eq!(resp.snapshot.unwrap().total, 5);
}

#[test]
fn test_pause_resume_stop_requests() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    handle_json(&scheduler, &start_json(owner, &json!({}))).unwrap();

    let paused = handle_request(&scheduler, ControlRequest::Pause { owner });
    assert_eq!(paused.status, Some(SessionStatus::Paused));
    let resumed = handle_request(&scheduler, ControlRequest::Resume { owner });
    assert_eq!(resumed.status, Some(SessionStatus::Active));
    let stopped = handle_request(&scheduler, ControlRequest::Stop { owner });
    assert_eq!(stopped.status, Some(SessionStatus::Stopped));

    scheduler.tick();
    let status = handle_request(&scheduler, ControlRequest::Status { owner });
    assert!(!status.ok);
    assert!(status.error.unwrap().contains("no session"));
}

#[test]
fn test_unknown_owner_controls_are_noops() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let resp = handle_request(&scheduler, ControlRequest::Stop { owner });
    assert!(resp.ok);
    assert_eq!(resp.status, None);
    assert_eq!(fetch_status(&scheduler, owner), Err(MiningError::NotFound(owner)));
}

#[test]
fn test_invalid_speed_reports_error() {
    let (_world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let raw = handle_json(&scheduler, &start_json(owner, &json!({"speed": -3.0}))).unwrap();
    let resp: ControlResponse = serde_json::from_str(&raw).unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some("invalid speed: -3"));
    assert!(scheduler.is_empty());
}

#[test]
fn test_deferred_start_request() {
    let (world, scheduler) = setup();
    let owner = OwnerId::new_random();
    let raw = handle_json(&scheduler, &start_json(owner, &json!({"deferred": true}))).unwrap();
    let resp: ControlResponse = serde_json::from_str(&raw).unwrap();
    assert!(resp.created);
    assert_eq!(resp.status, Some(SessionStatus::Idle));

    for _ in 0..10 {
        scheduler.tick();
    }
    assert_eq!(world.occupied(), 0);
}

#[test]
fn test_malformed_json_is_an_error() {
    let (_world, scheduler) = setup();
    assert!(handle_json(&scheduler, r#"{"op": "explode"}"#).is_err());
}
