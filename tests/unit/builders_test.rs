//! Tests for builder modules

use std::sync::Arc;

use area_miner::builders::SchedulerBuilder;
use area_miner::config::MinerConfig;
use area_miner::core::{CellKind, Coordinate, EligibilityPolicy, ProgressReporter, Region};
use area_miner::infra::{InMemoryProgressReporter, InMemoryWorld, TracingProgressReporter};
use area_miner::util::serde::OwnerId;

#[test]
fn test_scheduler_builder_keeps_config() {
    let config = MinerConfig {
        max_items_per_session: 42,
        ..MinerConfig::default()
    };
    let builder = SchedulerBuilder::new(config.clone());
    assert_eq!(builder.config(), &config);

    let scheduler = builder.build_shared(Arc::new(InMemoryWorld::new())).unwrap();
    assert_eq!(scheduler.config().max_items_per_session, 42);
}

#[test]
fn test_scheduler_builder_separate_capabilities() {
    let world = Arc::new(InMemoryWorld::new());
    world.set(Coordinate::new(0, 0, 0), CellKind::material("stone"));
    let scheduler = SchedulerBuilder::new(MinerConfig::default())
        .build(Arc::clone(&world), Arc::clone(&world))
        .unwrap();

    let owner = OwnerId::new_random();
    let region = Region::new(Coordinate::new(0, 0, 0), Coordinate::new(0, 0, 0));
    scheduler
        .register_and_start(owner, region, &EligibilityPolicy::default(), 1.0)
        .unwrap();
    scheduler.tick();
    assert_eq!(world.occupied(), 0);
}

#[test]
fn test_scheduler_builder_attaches_reporter() {
    let recorder = InMemoryProgressReporter::new(16);
    let reporter: Box<dyn ProgressReporter> = Box::new(recorder.clone());
    let world = Arc::new(InMemoryWorld::new());
    let scheduler = SchedulerBuilder::new(MinerConfig::default())
        .with_reporter(reporter)
        .build_shared(world)
        .unwrap();

    let owner = OwnerId::new_random();
    let region = Region::new(Coordinate::new(0, 0, 0), Coordinate::new(1, 1, 1));
    scheduler
        .register_and_start(owner, region, &EligibilityPolicy::default(), 1.0)
        .unwrap();
    scheduler.tick();

    let finished = recorder.finished();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].owner, owner);
    assert_eq!(finished[0].total, 0);
}

#[test]
fn test_scheduler_builder_with_tracing_reporter() {
    area_miner::util::init_tracing();
    let world = Arc::new(InMemoryWorld::new());
    let region = Region::new(Coordinate::new(0, 0, 0), Coordinate::new(39, 0, 0));
    world.fill(&region, &CellKind::material("stone"));
    let config = MinerConfig {
        reporting_interval_ticks: 10,
        ..MinerConfig::default()
    };
    let scheduler = SchedulerBuilder::new(config)
        .with_reporter(Box::new(TracingProgressReporter))
        .build_shared(Arc::clone(&world))
        .unwrap();

    let owner = OwnerId::new_random();
    scheduler
        .register_and_start(owner, region, &EligibilityPolicy::default(), 1.0)
        .unwrap();
    let reported: usize = (0..40).map(|_| scheduler.tick().reported).sum();

    assert_eq!(reported, 3);
    assert!(scheduler.is_empty());
    assert_eq!(world.occupied(), 0);
}
