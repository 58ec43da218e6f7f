//! # Area Miner
//!
//! Tick-driven, rate-limited bulk removal of cells inside an axis-aligned
//! box of a 3D voxel world.
//!
//! A session belongs to one owner. Starting it enumerates every eligible cell
//! of the region into a bounded work list, then each scheduler tick removes
//! `speed` items on average, carrying fractional speed across ticks exactly.
//! Sessions can be paused, resumed, or stopped, report progress on a fixed
//! cadence, and are reaped once they complete, stop, or exceed their maximum
//! lifetime.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use area_miner::builders::SchedulerBuilder;
//! use area_miner::config::MinerConfig;
//! use area_miner::core::{CellKind, Coordinate, EligibilityPolicy, Region};
//! use area_miner::infra::InMemoryWorld;
//! use area_miner::util::serde::OwnerId;
//!
//! let world = Arc::new(InMemoryWorld::new());
//! world.fill(
//!     &Region::new(Coordinate::new(0, 0, 0), Coordinate::new(2, 2, 2)),
//!     &CellKind::material("stone"),
//! );
//!
//! let scheduler = SchedulerBuilder::new(MinerConfig::default())
//!     .build_shared(Arc::clone(&world))
//!     .unwrap();
//!
//! let owner = OwnerId::new_random();
//! let region = Region::new(Coordinate::new(2, 2, 2), Coordinate::new(0, 0, 0));
//! scheduler
//!     .register_and_start(owner, region, &EligibilityPolicy::default(), 1.0)
//!     .unwrap();
//!
//! for _ in 0..27 {
//!     scheduler.tick();
//! }
//! assert_eq!(world.occupied(), 0);
//! assert!(scheduler.status(owner).is_none());
//! ```
//!
//! ## Layout
//!
//! - [`crate::core`]: regions, eligibility, work lists, sessions, and the scheduler
//! - [`config`]: [`config::MinerConfig`] with JSON and environment loading
//! - [`builders`]: [`builders::SchedulerBuilder`]
//! - [`infra`]: in-memory world and progress reporters
//! - [`runtime`]: tick drivers and the request/response control surface

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core mining abstractions and the session scheduler.
pub mod core;
/// Configuration models for caps, speeds, and cadences.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for world storage and progress reporting.
pub mod infra;
/// Tick drivers and the control-surface API.
pub mod runtime;
/// Shared utilities.
pub mod util;
