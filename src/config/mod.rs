//! Configuration models for the mining scheduler.

pub mod miner;

pub use miner::{DuplicateSessionPolicy, MinerConfig, ENV_PREFIX};
