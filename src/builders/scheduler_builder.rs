//! Builder wiring configuration, world capabilities, and a reporter into a
//! [`Scheduler`].

use std::sync::Arc;

use crate::config::MinerConfig;
use crate::core::{AppResult, CellRemover, MiningError, ProgressReporter, Scheduler, WorldReader};

/// Assembles a [`Scheduler`] from configuration.
pub struct SchedulerBuilder {
    config: MinerConfig,
    reporter: Option<Box<dyn ProgressReporter>>,
}

impl SchedulerBuilder {
    /// Start from an explicit configuration.
    #[must_use]
    pub fn new(config: MinerConfig) -> Self {
        Self {
            config,
            reporter: None,
        }
    }

    /// Start from `AREA_MINER_*` environment overrides.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::new(MinerConfig::from_env()?))
    }

    /// Configuration the scheduler will use.
    #[must_use]
    pub const fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Attach a progress reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build with separate reader and remover capabilities.
    pub fn build<W, C>(self, world: Arc<W>, remover: Arc<C>) -> Result<Scheduler<W, C>, MiningError>
    where
        W: WorldReader,
        C: CellRemover,
    {
        let scheduler = Scheduler::new(self.config, world, remover)?;
        Ok(match self.reporter {
            Some(reporter) => scheduler.with_reporter(reporter),
            None => scheduler,
        })
    }

    /// Build over one world that both reads and removes cells.
    pub fn build_shared<T>(self, world: Arc<T>) -> Result<Scheduler<T, T>, MiningError>
    where
        T: WorldReader + CellRemover,
    {
        let remover = Arc::clone(&world);
        self.build(world, remover)
    }
}
