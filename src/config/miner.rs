//! Scheduler configuration: caps, speed range, and cadences.

use std::str::FromStr;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::eligibility::EmptyAllowList;
use crate::core::session::SpeedLimits;
use crate::core::work_list::WorkListBuilder;
use crate::core::AppResult;

/// Prefix for environment overrides, e.g. `AREA_MINER_MAX_SPEED`.
pub const ENV_PREFIX: &str = "AREA_MINER_";

/// What to do when an owner with a running session starts another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSessionPolicy {
    /// Keep the running session and hand it back to the caller.
    #[default]
    ReturnExisting,
    /// Refuse with `SessionAlreadyActive`.
    Reject,
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Maximum work-list length per session.
    pub max_items_per_session: usize,
    /// Maximum region volume accepted for enumeration.
    pub max_region_volume: u64,
    /// Lowest accepted speed (items per tick).
    pub min_speed: f64,
    /// Highest accepted speed (items per tick).
    pub max_speed: f64,
    /// Sessions older than this many ticks are force-stopped.
    pub max_session_duration_ticks: u64,
    /// Progress is reported every this many ticks.
    pub reporting_interval_ticks: u64,
    /// Cells a deferred enumeration may visit per tick, shared by all pending builds.
    pub enumeration_budget_per_tick: u64,
    /// Interval between ticks for the bundled drivers.
    pub tick_interval_ms: u64,
    /// Duplicate start handling.
    pub duplicate_policy: DuplicateSessionPolicy,
    /// Allow-mode behavior for empty allow lists when a request leaves it unset.
    pub default_empty_allow_list: EmptyAllowList,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            max_items_per_session: 100_000,
            max_region_volume: 1_000_000,
            min_speed: 0.1,
            max_speed: 10.0,
            max_session_duration_ticks: 72_000,
            reporting_interval_ticks: 20,
            enumeration_budget_per_tick: 32_768,
            tick_interval_ms: 50,
            duplicate_policy: DuplicateSessionPolicy::ReturnExisting,
            default_empty_allow_list: EmptyAllowList::NothingEligible,
        }
    }
}

impl MinerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_items_per_session == 0 {
            return Err("max_items_per_session must be greater than 0".into());
        }
        if self.max_region_volume == 0 {
            return Err("max_region_volume must be greater than 0".into());
        }
        if !self.min_speed.is_finite() || self.min_speed <= 0.0 {
            return Err("min_speed must be a positive finite number".into());
        }
        if !self.max_speed.is_finite() || self.max_speed < self.min_speed {
            return Err("max_speed must be finite and at least min_speed".into());
        }
        if self.max_session_duration_ticks == 0 {
            return Err("max_session_duration_ticks must be greater than 0".into());
        }
        if self.reporting_interval_ticks == 0 {
            return Err("reporting_interval_ticks must be greater than 0".into());
        }
        if self.enumeration_budget_per_tick == 0 {
            return Err("enumeration_budget_per_tick must be greater than 0".into());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load defaults overridden by `AREA_MINER_*` environment variables,
    /// reading a `.env` file first if one exists.
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`MinerConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        parse_into(&var, "MAX_ITEMS_PER_SESSION", &mut cfg.max_items_per_session)?;
        parse_into(&var, "MAX_REGION_VOLUME", &mut cfg.max_region_volume)?;
        parse_into(&var, "MIN_SPEED", &mut cfg.min_speed)?;
        parse_into(&var, "MAX_SPEED", &mut cfg.max_speed)?;
        parse_into(&var, "MAX_SESSION_DURATION_TICKS", &mut cfg.max_session_duration_ticks)?;
        parse_into(&var, "REPORTING_INTERVAL_TICKS", &mut cfg.reporting_interval_ticks)?;
        parse_into(&var, "ENUMERATION_BUDGET_PER_TICK", &mut cfg.enumeration_budget_per_tick)?;
        parse_into(&var, "TICK_INTERVAL_MS", &mut cfg.tick_interval_ms)?;
        parse_variant(&var, "DUPLICATE_POLICY", &mut cfg.duplicate_policy)?;
        parse_variant(&var, "DEFAULT_EMPTY_ALLOW_LIST", &mut cfg.default_empty_allow_list)?;

        cfg.validate()
            .map_err(anyhow::Error::msg)
            .context("environment configuration invalid")?;
        Ok(cfg)
    }

    /// Speed range sessions are clamped into.
    #[must_use]
    pub const fn speed_limits(&self) -> SpeedLimits {
        SpeedLimits {
            min: self.min_speed,
            max: self.max_speed,
        }
    }

    /// Work-list builder carrying the configured caps.
    #[must_use]
    pub const fn work_list_builder(&self) -> WorkListBuilder {
        WorkListBuilder::new(self.max_items_per_session, self.max_region_volume)
    }
}

fn parse_into<T>(var: &dyn Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> AppResult<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = var(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("{ENV_PREFIX}{key}={raw} is not valid"))?;
    }
    Ok(())
}

// Enum values use their snake_case serde names, e.g. `reject`.
fn parse_variant<T>(var: &dyn Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> AppResult<()>
where
    T: DeserializeOwned,
{
    if let Some(raw) = var(key) {
        *slot = serde_json::from_value(serde_json::Value::String(raw.trim().to_owned()))
            .with_context(|| format!("{ENV_PREFIX}{key}={raw} is not valid"))?;
    }
    Ok(())
}
