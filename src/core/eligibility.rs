//! Allow/deny-list eligibility for cell removal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::world::CellKind;

/// Which list drives the eligibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Only kinds in the allow set qualify.
    Allow,
    /// Every non-empty kind qualifies unless it is in the deny set.
    #[default]
    Deny,
}

/// How Allow mode treats an empty allow set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyAllowList {
    /// Nothing is eligible.
    #[default]
    NothingEligible,
    /// Every non-empty kind is eligible.
    EverythingEligible,
}

/// Eligibility rules for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    /// Active list.
    pub mode: FilterMode,
    /// Kinds allowed in Allow mode.
    pub allow: HashSet<CellKind>,
    /// Kinds refused in Deny mode.
    pub deny: HashSet<CellKind>,
    /// Allow-mode behavior when `allow` is empty.
    pub empty_allow_list: EmptyAllowList,
}

impl EligibilityPolicy {
    /// Deny-mode policy refusing the given kinds.
    pub fn deny<I: IntoIterator<Item = CellKind>>(kinds: I) -> Self {
        Self {
            mode: FilterMode::Deny,
            deny: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Allow-mode policy accepting only the given kinds.
    pub fn allow<I: IntoIterator<Item = CellKind>>(kinds: I) -> Self {
        Self {
            mode: FilterMode::Allow,
            allow: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Override the empty allow-list behavior.
    #[must_use]
    pub const fn with_empty_allow_list(mut self, behavior: EmptyAllowList) -> Self {
        self.empty_allow_list = behavior;
        self
    }

    /// Shorthand for [`is_eligible`].
    #[must_use]
    pub fn permits(&self, kind: &CellKind) -> bool {
        is_eligible(kind, self)
    }
}

/// Whether a cell of `kind` should be removed under `policy`.
#[must_use]
pub fn is_eligible(kind: &CellKind, policy: &EligibilityPolicy) -> bool {
    if kind.is_empty() {
        return false;
    }
    match policy.mode {
        FilterMode::Deny => !policy.deny.contains(kind),
        FilterMode::Allow if policy.allow.is_empty() => {
            policy.empty_allow_list == EmptyAllowList::EverythingEligible
        }
        FilterMode::Allow => policy.allow.contains(kind),
    }
}
