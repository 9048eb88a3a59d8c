//! World configuration: registry capacities and ambient tuning, read once
//! at [`crate::World::new`] (spec §4.12, ported from `client_shell.h`'s
//! `DOM_SHELL_*_MAX` capacity constants).

use serde::Deserialize;

/// Registry capacities and default budgets a world is built with.
///
/// `0` for any `*_capacity` field means unbounded, matching
/// [`dominium_registry::Registry`]'s own convention; the defaults below are
/// finite, mirroring the original's fixed-size arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum live agents.
    pub agent_capacity: usize,
    /// Maximum live goals.
    pub goal_capacity: usize,
    /// Maximum live delegations.
    pub delegation_capacity: usize,
    /// Maximum live authority grants.
    pub authority_grant_capacity: usize,
    /// Maximum live constraints.
    pub constraint_capacity: usize,
    /// Maximum live institutions.
    pub institution_capacity: usize,
    /// Maximum live networks.
    pub network_capacity: usize,
    /// Maximum live interaction objects (spec gap, see [`crate::policy`]).
    pub interaction_object_capacity: usize,
    /// Ring buffer length for the UI event log.
    pub event_ring_capacity: usize,
    /// Ring buffer length for the per-tick metrics window.
    pub metrics_window_capacity: usize,
    /// Default budget a `resolve` verb call is charged if none is given
    /// explicitly.
    pub default_resolve_budget: u32,
    /// `compute_budget` every non-retired agent's schedule is reset to at
    /// the start of each tick, before the agent pipeline runs (spec §4.1's
    /// "remaining compute budget for the current tick" — a per-tick
    /// allowance, not a one-time spawn grant).
    pub agent_compute_budget_per_tick: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            agent_capacity: 8,
            goal_capacity: 32,
            delegation_capacity: 32,
            authority_grant_capacity: 32,
            constraint_capacity: 32,
            institution_capacity: 8,
            network_capacity: 4,
            interaction_object_capacity: 64,
            event_ring_capacity: 64,
            metrics_window_capacity: 64,
            default_resolve_budget: 1024,
            agent_compute_budget_per_tick: 1,
        }
    }
}

impl WorldConfig {
    /// Parses a config from TOML text, falling back to [`Default::default`]
    /// for any field the document omits.
    ///
    /// # Errors
    /// Returns `toml`'s parse error on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::WorldConfig;

    #[test]
    fn empty_document_yields_defaults() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = WorldConfig::from_toml_str("agent_capacity = 16\n").unwrap();
        assert_eq!(config.agent_capacity, 16);
        assert_eq!(config.goal_capacity, WorldConfig::default().goal_capacity);
    }
}
