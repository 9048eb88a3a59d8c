//! Ergonomic [`World`] construction for tests.
//!
//! Most integration tests just need a world seeded from one of the inline
//! `builtin.*` templates with a deterministic seed; this wraps
//! `bootstrap_template` so a fixture-only test doesn't need to handle the
//! `TemplateError` case for a template id it knows is valid.

use dominium_sim::{bootstrap_template, World, WorldConfig};

/// Builder for a fixture [`World`].
#[derive(Debug, Clone)]
pub struct WorldBuilder {
    template_id: String,
    seed: u64,
    config: WorldConfig,
}

impl WorldBuilder {
    /// Starts from the empty-universe template, seed `1`, default config.
    #[must_use]
    pub fn new() -> Self {
        Self {
            template_id: "builtin.empty_universe".to_string(),
            seed: 1,
            config: WorldConfig::default(),
        }
    }

    /// Seeds the fixture from `builtin.minimal_system` instead of the empty
    /// universe, picking up its one field layer and one two-node network.
    #[must_use]
    pub fn minimal_system(mut self) -> Self {
        self.template_id = "builtin.minimal_system".to_string();
        self
    }

    /// Overrides the deterministic seed (defaults to `1`).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the world's registry/ambient config.
    #[must_use]
    pub fn config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the per-tick compute budget every agent gets refilled to, a
    /// shortcut for the config field most pipeline-driving tests care about.
    #[must_use]
    pub fn agent_compute_budget_per_tick(mut self, budget: u32) -> Self {
        self.config.agent_compute_budget_per_tick = budget;
        self
    }

    /// Builds the world. Panics if `template_id` was overridden to an
    /// unknown id — fixture callers only ever name the two builtin ids, so a
    /// panic here signals a fixture bug, not a runtime condition to recover
    /// from.
    #[must_use]
    pub fn build(self) -> World {
        bootstrap_template(&self.template_id, self.seed, self.config)
            .unwrap_or_else(|err| panic!("fixture template {:?} failed to bootstrap: {err}", self.template_id))
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_produces_an_active_empty_world() {
        let world = WorldBuilder::new().build();
        assert!(world.active);
        assert_eq!(world.tick, 0);
    }

    #[test]
    fn minimal_system_seeds_one_network() {
        let world = WorldBuilder::new().minimal_system().build();
        assert_eq!(world.networks.len(), 1);
    }
}
