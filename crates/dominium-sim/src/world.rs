//! The `World` aggregate: every registry, subsystem, and ambient collaborator
//! a running simulation owns, ported from `client_shell.h`'s
//! `dom_client_shell` struct.

use dominium_field::FieldStorage;
use dominium_network::Network;
use dominium_registry::Registry;
use dominium_risk::RiskDomain;
use dominium_variant::Gate;
use dominium_world::{Assembly, Agent, AuthorityGrant, Constraint, Delegation, Goal, Institution};

use crate::config::WorldConfig;
use crate::events::EventRing;
use crate::metrics::MetricsState;
use crate::playtest::PlaytestState;
use crate::policy::{InteractionObject, PolicySet};

/// The aggregate root of one running simulation.
///
/// Owns objective field storage directly; per-agent subjective knowledge is
/// carried on each [`Agent`]'s own `belief.knowledge_mask`
/// (spec §4.2's objective/subjective split), not as a second
/// `FieldStorage` instance, since the simulation has exactly one ground
/// truth and agents gate visibility by mask rather than by a private copy.
#[derive(Debug)]
pub struct World {
    /// The world's deterministic seed.
    pub seed: u64,
    /// The current tick.
    pub tick: u64,
    /// Whether the world accepts `simulate`/`process` verbs at all. `false`
    /// only once an operator has explicitly torn the world down.
    pub active: bool,
    /// The `builtin.*` (or custom) template id this world was created from.
    pub template_id: String,
    /// Registry capacities and ambient tuning, fixed at construction.
    pub config: WorldConfig,

    /// Agents.
    pub agents: Registry<Agent>,
    /// Goals.
    pub goals: Registry<Goal>,
    /// Delegations.
    pub delegations: Registry<Delegation>,
    /// Authority grants.
    pub authority_grants: Registry<AuthorityGrant>,
    /// Constraints.
    pub constraints: Registry<Constraint>,
    /// Institutions.
    pub institutions: Registry<Institution>,
    /// Assemblies.
    pub assemblies: Registry<Assembly>,
    /// Networks.
    pub networks: Registry<Network>,

    /// Objective field storage.
    pub fields: FieldStorage,
    /// The risk/liability/insurance engine.
    pub risk: RiskDomain,
    /// The variant/policy gate.
    pub gate: Gate,
    /// Ambient content-level policy grants.
    pub policies: PolicySet,
    /// Objects placed via the `place` verb.
    pub interaction_objects: Registry<InteractionObject>,

    /// Playtest pacing, perturbation, and queued scenario injections.
    pub playtest: PlaytestState,
    /// Per-tick and cumulative metrics.
    pub metrics: MetricsState,
    /// The UI event ring and optional file sink.
    pub events: EventRing,

    /// Monotonic plan id counter shared across ticks.
    pub next_plan_id: u64,
    /// Monotonic command id counter shared across ticks.
    pub next_command_id: u64,

    /// The stable code of the most recent refusal, if any.
    pub last_refusal_code: Option<String>,
    /// Free-form detail attached to the most recent refusal.
    pub last_refusal_detail: String,
}

impl World {
    /// Constructs a fresh, active world from `template_id` and `seed`,
    /// sizing every registry from `config`.
    #[must_use]
    pub fn new(template_id: impl Into<String>, seed: u64, config: WorldConfig) -> Self {
        Self {
            seed,
            tick: 0,
            active: true,
            template_id: template_id.into(),
            agents: Registry::new(config.agent_capacity),
            goals: Registry::new(config.goal_capacity),
            delegations: Registry::new(config.delegation_capacity),
            authority_grants: Registry::new(config.authority_grant_capacity),
            constraints: Registry::new(config.constraint_capacity),
            institutions: Registry::new(config.institution_capacity),
            assemblies: Registry::new(0),
            networks: Registry::new(config.network_capacity),
            fields: FieldStorage::new(),
            risk: RiskDomain::new(),
            gate: Gate::new(),
            policies: PolicySet::new(),
            interaction_objects: Registry::new(config.interaction_object_capacity),
            playtest: PlaytestState::default(),
            metrics: MetricsState::new(config.metrics_window_capacity),
            events: EventRing::new(config.event_ring_capacity),
            next_plan_id: 0,
            next_command_id: 0,
            last_refusal_code: None,
            last_refusal_detail: String::new(),
            config,
        }
    }

    /// Records a refusal for inspection by the caller (tests, the CLI's
    /// operator-facing output) and logs it.
    pub fn set_refusal(&mut self, code: impl Into<String>, detail: impl Into<String>) {
        let code = code.into();
        let detail = detail.into();
        tracing::warn!(code = %code, detail = %detail, "refusal");
        self.last_refusal_code = Some(code);
        self.last_refusal_detail = detail;
    }

    /// Clears any previously recorded refusal.
    pub fn clear_refusal(&mut self) {
        self.last_refusal_code = None;
        self.last_refusal_detail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_is_active_with_empty_registries() {
        let world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        assert!(world.active);
        assert_eq!(world.tick, 0);
        assert_eq!(world.agents.len(), 0);
        assert_eq!(world.networks.len(), 0);
        assert!(world.last_refusal_code.is_none());
    }

    #[test]
    fn set_refusal_is_visible_and_clearable() {
        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        world.set_refusal("CAPACITY", "network full");
        assert_eq!(world.last_refusal_code.as_deref(), Some("CAPACITY"));
        world.clear_refusal();
        assert!(world.last_refusal_code.is_none());
    }
}
