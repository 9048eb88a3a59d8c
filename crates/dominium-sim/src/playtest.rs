//! Playtest/perturbation state and the queued scenario-injection buffer
//! (spec §4.10), ported from `client_shell.h`'s `dom_shell_playtest_state`
//! and `dom_shell_playtest_scenario`.

use std::collections::VecDeque;

use dominium_kernel::{seed_for, Q16};

/// One queued field write, applied at the start of the next `simulate` tick
/// in the order it was queued (spec §4.10 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioInjection {
    /// The field layer to write.
    pub field_id: u32,
    /// The cell within `field_id` to write.
    pub cell: (i32, i32, i32),
    /// The value to write.
    pub value: Q16,
    /// When set, the injection also marks this cell's layer known in every
    /// agent's knowledge mask, rather than leaving discovery to `survey`.
    pub mark_known: bool,
}

/// Operator-controlled simulation pacing and perturbation, plus the queue
/// of pending scenario injections.
#[derive(Debug, Clone, Default)]
pub struct PlaytestState {
    /// When `true`, `simulate` refuses with `PLAYTEST-REFUSAL` unless
    /// called with `force`.
    pub paused: bool,
    /// Ticks advanced per `simulate` call unit; purely advisory to callers
    /// driving their own loop, the orchestrator itself always advances
    /// exactly the number of ticks requested.
    pub speed: u32,
    /// Overrides the world's own seed for newly seeded randomness, when set.
    pub seed_override: Option<u64>,
    /// Whether per-process evaluation should mix in a deterministic
    /// perturbation seed.
    pub perturb_enabled: bool,
    /// Strength of the perturbation, Q16.16.
    pub perturb_strength: Q16,
    /// Base seed perturbation mixes with the current tick.
    pub perturb_seed: u64,
    /// Scenario injections queued for the next `simulate` tick.
    pub pending_injections: VecDeque<ScenarioInjection>,
}

impl PlaytestState {
    /// Queues an injection to be applied at the start of the next tick.
    pub fn queue_injection(&mut self, injection: ScenarioInjection) {
        self.pending_injections.push_back(injection);
    }

    /// The deterministic per-tick perturbation seed, `splitmix64(perturb_seed
    /// ⊕ tick)`, or `None` if perturbation is disabled. The `process` verb
    /// handler mixes this into the `world_seed` it hands
    /// `dominium_process::evaluate`; the tick orchestrator itself never
    /// invokes the process interpreter, since `PROCESS` is dispatched
    /// directly rather than through the agent pipeline.
    #[must_use]
    pub fn perturb_seed_for_tick(&self, tick: u64) -> Option<u64> {
        self.perturb_enabled
            .then(|| seed_for(self.perturb_seed, tick))
    }
}
