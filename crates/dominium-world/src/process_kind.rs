//! Goal types, plan step kinds, and the fixed step table joining them
//! (spec §4.3/§4.4).

/// The kind of outcome a goal pursues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalType {
    /// Gain knowledge of a network's infrastructure layer.
    Survey,
    /// Keep a network node in a serviceable state.
    Maintain,
    /// Move a resource between two nodes.
    Transfer,
}

/// One step in an expanded plan.
///
/// `Move` is never converted into a command: the physical process
/// interpreter (`dominium-process`) has no transit process kind, and the
/// simulation is headless (no positions, no live movement system). A `Move`
/// step instead gates plan feasibility — it requires a resolvable
/// destination in the agent's belief state — and is otherwise a free,
/// immediately-satisfied prerequisite for the step that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKind {
    /// Narrative transit prerequisite; never emitted as a command.
    Move,
    /// Survey a network's infrastructure (command executor verb `SURVEY`).
    Observe,
    /// Service a node (command executor verb `MAINTAIN`).
    Maintain,
    /// Move a resource between nodes (command executor verb `TRANSFER`).
    Transfer,
}

impl StepKind {
    /// Whether this step kind is ever materialized as a command. `Move`
    /// steps are consumed during planning and never reach the executor.
    #[must_use]
    pub const fn is_executable(self) -> bool {
        !matches!(self, Self::Move)
    }
}

/// Returns the fixed, ordered step list a goal of `goal_type` expands to.
#[must_use]
pub fn step_table(goal_type: GoalType) -> &'static [StepKind] {
    match goal_type {
        GoalType::Survey => &[StepKind::Observe],
        GoalType::Maintain => &[StepKind::Move, StepKind::Maintain],
        GoalType::Transfer => &[StepKind::Move, StepKind::Transfer],
    }
}
