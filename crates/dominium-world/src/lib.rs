// SPDX-License-Identifier: Apache-2.0
//! `dominium-world`: shared data model (spec §3) — agents, goals,
//! delegations, authority grants, constraints, and institutions.
//!
//! These are plain records with no storage of their own; every instance
//! lives inside a `dominium_registry::Registry<T>` owned by
//! `dominium-sim::World`.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod agent;
mod assembly;
mod authority;
mod command;
mod constraint;
mod delegation;
mod goal;
mod institution;
mod mask;
mod process_kind;
mod refusal;

pub use agent::{Agent, AgentStatus, Belief, Schedule};
pub use assembly::Assembly;
pub use authority::AuthorityGrant;
pub use command::{Command, CommandStatus};
pub use constraint::{Constraint, ConstraintMode};
pub use delegation::{Delegation, DelegationKind};
pub use goal::{Goal, GoalStatus, Preconditions, GOAL_FLAG_ALLOW_UNKNOWN};
pub use institution::{Institution, InstitutionStatus};
pub use mask::{AuthorityMask, CapabilityMask};
pub use process_kind::{step_table, GoalType, StepKind};
pub use refusal::Refusal;
