// SPDX-License-Identifier: Apache-2.0
//! `dominium-sim`: the world aggregate, tick orchestrator, and outer
//! collaborators (spec components C10, C11, C12).
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
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::too_many_lines
)]

mod compat;
mod config;
mod content;
mod events;
mod metrics;
mod playtest;
mod policy;
mod refusal_code;
mod replay;
mod save;
mod template;
mod template_json;
mod tick;
mod verb;
mod world;

pub use compat::{write_compat_report, CompatReport};
pub use config::WorldConfig;
pub use content::{
    parse_authority_mask, parse_capability_mask, parse_goal_type, parse_network_kind, AUTH_BASIC,
    CAP_MAINTAIN, CAP_SURVEY, CAP_TRANSFER,
};
pub use events::{EventLine, EventRing};
pub use metrics::{MetricsState, MetricsWindow};
pub use playtest::{PlaytestState, ScenarioInjection};
pub use policy::{InteractionObject, InteractionObjectKind, PolicySet, POLICY_INTERACTION_PLACE};
pub use refusal_code::{command_failure_code, process_refusal_code, refusal_kind, verb_status_for};
pub use replay::{load_replay, save_replay, ReplayEntry};
pub use save::{load_world, save_world};
pub use template::{bootstrap_template, TemplateError};
pub use tick::SimulateOutcome;
pub use verb::{dispatch, VerbResult, VerbStatus};
pub use world::World;
