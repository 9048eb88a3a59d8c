// SPDX-License-Identifier: Apache-2.0
//! Shared fixture builders for the `dominium-*` test suites.
//!
//! Every constructor here is grounded in a shape some crate's own tests
//! already build by hand — this crate just collapses the repeated parts
//! (seventeen-field `Goal` literals, two-node `Network` pairs, pipeline-
//! ready `Agent`s) into one chained builder call so a new test doesn't have
//! to rediscover the right defaults.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(clippy::all)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

pub mod agent;
pub mod goal;
pub mod network;
pub mod risk;
pub mod world;

pub use agent::AgentBuilder;
pub use goal::GoalBuilder;
pub use network::{NetworkBuilder, TwoNodeNetwork};
pub use risk::{risk_exposure, risk_field};
pub use world::WorldBuilder;
