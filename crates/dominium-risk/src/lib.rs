// SPDX-License-Identifier: Apache-2.0
//! `dominium-risk`: the risk/liability/insurance engine (spec component C8).
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

mod budget;
mod constants;
mod domain;
mod falloff;
mod query;
mod resolve;
mod types;

pub use budget::Budget;
pub use constants::{AUDIT_MIN, AUDIT_PENALTY, CLASS_COUNT, HIST_BINS, RATIO_ONE, RESOLVE_COST_BASE};
pub use domain::{Policy, RiskDomain};
pub use falloff::{distance, falloff, hist_bin, hist_bin_ratio};
pub use query::{
    query_exposure, query_field, query_policy, query_profile, query_type, QueryMeta, QueryStatus,
};
pub use resolve::{resolve, RefusalReason, ResolveFlags, ResolveResult};
pub use types::{
    ClaimStatus, InsuranceClaim, InsurancePolicy, LiabilityEvent, MacroCapsule, Point, RiskClass,
    RiskExposure, RiskField, RiskProfile, RiskType,
};
