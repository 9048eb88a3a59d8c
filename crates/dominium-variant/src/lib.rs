// SPDX-License-Identifier: Apache-2.0
//! `dominium-variant`: the variant/policy gate (spec component C9).
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

mod gate;
mod types;

pub use gate::{Gate, SetOutcome};
pub use types::{GatedVerb, VariantMode, VariantScope, MISSING_VARIANT_DETAIL};
