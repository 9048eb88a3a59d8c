// SPDX-License-Identifier: Apache-2.0
//! `dominium-command`: the command executor (spec component C5).
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

mod constants;
mod executor;

pub use constants::{maintain_amount, transfer_amount, BACKOFF_TICKS, KNOW_INFRA};
pub use executor::{execute_command, CommandOutcome};
