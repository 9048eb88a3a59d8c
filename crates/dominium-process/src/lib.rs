// SPDX-License-Identifier: Apache-2.0
//! `dominium-process`: the physical-process interpreter (spec component C6).
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

mod desc;
mod interpreter;
mod kind;
mod outcome;

pub use desc::{Cell, LocalProcessDesc};
pub use interpreter::evaluate;
pub use kind::ProcessKind;
pub use outcome::ProcessEffect;
