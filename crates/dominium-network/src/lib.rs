// SPDX-License-Identifier: Apache-2.0
//! `dominium-network`: the network graph (spec component C7).
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

mod edge;
mod network;
mod node;

pub use edge::{Edge, EdgeStatus};
pub use network::{Network, NetworkError, NetworkKind, DEGRADE_COOLDOWN_TICKS};
pub use node::{Node, NodeStatus};
