// SPDX-License-Identifier: Apache-2.0
//! `dominium-kernel`: deterministic fixed-point arithmetic, hashing, and
//! PRNG primitives (spec component C1).
//!
//! Nothing in this crate touches the host's floating-point unit in a way
//! that could vary results across platforms; [`Q16`] and [`Q48`] are the
//! only numeric representations the simulation's hashed/replayed state is
//! allowed to carry.
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

mod error;
mod fixed;
mod hash;
mod rng;

pub use error::RefusalKind;
pub use fixed::{Q16, Q16_ONE, Q48, Q48_ONE};
pub use hash::{fnv1a32_str, fnv1a64, fnv1a64_i32, fnv1a64_i64, fnv1a64_seeded, fnv1a64_u32, fnv1a64_u64};
pub use rng::{seed_for, splitmix64, SplitMix64};
