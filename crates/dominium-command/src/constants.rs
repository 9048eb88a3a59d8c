//! Fixed tuning constants named by spec §4.5.

use dominium_kernel::Q16;

/// Bit marking the infrastructure knowledge layer `SURVEY` grants.
pub const KNOW_INFRA: u32 = 1 << 0;

/// Amount `MAINTAIN` stores into its target node per successful call.
pub fn maintain_amount() -> Q16 {
    Q16::from_int(5)
}

/// Amount `TRANSFER` moves between nodes per successful call.
pub fn transfer_amount() -> Q16 {
    Q16::from_int(5)
}

/// Ticks a goal backs off for after a command failure, before it is
/// eligible again.
pub const BACKOFF_TICKS: u64 = 4;
