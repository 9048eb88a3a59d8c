//! Save-compatibility sidecar report, ported from `client_shell.c`'s
//! `dom_client_shell_inspect_save` compatibility summary.
//!
//! Alongside every save file the CLI writes a `<save>.compat_report.json`
//! sidecar: a deterministic fingerprint of the saved state plus a
//! generation timestamp. The fingerprint never depends on the timestamp,
//! so two saves of the same world state hash identically regardless of
//! when they were written; `generated_at_unix` is the one field callers
//! should not compare across reports.

use std::fs;
use std::io;

use serde::{Deserialize, Serialize};

use crate::save::render;
use crate::world::World;

/// Current compat-report schema version. Bumped whenever a field is added
/// or removed, never when only its values change.
pub const COMPAT_REPORT_VERSION: u32 = 1;

/// A save file's deterministic fingerprint plus descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatReport {
    /// Schema version of this report.
    pub format_version: u32,
    /// The world's deterministic seed.
    pub world_seed: u64,
    /// The tick the save was taken at.
    pub tick: u64,
    /// The template the world was bootstrapped from.
    pub template_id: String,
    /// Live agent count at save time.
    pub agent_count: usize,
    /// Live goal count at save time.
    pub goal_count: usize,
    /// Live network count at save time.
    pub network_count: usize,
    /// FNV-1a hash of the rendered save text, excluding this report itself.
    pub state_hash: u64,
    /// Unix timestamp the report was generated, supplied by the caller.
    /// Never folded into `state_hash`.
    pub generated_at_unix: u64,
}

/// 64-bit FNV-1a, chosen over `std::collections::hash_map::DefaultHasher`
/// because the latter's keying is randomized per process and would make
/// `state_hash` non-reproducible across runs.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Builds and writes `<path>.compat_report.json` describing `world`'s
/// current state, stamped with `generated_at_unix`.
///
/// # Errors
/// Returns the underlying I/O error if the sidecar cannot be written, or
/// a `serde_json` error wrapped as `io::Error` if serialization fails
/// (never expected to, since every field is a plain scalar or string).
pub fn write_compat_report(world: &World, save_path: &str, generated_at_unix: u64) -> io::Result<CompatReport> {
    let state_hash = fnv1a(render(world).as_bytes());
    let report = CompatReport {
        format_version: COMPAT_REPORT_VERSION,
        world_seed: world.seed,
        tick: world.tick,
        template_id: world.template_id.clone(),
        agent_count: world.agents.len(),
        goal_count: world.goals.len(),
        network_count: world.networks.len(),
        state_hash,
        generated_at_unix,
    };

    let json = serde_json::to_string_pretty(&report)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
    fs::write(format!("{save_path}.compat_report.json"), json)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    #[test]
    fn state_hash_is_stable_across_calls() {
        let world = World::new("builtin.empty_universe", 42, WorldConfig::default());
        let a = fnv1a(render(&world).as_bytes());
        let b = fnv1a(render(&world).as_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn timestamp_does_not_affect_state_hash() {
        let world = World::new("builtin.empty_universe", 42, WorldConfig::default());
        let path = std::env::temp_dir().join("dominium_compat_report_test.save");
        let path_str = path.to_string_lossy().to_string();
        let report_a = write_compat_report(&world, &path_str, 1_000).unwrap();
        let report_b = write_compat_report(&world, &path_str, 2_000).unwrap();
        assert_eq!(report_a.state_hash, report_b.state_hash);
        assert_ne!(report_a.generated_at_unix, report_b.generated_at_unix);
        let _ = fs::remove_file(format!("{path_str}.compat_report.json"));
    }

    #[test]
    fn different_tick_changes_state_hash() {
        let mut world = World::new("builtin.empty_universe", 42, WorldConfig::default());
        let before = fnv1a(render(&world).as_bytes());
        world.tick = 1;
        let after = fnv1a(render(&world).as_bytes());
        assert_ne!(before, after);
    }
}
