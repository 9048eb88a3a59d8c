//! Named capability/authority bit constants and verb-token parsers.
//!
//! `dominium_world::mask`'s own bit layout is deliberately left to callers:
//! bit assignment is a simulation-content concern, not a kernel one. This
//! is where `dominium-sim` plays that content-author role for its own
//! built-in templates and verb grammar.

use dominium_network::NetworkKind;
use dominium_process::ProcessKind;
use dominium_world::{AuthorityMask, CapabilityMask, GoalType};

/// Capability bit: may pursue `survey` goals / issue `OBSERVE` commands.
pub const CAP_SURVEY: u32 = 1 << 0;
/// Capability bit: may pursue `maintain` goals / issue `MAINTAIN` commands.
pub const CAP_MAINTAIN: u32 = 1 << 1;
/// Capability bit: may pursue `transfer` goals / issue `TRANSFER` commands.
pub const CAP_TRANSFER: u32 = 1 << 2;

/// Authority bit: holds baseline operating authority.
pub const AUTH_BASIC: u32 = 1 << 0;

/// Parses a comma-separated `caps=` token into a [`CapabilityMask`].
/// Unrecognized names are silently dropped (they contribute no bits),
/// matching the tolerant parsing the original shell's tokenizer uses for
/// unknown content keys.
#[must_use]
pub fn parse_capability_mask(token: &str) -> CapabilityMask {
    let bits = token
        .split(',')
        .map(str::trim)
        .fold(0u32, |acc, name| acc | capability_bit(name));
    CapabilityMask(bits)
}

fn capability_bit(name: &str) -> u32 {
    match name {
        "survey" => CAP_SURVEY,
        "maintain" => CAP_MAINTAIN,
        "transfer" => CAP_TRANSFER,
        _ => 0,
    }
}

/// Parses a comma-separated `auth=` token into an [`AuthorityMask`].
#[must_use]
pub fn parse_authority_mask(token: &str) -> AuthorityMask {
    let bits = token
        .split(',')
        .map(str::trim)
        .fold(0u32, |acc, name| acc | authority_bit(name));
    AuthorityMask(bits)
}

fn authority_bit(name: &str) -> u32 {
    match name {
        "basic" => AUTH_BASIC,
        _ => 0,
    }
}

/// Parses a `type=` token into a [`GoalType`].
#[must_use]
pub fn parse_goal_type(token: &str) -> Option<GoalType> {
    match token {
        "survey" => Some(GoalType::Survey),
        "maintain" => Some(GoalType::Maintain),
        "transfer" => Some(GoalType::Transfer),
        _ => None,
    }
}

/// Parses a `type=` token into a [`NetworkKind`].
#[must_use]
pub fn parse_network_kind(token: &str) -> Option<NetworkKind> {
    match token {
        "electrical" => Some(NetworkKind::Electrical),
        "thermal" => Some(NetworkKind::Thermal),
        "fluid" => Some(NetworkKind::Fluid),
        "logistics" => Some(NetworkKind::Logistics),
        "data" => Some(NetworkKind::Data),
        _ => None,
    }
}

/// Parses a `kind=` token into a [`ProcessKind`].
#[must_use]
pub fn parse_process_kind(token: &str) -> Option<ProcessKind> {
    match token {
        "survey" => Some(ProcessKind::Survey),
        "collect" => Some(ProcessKind::Collect),
        "assemble" => Some(ProcessKind::Assemble),
        "connect" => Some(ProcessKind::Connect),
        "repair" => Some(ProcessKind::Repair),
        _ => None,
    }
}

/// The capability bit a goal type requires of its pursuing agent.
#[must_use]
pub const fn goal_type_capability_bit(goal_type: GoalType) -> u32 {
    match goal_type {
        GoalType::Survey => CAP_SURVEY,
        GoalType::Maintain => CAP_MAINTAIN,
        GoalType::Transfer => CAP_TRANSFER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_capability_names() {
        let mask = parse_capability_mask("survey,transfer");
        assert_eq!(mask.0, CAP_SURVEY | CAP_TRANSFER);
    }

    #[test]
    fn unknown_capability_name_contributes_no_bits() {
        let mask = parse_capability_mask("nonsense");
        assert_eq!(mask.0, 0);
    }

    #[test]
    fn parses_network_kind() {
        assert_eq!(parse_network_kind("electrical"), Some(NetworkKind::Electrical));
        assert_eq!(parse_network_kind("bogus"), None);
    }

    #[test]
    fn parses_process_kind() {
        assert_eq!(parse_process_kind("collect"), Some(ProcessKind::Collect));
        assert_eq!(parse_process_kind("bogus"), None);
    }
}
