//! World templates, ported from `client_shell.c`'s `dom_shell_template_registry`
//! bootstrap entries.
//!
//! Two templates ship inline regardless of install location
//! (`builtin.empty_universe`, `builtin.minimal_system` — the
//! exploration-baseline fixtures spec scenarios are pinned to). Any other
//! template id is resolved as a file, `templates/<id>.json`, looked up
//! under `DOM_INSTALL_ROOT`, then `DOM_DATA_ROOT`, then the current working
//! directory, matching the original's env var lookup order.

use std::env;
use std::fs;
use std::path::PathBuf;

use dominium_kernel::Q16;
use dominium_network::{Edge, Network, NetworkKind, Node};
use thiserror::Error;

use crate::config::WorldConfig;
use crate::content::parse_network_kind;
use crate::template_json::{self, Value};
use crate::world::World;

/// Errors bootstrapping a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `template_id` does not name a known built-in template and no
    /// template file could be found under any lookup root.
    #[error("unknown template: {0}")]
    Unknown(String),
    /// A template file was found but could not be read.
    #[error("reading template file: {0}")]
    Io(String),
    /// A template file was found and read but failed to parse.
    #[error("parsing template file: {0}")]
    Parse(String),
}

/// Field layer id the `minimal_system` template declares.
pub const MINIMAL_SYSTEM_FIELD_ID: u32 = 0;

/// Environment variables consulted, in lookup order, to resolve a non-
/// builtin template id to a content root directory.
pub const TEMPLATE_ROOT_ENV_VARS: [&str; 2] = ["DOM_INSTALL_ROOT", "DOM_DATA_ROOT"];

/// Constructs a fresh [`World`] from `template_id`.
///
/// # Errors
/// Returns [`TemplateError::Unknown`] if `template_id` is neither a
/// built-in id nor resolvable to a template file under any lookup root,
/// [`TemplateError::Io`] if a resolved file cannot be read, or
/// [`TemplateError::Parse`] if it cannot be parsed.
pub fn bootstrap_template(template_id: &str, seed: u64, config: WorldConfig) -> Result<World, TemplateError> {
    match template_id {
        "builtin.empty_universe" => Ok(World::new(template_id, seed, config)),
        "builtin.minimal_system" => Ok(minimal_system(template_id, seed, config)),
        other => bootstrap_from_file(other, seed, config),
    }
}

fn minimal_system(template_id: &str, seed: u64, config: WorldConfig) -> World {
    let mut world = World::new(template_id, seed, config);

    let _ = world
        .fields
        .create_layer(MINIMAL_SYSTEM_FIELD_ID, (8, 8, 1), Q16::zero());

    let mut network = Network::new(NetworkKind::Electrical);
    let source = network
        .nodes
        .register(
            None,
            Node::new(Q16::from_int(100), Q16::zero(), Q16::from_int(10)),
        )
        .unwrap_or(0);
    let sink = network
        .nodes
        .register(
            None,
            Node::new(Q16::from_int(100), Q16::zero(), Q16::from_int(10)),
        )
        .unwrap_or(0);
    let _ = network
        .edges
        .register(None, Edge::new(source, sink, Q16::from_int(20), Q16::zero()));
    let _ = world.networks.register(None, network);

    world
}

/// Resolves `template_id` to a `templates/<id>.json` file under the first
/// of `DOM_INSTALL_ROOT`, `DOM_DATA_ROOT`, or the current working directory
/// that actually contains it.
fn resolve_template_path(template_id: &str) -> Option<PathBuf> {
    let roots = TEMPLATE_ROOT_ENV_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(PathBuf::from)
        .chain(env::current_dir().into_iter());

    roots.into_iter().find_map(|root| {
        let candidate = root.join("templates").join(format!("{template_id}.json"));
        candidate.is_file().then_some(candidate)
    })
}

fn bootstrap_from_file(template_id: &str, seed: u64, config: WorldConfig) -> Result<World, TemplateError> {
    let Some(path) = resolve_template_path(template_id) else {
        return Err(TemplateError::Unknown(template_id.to_string()));
    };
    let text = fs::read_to_string(&path).map_err(|err| TemplateError::Io(err.to_string()))?;
    let value = template_json::parse(&text).map_err(|err| TemplateError::Parse(err.to_string()))?;
    build_world_from_value(template_id, seed, config, &value)
}

fn build_world_from_value(
    template_id: &str,
    seed: u64,
    config: WorldConfig,
    value: &Value,
) -> Result<World, TemplateError> {
    let mut world = World::new(template_id, seed, config);

    if let Some(layers) = value.get("field_layers").and_then(Value::as_array) {
        for layer in layers {
            let id = layer.get("id").and_then(Value::as_u32).unwrap_or(0);
            let dims = layer.get("dims").and_then(Value::as_array).unwrap_or(&[]);
            let dims = (
                dims.first().and_then(Value::as_u32).unwrap_or(1),
                dims.get(1).and_then(Value::as_u32).unwrap_or(1),
                dims.get(2).and_then(Value::as_u32).unwrap_or(1),
            );
            let _ = world.fields.create_layer(id, dims, Q16::zero());
        }
    }

    if let Some(networks) = value.get("networks").and_then(Value::as_array) {
        for spec in networks {
            world.networks.register(None, build_network_from_value(spec)).map_err(|err| {
                TemplateError::Parse(format!("registering template network: {err}"))
            })?;
        }
    }

    Ok(world)
}

fn build_network_from_value(spec: &Value) -> Network {
    let kind = spec
        .get("kind")
        .and_then(Value::as_str)
        .and_then(parse_network_kind)
        .unwrap_or(NetworkKind::Electrical);
    let mut network = Network::new(kind);

    if let Some(nodes) = spec.get("nodes").and_then(Value::as_array) {
        for node in nodes {
            let capacity = node
                .get("capacity")
                .and_then(Value::as_i64)
                .map_or(Q16::zero(), |n| Q16::from_int(n as i32));
            let loss = node
                .get("loss")
                .and_then(Value::as_i64)
                .map_or(Q16::zero(), |n| Q16::from_int(n as i32));
            let min_required = node
                .get("min_required")
                .and_then(Value::as_i64)
                .map_or(Q16::zero(), |n| Q16::from_int(n as i32));
            let _ = network.nodes.register(None, Node::new(capacity, loss, min_required));
        }
    }

    if let Some(edges) = spec.get("edges").and_then(Value::as_array) {
        for edge in edges {
            let from = edge.get("from").and_then(Value::as_i64).unwrap_or(0) as u64;
            let to = edge.get("to").and_then(Value::as_i64).unwrap_or(0) as u64;
            let capacity = edge
                .get("capacity")
                .and_then(Value::as_i64)
                .map_or(Q16::zero(), |n| Q16::from_int(n as i32));
            let loss = edge
                .get("loss")
                .and_then(Value::as_i64)
                .map_or(Q16::zero(), |n| Q16::from_int(n as i32));
            let _ = network.edges.register(None, Edge::new(from, to, capacity, loss));
        }
    }

    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_template_is_an_error() {
        let result = bootstrap_template("builtin.nonexistent", 1, WorldConfig::default());
        assert_eq!(result.unwrap_err(), TemplateError::Unknown("builtin.nonexistent".to_string()));
    }

    #[test]
    fn empty_universe_has_no_networks() {
        let world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
        assert_eq!(world.networks.len(), 0);
    }

    #[test]
    fn minimal_system_has_one_network_with_an_edge() {
        let world = bootstrap_template("builtin.minimal_system", 1, WorldConfig::default()).unwrap();
        assert_eq!(world.networks.len(), 1);
        let (_, network) = world.networks.iter().next().unwrap();
        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.edges.len(), 1);
        assert!(world.fields.has_layer(MINIMAL_SYSTEM_FIELD_ID));
    }

    #[test]
    fn file_template_under_data_root_env_var_bootstraps_a_network() {
        let dir = tempfile::tempdir().unwrap();
        let templates_dir = dir.path().join("templates");
        fs::create_dir_all(&templates_dir).unwrap();
        let mut file = fs::File::create(templates_dir.join("custom.station.json")).unwrap();
        write!(
            file,
            r#"{{"field_layers": [{{"id": 1, "dims": [4, 4, 1]}}], "networks": [{{"kind": "thermal", "nodes": [{{"capacity": 50, "loss": 0, "min_required": 0}}], "edges": []}}]}}"#
        )
        .unwrap();
        drop(file);

        // SAFETY: test-local env var set, not shared mutable process state
        // across threads in this crate's test binary layout.
        std::env::set_var("DOM_DATA_ROOT", dir.path());
        let result = bootstrap_template("custom.station", 7, WorldConfig::default());
        std::env::remove_var("DOM_DATA_ROOT");

        let world = result.unwrap();
        assert_eq!(world.networks.len(), 1);
        assert!(world.fields.has_layer(1));
    }

    #[test]
    fn nonexistent_template_file_is_unknown_not_io_error() {
        std::env::remove_var("DOM_INSTALL_ROOT");
        std::env::remove_var("DOM_DATA_ROOT");
        let result = bootstrap_template("no.such.template", 1, WorldConfig::default());
        assert_eq!(result.unwrap_err(), TemplateError::Unknown("no.such.template".to_string()));
    }
}
