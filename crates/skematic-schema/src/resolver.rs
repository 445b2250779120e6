//! # Reference Resolver
//!
//! Expands local `$ref` nodes (`#/definitions/...`, `#/$defs/...`) in a raw
//! schema tree before model parsing. Resolution is cycle-safe: definitions
//! are enumerated once into an arena indexed by `DefId`, and the set of
//! definitions currently being expanded is a `DefId` bitset. A ref whose
//! target is already in flight is left in place, as is any ref the arena
//! does not know (external URIs, non-local pointers) — such nodes are later
//! skipped by the validator rather than treated as failures.
//!
//! When a node carries sibling keywords next to `$ref`, the siblings are
//! merged into the resolved target: objects deep-merge, arrays concatenate
//! (target first), scalars are overwritten by the sibling. Draft-07
//! technically ignores `$ref` siblings; the merge is deliberately stricter.

use std::collections::HashMap;

use serde_json::{Map, Value};

type DefId = usize;

/// Definitions of the schema root, enumerated once per resolution.
struct DefArena<'a> {
    ids: HashMap<String, DefId>,
    targets: Vec<&'a Value>,
}

impl<'a> DefArena<'a> {
    fn collect(root: &'a Value) -> Self {
        let mut ids = HashMap::new();
        let mut targets = Vec::new();
        if let Value::Object(map) = root {
            for container in ["definitions", "$defs"] {
                if let Some(Value::Object(defs)) = map.get(container) {
                    for (name, target) in defs {
                        let pointer = format!("#/{container}/{}", escape_pointer_token(name));
                        ids.insert(pointer, targets.len());
                        targets.push(target);
                    }
                }
            }
        }
        Self { ids, targets }
    }

    fn lookup(&self, reference: &str) -> Option<DefId> {
        self.ids.get(reference).copied()
    }

    fn target(&self, id: DefId) -> &'a Value {
        self.targets[id]
    }

    fn len(&self) -> usize {
        self.targets.len()
    }
}

/// Bitset over `DefId`s tracking definitions currently being expanded.
struct InFlight {
    words: Vec<u64>,
}

impl InFlight {
    fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    fn contains(&self, id: DefId) -> bool {
        self.words[id / 64] & (1 << (id % 64)) != 0
    }

    fn insert(&mut self, id: DefId) {
        self.words[id / 64] |= 1 << (id % 64);
    }

    fn remove(&mut self, id: DefId) {
        self.words[id / 64] &= !(1 << (id % 64));
    }
}

/// Expand every resolvable local `$ref` in `root`.
///
/// The result contains no `$ref` nodes except those left unresolved by the
/// cycle guard or by an unknown target.
pub fn resolve(root: &Value) -> Value {
    let arena = DefArena::collect(root);
    let mut in_flight = InFlight::new(arena.len());
    expand(root, &arena, &mut in_flight)
}

fn expand(node: &Value, arena: &DefArena<'_>, in_flight: &mut InFlight) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                return match arena.lookup(reference) {
                    Some(id) if !in_flight.contains(id) => {
                        in_flight.insert(id);
                        let resolved = expand(arena.target(id), arena, in_flight);
                        let siblings = expand_siblings(map, arena, in_flight);
                        in_flight.remove(id);
                        if siblings.is_empty() {
                            resolved
                        } else {
                            deep_merge(resolved, Value::Object(siblings))
                        }
                    }
                    Some(_) => {
                        tracing::debug!(reference, "cyclic $ref left unresolved");
                        node.clone()
                    }
                    None => {
                        tracing::debug!(reference, "unknown $ref target left unresolved");
                        node.clone()
                    }
                };
            }
            Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), expand(value, arena, in_flight)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| expand(item, arena, in_flight))
                .collect(),
        ),
        _ => node.clone(),
    }
}

fn expand_siblings(
    map: &Map<String, Value>,
    arena: &DefArena<'_>,
    in_flight: &mut InFlight,
) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| key.as_str() != "$ref")
        .map(|(key, value)| (key.clone(), expand(value, arena, in_flight)))
        .collect()
}

/// Merge `overlay` into `base`: objects merge key-wise recursively, arrays
/// concatenate with base elements first, anything else is replaced by the
/// overlay.
fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.remove(&key) {
                    Some(base_value) => {
                        base_map.insert(key, deep_merge(base_value, overlay_value));
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (Value::Array(mut base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }
        (_, overlay) => overlay,
    }
}

/// JSON Pointer token escaping per RFC 6901: `~` → `~0`, `/` → `~1`.
fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
