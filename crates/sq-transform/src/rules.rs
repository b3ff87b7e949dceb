//! Ordered rewrite rules for the structured-data family.
//!
//! Each enabled rule is one full-tree pass; passes run in the documented
//! evaluation order, so later rules observe the output of earlier ones.
//! Every pass recurses bottom-up: emptiness created inside a child must be
//! visible to the pass that prunes the parent, otherwise running the rule
//! set twice would not be a no-op. Idempotence of the whole enabled set is
//! the central property of this module and is asserted by tests.

use serde_json::Value;
use sq_core::JsonOptions;

/// Apply the enabled rule set to `value`, in evaluation order.
///
/// `removeUndefinedValues` never appears here: a parse cannot produce an
/// undefined value, so the toggle is accepted and ignored.
/// `removeDuplicateKeys` is equally absent: the parser already keeps the
/// last occurrence of a duplicate key.
pub fn apply(value: &mut Value, opts: &JsonOptions) {
    if opts.remove_null_values {
        remove_null_values(value);
    }
    if opts.remove_empty_keys {
        remove_empty_keys(value);
    }
    if opts.remove_empty_array_elements {
        remove_empty_array_elements(value);
    }
    if opts.remove_duplicate_array_elements {
        dedup_array_elements(value);
    }
    if opts.sort_array_elements {
        sort_array_elements(value);
    }
    if opts.remove_empty_objects || opts.remove_empty_arrays {
        prune_empty_containers(value, opts.remove_empty_objects, opts.remove_empty_arrays);
    }
    if opts.sort_object_keys {
        sort_object_keys(value);
    }
}

/// Drop object entries whose value is null. Objects only; array slots keep
/// their nulls.
fn remove_null_values(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                remove_null_values(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                remove_null_values(v);
            }
        }
        _ => {}
    }
}

fn remove_empty_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|k, _| !k.is_empty());
            for v in map.values_mut() {
                remove_empty_keys(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                remove_empty_keys(v);
            }
        }
        _ => {}
    }
}

fn is_empty_element(v: &Value) -> bool {
    match v {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn remove_empty_array_elements(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for v in items.iter_mut() {
                remove_empty_array_elements(v);
            }
            items.retain(|v| !is_empty_element(v));
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                remove_empty_array_elements(v);
            }
        }
        _ => {}
    }
}

/// De-duplicate by deep structural equality, keeping the first occurrence
/// and the original relative order.
fn dedup_array_elements(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for v in items.iter_mut() {
                dedup_array_elements(v);
            }
            let mut seen: Vec<Value> = Vec::new();
            items.retain(|v| {
                if seen.contains(v) {
                    false
                } else {
                    seen.push(v.clone());
                    true
                }
            });
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                dedup_array_elements(v);
            }
        }
        _ => {}
    }
}

/// Sort arrays whose elements are all the same primitive kind. Mixed-type
/// and container-bearing arrays are left untouched.
fn sort_array_elements(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for v in items.iter_mut() {
                sort_array_elements(v);
            }
            if items.iter().all(Value::is_number) {
                items.sort_by(|a, b| {
                    let x = a.as_f64().unwrap_or(0.0);
                    let y = b.as_f64().unwrap_or(0.0);
                    x.total_cmp(&y)
                });
            } else if items.iter().all(Value::is_string) {
                items.sort_by(|a, b| a.as_str().unwrap_or("").cmp(b.as_str().unwrap_or("")));
            } else if items.iter().all(Value::is_boolean) {
                items.sort_by_key(|v| v.as_bool().unwrap_or(false));
            }
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                sort_array_elements(v);
            }
        }
        _ => {}
    }
}

fn is_prunable(v: &Value, objects: bool, arrays: bool) -> bool {
    (objects && v.as_object().is_some_and(|o| o.is_empty()))
        || (arrays && v.as_array().is_some_and(|a| a.is_empty()))
}

/// Recursively drop now-empty containers, bottom-up, so emptiness created
/// by child pruning propagates to parents. The root itself is never
/// replaced; only entries and elements are dropped.
fn prune_empty_containers(value: &mut Value, objects: bool, arrays: bool) {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                prune_empty_containers(v, objects, arrays);
            }
            map.retain(|_, v| !is_prunable(v, objects, arrays));
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                prune_empty_containers(v, objects, arrays);
            }
            items.retain(|v| !is_prunable(v, objects, arrays));
        }
        _ => {}
    }
}

/// Sort object keys lexicographically by code point. Applied last so it
/// reflects the final key set.
fn sort_object_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                sort_object_keys(v);
            }
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (k, v) in entries {
                map.insert(k, v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                sort_object_keys(v);
            }
        }
        _ => {}
    }
}
