//! Deep merge functionality for layered configuration.
//!
//! Later sources win for scalars, objects merge key by key, and two arrays at
//! the same key combine into their order-preserving union.

use super::Config;
use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Two arrays become the union of both, base elements first, duplicates dropped
/// - Anything else (including `null`) is replaced by the overlay value
///
/// # Example
/// ```
/// use serde_json::json;
/// use lando_bootstrap::config::deep_merge;
///
/// let base = json!({
///     "proxy": { "domain": "lndo.site", "port": 80 },
///     "pluginDirs": ["a", "b"]
/// });
/// let overlay = json!({
///     "proxy": { "port": 8080 },
///     "pluginDirs": ["b", "c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(
///     result,
///     json!({
///         "proxy": { "domain": "lndo.site", "port": 8080 },
///         "pluginDirs": ["a", "b", "c"]
///     })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge(base_map, overlay_map))
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            Value::Array(union(base_items, overlay_items))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two configuration mappings, with `overlay` taking precedence.
///
/// Both inputs are consumed, so the caller never observes a half-merged value.
pub fn merge(mut base: Config, overlay: Config) -> Config {
    for (key, overlay_value) in overlay {
        let merged_value = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged_value);
    }
    base
}

/// Concatenate two arrays keeping only the first occurrence of each element.
fn union(base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(base.len() + overlay.len());
    for item in base.into_iter().chain(overlay) {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Config {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_merge_simple_objects() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3, "c": 4});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_merge_nested_objects() {
        let base = json!({
            "proxy": {"domain": "lndo.site", "port": 80},
            "debug": true
        });
        let overlay = json!({
            "proxy": {"port": 8080}
        });
        let result = deep_merge(base, overlay);
        assert_eq!(
            result,
            json!({
                "proxy": {"domain": "lndo.site", "port": 8080},
                "debug": true
            })
        );
    }

    #[test]
    fn test_arrays_are_unioned() {
        let base = json!({"items": [1, 2, 3]});
        let overlay = json!({"items": [3, 4, 1, 5]});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"items": [1, 2, 3, 4, 5]}));
    }

    #[test]
    fn test_union_collapses_duplicates_within_one_side() {
        let result = deep_merge(json!(["a", "a", "b"]), json!(["b", "c", "c"]));
        assert_eq!(result, json!(["a", "b", "c"]));
    }

    #[test]
    fn test_union_compares_structurally() {
        let result = deep_merge(json!([{"name": "x"}]), json!([{"name": "x"}, {"name": "y"}]));
        assert_eq!(result, json!([{"name": "x"}, {"name": "y"}]));
    }

    #[test]
    fn test_union_length_bounded_by_inputs() {
        let base = vec![json!(1), json!(2), json!(3)];
        let overlay = vec![json!(2), json!(4)];
        let merged = union(base.clone(), overlay.clone());
        assert!(merged.len() <= base.len() + overlay.len());
        for item in base.iter().chain(overlay.iter()) {
            assert_eq!(merged.iter().filter(|v| *v == item).count(), 1);
        }
    }

    #[test]
    fn test_null_overrides_base() {
        let base = json!({"a": 1, "b": {"c": 2}});
        let overlay = json!({"a": null, "b": {"c": null}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": null, "b": {"c": null}}));
    }

    #[test]
    fn test_array_replaces_scalar_and_back() {
        assert_eq!(
            deep_merge(json!({"v": 1}), json!({"v": [1]})),
            json!({"v": [1]})
        );
        assert_eq!(
            deep_merge(json!({"v": [1]}), json!({"v": "x"})),
            json!({"v": "x"})
        );
    }

    #[test]
    fn test_deep_nested_merge() {
        let base = json!({
            "level1": {"level2": {"level3": {"a": 1, "b": [1]}}}
        });
        let overlay = json!({
            "level1": {"level2": {"level3": {"b": [2], "c": 4}}}
        });
        let result = deep_merge(base, overlay);
        assert_eq!(
            result,
            json!({
                "level1": {"level2": {"level3": {"a": 1, "b": [1, 2], "c": 4}}}
            })
        );
    }

    #[test]
    fn test_merge_configs_shared_scalar_takes_overlay() {
        let base = obj(json!({"domain": "lndo.site", "keep": true}));
        let overlay = obj(json!({"domain": "example.test"}));
        let merged = merge(base, overlay);
        assert_eq!(merged["domain"], json!("example.test"));
        assert_eq!(merged["keep"], json!(true));
    }

    #[test]
    fn test_overlay_replaces_primitive_with_object() {
        let base = json!({"value": 42});
        let overlay = json!({"value": {"nested": true}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"value": {"nested": true}}));
    }
}
