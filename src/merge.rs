//! Delta merge engine
//!
//! Deep-merges a sparse locale document (only added or changed keys) into an
//! existing one. There are no delete semantics: a delta can only add or
//! overwrite.

use serde_json::Value;

use crate::LocaleDocument;

/// Merge `delta` into `base`, returning a new document
///
/// - Objects present on both sides are merged recursively.
/// - Any other delta value replaces the base value wholesale (arrays are not
///   merged element-wise, and a scalar replaces a nested object).
/// - Keys only in `base` keep their value and position.
/// - Keys only in `delta` are appended after the base keys, in delta order.
///
/// # Example
///
/// ```
/// use ai_translate::merge::merge;
/// use serde_json::json;
///
/// let base = json!({"a": "1", "b": {"c": "2"}});
/// let delta = json!({"b": {"d": "3"}, "e": "4"});
/// let merged = merge(base.as_object().unwrap(), delta.as_object().unwrap());
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"a": "1", "b": {"c": "2", "d": "3"}, "e": "4"})
/// );
/// ```
pub fn merge(base: &LocaleDocument, delta: &LocaleDocument) -> LocaleDocument {
    let mut result = base.clone();
    for (key, delta_value) in delta {
        let merged = match (result.get(key), delta_value) {
            (Some(Value::Object(base_obj)), Value::Object(delta_obj)) => {
                Value::Object(merge(base_obj, delta_obj))
            }
            _ => delta_value.clone(),
        };
        // Insert on an existing key keeps its position with preserve_order.
        result.insert(key.clone(), merged);
    }
    result
}

/// Count the leaf (non-object) values in a document
pub fn count_leaves(doc: &LocaleDocument) -> usize {
    doc.values()
        .map(|value| match value {
            Value::Object(inner) => count_leaves(inner),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> LocaleDocument {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn keys(doc: &LocaleDocument) -> Vec<&str> {
        doc.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_merge_nested_scenario() {
        let base = doc(json!({"a": "1", "b": {"c": "2"}}));
        let delta = doc(json!({"b": {"d": "3"}, "e": "4"}));
        let merged = merge(&base, &delta);
        assert_eq!(
            Value::Object(merged),
            json!({"a": "1", "b": {"c": "2", "d": "3"}, "e": "4"})
        );
    }

    #[test]
    fn test_empty_delta_is_identity() {
        let base = doc(json!({"title": "Titre", "menu": {"file": "Fichier", "edit": "Édition"}}));
        assert_eq!(merge(&base, &LocaleDocument::new()), base);
    }

    #[test]
    fn test_empty_base_yields_delta() {
        let delta = doc(json!({"x": "1", "y": {"z": ["a", "b"]}}));
        let merged = merge(&LocaleDocument::new(), &delta);
        assert_eq!(merged, delta);
        assert_eq!(keys(&merged), vec!["x", "y"]);
    }

    #[test]
    fn test_untouched_keys_preserved_in_place() {
        let base = doc(json!({"first": "1", "second": "2", "third": "3"}));
        let delta = doc(json!({"second": "deux"}));
        let merged = merge(&base, &delta);
        assert_eq!(keys(&merged), vec!["first", "second", "third"]);
        assert_eq!(merged["first"], json!("1"));
        assert_eq!(merged["second"], json!("deux"));
        assert_eq!(merged["third"], json!("3"));
    }

    #[test]
    fn test_new_keys_appended_in_delta_order() {
        let base = doc(json!({"b": "1", "a": "2"}));
        let delta = doc(json!({"z": "new", "a": "changed", "m": "also new"}));
        let merged = merge(&base, &delta);
        assert_eq!(keys(&merged), vec!["b", "a", "z", "m"]);
    }

    #[test]
    fn test_nested_new_keys_appended() {
        let base = doc(json!({"menu": {"open": "Ouvrir", "close": "Fermer"}}));
        let delta = doc(json!({"menu": {"save": "Enregistrer", "open": "Ouvrir…"}}));
        let merged = merge(&base, &delta);
        let menu = merged["menu"].as_object().unwrap();
        assert_eq!(keys(menu), vec!["open", "close", "save"]);
        assert_eq!(menu["open"], json!("Ouvrir…"));
    }

    #[test]
    fn test_scalar_replaces_object() {
        let base = doc(json!({"a": {"b": "1"}}));
        let delta = doc(json!({"a": "flat"}));
        assert_eq!(Value::Object(merge(&base, &delta)), json!({"a": "flat"}));
    }

    #[test]
    fn test_object_replaces_scalar() {
        let base = doc(json!({"a": "flat"}));
        let delta = doc(json!({"a": {"b": "1"}}));
        assert_eq!(Value::Object(merge(&base, &delta)), json!({"a": {"b": "1"}}));
    }

    #[test]
    fn test_arrays_replaced_wholesale() {
        let base = doc(json!({"days": ["lun", "mar", "mer"]}));
        let delta = doc(json!({"days": ["lundi"]}));
        assert_eq!(Value::Object(merge(&base, &delta)), json!({"days": ["lundi"]}));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let base = doc(json!({"a": "1", "b": {"c": "2", "d": {"e": "3"}}, "f": [1]}));
        let delta = doc(json!({"b": {"d": {"g": "4"}, "h": "5"}, "f": [2, 3], "i": "6"}));
        let once = merge(&base, &delta);
        let twice = merge(&once, &delta);
        assert_eq!(once, twice);
        assert_eq!(keys(&once), keys(&twice));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let base = doc(json!({"a": {"b": "1"}}));
        let delta = doc(json!({"a": {"c": "2"}}));
        let base_before = base.clone();
        let delta_before = delta.clone();
        let _ = merge(&base, &delta);
        assert_eq!(base, base_before);
        assert_eq!(delta, delta_before);
    }

    #[test]
    fn test_deep_nesting() {
        let base = doc(json!({"l1": {"l2": {"l3": {"keep": "k"}}}}));
        let delta = doc(json!({"l1": {"l2": {"l3": {"add": "a"}}}}));
        assert_eq!(
            Value::Object(merge(&base, &delta)),
            json!({"l1": {"l2": {"l3": {"keep": "k", "add": "a"}}}})
        );
    }

    #[test]
    fn test_count_leaves() {
        let d = doc(json!({"a": "1", "b": {"c": "2", "d": {"e": "3"}}, "f": ["x", "y"]}));
        assert_eq!(count_leaves(&d), 4);
        assert_eq!(count_leaves(&LocaleDocument::new()), 0);
    }
}
