// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON merging functionality

use serde_json::Value as J;

/// Deep-merge `layer` into `base`
///
/// Objects merge recursively; scalars and arrays replace the left value;
/// a null on the right keeps the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path, creating intermediate objects
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let mut cur = root;
    let mut parts = dotted.split('.').peekable();
    while let Some(part) = parts.next() {
        if !cur.is_object() {
            *cur = J::Object(Default::default());
        }
        let J::Object(map) = cur else { return };
        if parts.peek().is_none() {
            map.insert(part.to_string(), v);
            return;
        }
        cur = map.entry(part.to_string()).or_insert_with(|| J::Object(Default::default()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge() {
        let mut base = json!({ "lookup": { "base-url": "a", "timeout-ms": 10 }, "max-results": 8 });
        merge_two_json(&mut base, json!({ "lookup": { "base-url": "b" }, "max-results": null }));
        assert_eq!(
            base,
            json!({ "lookup": { "base-url": "b", "timeout-ms": 10 }, "max-results": 8 })
        );
    }

    #[test]
    fn arrays_are_replaced() {
        let mut base = json!({ "fallback": { "entries": [1, 2, 3] } });
        merge_two_json(&mut base, json!({ "fallback": { "entries": [4] } }));
        assert_eq!(base, json!({ "fallback": { "entries": [4] } }));
    }

    #[test]
    fn insert_dotted_overwrites_scalars_on_the_path() {
        let mut root = json!({ "lookup": "oops" });
        insert_dotted(&mut root, "lookup.base-url", json!("http://x"));
        assert_eq!(root, json!({ "lookup": { "base-url": "http://x" } }));
    }
}
