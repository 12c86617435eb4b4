//! Shared test utilities for the archrule workspace.
//!
//! Lives outside `#[cfg(test)]` because `xtask` normalizes reports at runtime too.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 2] = ["started_at", "ended_at"];
const ENVELOPE_KEYS: [&str; 5] = ["schema", "tool", "run", "verdict", "rules"];

/// Mask run-dependent values so two reports of the same input compare equal.
///
/// `tool.version` is masked only on a root report envelope, so rule payloads
/// that happen to carry a `version` stay intact. Timestamps and
/// `duration_ms` are masked at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let is_envelope = value
        .as_object()
        .is_some_and(|obj| ENVELOPE_KEYS.iter().all(|k| obj.contains_key(*k)));
    if is_envelope
        && let Some(tool) = value.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert("version".to_string(), Value::from("__VERSION__"));
    }
    mask_run_fields(&mut value);
    value
}

fn mask_run_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(key)
                    && !v.is_null()
                {
                    *v = Value::from("__TIMESTAMP__");
                }
            }
            if let Some(v) = map.get_mut("duration_ms") {
                *v = Value::from(0);
            }
            map.values_mut().for_each(mask_run_fields);
        }
        Value::Array(items) => items.iter_mut().for_each(mask_run_fields),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_envelope_version_and_run_times() {
        let input = json!({
            "schema": "archrule.report.v1",
            "tool": { "name": "archrule", "version": "0.1.0" },
            "run": {
                "started_at": "2026-01-01T00:00:00Z",
                "ended_at": "2026-01-01T00:00:01Z",
                "duration_ms": 1000
            },
            "verdict": "fail",
            "rules": [
                { "violations": [{ "data": { "version": "3.2.1" } }] }
            ]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "archrule");
        assert_eq!(result["run"]["started_at"], "__TIMESTAMP__");
        assert_eq!(result["run"]["ended_at"], "__TIMESTAMP__");
        assert_eq!(result["run"]["duration_ms"], 0);
        assert_eq!(result["rules"][0]["violations"][0]["data"]["version"], "3.2.1");
    }

    #[test]
    fn non_envelope_keeps_version_but_masks_nested_times() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" },
            "nested": [{ "started_at": "2026-01-01T00:00:00Z" }]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "2.0.0");
        assert_eq!(result["nested"][0]["started_at"], "__TIMESTAMP__");
    }
}
