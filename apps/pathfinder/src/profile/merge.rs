use serde_json::{Map, Value};

use crate::profile::models::SectionName;

/// Recursively overlays `source` onto `target`.
///
/// Objects merge key by key; arrays and primitives from `source` replace whatever
/// `target` held. A non-object `target` is replaced by an empty object first when
/// `source` is an object.
pub fn deep_merge(target: &mut Value, source: Value) {
    match source {
        Value::Object(source_map) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(target_map) = target {
                for (key, value) in source_map {
                    if value.is_object() {
                        let slot = target_map
                            .entry(key)
                            .or_insert_with(|| Value::Object(Map::new()));
                        deep_merge(slot, value);
                    } else {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        other => *target = other,
    }
}

/// Overlays one section's payload onto an existing profile document.
pub fn merge_section(mut existing: Value, section: SectionName, data: Value) -> Value {
    let mut update = Map::new();
    update.insert(section.as_str().to_string(), data);
    deep_merge(&mut existing, Value::Object(update));
    existing
}

/// Sets `updated_at` to the current UTC time on a profile document.
pub fn stamp_updated_at(profile: &mut Value) {
    if let Value::Object(map) = profile {
        map.insert(
            "updated_at".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
}
