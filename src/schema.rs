//! JSON schema descriptors for extraction payloads.
//!
//! Schemas come from the Rust types via `schemars`, then get flattened so the
//! extraction service sees one self-contained document.

use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// Types that can describe the payload an extraction call should return.
///
/// Implemented for every `JsonSchema` type.
pub trait ExtractionSchema: JsonSchema + Sized {
    /// Self-contained schema: `$ref`s inlined, every property required.
    fn extraction_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = value.get("definitions").cloned();
        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }
        require_all_properties(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }
}

impl<T: JsonSchema> ExtractionSchema for T {}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get("$ref").cloned() {
                if let Some(name) = path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        inline_refs(value, definitions);
                        return;
                    }
                }
            }
            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

// Fields carry serde defaults for lenient decoding, but the extraction
// service should still be asked for every one of them.
fn require_all_properties(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let is_object = map.get("type").and_then(Value::as_str) == Some("object");
            if let (true, Some(Value::Object(props))) = (is_object, map.get("properties")) {
                let keys: Vec<Value> = props.keys().map(|k| Value::String(k.clone())).collect();
                map.insert("required".to_string(), Value::Array(keys));
            }
            for (_, v) in map.iter_mut() {
                require_all_properties(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                require_all_properties(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationsResponse, PropertiesResponse};

    #[test]
    fn test_properties_schema_is_inlined() {
        let schema = PropertiesResponse::extraction_schema();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$ref"));
        assert!(schema.get("definitions").is_none());

        let item = &schema["properties"]["properties"]["items"];
        let fields = item["properties"].as_object().unwrap();
        assert!(fields.contains_key("Building_name"));
        assert!(fields.contains_key("location_address"));
        assert!(fields.contains_key("property_link"));
        assert_eq!(item["required"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_locations_schema_fields() {
        let schema = LocationsResponse::extraction_schema();
        let item = &schema["properties"]["locations"]["items"];
        let fields = item["properties"].as_object().unwrap();

        assert!(fields.contains_key("price_per_sqft"));
        assert!(fields.contains_key("percent_increase"));
        assert!(fields.contains_key("rental_yield"));
    }
}
