//! Module `location`
//!
//! Defines the `Location` record each client reports and the decoding rules
//! applied to it. Every field is optional on the wire; anything absent or
//! `null` falls back to its zero value. No range checks are applied.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

const FIELDS: [&str; 5] = ["lat", "lng", "status", "name", "initials"];

/// Last reported position and status of one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub initials: String,
}

/// Client identifier → last reported location.
pub type LocationSnapshot = HashMap<String, Location>;

impl Location {
    /// Decodes one client message.
    ///
    /// Accepts a JSON object or a bare `null` (the all-zero record). Arrays,
    /// scalars and fields of the wrong type are rejected. Field names match
    /// case-insensitively, an exact match winning over a case variant, and
    /// anything after the first JSON value is ignored.
    pub fn decode(input: &str) -> Result<Self, serde_json::Error> {
        let value = match serde_json::Deserializer::from_str(input)
            .into_iter::<Value>()
            .next()
        {
            Some(value) => value?,
            None => {
                return Err(serde::de::Error::custom("empty location message"));
            }
        };
        match value {
            Value::Null => Ok(Location::default()),
            Value::Object(object) => Location::deserialize(Value::Object(fold_field_names(object))),
            other => Err(serde::de::Error::custom(format!(
                "expected a location object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

/// Maps keys onto the canonical field names, dropping unknown ones.
fn fold_field_names(object: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::new();
    for (key, value) in object {
        match FIELDS.iter().find(|field| field.eq_ignore_ascii_case(&key)) {
            Some(field) if key == *field => {
                folded.insert(key, value);
            }
            Some(field) => {
                folded.entry(field.to_string()).or_insert(value);
            }
            None => {}
        }
    }
    folded
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
