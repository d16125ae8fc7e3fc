//! The host-owned settings bag.
//!
//! Hosts persist node configuration as an untyped key/value object and hand
//! nodes a snapshot of it on create/load/update. Nodes read what they need
//! and never keep the bag around beyond the call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of a node's persisted configuration.
///
/// Backed by a JSON object so hosts can persist it verbatim. Cloning is
/// cheap enough for the per-callback snapshot model; mutation only ever
/// happens on the host's copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsData {
    map: Map<String, Value>,
}

impl SettingsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Returns `None` for anything but an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self { map }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key)?.as_bool()
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.map.get(key)?.as_i64()
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.map.get(key)?.as_f64()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key)?.as_str()
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn get_float_or(&self, key: &str, default: f64) -> f64 {
        self.get_float(key).unwrap_or(default)
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.map.insert(key.to_string(), value);
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, Value::from(value));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, Value::from(value));
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.set(key, Value::from(value));
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.set(key, Value::from(value));
    }

    /// Insert every default that the bag does not already carry.
    ///
    /// Existing keys keep their values, matching how hosts layer persisted
    /// configuration over factory defaults.
    pub fn apply_defaults(&mut self, defaults: &SettingsData) {
        for (key, value) in &defaults.map {
            self.map
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The underlying JSON object, for hosts that persist it verbatim.
    pub fn as_value(&self) -> Value {
        Value::Object(self.map.clone())
    }
}
