//! Property descriptors for node configuration UIs.
//!
//! Nodes describe their editable settings as an ordered list of typed
//! descriptors; the host renders them however it likes. Nothing here draws
//! anything.

use serde_json::Value;

/// Widget class for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    Text,
    Path,
    Color,
    List,
}

/// One selectable entry of a [`PropertyKind::List`] property.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOption {
    pub display_name: String,
    pub value: Value,
}

/// A single editable setting, keyed by its settings-bag entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub display_name: String,
    pub kind: PropertyKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub group: Option<String>,
    pub options: Vec<ListOption>,
}

impl Property {
    pub fn new(key: &str, display_name: &str, kind: PropertyKind) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            kind,
            default: None,
            min: None,
            max: None,
            step: None,
            group: None,
            options: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_option(mut self, display_name: &str, value: Value) -> Self {
        self.options.push(ListOption {
            display_name: display_name.to_string(),
            value,
        });
        self
    }
}

/// Ordered property container handed back to the host.
///
/// Tagged with the source-type id that built it so the host can route UI
/// callbacks to the right factory.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    source_id: Option<&'static str>,
    items: Vec<Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_source(source_id: &'static str) -> Self {
        Self {
            source_id: Some(source_id),
            items: Vec::new(),
        }
    }

    pub fn source_id(&self) -> Option<&'static str> {
        self.source_id
    }

    pub fn add(&mut self, property: Property) -> &mut Self {
        self.items.push(property);
        self
    }

    pub fn add_bool(&mut self, key: &str, display_name: &str) -> &mut Self {
        self.add(Property::new(key, display_name, PropertyKind::Bool))
    }

    pub fn add_float(
        &mut self,
        key: &str,
        display_name: &str,
        min: f64,
        max: f64,
        step: f64,
    ) -> &mut Self {
        self.add(
            Property::new(key, display_name, PropertyKind::Float)
                .with_range(min, max)
                .with_step(step),
        )
    }

    pub fn add_int(
        &mut self,
        key: &str,
        display_name: &str,
        min: i64,
        max: i64,
    ) -> &mut Self {
        self.add(
            Property::new(key, display_name, PropertyKind::Int)
                .with_range(min as f64, max as f64),
        )
    }

    pub fn add_text(&mut self, key: &str, display_name: &str) -> &mut Self {
        self.add(Property::new(key, display_name, PropertyKind::Text))
    }

    pub fn add_path(&mut self, key: &str, display_name: &str) -> &mut Self {
        self.add(Property::new(key, display_name, PropertyKind::Path))
    }

    pub fn add_color(&mut self, key: &str, display_name: &str) -> &mut Self {
        self.add(Property::new(key, display_name, PropertyKind::Color))
    }

    pub fn add_list(&mut self, key: &str, display_name: &str) -> &mut Self {
        self.add(Property::new(key, display_name, PropertyKind::List))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.items.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.items.iter().find(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut props = Properties::for_source("test-source");
        props
            .add_float("strength", "Strength", 0.0, 1.0, 0.01)
            .add_bool("enabled", "Enabled")
            .add_color("tint", "Tint");

        let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["strength", "enabled", "tint"]);
        assert_eq!(props.source_id(), Some("test-source"));
    }

    #[test]
    fn range_and_options() {
        let mut props = Properties::new();
        props.add(
            Property::new("mode", "Mode", PropertyKind::List)
                .with_option("Fast", Value::from(0))
                .with_option("Accurate", Value::from(1)),
        );
        props.add_int("passes", "Passes", 1, 8);

        let mode = props.get("mode").unwrap();
        assert_eq!(mode.options.len(), 2);
        let passes = props.get("passes").unwrap();
        assert_eq!(passes.min, Some(1.0));
        assert_eq!(passes.max, Some(8.0));
    }
}
