// Mon Oct 12 2026 - Alex

use crate::model::{SourceAggregate, SourceFunction, SourceInterface};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEnum {
    pub name: String,
    #[serde(default = "default_enum_underlying")]
    pub underlying: String,
}

fn default_enum_underlying() -> String {
    "int".to_string()
}

impl SourceEnum {
    pub fn new(name: &str, underlying: &str) -> Self {
        Self {
            name: name.to_string(),
            underlying: underlying.to_string(),
        }
    }
}

/// Fully materialised, already flattened native declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationTree {
    #[serde(default)]
    pub aggregates: Vec<SourceAggregate>,
    #[serde(default)]
    pub enums: Vec<SourceEnum>,
    #[serde(default)]
    pub interfaces: Vec<SourceInterface>,
    #[serde(default)]
    pub functions: Vec<SourceFunction>,
    /// Declared GUID constants, grouped by include then keyed by constant name.
    #[serde(default)]
    pub guids: IndexMap<String, IndexMap<String, String>>,
}

impl DeclarationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregate(mut self, aggregate: SourceAggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    pub fn with_enum(mut self, source_enum: SourceEnum) -> Self {
        self.enums.push(source_enum);
        self
    }

    pub fn with_interface(mut self, interface: SourceInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_function(mut self, function: SourceFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_guid(mut self, include: &str, key: &str, guid: &str) -> Self {
        self.guids
            .entry(include.to_string())
            .or_default()
            .insert(key.to_string(), guid.to_string());
        self
    }

    pub fn aggregate(&self, name: &str) -> Option<&SourceAggregate> {
        self.aggregates.iter().find(|a| a.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&SourceInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn guid_in(&self, include: &str, key: &str) -> Option<&str> {
        self.guids.get(include).and_then(|keys| keys.get(key)).map(String::as_str)
    }

    /// True when any aggregate in the tree declares a field with this name.
    pub fn any_aggregate_declares(&self, field_name: &str) -> bool {
        self.aggregates.iter().any(|a| a.field(field_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceField;

    #[test]
    fn test_guid_lookup_is_scoped_by_include() {
        let tree = DeclarationTree::new().with_guid("d3d", "IID_IFoo", "0000-1111");
        assert_eq!(tree.guid_in("d3d", "IID_IFoo"), Some("0000-1111"));
        assert_eq!(tree.guid_in("other", "IID_IFoo"), None);
    }

    #[test]
    fn test_any_aggregate_declares() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("A").with_field(SourceField::new("count", "int")));
        assert!(tree.any_aggregate_declares("count"));
        assert!(!tree.any_aggregate_declares("missing"));
    }
}
