// Mon Oct 12 2026 - Alex

use crate::model::SourceField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAggregate {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<SourceField>,
    /// Single inheritance only; looked up by name, never owned.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub is_union: bool,
    #[serde(default)]
    pub explicit_layout: bool,
}

impl SourceAggregate {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            base: None,
            is_union: false,
            explicit_layout: false,
        }
    }

    pub fn union(name: &str) -> Self {
        let mut aggregate = Self::new(name);
        aggregate.is_union = true;
        aggregate
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn with_field(mut self, field: SourceField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_explicit_layout(mut self) -> Self {
        self.explicit_layout = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&SourceField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_bitfields(&self) -> bool {
        self.fields.iter().any(|f| f.is_bitfield())
    }
}
