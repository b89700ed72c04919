// Mon Oct 12 2026 - Alex

use crate::model::{SourceParameter, SourceReturn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMethod {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<SourceParameter>,
    #[serde(default)]
    pub return_type: Option<SourceReturn>,
}

impl SourceMethod {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_parameter(mut self, parameter: SourceParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, type_name: &str) -> Self {
        self.return_type = Some(SourceReturn::new(type_name));
        self
    }
}

/// A native interface with a fixed virtual method list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInterface {
    pub name: String,
    /// Include (header) the interface was declared in; scopes `IID_` lookups.
    #[serde(default)]
    pub include: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub methods: Vec<SourceMethod>,
}

impl SourceInterface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            include: String::new(),
            base: None,
            guid: None,
            methods: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: &str) -> Self {
        self.include = include.to_string();
        self
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn with_guid(mut self, guid: &str) -> Self {
        self.guid = Some(guid.to_string());
        self
    }

    pub fn with_method(mut self, method: SourceMethod) -> Self {
        self.methods.push(method);
        self
    }
}
