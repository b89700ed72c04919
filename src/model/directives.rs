// Mon Oct 12 2026 - Alex

use crate::model::ParamDirection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

/// Per-field mapping rule, keyed `Aggregate::field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRule {
    pub mapping_type: Option<String>,
    pub relation: Option<String>,
    pub callback: Option<String>,
    pub visibility: Option<Visibility>,
    pub rename: Option<String>,
    pub optional: Option<bool>,
    pub default_value: Option<String>,
}

impl FieldRule {
    pub fn with_mapping_type(mut self, type_name: &str) -> Self {
        self.mapping_type = Some(type_name.to_string());
        self
    }

    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = Some(relation.to_string());
        self
    }

    pub fn with_callback(mut self, statement: &str) -> Self {
        self.callback = Some(statement.to_string());
        self
    }

    pub fn with_optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }

    pub fn with_rename(mut self, name: &str) -> Self {
        self.rename = Some(name.to_string());
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateRule {
    pub explicit_layout: Option<bool>,
    pub pack: Option<u32>,
    pub custom_marshal: bool,
    pub generate_as_class: bool,
}

impl AggregateRule {
    pub fn with_pack(mut self, pack: u32) -> Self {
        self.pack = Some(pack);
        self
    }

    pub fn with_explicit_layout(mut self, explicit: bool) -> Self {
        self.explicit_layout = Some(explicit);
        self
    }

    pub fn with_custom_marshal(mut self) -> Self {
        self.custom_marshal = true;
        self
    }

    pub fn with_class(mut self) -> Self {
        self.generate_as_class = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceRule {
    pub callback: bool,
    pub dual_callback: bool,
    pub native_callback_name: Option<String>,
    pub native_callback_visibility: Option<Visibility>,
}

impl InterfaceRule {
    pub fn callback() -> Self {
        Self {
            callback: true,
            ..Self::default()
        }
    }

    pub fn dual_callback() -> Self {
        Self {
            callback: true,
            dual_callback: true,
            ..Self::default()
        }
    }
}

/// Per-method rule, keyed `Interface::Method` (or the bare function name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodRule {
    pub property: Option<bool>,
    pub persist: Option<bool>,
    pub hidden: Option<bool>,
    pub keep_implement_public: Option<bool>,
    pub vtable_offset_translate: i32,
    pub request_raw_ptr: bool,
    pub check_return: Option<bool>,
    pub rename: Option<String>,
}

impl MethodRule {
    pub fn without_property(mut self) -> Self {
        self.property = Some(false);
        self
    }

    pub fn keep_public(mut self) -> Self {
        self.keep_implement_public = Some(true);
        self
    }
}

/// Per-parameter rule, keyed `Interface::Method::param` (or `function::param`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRule {
    pub direction: Option<ParamDirection>,
    pub relation: Option<String>,
    pub mapping_type: Option<String>,
}

impl ParameterRule {
    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = Some(relation.to_string());
        self
    }

    pub fn with_direction(mut self, direction: ParamDirection) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// All per-element mapping rules of a run. Populated once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Directives {
    pub fields: IndexMap<String, FieldRule>,
    pub aggregates: IndexMap<String, AggregateRule>,
    pub interfaces: IndexMap<String, InterfaceRule>,
    pub methods: IndexMap<String, MethodRule>,
    pub parameters: IndexMap<String, ParameterRule>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: &str, rule: FieldRule) -> Self {
        self.fields.insert(key.to_string(), rule);
        self
    }

    pub fn with_aggregate(mut self, key: &str, rule: AggregateRule) -> Self {
        self.aggregates.insert(key.to_string(), rule);
        self
    }

    pub fn with_interface(mut self, key: &str, rule: InterfaceRule) -> Self {
        self.interfaces.insert(key.to_string(), rule);
        self
    }

    pub fn with_method(mut self, key: &str, rule: MethodRule) -> Self {
        self.methods.insert(key.to_string(), rule);
        self
    }

    pub fn with_parameter(mut self, key: &str, rule: ParameterRule) -> Self {
        self.parameters.insert(key.to_string(), rule);
        self
    }

    pub fn field(&self, aggregate: &str, field: &str) -> Option<&FieldRule> {
        self.fields.get(&format!("{}::{}", aggregate, field))
    }

    pub fn aggregate(&self, aggregate: &str) -> Option<&AggregateRule> {
        self.aggregates.get(aggregate)
    }

    pub fn interface(&self, interface: &str) -> Option<&InterfaceRule> {
        self.interfaces.get(interface)
    }

    pub fn method(&self, owner: Option<&str>, method: &str) -> Option<&MethodRule> {
        match owner {
            Some(owner) => self.methods.get(&format!("{}::{}", owner, method)),
            None => self.methods.get(method),
        }
    }

    pub fn parameter(&self, owner: Option<&str>, method: &str, parameter: &str) -> Option<&ParameterRule> {
        match owner {
            Some(owner) => self.parameters.get(&format!("{}::{}::{}", owner, method, parameter)),
            None => self.parameters.get(&format!("{}::{}", method, parameter)),
        }
    }
}
