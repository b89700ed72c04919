// Mon Oct 12 2026 - Alex

use crate::interface::{TargetMethod, TargetProperty, VTableLayout};
use crate::model::Visibility;
use serde::Serialize;
use std::fmt;

/// Handle into the mapper's interface arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InterfaceId(pub usize);

/// Property on an outer interface giving access to a relocated inner interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InnerAccess {
    pub property_name: String,
    pub interface: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetInterface {
    pub name: String,
    pub native_name: String,
    pub include: String,
    /// Managed base: another interface, or the object/callbackable root type.
    pub base: Option<String>,
    #[serde(skip)]
    pub base_id: Option<InterfaceId>,
    pub guid: Option<String>,
    pub visibility: Visibility,
    pub is_callback: bool,
    pub is_dual_callback: bool,
    pub is_native_shadow: bool,
    pub is_inner: bool,
    /// Public interface a native shadow was cloned from.
    pub shadow_of: Option<String>,
    pub native_shadow: Option<String>,
    pub vtable: VTableLayout,
    pub methods: Vec<TargetMethod>,
    pub properties: Vec<TargetProperty>,
    pub inner_interfaces: Vec<InnerAccess>,
    #[serde(skip)]
    pub fully_mapped: bool,
}

impl TargetInterface {
    pub fn new(name: &str, native_name: &str) -> Self {
        Self {
            name: name.to_string(),
            native_name: native_name.to_string(),
            include: String::new(),
            base: None,
            base_id: None,
            guid: None,
            visibility: Visibility::Public,
            is_callback: false,
            is_dual_callback: false,
            is_native_shadow: false,
            is_inner: false,
            shadow_of: None,
            native_shadow: None,
            vtable: VTableLayout::default(),
            methods: Vec::new(),
            properties: Vec::new(),
            inner_interfaces: Vec::new(),
            fully_mapped: false,
        }
    }

    pub fn method(&self, name: &str) -> Option<&TargetMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&TargetProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for TargetInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.name)?;
        if let Some(base) = &self.base {
            write!(f, " : {}", base)?;
        }
        if let Some(guid) = &self.guid {
            write!(f, " [{}]", guid)?;
        }
        write!(f, " ({} methods, {} properties)", self.methods.len(), self.properties.len())
    }
}
