// Mon Oct 12 2026 - Alex

use crate::interface::InterfaceError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Moves matching methods of an interface into a nested interface reached
/// through a property of the outer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerInterfaceRule {
    /// Pattern matched against `Interface::Method`.
    pub method: String,
    pub inner_interface: String,
    #[serde(default)]
    pub property_access_name: Option<String>,
    #[serde(default)]
    pub inherited_interface: Option<String>,
}

impl InnerInterfaceRule {
    pub fn new(method: &str, inner_interface: &str) -> Self {
        Self {
            method: method.to_string(),
            inner_interface: inner_interface.to_string(),
            property_access_name: None,
            inherited_interface: None,
        }
    }

    pub fn with_property_access_name(mut self, name: &str) -> Self {
        self.property_access_name = Some(name.to_string());
        self
    }

    pub fn with_inherited_interface(mut self, name: &str) -> Self {
        self.inherited_interface = Some(name.to_string());
        self
    }

    pub fn property_name(&self) -> &str {
        self.property_access_name.as_deref().unwrap_or(&self.inner_interface)
    }

    fn compile(&self) -> Result<Regex, InterfaceError> {
        Regex::new(&format!("^(?:{})$", self.method)).map_err(|e| InterfaceError::InvalidInnerInterfaceRule {
            pattern: self.method.clone(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.inner_interface.is_empty() {
            return Err(format!("inner interface rule '{}' names no interface", self.method));
        }
        self.compile().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Compiled set of inner interface rules; the first matching rule wins.
#[derive(Debug, Default)]
pub struct InnerInterfaceRouter {
    rules: Vec<(Regex, InnerInterfaceRule)>,
}

impl InnerInterfaceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &[InnerInterfaceRule]) -> Result<Self, InterfaceError> {
        let rules = rules
            .iter()
            .map(|rule| Ok((rule.compile()?, rule.clone())))
            .collect::<Result<Vec<_>, InterfaceError>>()?;
        Ok(Self { rules })
    }

    pub fn route(&self, interface: &str, method: &str) -> Option<&InnerInterfaceRule> {
        let full_name = format!("{}::{}", interface, method);
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(&full_name))
            .map(|(_, rule)| rule)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
