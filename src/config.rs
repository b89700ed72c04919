// Mon Oct 12 2026 - Alex

use crate::interface::inner::InnerInterfaceRule;
use crate::interface::vtable::PlatformDetection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Method count of the root object-identity interface per platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSlots {
    pub windows: u32,
    pub default: u32,
}

impl Default for RootSlots {
    fn default() -> Self {
        Self { windows: 3, default: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pointer_size: usize,
    pub platforms: PlatformDetection,
    pub root_slots: RootSlots,
    pub msvc_overload_ordering: bool,
    pub object_type: String,
    pub callbackable_type: String,
    pub status_code_type: String,
    pub interface_array_type: String,
    pub native_callback_suffix: String,
    pub reserved_suffix: String,
    pub inner_interfaces: Vec<InnerInterfaceRule>,
    pub strict_properties: bool,
    pub max_diagnostics: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pointer_size: 8,
            platforms: PlatformDetection::ANY,
            root_slots: RootSlots::default(),
            msvc_overload_ordering: true,
            object_type: "CppObject".to_string(),
            callbackable_type: "ICallbackable".to_string(),
            status_code_type: "Result".to_string(),
            interface_array_type: "InterfaceArray".to_string(),
            native_callback_suffix: "Native".to_string(),
            reserved_suffix: "_".to_string(),
            inner_interfaces: Vec::new(),
            strict_properties: false,
            max_diagnostics: 1000,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    pub fn with_pointer_size(mut self, size: usize) -> Self {
        self.pointer_size = size;
        self
    }

    pub fn with_platforms(mut self, platforms: PlatformDetection) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_root_slots(mut self, windows: u32, default: u32) -> Self {
        self.root_slots = RootSlots { windows, default };
        self
    }

    pub fn with_inner_interface(mut self, rule: InnerInterfaceRule) -> Self {
        self.inner_interfaces.push(rule);
        self
    }

    pub fn with_strict_properties(mut self, strict: bool) -> Self {
        self.strict_properties = strict;
        self
    }

    /// Pointer width of the other platform family, used for portability checks.
    pub fn alternate_pointer_size(&self) -> usize {
        if self.pointer_size == 8 {
            4
        } else {
            8
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pointer_size != 4 && self.pointer_size != 8 {
            return Err(format!("pointer_size must be 4 or 8, got {}", self.pointer_size));
        }
        if self.platforms.is_empty() {
            return Err("platforms must name at least one platform family".to_string());
        }
        if self.object_type.is_empty() || self.callbackable_type.is_empty() {
            return Err("object_type and callbackable_type must be set".to_string());
        }
        if self.reserved_suffix.is_empty() {
            return Err("reserved_suffix must not be empty".to_string());
        }
        for rule in &self.inner_interfaces {
            rule.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_odd_pointer_size() {
        let config = Config::new().with_pointer_size(6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alternate_pointer_size() {
        assert_eq!(Config::new().alternate_pointer_size(), 4);
        assert_eq!(Config::new().with_pointer_size(4).alternate_pointer_size(), 8);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = Config::from_json(r#"{ "pointer_size": 4, "strict_properties": true }"#).unwrap();
        assert_eq!(config.pointer_size, 4);
        assert!(config.strict_properties);
        assert_eq!(config.object_type, "CppObject");
        assert_eq!(config.platforms, PlatformDetection::ANY);
    }
}
