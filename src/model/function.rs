// Mon Oct 12 2026 - Alex

use serde::{Deserialize, Serialize};

/// Data flow of a callable parameter across the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParamDirection {
    #[default]
    In,
    Out,
    Ref,
    RefIn,
}

impl ParamDirection {
    /// Whether the managed value travels to native code before the call.
    pub fn flows_in(self) -> bool {
        matches!(self, Self::In | Self::Ref | Self::RefIn)
    }

    /// Whether the native value travels back to managed code after the call.
    pub fn flows_out(self) -> bool {
        matches!(self, Self::Out | Self::Ref)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceParameter {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub pointer_depth: u8,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub direction: ParamDirection,
}

impl SourceParameter {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            pointer_depth: 0,
            is_array: false,
            direction: ParamDirection::In,
        }
    }

    pub fn with_pointer(mut self, depth: u8) -> Self {
        self.pointer_depth = depth;
        self
    }

    pub fn with_array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_direction(mut self, direction: ParamDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn out(name: &str, type_name: &str) -> Self {
        Self::new(name, type_name).with_pointer(1).with_direction(ParamDirection::Out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReturn {
    pub type_name: String,
    #[serde(default)]
    pub pointer_depth: u8,
}

impl SourceReturn {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            pointer_depth: 0,
        }
    }
}

/// A free function exported by the native library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFunction {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub parameters: Vec<SourceParameter>,
    #[serde(default)]
    pub return_type: Option<SourceReturn>,
}

impl SourceFunction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: None,
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

    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.name)
    }
}
