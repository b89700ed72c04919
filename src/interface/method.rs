// Mon Oct 12 2026 - Alex

use crate::binding::{ArraySpecification, Relation, TargetType};
use crate::interface::VtableOffset;
use crate::marshal::{CallablePlan, MarshalShape};
use crate::model::{ParamDirection, Visibility};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct TargetParameter {
    pub name: String,
    pub native_name: String,
    pub native_type: TargetType,
    pub public_type: TargetType,
    pub marshal_type: TargetType,
    pub pointer_depth: u8,
    pub direction: ParamDirection,
    pub is_array: bool,
    pub array: ArraySpecification,
    pub is_bool_to_int: bool,
    pub relations: Vec<Relation>,
    /// Value is computed from a relation and hidden from callers.
    pub is_derived: bool,
    pub is_return: bool,
    pub is_valid: bool,
    pub strategy: Option<MarshalShape>,
}

impl TargetParameter {
    pub const RETURN_NAME: &'static str = "__result";

    pub fn new(name: &str, native_type: TargetType) -> Self {
        Self {
            name: name.to_string(),
            native_name: name.to_string(),
            public_type: native_type.clone(),
            marshal_type: native_type.clone(),
            native_type,
            pointer_depth: 0,
            direction: ParamDirection::In,
            is_array: false,
            array: ArraySpecification::Undefined,
            is_bool_to_int: false,
            relations: Vec::new(),
            is_derived: false,
            is_return: false,
            is_valid: true,
            strategy: None,
        }
    }

    pub fn invalid(name: &str, native_type_name: &str) -> Self {
        let mut parameter = Self::new(name, TargetType::Unknown(native_type_name.to_string()));
        parameter.is_valid = false;
        parameter
    }

    pub fn with_direction(mut self, direction: ParamDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_array(mut self) -> Self {
        self.is_array = true;
        self
    }
}

impl fmt::Display for TargetParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            ParamDirection::In => "",
            ParamDirection::Out => "out ",
            ParamDirection::Ref => "ref ",
            ParamDirection::RefIn => "in ",
        };
        let array = if self.is_array { "[]" } else { "" };
        write!(f, "{}{}{} {}", direction, self.public_type, array, self.name)
    }
}

/// Parameters and return value of a method or free function.
#[derive(Debug, Clone, Serialize)]
pub struct CallableSignature {
    pub parameters: Vec<TargetParameter>,
    pub return_value: Option<TargetParameter>,
    pub is_valid: bool,
}

impl Default for CallableSignature {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
            return_value: None,
            is_valid: true,
        }
    }
}

impl CallableSignature {
    pub fn with_parameter(mut self, parameter: TargetParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, target: TargetType) -> Self {
        let mut result = TargetParameter::new(TargetParameter::RETURN_NAME, target);
        result.direction = ParamDirection::Out;
        result.is_return = true;
        self.return_value = Some(result);
        self
    }

    /// Parameters visible to managed callers.
    pub fn public_parameters(&self) -> impl Iterator<Item = &TargetParameter> {
        self.parameters.iter().filter(|p| !p.is_derived)
    }

    pub fn parameter(&self, name: &str) -> Option<&TargetParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_return(&self) -> bool {
        self.return_value.is_some()
    }

    pub fn return_type(&self) -> Option<&TargetType> {
        self.return_value.as_ref().map(|r| &r.public_type)
    }

    pub fn returns_status(&self, status_code_type: &str) -> bool {
        self.return_type().map(|t| t.qualified_name() == status_code_type).unwrap_or(false)
    }

    pub fn all_valid(&self) -> bool {
        self.is_valid && self.parameters.iter().all(|p| p.is_valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Declared,
    /// Added overload taking the interface-array wrapper type.
    InterfaceArrayOverload,
    /// Private raw-pointer variant kept next to an added overload.
    RawOverload,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetMethod {
    pub name: String,
    pub native_name: String,
    pub kind: MethodKind,
    pub signature: CallableSignature,
    pub visibility: Visibility,
    /// Slot index on non-Windows platforms.
    pub offset: i32,
    pub windows_offset: i32,
    pub vtable_offset: Option<VtableOffset>,
    pub allow_property: Option<bool>,
    pub is_persistent: bool,
    pub hidden: bool,
    pub keep_implement_public: bool,
    pub request_raw_ptr: bool,
    pub check_return: bool,
    pub plan: Option<CallablePlan>,
}

impl TargetMethod {
    pub fn new(name: &str, signature: CallableSignature) -> Self {
        Self {
            name: name.to_string(),
            native_name: name.to_string(),
            kind: MethodKind::Declared,
            signature,
            visibility: Visibility::Public,
            offset: 0,
            windows_offset: 0,
            vtable_offset: None,
            allow_property: None,
            is_persistent: false,
            hidden: false,
            keep_implement_public: false,
            request_raw_ptr: false,
            check_return: true,
            plan: None,
        }
    }

    pub fn is_declared(&self) -> bool {
        self.kind == MethodKind::Declared
    }
}

impl fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let return_type = self
            .signature
            .return_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "void".to_string());
        write!(f, "{} {}(", return_type, self.name)?;
        for (i, parameter) in self.signature.public_parameters().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, ")")?;
        if let Some(offset) = &self.vtable_offset {
            write!(f, " @ {}", offset)?;
        }
        Ok(())
    }
}

/// A free function exported by the native library.
#[derive(Debug, Clone, Serialize)]
pub struct TargetFunction {
    pub name: String,
    pub symbol: String,
    pub signature: CallableSignature,
    pub visibility: Visibility,
    pub check_return: bool,
    pub plan: Option<CallablePlan>,
}

impl TargetFunction {
    pub fn new(name: &str, symbol: &str, signature: CallableSignature) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            signature,
            visibility: Visibility::Public,
            check_return: true,
            plan: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PrimitiveType;

    #[test]
    fn test_derived_parameters_are_hidden() {
        let mut count = TargetParameter::new("count", TargetType::Fundamental(PrimitiveType::U32));
        count.is_derived = true;
        let signature = CallableSignature::default()
            .with_parameter(TargetParameter::new("data", TargetType::Fundamental(PrimitiveType::U8)).with_array())
            .with_parameter(count);

        let visible: Vec<&str> = signature.public_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(visible, vec!["data"]);
    }

    #[test]
    fn test_returns_status() {
        let status = TargetType::Enum { name: "Result".to_string(), underlying: PrimitiveType::I32 };
        let signature = CallableSignature::default().returning(status);
        assert!(signature.returns_status("Result"));
        assert!(!CallableSignature::default().returns_status("Result"));
    }
}
