// Mon Oct 12 2026 - Alex

use crate::binding::TargetType;
use crate::diagnostics::DiagnosticSink;
use crate::interface::{InterfaceError, TargetMethod};
use crate::model::{ParamDirection, Visibility};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A getter/setter pair exposed as one managed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetProperty {
    pub name: String,
    pub public_type: TargetType,
    pub getter: Option<String>,
    pub setter: Option<String>,
    /// Getter returns its value through an out parameter.
    pub is_property_param: bool,
    pub is_persistent: bool,
}

impl TargetProperty {
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

impl fmt::Display for TargetProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut accessors = Vec::new();
        if self.getter.is_some() {
            accessors.push("get;");
        }
        if self.setter.is_some() {
            accessors.push("set;");
        }
        write!(f, "{} {} {{ {} }}", self.public_type, self.name, accessors.join(" "))
    }
}

#[derive(Debug, Default)]
struct Candidate {
    getter: Option<usize>,
    setter: Option<usize>,
    public_type: Option<TargetType>,
    is_property_param: bool,
}

enum Role {
    Getter,
    Setter,
}

/// Merges `Get<Name>`/`Is<Name>` and `Set<Name>` methods into properties.
///
/// Candidates whose getter and setter disagree on the value type are dropped
/// and both methods stay plain methods.
pub struct PropertySynthesizer<'a> {
    status_code_type: &'a str,
    reserved_suffix: &'a str,
    strict: bool,
}

impl<'a> PropertySynthesizer<'a> {
    pub fn new(status_code_type: &'a str, reserved_suffix: &'a str) -> Self {
        Self {
            status_code_type,
            reserved_suffix,
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn synthesize(
        &self,
        interface: &str,
        methods: &mut [TargetMethod],
        sink: &mut DiagnosticSink,
    ) -> Vec<TargetProperty> {
        let mut candidates: IndexMap<String, Candidate> = IndexMap::new();
        let mut discarded: HashSet<String> = HashSet::new();

        for (index, method) in methods.iter().enumerate() {
            if !method.is_declared() {
                continue;
            }
            let Some((property_name, role)) = split_accessor(&method.name) else {
                continue;
            };
            if discarded.contains(&property_name) {
                continue;
            }

            let candidate = candidates.entry(property_name.clone()).or_default();
            let role_taken = match role {
                Role::Getter => candidate.getter.is_some(),
                Role::Setter => candidate.setter.is_some(),
            };
            if role_taken {
                log::debug!("Discarding property candidate {}::{}: duplicate accessor {}", interface, property_name, method.name);
                candidates.shift_remove(&property_name);
                discarded.insert(property_name);
                continue;
            }

            let accepted = match role {
                Role::Getter => self.accept_getter(method, candidate, index),
                Role::Setter => self.accept_setter(method, candidate, index),
            };
            if !accepted {
                let partial = candidate.getter.is_some() || candidate.setter.is_some();
                candidates.shift_remove(&property_name);
                if partial {
                    discarded.insert(property_name);
                }
                continue;
            }

            if let (Some(getter), Some(setter)) = (candidate.getter, candidate.setter) {
                let getter_type = getter_value_type(&methods[getter], candidate.is_property_param);
                let setter_type = setter_value_type(&methods[setter]);
                if getter_type.map(|t| t.qualified_name()) != setter_type.map(|t| t.qualified_name()) {
                    let error = InterfaceError::AmbiguousProperty {
                        property: format!("{}::{}", interface, property_name),
                        getter: getter_type.map(|t| t.to_string()).unwrap_or_default(),
                        setter: setter_type.map(|t| t.to_string()).unwrap_or_default(),
                    };
                    if self.strict {
                        sink.warning(error.code(), &format!("{}::{}", interface, property_name), error.to_string());
                    } else {
                        log::debug!("Discarding property candidate: {}", error);
                    }
                    candidates.shift_remove(&property_name);
                    discarded.insert(property_name);
                }
            }
        }

        let mut properties = Vec::new();
        for (name, candidate) in candidates {
            let Some(public_type) = candidate.public_type else {
                continue;
            };
            let disabled = [candidate.getter, candidate.setter]
                .into_iter()
                .flatten()
                .any(|index| methods[index].allow_property == Some(false));
            if disabled {
                log::debug!("Property {}::{} disabled by rule", interface, name);
                continue;
            }

            let mut property = TargetProperty {
                name: name.clone(),
                public_type,
                getter: None,
                setter: None,
                is_property_param: candidate.is_property_param,
                is_persistent: false,
            };
            if let Some(index) = candidate.getter {
                let getter = &mut methods[index];
                getter.visibility = Visibility::Internal;
                property.is_persistent = getter.is_persistent;
                if is_is_accessor(&getter.name) {
                    getter.name.push_str(self.reserved_suffix);
                }
                property.getter = Some(getter.name.clone());
            }
            if let Some(index) = candidate.setter {
                let setter = &mut methods[index];
                setter.visibility = Visibility::Internal;
                property.setter = Some(setter.name.clone());
            }
            properties.push(property);
        }
        properties
    }

    fn returns_nothing_or_status(&self, method: &TargetMethod) -> bool {
        !method.signature.has_return() || method.signature.returns_status(self.status_code_type)
    }

    fn accept_getter(&self, method: &TargetMethod, candidate: &mut Candidate, index: usize) -> bool {
        let parameters: Vec<_> = method.signature.public_parameters().collect();
        match parameters.as_slice() {
            [only] if self.returns_nothing_or_status(method) && only.direction == ParamDirection::Out && !only.is_array => {
                candidate.getter = Some(index);
                candidate.public_type = Some(only.public_type.clone());
                candidate.is_property_param = true;
                true
            }
            [] if method.signature.has_return() => {
                candidate.getter = Some(index);
                candidate.public_type = method.signature.return_type().cloned();
                true
            }
            _ => false,
        }
    }

    fn accept_setter(&self, method: &TargetMethod, candidate: &mut Candidate, index: usize) -> bool {
        let parameters: Vec<_> = method.signature.public_parameters().collect();
        match parameters.as_slice() {
            [only] if self.returns_nothing_or_status(method) && only.direction != ParamDirection::Out && !only.is_array => {
                candidate.setter = Some(index);
                candidate.public_type = Some(only.public_type.clone());
                true
            }
            _ => false,
        }
    }
}

fn split_accessor(method: &str) -> Option<(String, Role)> {
    let (name, role) = if is_is_accessor(method) {
        (method, Role::Getter)
    } else if let Some(rest) = method.strip_prefix("Get") {
        (rest, Role::Getter)
    } else if let Some(rest) = method.strip_prefix("Set") {
        (rest, Role::Setter)
    } else {
        return None;
    };
    if name.is_empty() {
        None
    } else {
        Some((name.to_string(), role))
    }
}

/// `IsEnabled` qualifies, `Issue` does not.
fn is_is_accessor(method: &str) -> bool {
    method
        .strip_prefix("Is")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn getter_value_type(getter: &TargetMethod, is_property_param: bool) -> Option<&TargetType> {
    if is_property_param {
        getter.signature.public_parameters().next().map(|p| &p.public_type)
    } else {
        getter.signature.return_type()
    }
}

fn setter_value_type(setter: &TargetMethod) -> Option<&TargetType> {
    setter.signature.public_parameters().next().map(|p| &p.public_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PrimitiveType;
    use crate::diagnostics::DiagnosticCode;
    use crate::interface::{CallableSignature, TargetParameter};

    fn int() -> TargetType {
        TargetType::Fundamental(PrimitiveType::I32)
    }

    fn float() -> TargetType {
        TargetType::Fundamental(PrimitiveType::F32)
    }

    fn getter(name: &str, ty: TargetType) -> TargetMethod {
        TargetMethod::new(name, CallableSignature::default().returning(ty))
    }

    fn setter(name: &str, ty: TargetType) -> TargetMethod {
        TargetMethod::new(name, CallableSignature::default().with_parameter(TargetParameter::new("value", ty)))
    }

    fn synthesize(methods: &mut [TargetMethod], strict: bool, sink: &mut DiagnosticSink) -> Vec<TargetProperty> {
        PropertySynthesizer::new("Result", "_")
            .with_strict(strict)
            .synthesize("IFoo", methods, sink)
    }

    #[test]
    fn test_matching_pair_becomes_property() {
        let mut methods = vec![getter("GetValue", int()), setter("SetValue", int())];
        let mut sink = DiagnosticSink::new();
        let properties = synthesize(&mut methods, false, &mut sink);

        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Value");
        assert_eq!(properties[0].public_type, int());
        assert_eq!(properties[0].getter.as_deref(), Some("GetValue"));
        assert_eq!(methods[0].visibility, Visibility::Internal);
        assert_eq!(methods[1].visibility, Visibility::Internal);
    }

    #[test]
    fn test_type_mismatch_discards_silently() {
        let mut methods = vec![getter("GetValue", int()), setter("SetValue", float())];
        let mut sink = DiagnosticSink::new();
        let properties = synthesize(&mut methods, false, &mut sink);

        assert!(properties.is_empty());
        assert_eq!(sink.count(), 0);
        assert!(methods.iter().all(|m| m.visibility == Visibility::Public));
    }

    #[test]
    fn test_type_mismatch_warns_when_strict() {
        let mut methods = vec![getter("GetValue", int()), setter("SetValue", float())];
        let mut sink = DiagnosticSink::new();
        assert!(synthesize(&mut methods, true, &mut sink).is_empty());
        assert_eq!(sink.count_of(DiagnosticCode::AmbiguousProperty), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_out_parameter_getter_with_status() {
        let status = TargetType::Enum {
            name: "Result".to_string(),
            underlying: PrimitiveType::I32,
        };
        let out = TargetParameter::new("desc", int()).with_direction(ParamDirection::Out);
        let mut methods = vec![TargetMethod::new(
            "GetDesc",
            CallableSignature::default().with_parameter(out).returning(status),
        )];
        let mut sink = DiagnosticSink::new();
        let properties = synthesize(&mut methods, false, &mut sink);
        assert_eq!(properties.len(), 1);
        assert!(properties[0].is_property_param);
        assert!(properties[0].is_read_only());
    }

    #[test]
    fn test_is_getter_gets_reserved_suffix() {
        let mut methods = vec![getter("IsEnabled", TargetType::Fundamental(PrimitiveType::Bool))];
        let mut sink = DiagnosticSink::new();
        let properties = synthesize(&mut methods, false, &mut sink);
        assert_eq!(properties[0].name, "IsEnabled");
        assert_eq!(methods[0].name, "IsEnabled_");
        assert_eq!(properties[0].getter.as_deref(), Some("IsEnabled_"));
    }

    #[test]
    fn test_disabled_property_is_skipped() {
        let mut methods = vec![getter("GetValue", int()), setter("SetValue", int())];
        methods[1].allow_property = Some(false);
        let mut sink = DiagnosticSink::new();
        assert!(synthesize(&mut methods, false, &mut sink).is_empty());
        assert_eq!(methods[0].visibility, Visibility::Public);
    }

    #[test]
    fn test_getter_with_arguments_is_not_a_property() {
        let mut methods = vec![TargetMethod::new(
            "GetItem",
            CallableSignature::default()
                .with_parameter(TargetParameter::new("index", int()))
                .returning(int()),
        )];
        let mut sink = DiagnosticSink::new();
        assert!(synthesize(&mut methods, false, &mut sink).is_empty());
    }

    #[test]
    fn test_duplicate_getter_discards_property() {
        let out = TargetParameter::new("value", float()).with_direction(ParamDirection::Out);
        let mut methods = vec![
            getter("GetValue", int()),
            TargetMethod::new("GetValue", CallableSignature::default().with_parameter(out)),
            setter("SetValue", int()),
        ];
        let mut sink = DiagnosticSink::new();
        assert!(synthesize(&mut methods, false, &mut sink).is_empty());
        assert!(methods.iter().all(|m| m.visibility == Visibility::Public));
    }

    #[test]
    fn test_duplicate_setter_discards_property() {
        let mut methods = vec![setter("SetValue", int()), setter("SetValue", float())];
        let mut sink = DiagnosticSink::new();
        assert!(synthesize(&mut methods, false, &mut sink).is_empty());
        assert!(methods.iter().all(|m| m.visibility == Visibility::Public));
    }

    #[test]
    fn test_is_prefix_needs_word_boundary() {
        let mut methods = vec![
            getter("Issue", int()),
            getter("GetIsolation", int()),
        ];
        let mut sink = DiagnosticSink::new();
        let properties = synthesize(&mut methods, false, &mut sink);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "Isolation");
        assert_eq!(methods[0].name, "Issue");
        assert_eq!(methods[0].visibility, Visibility::Public);
        assert_eq!(methods[1].name, "GetIsolation");
    }
}
