// Mon Oct 12 2026 - Alex

use crate::binding::{ArraySpecification, PrimitiveType, Relation, TargetType};
use crate::interface::{MethodKind, TargetMethod, TargetParameter};
use crate::model::{ParamDirection, Visibility};

fn is_input_interface_array(parameter: &TargetParameter) -> bool {
    parameter.is_array && parameter.public_type.is_interface() && parameter.direction == ParamDirection::In
}

pub fn interface_array_wrapper(array_type: &str, interface: &str) -> String {
    format!("{}<{}>", array_type, interface)
}

/// Extra overloads a declared method needs.
///
/// An input interface-array parameter yields a public overload taking the
/// wrapper type. Such methods, and those requesting it, also get a private
/// raw overload where arrays, interfaces and pointers are plain pointer-sized
/// inputs. All overloads share the declared method's vtable slot.
pub fn special_overloads(method: &TargetMethod, interface_array_type: &str) -> Vec<TargetMethod> {
    let has_interface_array = method.signature.parameters.iter().any(is_input_interface_array);
    let mut overloads = Vec::new();

    if has_interface_array {
        let mut overload = clone_overload(method, MethodKind::InterfaceArrayOverload);
        for parameter in overload.signature.parameters.iter_mut().filter(|p| is_input_interface_array(p)) {
            let wrapper = interface_array_wrapper(interface_array_type, &parameter.public_type.qualified_name());
            parameter.public_type = TargetType::Struct(wrapper);
            parameter.is_array = false;
            parameter.array = ArraySpecification::Undefined;
        }
        drop_stale_lengths(&mut overload);
        overloads.push(overload);
    }

    if has_interface_array || method.request_raw_ptr {
        let mut raw = clone_overload(method, MethodKind::RawOverload);
        raw.visibility = Visibility::Private;
        let pointer = TargetType::Fundamental(PrimitiveType::IntPtr);
        for parameter in raw.signature.parameters.iter_mut() {
            if parameter.is_array || parameter.public_type.is_interface() || parameter.pointer_depth > 0 {
                parameter.public_type = pointer.clone();
                parameter.marshal_type = pointer.clone();
                parameter.is_array = false;
                parameter.array = ArraySpecification::Undefined;
                parameter.is_bool_to_int = false;
                parameter.direction = ParamDirection::In;
            }
        }
        drop_stale_lengths(&mut raw);
        overloads.push(raw);
    }

    overloads
}

/// Counts of parameters that stopped being arrays become ordinary inputs.
fn drop_stale_lengths(method: &mut TargetMethod) {
    let arrays: Vec<String> = method
        .signature
        .parameters
        .iter()
        .filter(|p| p.is_array)
        .map(|p| p.name.clone())
        .collect();
    for parameter in method.signature.parameters.iter_mut() {
        parameter
            .relations
            .retain(|r| !matches!(r, Relation::Length(target) if !arrays.contains(target)));
        parameter.is_derived = !parameter.relations.is_empty();
    }
}

fn clone_overload(method: &TargetMethod, kind: MethodKind) -> TargetMethod {
    let mut clone = method.clone();
    clone.kind = kind;
    clone.plan = None;
    for parameter in clone.signature.parameters.iter_mut() {
        parameter.strategy = None;
    }
    if let Some(result) = clone.signature.return_value.as_mut() {
        result.strategy = None;
    }
    clone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::CallableSignature;

    fn set_targets() -> TargetMethod {
        let targets = TargetParameter::new("targets", TargetType::Interface("IView".to_string())).with_array();
        let mut count = TargetParameter::new("count", TargetType::Fundamental(PrimitiveType::U32));
        count.relations.push(Relation::Length("targets".to_string()));
        count.is_derived = true;
        TargetMethod::new(
            "SetTargets",
            CallableSignature::default().with_parameter(count).with_parameter(targets),
        )
    }

    #[test]
    fn test_interface_array_gets_two_overloads() {
        let overloads = special_overloads(&set_targets(), "InterfaceArray");
        assert_eq!(overloads.len(), 2);

        let wrapper = &overloads[0];
        assert_eq!(wrapper.kind, MethodKind::InterfaceArrayOverload);
        assert_eq!(
            wrapper.signature.parameters[1].public_type,
            TargetType::Struct("InterfaceArray<IView>".to_string())
        );

        let raw = &overloads[1];
        assert_eq!(raw.kind, MethodKind::RawOverload);
        assert_eq!(raw.visibility, Visibility::Private);
        assert_eq!(raw.signature.parameters[1].public_type, TargetType::Fundamental(PrimitiveType::IntPtr));
        assert!(!raw.signature.parameters[1].is_array);
        assert_eq!(raw.signature.parameters[0].public_type, TargetType::Fundamental(PrimitiveType::U32));
        assert!(raw.signature.parameters[0].relations.is_empty());
        assert!(!raw.signature.parameters[0].is_derived);
    }

    #[test]
    fn test_raw_pointer_request_only() {
        let mut method = TargetMethod::new(
            "Map",
            CallableSignature::default()
                .with_parameter(TargetParameter::new("data", TargetType::Fundamental(PrimitiveType::U8)).with_array()),
        );
        method.request_raw_ptr = true;
        let overloads = special_overloads(&method, "InterfaceArray");
        assert_eq!(overloads.len(), 1);
        assert_eq!(overloads[0].kind, MethodKind::RawOverload);
    }

    #[test]
    fn test_plain_method_has_no_overloads() {
        let method = TargetMethod::new("Flush", CallableSignature::default());
        assert!(special_overloads(&method, "InterfaceArray").is_empty());
    }
}
