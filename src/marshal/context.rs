// Mon Oct 12 2026 - Alex

use crate::binding::TargetType;
use crate::marshal::statement::Place;
use crate::marshal::Marshallable;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshalScope {
    /// Copying between a managed aggregate and its native shadow.
    Struct,
    /// Converting arguments around a single native call.
    Callable,
}

/// What a marshaller needs to know about its surroundings.
#[derive(Debug, Clone, Copy)]
pub struct MarshalContext<'a> {
    pub scope: MarshalScope,
    shadowed: &'a HashSet<String>,
}

impl<'a> MarshalContext<'a> {
    pub fn new(scope: MarshalScope, shadowed: &'a HashSet<String>) -> Self {
        Self { scope, shadowed }
    }

    pub fn for_struct(shadowed: &'a HashSet<String>) -> Self {
        Self::new(MarshalScope::Struct, shadowed)
    }

    pub fn for_callable(shadowed: &'a HashSet<String>) -> Self {
        Self::new(MarshalScope::Callable, shadowed)
    }

    pub fn is_callable(&self) -> bool {
        self.scope == MarshalScope::Callable
    }

    pub fn managed(&self, name: &str) -> Place {
        Place::Managed(name.to_string())
    }

    /// Native-side counterpart of an element: a shadow member or a call local.
    pub fn native(&self, name: &str) -> Place {
        match self.scope {
            MarshalScope::Struct => Place::Native(name.to_string()),
            MarshalScope::Callable => Place::Local(local_name(name)),
        }
    }

    pub fn has_native_shadow(&self, target: &TargetType) -> bool {
        match target {
            TargetType::Struct(name) => self.shadowed.contains(name),
            _ => false,
        }
    }

    /// Type name used for the native representation of one element.
    pub fn native_type_name(&self, target: &TargetType) -> String {
        match target {
            TargetType::Struct(name) if self.shadowed.contains(name) => native_struct_name(name),
            TargetType::Interface(_) | TargetType::Callback(_) => "isize".to_string(),
            other => other.qualified_name(),
        }
    }

    pub fn element_native_type(&self, subject: &dyn Marshallable) -> String {
        if subject.is_interface() {
            "isize".to_string()
        } else if subject.is_bool_to_int() {
            subject.marshal_type().qualified_name()
        } else {
            self.native_type_name(subject.marshal_type())
        }
    }
}

/// Name of the native-side local a callable plan introduces for an element.
pub fn local_name(element: &str) -> String {
    format!("{}_", element)
}

pub fn native_struct_name(aggregate: &str) -> String {
    format!("{}::Native", aggregate)
}
