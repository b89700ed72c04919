// Mon Oct 12 2026 - Alex

use crate::binding::type_info::{PrimitiveType, TargetType};
use crate::model::DeclarationTree;
use indexmap::IndexMap;

const FUNDAMENTALS: &[(&str, PrimitiveType)] = &[
    ("void", PrimitiveType::Void),
    ("bool", PrimitiveType::Bool),
    ("char", PrimitiveType::Char),
    ("signed char", PrimitiveType::I8),
    ("unsigned char", PrimitiveType::U8),
    ("wchar_t", PrimitiveType::WideChar),
    ("short", PrimitiveType::I16),
    ("unsigned short", PrimitiveType::U16),
    ("int", PrimitiveType::I32),
    ("unsigned int", PrimitiveType::U32),
    ("long", PrimitiveType::I32),
    ("unsigned long", PrimitiveType::U32),
    ("long long", PrimitiveType::I64),
    ("unsigned long long", PrimitiveType::U64),
    ("__int64", PrimitiveType::I64),
    ("float", PrimitiveType::F32),
    ("double", PrimitiveType::F64),
    ("int8_t", PrimitiveType::I8),
    ("uint8_t", PrimitiveType::U8),
    ("int16_t", PrimitiveType::I16),
    ("uint16_t", PrimitiveType::U16),
    ("int32_t", PrimitiveType::I32),
    ("uint32_t", PrimitiveType::U32),
    ("int64_t", PrimitiveType::I64),
    ("uint64_t", PrimitiveType::U64),
    ("size_t", PrimitiveType::UIntPtr),
    ("ptrdiff_t", PrimitiveType::IntPtr),
    ("intptr_t", PrimitiveType::IntPtr),
    ("uintptr_t", PrimitiveType::UIntPtr),
];

/// Native type name to managed type mapping.
///
/// Built once before resolution starts and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: IndexMap<String, TargetType>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fundamentals() -> Self {
        let mut table = Self::new();
        for (name, primitive) in FUNDAMENTALS {
            table.bind(name, TargetType::Fundamental(*primitive));
        }
        table
    }

    pub fn bind(&mut self, native_name: &str, target: TargetType) {
        self.bindings.insert(native_name.to_string(), target);
    }

    pub fn with_binding(mut self, native_name: &str, target: TargetType) -> Self {
        self.bind(native_name, target);
        self
    }

    /// Binds every declaration of the tree that has no explicit binding yet.
    pub fn bind_declarations(&mut self, tree: &DeclarationTree) {
        for aggregate in &tree.aggregates {
            self.bind_missing(&aggregate.name, TargetType::Struct(aggregate.name.clone()));
        }
        for interface in &tree.interfaces {
            self.bind_missing(&interface.name, TargetType::Interface(interface.name.clone()));
        }
        for source in &tree.enums {
            let underlying = self
                .lookup(&source.underlying)
                .and_then(|ty| ty.primitive())
                .unwrap_or(PrimitiveType::I32);
            self.bind_missing(
                &source.name,
                TargetType::Enum { name: source.name.clone(), underlying },
            );
        }
    }

    fn bind_missing(&mut self, native_name: &str, target: TargetType) {
        if !self.bindings.contains_key(native_name) {
            self.bind(native_name, target);
        }
    }

    pub fn lookup(&self, native_name: &str) -> Option<&TargetType> {
        self.bindings.get(native_name.trim())
    }

    pub fn contains(&self, native_name: &str) -> bool {
        self.bindings.contains_key(native_name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Integer of pointer width, the fallback for pointers to unbound types.
    pub fn pointer_sized_int() -> TargetType {
        TargetType::Fundamental(PrimitiveType::IntPtr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceAggregate, SourceEnum};

    #[test]
    fn test_fundamentals_are_bound() {
        let table = BindingTable::with_fundamentals();
        assert_eq!(table.lookup("int"), Some(&TargetType::Fundamental(PrimitiveType::I32)));
        assert_eq!(table.lookup("size_t"), Some(&TargetType::Fundamental(PrimitiveType::UIntPtr)));
        assert!(table.lookup("HRESULT").is_none());
    }

    #[test]
    fn test_declarations_do_not_override_explicit_bindings() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("POINT"))
            .with_enum(SourceEnum::new("FORMAT", "unsigned int"));
        let mut table = BindingTable::with_fundamentals()
            .with_binding("POINT", TargetType::Struct("Point".to_string()));
        table.bind_declarations(&tree);

        assert_eq!(table.lookup("POINT"), Some(&TargetType::Struct("Point".to_string())));
        assert_eq!(
            table.lookup("FORMAT"),
            Some(&TargetType::Enum { name: "FORMAT".to_string(), underlying: PrimitiveType::U32 })
        );
    }
}
