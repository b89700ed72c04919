// Mon Oct 12 2026 - Alex

use crate::marshal::context::MarshalContext;
use crate::marshal::marshallers::Marshaller;
use crate::marshal::statement::{MarshalStatement, Place, Value};
use crate::marshal::Marshallable;

/// A bit run inside a shared storage unit, optionally exposed as `bool`.
pub struct BitfieldMarshaller;

impl Marshaller for BitfieldMarshaller {
    fn to_native(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let Some(bits) = subject.bit_placement() else {
            return Vec::new();
        };
        let storage = Place::Native(bits.storage);
        let mut value = ctx.managed(subject.name()).read();
        if subject.is_bool_to_int() {
            value = Value::BoolToInt(Box::new(value));
        }
        vec![MarshalStatement::assign(
            storage.clone(),
            Value::Insert {
                storage: Box::new(storage.read()),
                value: Box::new(value),
                offset: bits.bit_offset,
                mask: bits.bit_mask,
            },
        )]
    }

    fn to_managed(&self, subject: &dyn Marshallable, ctx: &MarshalContext) -> Vec<MarshalStatement> {
        let Some(bits) = subject.bit_placement() else {
            return Vec::new();
        };
        let mut value = Value::Extract {
            storage: Box::new(Place::Native(bits.storage).read()),
            offset: bits.bit_offset,
            mask: bits.bit_mask,
        };
        if subject.is_bool_to_int() {
            value = Value::IntToBool(Box::new(value));
        }
        vec![MarshalStatement::assign(ctx.managed(subject.name()), value)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{PrimitiveType, TargetType};
    use crate::marshal::statement::render;
    use crate::structure::TargetField;
    use std::collections::HashSet;

    fn bits(name: &str, offset: u32, mask: u64) -> TargetField {
        let mut field = TargetField::new(name, TargetType::Fundamental(PrimitiveType::U32));
        field.storage = Some("_bitfield0".to_string());
        field.bit_offset = offset;
        field.bit_mask = mask;
        field
    }

    #[test]
    fn test_write_keeps_sibling_bits() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let field = bits("mode", 4, 0x7);

        assert_eq!(
            render(&BitfieldMarshaller.to_native(&field, &ctx)),
            "@ref._bitfield0 = ((@ref._bitfield0 & ~(0x7 << 4)) | ((mode & 0x7) << 4));\n"
        );
        assert_eq!(
            render(&BitfieldMarshaller.to_managed(&field, &ctx)),
            "mode = ((@ref._bitfield0 >> 4) & 0x7);\n"
        );
    }

    #[test]
    fn test_bool_bit_composes_conversion() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let mut field = bits("enabled", 0, 0x1);
        field.public_type = TargetType::Fundamental(PrimitiveType::Bool);
        field.is_bool_to_int = true;

        assert!(render(&BitfieldMarshaller.to_native(&field, &ctx)).contains("(((enabled ? 1 : 0) & 0x1) << 0)"));
        assert_eq!(
            render(&BitfieldMarshaller.to_managed(&field, &ctx)),
            "enabled = (((@ref._bitfield0 >> 0) & 0x1) != 0);\n"
        );
    }

    #[test]
    fn test_unplaced_bitfield_emits_nothing() {
        let shadowed = HashSet::new();
        let ctx = MarshalContext::for_struct(&shadowed);
        let mut field = bits("mode", 0, 0x1);
        field.storage = None;
        assert!(BitfieldMarshaller.to_native(&field, &ctx).is_empty());
        assert!(BitfieldMarshaller.to_managed(&field, &ctx).is_empty());
    }
}
