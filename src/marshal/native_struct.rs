// Mon Oct 12 2026 - Alex

//! Native shadow structs: the blittable twin of an aggregate whose managed
//! representation differs from its native one, plus the three struct-level
//! marshal methods that copy between them.

use crate::binding::{ArraySpecification, Relation};
use crate::marshal::context::{native_struct_name, MarshalContext};
use crate::marshal::statement::{MarshalStatement, Place, StructMarshalMethod, Value};
use crate::marshal::{MarshalShape, MarshallerRegistry};
use crate::structure::{AggregateTable, Offset, TargetAggregate, TargetField};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub const BASE_MEMBER: &str = "Base";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeMember {
    pub name: String,
    pub type_name: String,
    /// Only set for explicit layouts.
    pub offset: Option<Offset>,
}

impl fmt::Display for NativeMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "[{}] {} {}", offset, self.type_name, self.name),
            None => write!(f, "{} {}", self.type_name, self.name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NativeStructPlan {
    pub name: String,
    pub explicit_layout: bool,
    pub has_base: bool,
    pub members: Vec<NativeMember>,
    pub marshal_to: Vec<MarshalStatement>,
    pub marshal_from: Vec<MarshalStatement>,
    pub marshal_free: Vec<MarshalStatement>,
    /// Members with no native-to-managed conversion.
    pub skipped_from_native: Vec<String>,
}

impl NativeStructPlan {
    pub fn member(&self, name: &str) -> Option<&NativeMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn statements(&self, method: StructMarshalMethod) -> &[MarshalStatement] {
        match method {
            StructMarshalMethod::To => &self.marshal_to,
            StructMarshalMethod::From => &self.marshal_from,
            StructMarshalMethod::Free => &self.marshal_free,
        }
    }
}

impl fmt::Display for NativeStructPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "struct {} {{", self.name)?;
        for member in &self.members {
            writeln!(f, "    {};", member)?;
        }
        writeln!(f, "}}")?;
        for method in [StructMarshalMethod::To, StructMarshalMethod::From, StructMarshalMethod::Free] {
            writeln!(f, "{}:", method)?;
            for statement in self.statements(method) {
                write!(f, "{}", statement)?;
            }
        }
        Ok(())
    }
}

/// Builds shadow declarations and marshal methods from a laid-out aggregate
/// whose fields already carry their strategies.
pub struct NativeStructPlanner<'a> {
    registry: &'a MarshallerRegistry,
    table: &'a AggregateTable,
}

impl<'a> NativeStructPlanner<'a> {
    pub fn new(registry: &'a MarshallerRegistry, table: &'a AggregateTable) -> Self {
        Self { registry, table }
    }

    pub fn plan(&self, aggregate: &TargetAggregate, ctx: &MarshalContext) -> NativeStructPlan {
        let has_base = aggregate.base.is_some();
        let mut plan = NativeStructPlan {
            name: native_struct_name(aggregate.name()),
            explicit_layout: aggregate.explicit_layout,
            has_base,
            ..Default::default()
        };

        if let Some(base) = aggregate.base {
            let base = self.table.get(base);
            let type_name = if base.needs_native_shadow {
                native_struct_name(base.name())
            } else {
                base.name().to_string()
            };
            plan.members.push(NativeMember {
                name: BASE_MEMBER.to_string(),
                type_name,
                offset: aggregate.explicit_layout.then(Offset::zero),
            });
            plan.marshal_to.push(MarshalStatement::BaseMarshal(StructMarshalMethod::To));
            plan.marshal_from.push(MarshalStatement::BaseMarshal(StructMarshalMethod::From));
            plan.marshal_free.push(MarshalStatement::BaseMarshal(StructMarshalMethod::Free));
        }

        self.declare_members(aggregate, ctx, &mut plan);

        let callback_targets: HashSet<&str> = aggregate
            .fields()
            .iter()
            .filter_map(|f| f.callback.as_ref().map(|c| c.reference_name.as_str()))
            .collect();

        for field in aggregate.fields().iter().filter(|f| f.is_valid) {
            let Some(shape) = field.strategy else {
                continue;
            };
            let marshaller = self.registry.marshaller_for(shape);

            if !callback_targets.contains(field.name.as_str()) {
                match self.relation_assignment(field, &plan.name, ctx) {
                    Some(RelationWrite::Assign(statement)) => plan.marshal_to.push(statement),
                    Some(RelationWrite::ByArray) => {}
                    None => plan.marshal_to.extend(marshaller.to_native(field, ctx)),
                }
            }

            if shape == MarshalShape::Callback {
                plan.skipped_from_native.push(field.name.clone());
            } else {
                plan.marshal_from.extend(marshaller.to_managed(field, ctx));
            }

            plan.marshal_free.extend(marshaller.cleanup(field, ctx));
        }

        log::debug!(
            "Planned {} with {} members ({} skipped from native)",
            plan.name,
            plan.members.len(),
            plan.skipped_from_native.len()
        );
        plan
    }

    fn declare_members(&self, aggregate: &TargetAggregate, ctx: &MarshalContext, plan: &mut NativeStructPlan) {
        let offset_of = |offset: Offset| aggregate.explicit_layout.then_some(offset);
        let mut storages: HashSet<&str> = HashSet::new();

        for field in aggregate.fields().iter().filter(|f| f.is_valid) {
            if let Some(storage) = &field.storage {
                if storages.insert(storage.as_str()) {
                    plan.members.push(NativeMember {
                        name: storage.clone(),
                        type_name: ctx.element_native_type(field),
                        offset: offset_of(field.offset),
                    });
                }
                continue;
            }

            let element = ctx.element_native_type(field);
            match &field.array {
                ArraySpecification::Constant(dimension) if field.is_array && !field.is_pointer_slot() => {
                    let count = (*dimension).max(1) as usize;
                    let stride = field.size.as_usize() / count;
                    for index in 0..count {
                        let name = if index == 0 {
                            field.name.clone()
                        } else {
                            format!("__{}{}", field.name, index)
                        };
                        plan.members.push(NativeMember {
                            name,
                            type_name: element.clone(),
                            offset: offset_of(field.offset.advance((index * stride) as u64)),
                        });
                    }
                }
                ArraySpecification::Dynamic { .. } => plan.members.push(NativeMember {
                    name: field.name.clone(),
                    type_name: format!("{}*", element),
                    offset: offset_of(field.offset),
                }),
                _ => {
                    let type_name = if field.callback.is_some() {
                        "isize".to_string()
                    } else if field.is_optional_pointer {
                        format!("{}*", element)
                    } else {
                        element
                    };
                    plan.members.push(NativeMember {
                        name: field.name.clone(),
                        type_name,
                        offset: offset_of(field.offset),
                    });
                }
            }
        }
    }

    fn relation_assignment(&self, field: &TargetField, shadow: &str, ctx: &MarshalContext) -> Option<RelationWrite> {
        let type_name = ctx.element_native_type(field);
        field.relations.iter().find_map(|relation| match relation {
            Relation::Length(_) => Some(RelationWrite::ByArray),
            Relation::ConstantValue(value) => Some(RelationWrite::Assign(MarshalStatement::assign(
                Place::Native(field.name.clone()),
                Value::cast(&type_name, Value::Constant(value.clone())),
            ))),
            Relation::StructSize => Some(RelationWrite::Assign(MarshalStatement::assign(
                Place::Native(field.name.clone()),
                Value::cast(&type_name, Value::SizeOf(shadow.to_string())),
            ))),
        })
    }
}

enum RelationWrite {
    Assign(MarshalStatement),
    /// Written by the array marshaller of the related field.
    ByArray,
}
