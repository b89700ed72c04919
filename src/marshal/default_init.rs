// Mon Oct 12 2026 - Alex

//! Default constructor of a managed aggregate: member initialisers built from
//! declared default values.

use crate::binding::{ArraySpecification, TargetType};
use crate::diagnostics::DiagnosticSink;
use crate::marshal::MarshalError;
use crate::model::Visibility;
use crate::structure::{AggregateTable, TargetAggregate, TargetField};
use serde::Serialize;
use std::fmt;

/// Value assumed when a member declares no default.
const IMPLICIT_DEFAULT: &str = "{}";

/// Defaults the zero-initialised aggregate already has.
const ZERO_DEFAULTS: [&str; 5] = ["nullptr", "0", "0.0", "0.0f", "false"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DefaultInit {
    /// `field = value`
    Value { field: String, value: String },
    /// `field = new T[n] value`
    FixedArray {
        field: String,
        element: String,
        dimension: u32,
        value: String,
    },
    /// `field = new()`
    Construct { field: String },
    /// Every element of a fixed array constructed in a loop.
    ConstructEach { field: String, dimension: u32 },
    /// `field = new() { member = value, ... }`
    Members { field: String, values: Vec<(String, String)> },
}

impl fmt::Display for DefaultInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { field, value } => write!(f, "{} = {};", field, value),
            Self::FixedArray {
                field,
                element,
                dimension,
                value,
            } => write!(f, "{} = new {}[{}] {};", field, element, dimension, value),
            Self::Construct { field } => write!(f, "{} = new();", field),
            Self::ConstructEach { field, dimension } => {
                write!(f, "for (i = 0; i < {}; i++) {}[i] = new();", dimension, field)
            }
            Self::Members { field, values } => {
                let members: Vec<String> = values.iter().map(|(name, value)| format!("{} = {}", name, value)).collect();
                write!(f, "{} = new() {{ {} }};", field, members.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefaultConstructorPlan {
    /// Value types reset every member before the initialisers run.
    pub reset_to_default: bool,
    pub initializers: Vec<DefaultInit>,
}

impl fmt::Display for DefaultConstructorPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reset_to_default {
            writeln!(f, "this = default;")?;
        }
        for init in &self.initializers {
            writeln!(f, "{}", init)?;
        }
        Ok(())
    }
}

pub struct DefaultConstructorPlanner<'a> {
    table: &'a AggregateTable,
}

impl<'a> DefaultConstructorPlanner<'a> {
    pub fn new(table: &'a AggregateTable) -> Self {
        Self { table }
    }

    /// `None` when a value type would get nothing beyond `this = default`,
    /// or when a member initialiser list does not fit its aggregate.
    pub fn plan(&self, aggregate: &TargetAggregate, sink: &mut DiagnosticSink) -> Option<DefaultConstructorPlan> {
        let mut plan = DefaultConstructorPlan {
            reset_to_default: !aggregate.generate_as_class,
            initializers: Vec::new(),
        };

        for field in aggregate.fields().iter().filter(|f| f.is_valid && f.visibility == Visibility::Public) {
            match self.initializer(field) {
                Ok(Some(init)) => plan.initializers.push(init),
                Ok(None) => {}
                Err(e) => {
                    sink.report(e.to_diagnostic(&format!("{}::{}", aggregate.name, field.name)));
                    return None;
                }
            }
        }

        if plan.reset_to_default && plan.initializers.is_empty() {
            return None;
        }
        Some(plan)
    }

    fn initializer(&self, field: &TargetField) -> Result<Option<DefaultInit>, MarshalError> {
        let mut value = field.default_value.clone().unwrap_or_else(|| IMPLICIT_DEFAULT.to_string());
        if matches!(field.public_type, TargetType::Fundamental(p) if p.is_float()) {
            value = value.replace(".F", ".0f");
        }
        if field.is_bool_to_int {
            value = value.to_lowercase();
        }

        if ZERO_DEFAULTS.contains(&value.as_str()) {
            return Ok(None);
        }
        if field.array.is_dynamic() || field.public_type.is_interface() || field.callback.is_some() {
            return Ok(None);
        }

        let dimension = match field.array {
            ArraySpecification::Constant(dimension) if field.is_array => Some(dimension),
            _ => None,
        };
        let field_name = field.name.clone();

        if matches!(field.public_type, TargetType::Fundamental(_) | TargetType::Enum { .. }) {
            if value == IMPLICIT_DEFAULT {
                return Ok(None);
            }
            return Ok(Some(match dimension {
                Some(dimension) => DefaultInit::FixedArray {
                    field: field_name,
                    element: field.public_type.qualified_name(),
                    dimension,
                    value,
                },
                None => DefaultInit::Value { field: field_name, value },
            }));
        }

        if value == IMPLICIT_DEFAULT {
            return Ok(Some(match dimension {
                Some(dimension) => DefaultInit::ConstructEach {
                    field: field_name,
                    dimension,
                },
                None => DefaultInit::Construct { field: field_name },
            }));
        }

        let nested = field.public_type.qualified_name();
        let members: Vec<String> = self
            .table
            .by_name(&nested)
            .map(|a| {
                a.fields()
                    .iter()
                    .filter(|f| f.visibility == Visibility::Public)
                    .map(|f| f.name.clone())
                    .collect()
            })
            .unwrap_or_default();
        let values: Vec<String> = value
            .trim_matches(|c| c == '{' || c == '}')
            .split(',')
            .map(|v| v.trim().to_string())
            .collect();

        if members.len() != values.len() {
            return Err(MarshalError::DefaultValueArity {
                element: field_name,
                value,
                aggregate: nested,
                given: values.len(),
                expected: members.len(),
            });
        }
        Ok(Some(DefaultInit::Members {
            field: field_name,
            values: members.into_iter().zip(values).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{CallbackDescriptor, PrimitiveType};
    use crate::diagnostics::DiagnosticCode;

    fn scalar(name: &str, primitive: PrimitiveType, default: Option<&str>) -> TargetField {
        let mut field = TargetField::new(name, TargetType::Fundamental(primitive));
        field.default_value = default.map(str::to_string);
        field
    }

    fn plan(aggregate: &TargetAggregate, table: &AggregateTable) -> (Option<DefaultConstructorPlan>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let plan = DefaultConstructorPlanner::new(table).plan(aggregate, &mut sink);
        (plan, sink)
    }

    #[test]
    fn test_zero_defaults_need_no_constructor() {
        let mut aggregate = TargetAggregate::new("Plain");
        aggregate.add_field(scalar("a", PrimitiveType::I32, None));
        aggregate.add_field(scalar("b", PrimitiveType::I32, Some("0")));
        aggregate.add_field(scalar("c", PrimitiveType::F32, Some("0.0f")));

        let (plan, sink) = plan(&aggregate, &AggregateTable::new());
        assert!(plan.is_none());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_scalar_and_fixed_array_defaults() {
        let mut aggregate = TargetAggregate::new("Settings");
        aggregate.add_field(scalar("scale", PrimitiveType::F32, Some("1.F")));
        let mut enabled = scalar("enabled", PrimitiveType::Bool, Some("TRUE"));
        enabled.is_bool_to_int = true;
        aggregate.add_field(enabled);
        let mut weights = scalar("weights", PrimitiveType::I32, Some("{ 1, 2, 3 }"));
        weights.is_array = true;
        weights.array = ArraySpecification::Constant(3);
        aggregate.add_field(weights);

        let (plan, _) = plan(&aggregate, &AggregateTable::new());
        let plan = plan.unwrap();
        assert!(plan.reset_to_default);
        assert_eq!(
            plan.to_string(),
            "this = default;\nscale = 1.0f;\nenabled = true;\nweights = new i32[3] { 1, 2, 3 };\n"
        );
    }

    #[test]
    fn test_references_and_dynamic_arrays_skipped() {
        let mut aggregate = TargetAggregate::new("Holder");
        aggregate.generate_as_class = true;
        let mut item = TargetField::new("item", TargetType::Interface("IItem".to_string()));
        item.default_value = Some("make()".to_string());
        aggregate.add_field(item);
        let mut data = scalar("data", PrimitiveType::U8, Some("{ 1 }"));
        data.is_array = true;
        data.array = ArraySpecification::Dynamic {
            size_identifier: "count".to_string(),
            size_type: "u32".to_string(),
        };
        aggregate.add_field(data);
        let mut handler = TargetField::new("on_event", TargetType::Callback("EventFn".to_string()));
        handler.callback = Some(CallbackDescriptor {
            identifier_type: "EventFn".to_string(),
            reference_name: "on_event_ref".to_string(),
        });
        handler.default_value = Some("handler".to_string());
        aggregate.add_field(handler);

        let (plan, _) = plan(&aggregate, &AggregateTable::new());
        let plan = plan.unwrap();
        assert!(!plan.reset_to_default);
        assert!(plan.initializers.is_empty());
    }

    #[test]
    fn test_nested_aggregates_constructed() {
        let mut point = TargetAggregate::new("Point");
        point.add_field(scalar("x", PrimitiveType::I32, None));
        point.add_field(scalar("y", PrimitiveType::I32, None));
        let mut table = AggregateTable::new();
        table.insert(point);

        let mut shape = TargetAggregate::new("Shape");
        let mut origin = TargetField::new("origin", TargetType::Struct("Point".to_string()));
        origin.default_value = Some("{1, 2}".to_string());
        shape.add_field(origin);
        shape.add_field(TargetField::new("extent", TargetType::Struct("Point".to_string())));
        let mut corners = TargetField::new("corners", TargetType::Struct("Point".to_string()));
        corners.is_array = true;
        corners.array = ArraySpecification::Constant(4);
        shape.add_field(corners);

        let (plan, _) = plan(&shape, &table);
        let initializers = plan.unwrap().initializers;
        assert_eq!(initializers[0].to_string(), "origin = new() { x = 1, y = 2 };");
        assert_eq!(initializers[1], DefaultInit::Construct { field: "extent".to_string() });
        assert_eq!(
            initializers[2],
            DefaultInit::ConstructEach {
                field: "corners".to_string(),
                dimension: 4
            }
        );
    }

    #[test]
    fn test_member_count_mismatch_reported() {
        let mut point = TargetAggregate::new("Point");
        point.add_field(scalar("x", PrimitiveType::I32, None));
        point.add_field(scalar("y", PrimitiveType::I32, None));
        let mut table = AggregateTable::new();
        table.insert(point);

        let mut shape = TargetAggregate::new("Shape");
        let mut origin = TargetField::new("origin", TargetType::Struct("Point".to_string()));
        origin.default_value = Some("{1, 2, 3}".to_string());
        shape.add_field(origin);

        let (plan, sink) = plan(&shape, &table);
        assert!(plan.is_none());
        assert_eq!(sink.count_of(DiagnosticCode::InvalidDefaultValue), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn test_hidden_members_not_initialised() {
        let mut aggregate = TargetAggregate::new("Counted");
        let mut count = scalar("count", PrimitiveType::U32, Some("4"));
        count.visibility = Visibility::Internal;
        aggregate.add_field(count);
        assert!(plan(&aggregate, &AggregateTable::new()).0.is_none());
    }
}
