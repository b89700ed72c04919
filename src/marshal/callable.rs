// Mon Oct 12 2026 - Alex

use crate::binding::Relation;
use crate::diagnostics::DiagnosticSink;
use crate::interface::{CallableSignature, TargetParameter};
use crate::marshal::context::{local_name, MarshalContext};
use crate::marshal::error::MarshalError;
use crate::marshal::statement::{render, CallTarget, MarshalStatement, Place, Value};
use crate::marshal::{MarshalShape, MarshallerRegistry};
use serde::Serialize;
use std::fmt;

/// Statements wrapping one native call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallablePlan {
    pub statements: Vec<MarshalStatement>,
    pub is_valid: bool,
}

impl CallablePlan {
    pub fn invalid() -> Self {
        Self {
            statements: Vec::new(),
            is_valid: false,
        }
    }

    pub fn call(&self) -> Option<&MarshalStatement> {
        let mut found = None;
        for statement in &self.statements {
            statement.walk(&mut |s| {
                if found.is_none() && matches!(s, MarshalStatement::Call { .. }) {
                    found = Some(s);
                }
            });
        }
        found
    }
}

impl fmt::Display for CallablePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.statements))
    }
}

pub struct CallablePlanner<'a> {
    registry: &'a MarshallerRegistry,
    status_code_type: String,
}

impl<'a> CallablePlanner<'a> {
    pub fn new(registry: &'a MarshallerRegistry, status_code_type: &str) -> Self {
        Self {
            registry,
            status_code_type: status_code_type.to_string(),
        }
    }

    /// Assigns parameter strategies and lays out the call sequence.
    ///
    /// Derived parameters are computed from their relation before any
    /// conversion runs, and every pin scope encloses the call itself.
    pub fn plan(
        &self,
        signature: &mut CallableSignature,
        target: CallTarget,
        check_return: bool,
        location: &str,
        ctx: &MarshalContext,
        sink: &mut DiagnosticSink,
    ) -> CallablePlan {
        if !signature.all_valid() {
            log::debug!("Skipping call plan for {}: signature has unresolved parts", location);
            return CallablePlan::invalid();
        }

        for parameter in signature.parameters.iter_mut() {
            self.registry.assign_parameter(parameter, ctx);
        }
        let return_shape = signature
            .return_value
            .as_mut()
            .and_then(|result| self.registry.assign_parameter(result, ctx));

        let mut plan = CallablePlan {
            statements: Vec::new(),
            is_valid: true,
        };

        if let Some(result) = &signature.return_value {
            plan.statements.push(MarshalStatement::declare(
                &result.name,
                &result.public_type.qualified_name(),
                None,
            ));
            if let Some(shape) = return_shape.filter(|s| *s != MarshalShape::PassThrough) {
                plan.statements.extend(self.registry.marshaller_for(shape).prolog(result, ctx));
            }
        }

        for parameter in &signature.parameters {
            if let Some(shape) = parameter.strategy {
                plan.statements.extend(self.registry.marshaller_for(shape).prolog(parameter, ctx));
            }
        }

        for parameter in signature.parameters.iter().filter(|p| !p.relations.is_empty()) {
            match self.relation_statement(parameter, signature) {
                Ok(statement) => plan.statements.push(statement),
                Err(error) => {
                    sink.report(error.to_diagnostic(location));
                    plan.is_valid = false;
                }
            }
        }

        for parameter in signature.parameters.iter().filter(|p| p.direction.flows_in()) {
            if let Some(shape) = parameter.strategy {
                plan.statements.extend(self.registry.marshaller_for(shape).to_native(parameter, ctx));
            }
        }

        plan.statements.extend(self.pinned_call(signature, target, return_shape, ctx));

        for parameter in signature.parameters.iter().filter(|p| p.direction.flows_out()) {
            if let Some(shape) = parameter.strategy {
                plan.statements.extend(self.registry.marshaller_for(shape).to_managed(parameter, ctx));
            }
        }
        if let (Some(result), Some(shape)) = (&signature.return_value, return_shape) {
            if shape != MarshalShape::PassThrough {
                plan.statements.extend(self.registry.marshaller_for(shape).to_managed(result, ctx));
            }
        }

        for parameter in signature.parameters.iter().filter(|p| p.direction.flows_in()) {
            if let Some(shape) = parameter.strategy {
                plan.statements.extend(self.registry.marshaller_for(shape).cleanup(parameter, ctx));
            }
        }

        let result = Place::Managed(TargetParameter::RETURN_NAME.to_string());
        if check_return && signature.returns_status(&self.status_code_type) {
            plan.statements.push(MarshalStatement::CheckError(result.clone()));
        }
        if signature.has_return() {
            plan.statements.push(MarshalStatement::Return(result.read()));
        }

        plan
    }

    fn relation_statement(
        &self,
        parameter: &TargetParameter,
        signature: &CallableSignature,
    ) -> Result<MarshalStatement, MarshalError> {
        let type_name = parameter.public_type.qualified_name();
        let mut value = None;
        for relation in &parameter.relations {
            match relation {
                Relation::Length(target) => {
                    let source = signature.parameter(target).filter(|p| p.is_array).ok_or_else(|| {
                        MarshalError::MissingLengthSource {
                            element: parameter.name.clone(),
                            target: target.clone(),
                        }
                    })?;
                    if value.is_none() {
                        value = Some(Value::LengthOf(Place::Managed(source.name.clone())));
                    }
                }
                Relation::ConstantValue(constant) => {
                    if value.is_none() {
                        value = Some(Value::Constant(constant.clone()));
                    }
                }
                Relation::StructSize => {
                    return Err(MarshalError::RelationNotAllowed {
                        element: parameter.name.clone(),
                        relation: relation.to_string(),
                    })
                }
            }
        }
        Ok(MarshalStatement::declare(
            &parameter.name,
            &type_name,
            value.map(|v| Value::cast(&type_name, v)),
        ))
    }

    fn pinned_call(
        &self,
        signature: &CallableSignature,
        target: CallTarget,
        return_shape: Option<MarshalShape>,
        ctx: &MarshalContext,
    ) -> Vec<MarshalStatement> {
        let mut arguments = Vec::with_capacity(signature.parameters.len());
        let mut pins = Vec::new();
        for parameter in &signature.parameters {
            let shape = parameter.strategy.unwrap_or(MarshalShape::PassThrough);
            let marshaller = self.registry.marshaller_for(shape);
            arguments.push(marshaller.argument(parameter, ctx));
            if let Some(pin) = marshaller.pin(parameter, ctx) {
                pins.push(pin);
            }
        }

        let result = return_shape.map(|shape| match shape {
            MarshalShape::PassThrough => Place::Managed(TargetParameter::RETURN_NAME.to_string()),
            _ => Place::Local(local_name(TargetParameter::RETURN_NAME)),
        });

        let mut body = vec![MarshalStatement::Call {
            target,
            arguments,
            result,
        }];
        for pin in pins.into_iter().rev() {
            body = vec![MarshalStatement::Pinned { pin, body }];
        }
        body
    }
}
