// Mon Oct 12 2026 - Alex

use crate::binding::callback::parse_callback;
use crate::binding::relation::{parse_relations, Relation};
use crate::binding::{ArraySpecification, BindingTable, PrimitiveType, ResolveError, TargetType};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use crate::interface::{CallableSignature, TargetParameter};
use crate::model::{
    DeclarationTree, Directives, ParamDirection, SourceAggregate, SourceField, SourceParameter, SourceReturn,
    Visibility,
};
use crate::structure::{Alignment, TargetAggregate, TargetField};

/// Binds native declarations to managed types and attaches relation metadata.
///
/// Reads the binding table and directives only; every output element is a
/// freshly built target model value.
pub struct TypeResolver<'a> {
    bindings: &'a BindingTable,
    directives: &'a Directives,
    tree: &'a DeclarationTree,
}

impl<'a> TypeResolver<'a> {
    pub fn new(bindings: &'a BindingTable, directives: &'a Directives, tree: &'a DeclarationTree) -> Self {
        Self {
            bindings,
            directives,
            tree,
        }
    }

    /// Binds a native type name. Pointers to unbound types fall back to a pointer-sized integer.
    pub fn resolve_type(&self, type_name: &str, pointer_depth: u8) -> Result<TargetType, ResolveError> {
        match self.bindings.lookup(type_name) {
            Some(target) => Ok(target.clone()),
            None if pointer_depth > 0 => Ok(BindingTable::pointer_sized_int()),
            None => Err(ResolveError::UnknownType(type_name.to_string())),
        }
    }

    /// Applies a mapping override. Returns `(public, marshal, bool_to_int)`.
    fn apply_override(
        &self,
        native: &TargetType,
        mapping_type: Option<&str>,
    ) -> Result<(TargetType, TargetType, bool), ResolveError> {
        let Some(mapping_type) = mapping_type else {
            return Ok((native.clone(), native.clone(), false));
        };
        let override_type = self
            .bindings
            .lookup(mapping_type)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownType(mapping_type.to_string()))?;

        if override_type.is_bool() && native.is_integer() {
            Ok((override_type, native.clone(), true))
        } else {
            Ok((override_type.clone(), override_type, false))
        }
    }

    pub fn resolve_field(
        &self,
        aggregate: &str,
        source: &SourceField,
        sink: &mut DiagnosticSink,
    ) -> Result<TargetField, ResolveError> {
        let location = format!("{}::{}", aggregate, source.name);
        let rule = self.directives.field(aggregate, &source.name).cloned().unwrap_or_default();

        let callback = match rule.callback.as_deref().map(parse_callback) {
            Some(Ok(descriptor)) => descriptor,
            Some(Err(e)) => {
                sink.error(DiagnosticCode::InvalidCallback, &location, e.to_string());
                None
            }
            None => None,
        };

        let native_type = match (self.resolve_type(&source.type_name, source.pointer_depth), &callback) {
            (Ok(target), _) => target,
            (Err(_), Some(_)) => BindingTable::pointer_sized_int(),
            (Err(e), None) => return Err(e),
        };

        let mut field = TargetField::new(rule.rename.as_deref().unwrap_or(&source.name), native_type.clone());
        field.native_name = source.name.clone();
        field.pointer_depth = source.pointer_depth;
        field.rank = source.offset;
        field.bitfield = source.bitfield;
        if let Some(visibility) = rule.visibility {
            field.visibility = visibility;
        }
        field.default_value = rule.default_value.clone().or_else(|| source.default_value.clone());

        let (public_type, marshal_type, bool_to_int) =
            self.apply_override(&native_type, rule.mapping_type.as_deref())?;
        field.public_type = public_type;
        field.marshal_type = marshal_type;
        field.is_bool_to_int = bool_to_int;

        if source.pointer_depth > 0 {
            let interface_pointer = native_type.is_interface() && source.pointer_depth == 1;
            if rule.optional == Some(true) && source.pointer_depth == 1 && !interface_pointer {
                field.is_optional_pointer = true;
            } else if !interface_pointer {
                field.public_type = BindingTable::pointer_sized_int();
                field.marshal_type = BindingTable::pointer_sized_int();
                field.is_bool_to_int = false;
            }
        }

        if source.is_array {
            field.is_array = true;
            field.array = source
                .array_dimension
                .map(ArraySpecification::Constant)
                .unwrap_or(ArraySpecification::Undefined);
        }

        if let Some(descriptor) = callback {
            field.public_type = TargetType::Callback(descriptor.identifier_type.clone());
            field.marshal_type = BindingTable::pointer_sized_int();
            field.callback = Some(descriptor);
        }

        Ok(field)
    }

    /// Resolves every member and relation of an aggregate.
    pub fn resolve_aggregate(&self, source: &SourceAggregate, sink: &mut DiagnosticSink) -> TargetAggregate {
        let rule = self.directives.aggregate(&source.name).cloned().unwrap_or_default();
        let mut aggregate = TargetAggregate::new(&source.name);
        aggregate.base_name = source.base.clone();
        aggregate.is_union = source.is_union;
        aggregate.explicit_layout = rule
            .explicit_layout
            .unwrap_or(source.explicit_layout || source.is_union || source.has_bitfields());
        aggregate.pack = rule.pack.filter(|&p| p > 0).map(|p| Alignment::from_size(p as usize));
        aggregate.custom_marshal = rule.custom_marshal;
        aggregate.generate_as_class = rule.generate_as_class;

        for field in &source.fields {
            match self.resolve_field(&source.name, field, sink) {
                Ok(resolved) => aggregate.add_field(resolved),
                Err(e) => {
                    sink.error(e.code(), &format!("{}::{}", source.name, field.name), e.to_string());
                    aggregate.add_field(TargetField::invalid(&field.name, &field.type_name));
                }
            }
        }

        self.resolve_field_relations(source, &mut aggregate, sink);
        aggregate
    }

    fn resolve_field_relations(&self, source: &SourceAggregate, aggregate: &mut TargetAggregate, sink: &mut DiagnosticSink) {
        for (index, field) in source.fields.iter().enumerate() {
            let location = format!("{}::{}", source.name, field.name);
            let Some(rule) = self.directives.field(&source.name, &field.name) else {
                continue;
            };
            let Some(text) = rule.relation.as_deref() else {
                continue;
            };
            let relations = match parse_relations(text) {
                Ok(relations) => relations,
                Err(e) => {
                    sink.error(DiagnosticCode::InvalidRelation, &location, e.to_string());
                    continue;
                }
            };

            for relation in relations {
                if let Relation::Length(target) = &relation {
                    let Some(target_index) = aggregate.field_index(target).filter(|&t| t != index) else {
                        let error = ResolveError::InvalidLengthRelation {
                            aggregate: source.name.clone(),
                            field: field.name.clone(),
                            target: target.clone(),
                        };
                        let severity = if self.tree.any_aggregate_declares(target) {
                            Severity::Error
                        } else {
                            aggregate.is_valid = false;
                            Severity::Fatal
                        };
                        sink.report(Diagnostic::new(error.code(), &location, error.to_string()).with_severity(severity));
                        continue;
                    };

                    let fields = aggregate.fields_mut();
                    let size_identifier = fields[index].name.clone();
                    let size_type = fields[index].marshal_type.qualified_name();
                    let target_field = &mut fields[target_index];
                    if let Some(existing) = target_field.array.size_identifier() {
                        let error = ResolveError::DuplicateRelation {
                            target: target.clone(),
                            existing: existing.to_string(),
                        };
                        sink.error(error.code(), &location, error.to_string());
                        continue;
                    }
                    make_dynamic_array(target_field, size_identifier, size_type);
                    if rule.visibility.is_none() {
                        aggregate.fields_mut()[index].visibility = Visibility::Internal;
                    }
                }

                let owner = &mut aggregate.fields_mut()[index];
                owner.is_derived = true;
                owner.relations.push(relation);
            }
        }
    }

    pub fn resolve_parameter(
        &self,
        owner: Option<&str>,
        callable: &str,
        source: &SourceParameter,
    ) -> Result<TargetParameter, ResolveError> {
        let rule = self.directives.parameter(owner, callable, &source.name).cloned().unwrap_or_default();
        let direction = rule.direction.unwrap_or(source.direction);
        let native_type = self.resolve_type(&source.type_name, source.pointer_depth)?;

        let mut parameter = TargetParameter::new(&source.name, native_type.clone());
        parameter.direction = direction;
        parameter.pointer_depth = source.pointer_depth;

        let (public_type, marshal_type, bool_to_int) =
            self.apply_override(&native_type, rule.mapping_type.as_deref())?;
        parameter.public_type = public_type;
        parameter.marshal_type = marshal_type;
        parameter.is_bool_to_int = bool_to_int;

        let mut depth = source.pointer_depth;
        if source.is_array && depth > 0 {
            depth -= 1;
        }
        if direction != ParamDirection::In && depth > 0 {
            depth -= 1;
        }
        if native_type.is_interface() && depth > 0 {
            depth -= 1;
        }
        if depth > 0 {
            parameter.public_type = BindingTable::pointer_sized_int();
            parameter.marshal_type = BindingTable::pointer_sized_int();
            parameter.is_bool_to_int = false;
        } else if source.is_array {
            parameter.is_array = true;
        }

        if let Some(text) = rule.relation.as_deref() {
            parameter.relations = parse_relations(text)?;
            parameter.is_derived = !parameter.relations.is_empty();
        }
        Ok(parameter)
    }

    pub fn resolve_return(&self, source: &SourceReturn) -> Result<Option<TargetParameter>, ResolveError> {
        let native_type = self.resolve_type(&source.type_name, source.pointer_depth)?;
        if native_type.is_void() && source.pointer_depth == 0 {
            return Ok(None);
        }

        let mut result = TargetParameter::new(TargetParameter::RETURN_NAME, native_type.clone());
        result.direction = ParamDirection::Out;
        result.is_return = true;
        result.pointer_depth = source.pointer_depth;
        let interface_pointer = native_type.is_interface() && source.pointer_depth == 1;
        if source.pointer_depth > 0 && !interface_pointer {
            result.public_type = BindingTable::pointer_sized_int();
            result.marshal_type = BindingTable::pointer_sized_int();
        }
        Ok(Some(result))
    }

    /// Resolves a whole parameter list and return value.
    ///
    /// Parameters that fail to bind are kept as invalid placeholders so the
    /// callable still appears in the model.
    pub fn resolve_signature(
        &self,
        owner: Option<&str>,
        callable: &str,
        parameters: &[SourceParameter],
        return_type: Option<&SourceReturn>,
        sink: &mut DiagnosticSink,
    ) -> CallableSignature {
        let location = match owner {
            Some(owner) => format!("{}::{}", owner, callable),
            None => callable.to_string(),
        };
        let mut signature = CallableSignature::default();

        for source in parameters {
            match self.resolve_parameter(owner, callable, source) {
                Ok(parameter) => signature.parameters.push(parameter),
                Err(e) => {
                    sink.error(e.code(), &format!("{}::{}", location, source.name), e.to_string());
                    signature.parameters.push(TargetParameter::invalid(&source.name, &source.type_name));
                }
            }
        }

        for index in 0..signature.parameters.len() {
            let targets: Vec<String> = signature.parameters[index]
                .relations
                .iter()
                .filter_map(|r| r.length_target().map(str::to_string))
                .collect();
            for target in targets {
                let size_identifier = signature.parameters[index].name.clone();
                let size_type = signature.parameters[index].marshal_type.qualified_name();
                if let Some(related) = signature.parameters.iter_mut().find(|p| p.name == target) {
                    if related.is_array {
                        related.array = ArraySpecification::Dynamic { size_identifier, size_type };
                    }
                }
            }
        }

        if let Some(source) = return_type {
            match self.resolve_return(source) {
                Ok(result) => signature.return_value = result,
                Err(e) => {
                    sink.error(e.code(), &location, e.to_string());
                    signature.is_valid = false;
                }
            }
        }
        signature
    }
}

fn make_dynamic_array(field: &mut TargetField, size_identifier: String, size_type: String) {
    field.array = ArraySpecification::Dynamic { size_identifier, size_type };
    field.is_array = true;
    field.is_optional_pointer = false;
    if field.callback.is_none() {
        let element = field.native_type.clone();
        if field.is_bool_to_int {
            field.public_type = TargetType::Fundamental(PrimitiveType::Bool);
        } else {
            field.public_type = element.clone();
        }
        field.marshal_type = element;
    }
}
