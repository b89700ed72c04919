// Mon Oct 12 2026 - Alex

use crate::binding::{BindingTable, TypeResolver};
use crate::config::Config;
use crate::diagnostics::{DiagnosticReport, DiagnosticSink};
use crate::interface::{InterfaceMapper, TargetFunction, TargetInterface};
use crate::marshal::{DefaultConstructorPlanner, MarshalContext, MarshallerRegistry, NativeStructPlanner};
use crate::model::{DeclarationTree, Directives};
use crate::orchestration::RunError;
use crate::structure::{AggregateId, AggregateTable, LayoutEngine, TargetAggregate};
use crate::utils::logging::ScopedTimer;
use serde::Serialize;
use std::collections::HashSet;

/// Fully laid out, marshaller-assigned output of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TargetModel {
    pub aggregates: Vec<TargetAggregate>,
    pub interfaces: Vec<TargetInterface>,
    pub functions: Vec<TargetFunction>,
}

impl TargetModel {
    pub fn aggregate(&self, name: &str) -> Option<&TargetAggregate> {
        self.aggregates.iter().find(|a| a.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&TargetInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&TargetFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn summary(&self) -> String {
        format!(
            "Aggregates: {}, Interfaces: {}, Functions: {}",
            self.aggregates.len(),
            self.interfaces.len(),
            self.functions.len()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub model: TargetModel,
    pub report: DiagnosticReport,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        !self.report.is_clean()
    }
}

/// One generation invocation: resolve, lay out, assign marshallers, map interfaces.
pub struct GenerationRun {
    config: Config,
    registry: MarshallerRegistry,
}

impl GenerationRun {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: MarshallerRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn execute(
        &self,
        tree: &DeclarationTree,
        directives: &Directives,
        bindings: &BindingTable,
    ) -> Result<RunOutcome, RunError> {
        self.config.validate().map_err(RunError::InvalidConfig)?;
        let _timer = ScopedTimer::new("generation run");

        let mut bindings = bindings.clone();
        bindings.bind_declarations(tree);
        let mut sink = DiagnosticSink::new().with_max_records(self.config.max_diagnostics);

        let mut table = self.resolve_aggregates(tree, directives, &bindings, &mut sink);
        let order = self.order_aggregates(&mut table, &mut sink);
        self.lay_out(&mut table, &order, &mut sink);
        let shadowed = self.assign_marshallers(&mut table, &order);
        self.plan_default_constructors(&mut table, &order, &mut sink);

        let (interfaces, functions) = {
            let _timer = ScopedTimer::new("interfaces");
            let mut mapper = InterfaceMapper::new(tree, directives, &bindings, &self.config, &shadowed)?;
            let functions: Vec<TargetFunction> = tree
                .functions
                .iter()
                .map(|function| mapper.map_function(function, &mut sink))
                .collect();
            mapper.map_all(&mut sink);
            (mapper.into_interfaces(), functions)
        };

        let model = TargetModel {
            aggregates: table.into_aggregates(),
            interfaces,
            functions,
        };
        log::info!("{}", model.summary());
        log::info!("{}", sink.summary());

        Ok(RunOutcome {
            model,
            report: DiagnosticReport::from_sink(sink),
        })
    }

    fn resolve_aggregates(
        &self,
        tree: &DeclarationTree,
        directives: &Directives,
        bindings: &BindingTable,
        sink: &mut DiagnosticSink,
    ) -> AggregateTable {
        let _timer = ScopedTimer::new("resolve");
        let resolver = TypeResolver::new(bindings, directives, tree);
        let mut table = AggregateTable::new();
        for source in &tree.aggregates {
            if table.id_of(&source.name).is_some() {
                log::warn!("Aggregate {} declared twice, keeping the first", source.name);
                continue;
            }
            table.insert(resolver.resolve_aggregate(source, sink));
        }
        table
    }

    fn order_aggregates(&self, table: &mut AggregateTable, sink: &mut DiagnosticSink) -> Vec<AggregateId> {
        for error in table.link_bases() {
            sink.report(error.to_diagnostic());
        }

        let (order, cycles) = table.dependency_order();
        for error in cycles {
            if let Some(id) = table.id_of(&error.location()) {
                table.get_mut(id).is_valid = false;
            }
            sink.report(error.to_diagnostic());
        }
        order
    }

    fn lay_out(&self, table: &mut AggregateTable, order: &[AggregateId], sink: &mut DiagnosticSink) {
        let _timer = ScopedTimer::new("layout");
        for &id in order {
            let result = LayoutEngine::new(table, self.config.pointer_size)
                .with_alternate_pointer_size(self.config.alternate_pointer_size())
                .layout(table.get(id));
            for error in &result.errors {
                sink.report(error.to_diagnostic());
            }
            result.apply(table.get_mut(id));
        }
    }

    /// Assigns field strategies in dependency order so nested and base
    /// aggregates are known to need a shadow before their users are planned.
    fn assign_marshallers(&self, table: &mut AggregateTable, order: &[AggregateId]) -> HashSet<String> {
        let _timer = ScopedTimer::new("marshal");
        let mut shadowed = HashSet::new();

        for &id in order {
            if !table.get(id).is_valid {
                log::debug!("Skipping marshalling of invalid aggregate {}", table.get(id).name);
                continue;
            }

            let needs_shadow = {
                let ctx = MarshalContext::for_struct(&shadowed);
                let base_shadowed = table.get(id).base.map(|b| table.get(b).needs_native_shadow).unwrap_or(false);
                let aggregate = table.get_mut(id);
                let mut structural = false;
                for field in aggregate.fields_mut() {
                    let shape = self.registry.assign_field(field, &ctx);
                    structural |= shape.map(|s| s.needs_native_shadow()).unwrap_or(false);
                    structural |= !field.relations.is_empty();
                }
                structural || base_shadowed || aggregate.generate_as_class || aggregate.custom_marshal
            };
            table.get_mut(id).needs_native_shadow = needs_shadow;
            if !needs_shadow {
                continue;
            }

            shadowed.insert(table.get(id).name.clone());
            let ctx = MarshalContext::for_struct(&shadowed);
            let plan = NativeStructPlanner::new(&self.registry, table).plan(table.get(id), &ctx);
            table.get_mut(id).native = Some(plan);
        }
        shadowed
    }

    fn plan_default_constructors(&self, table: &mut AggregateTable, order: &[AggregateId], sink: &mut DiagnosticSink) {
        for &id in order {
            if !table.get(id).is_valid {
                continue;
            }
            let plan = DefaultConstructorPlanner::new(table).plan(table.get(id), sink);
            table.get_mut(id).default_constructor = plan;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ArrayKind;
    use crate::diagnostics::DiagnosticCode;
    use crate::marshal::MarshalShape;
    use crate::model::{
        AggregateRule, FieldRule, SourceAggregate, SourceField, SourceInterface, SourceMethod, SourceParameter,
    };

    fn run(tree: &DeclarationTree, directives: &Directives) -> RunOutcome {
        GenerationRun::new(Config::default())
            .execute(tree, directives, &BindingTable::with_fundamentals())
            .unwrap()
    }

    fn offsets(model: &TargetModel, name: &str) -> Vec<u64> {
        model
            .aggregate(name)
            .map(|a| a.fields().iter().map(|f| f.offset.as_u64()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_sequential_scalars() {
        let tree = DeclarationTree::new().with_aggregate(
            SourceAggregate::new("Pair")
                .with_field(SourceField::new("a", "int"))
                .with_field(SourceField::new("b", "int").with_offset(1)),
        );
        let outcome = run(&tree, &Directives::new());
        assert_eq!(offsets(&outcome.model, "Pair"), vec![0, 4]);
        assert!(!outcome.has_errors());

        let pair = outcome.model.aggregate("Pair").unwrap();
        assert_eq!(pair.fields()[0].strategy, Some(MarshalShape::PassThrough));
        assert!(!pair.needs_native_shadow);
        assert!(pair.native.is_none());
    }

    #[test]
    fn test_bitfields_with_separate_storage() {
        let tree = DeclarationTree::new().with_aggregate(
            SourceAggregate::new("Packed")
                .with_field(SourceField::new("a", "int").with_bitfield(16).with_offset(0))
                .with_field(SourceField::new("b", "int").with_offset(1))
                .with_field(SourceField::new("c", "int").with_bitfield(16).with_offset(2)),
        );
        let outcome = run(&tree, &Directives::new());
        let packed = outcome.model.aggregate("Packed").unwrap();
        let fields = packed.fields();

        assert_eq!(offsets(&outcome.model, "Packed"), vec![0, 4, 8]);
        assert_eq!((fields[0].bit_offset, fields[2].bit_offset), (0, 0));
        assert_eq!((fields[0].bit_mask, fields[2].bit_mask), (0xFFFF, 0xFFFF));
        assert!(packed.needs_native_shadow);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn test_union_members_overlap() {
        let tree = DeclarationTree::new().with_aggregate(
            SourceAggregate::union("Either")
                .with_field(SourceField::new("p", "int").with_pointer(1))
                .with_field(SourceField::new("s", "int")),
        );
        let outcome = run(&tree, &Directives::new());
        assert_eq!(offsets(&outcome.model, "Either"), vec![0, 0]);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn test_derived_starts_after_base() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("Derived").with_base("Base").with_field(SourceField::new("extra", "int")))
            .with_aggregate(
                SourceAggregate::new("Base")
                    .with_field(SourceField::new("a", "int"))
                    .with_field(SourceField::new("b", "short")),
            );
        let outcome = run(&tree, &Directives::new());
        let base_size = outcome.model.aggregate("Base").unwrap().size().as_usize() as u64;
        assert_eq!(offsets(&outcome.model, "Derived"), vec![base_size]);
    }

    #[test]
    fn test_length_relation_through_the_run() {
        let tree = DeclarationTree::new().with_aggregate(
            SourceAggregate::new("Buffer")
                .with_field(SourceField::new("data", "int").with_pointer(1))
                .with_field(SourceField::new("count", "unsigned int")),
        );
        let directives =
            Directives::new().with_field("Buffer::count", FieldRule::default().with_relation("length(data)"));
        let outcome = run(&tree, &directives);

        let buffer = outcome.model.aggregate("Buffer").unwrap();
        let data = buffer.get_field("data").unwrap();
        assert_eq!(data.array.kind(), ArrayKind::Dynamic);
        assert_eq!(data.array.size_identifier(), Some("count"));
        assert!(buffer.needs_native_shadow);
        assert!(buffer.native.is_some());
        assert!(!outcome.has_errors());
    }

    #[test]
    fn test_missing_length_target_reported_once() {
        let tree = DeclarationTree::new().with_aggregate(
            SourceAggregate::new("Buffer")
                .with_field(SourceField::new("data", "int").with_pointer(1))
                .with_field(SourceField::new("count", "unsigned int")),
        );
        let directives =
            Directives::new().with_field("Buffer::count", FieldRule::default().with_relation("length(missing)"));
        let outcome = run(&tree, &directives);

        assert_eq!(outcome.report.summary.total, 1);
        assert_eq!(outcome.report.diagnostics[0].code, DiagnosticCode::InvalidLengthRelation);
        assert!(!outcome.model.aggregate("Buffer").unwrap().is_valid);
        assert!(outcome.has_errors());
    }

    #[test]
    fn test_cycle_is_reported_and_run_continues() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("A").with_field(SourceField::new("b", "B")))
            .with_aggregate(SourceAggregate::new("B").with_field(SourceField::new("a", "A")))
            .with_aggregate(SourceAggregate::new("Fine").with_field(SourceField::new("x", "int")));
        let outcome = run(&tree, &Directives::new());

        assert_eq!(outcome.report.diagnostics.iter().filter(|d| d.code == DiagnosticCode::CyclicAggregate).count(), 2);
        assert!(!outcome.model.aggregate("A").unwrap().is_valid);
        assert!(outcome.model.aggregate("Fine").unwrap().is_laid_out);
    }

    #[test]
    fn test_nested_shadow_propagates_to_container() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("Outer").with_field(SourceField::new("inner", "Inner")))
            .with_aggregate(SourceAggregate::new("Inner").with_field(SourceField::new("values", "int").with_array(4)));
        let outcome = run(&tree, &Directives::new());

        assert!(outcome.model.aggregate("Inner").unwrap().needs_native_shadow);
        let outer = outcome.model.aggregate("Outer").unwrap();
        assert!(outer.needs_native_shadow);
        assert_eq!(outer.fields()[0].strategy, Some(MarshalShape::NativeStruct));
    }

    #[test]
    fn test_property_synthesis_through_the_run() {
        let value = |setter_type: &str| {
            DeclarationTree::new().with_interface(
                SourceInterface::new("IValue")
                    .with_method(SourceMethod::new("GetValue").returning("int"))
                    .with_method(SourceMethod::new("SetValue").with_parameter(SourceParameter::new("value", setter_type))),
            )
        };

        let outcome = run(&value("int"), &Directives::new());
        let iface = outcome.model.interface("IValue").unwrap();
        assert_eq!(iface.properties.len(), 1);
        assert_eq!(iface.properties[0].public_type.qualified_name(), "i32");

        let outcome = run(&value("float"), &Directives::new());
        let iface = outcome.model.interface("IValue").unwrap();
        assert!(iface.properties.is_empty());
        assert_eq!(iface.methods.len(), 2);
    }

    #[test]
    fn test_strict_properties_warn_on_mismatch() {
        let tree = DeclarationTree::new().with_interface(
            SourceInterface::new("IValue")
                .with_method(SourceMethod::new("GetValue").returning("int"))
                .with_method(SourceMethod::new("SetValue").with_parameter(SourceParameter::new("value", "float"))),
        );
        let outcome = GenerationRun::new(Config::default().with_strict_properties(true))
            .execute(&tree, &Directives::new(), &BindingTable::with_fundamentals())
            .unwrap();
        assert_eq!(outcome.report.summary.warning_count, 1);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn test_default_values_planned() {
        let tree = DeclarationTree::new()
            .with_aggregate(
                SourceAggregate::new("Settings")
                    .with_field(SourceField::new("scale", "float").with_default("1.F"))
                    .with_field(SourceField::new("count", "int")),
            )
            .with_aggregate(SourceAggregate::new("Plain").with_field(SourceField::new("a", "int")))
            .with_aggregate(SourceAggregate::new("Handle").with_field(SourceField::new("a", "int")));
        let directives = Directives::new()
            .with_field("Settings::count", FieldRule::default().with_default("4"))
            .with_aggregate("Handle", AggregateRule::default().with_class());
        let outcome = run(&tree, &directives);

        let settings = outcome.model.aggregate("Settings").unwrap();
        let plan = settings.default_constructor.as_ref().unwrap();
        assert_eq!(plan.to_string(), "this = default;\nscale = 1.0f;\ncount = 4;\n");
        assert!(outcome.model.aggregate("Plain").unwrap().default_constructor.is_none());

        let handle = outcome.model.aggregate("Handle").unwrap();
        assert!(handle.needs_native_shadow);
        assert!(!handle.default_constructor.as_ref().unwrap().reset_to_default);
    }

    #[test]
    fn test_aggregate_rules_reach_layout() {
        let tree = DeclarationTree::new()
            .with_aggregate(
                SourceAggregate::new("Packed")
                    .with_field(SourceField::new("tag", "char"))
                    .with_field(SourceField::new("value", "int")),
            )
            .with_aggregate(SourceAggregate::new("Opaque").with_explicit_layout().with_field(SourceField::new("a", "int")));
        let directives = Directives::new()
            .with_aggregate("Packed", AggregateRule::default().with_pack(1))
            .with_aggregate("Opaque", AggregateRule::default().with_explicit_layout(false).with_custom_marshal());
        let outcome = run(&tree, &directives);

        assert_eq!(offsets(&outcome.model, "Packed"), vec![0, 1]);
        let opaque = outcome.model.aggregate("Opaque").unwrap();
        assert!(!opaque.explicit_layout);
        assert!(opaque.custom_marshal);
        assert!(opaque.needs_native_shadow);
    }

    #[test]
    fn test_unknown_array_dimension_is_a_warning() {
        let tree = DeclarationTree::new()
            .with_aggregate(SourceAggregate::new("Blob").with_field(SourceField::new("data", "int").with_unknown_array()));
        let outcome = run(&tree, &Directives::new());
        assert_eq!(outcome.report.summary.warning_count, 1);
        assert_eq!(outcome.report.diagnostics[0].code, DiagnosticCode::UnknownArrayDimension);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = Config::default().with_pointer_size(6);
        let result = GenerationRun::new(config).execute(
            &DeclarationTree::new(),
            &Directives::new(),
            &BindingTable::with_fundamentals(),
        );
        assert!(matches!(result, Err(RunError::InvalidConfig(_))));
    }
}
