// Mon Oct 12 2026 - Alex

use crate::binding::{BindingTable, TypeResolver};
use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::interface::dual::native_shadow;
use crate::interface::guid::GuidResolver;
use crate::interface::overloads::special_overloads;
use crate::interface::{
    InnerAccess, InnerInterfaceRouter, InnerInterfaceRule, InterfaceError, InterfaceId, MethodKind,
    PropertySynthesizer, SlotTotals, TargetFunction, TargetInterface, TargetMethod, VTableBuilder, VTableEntry,
    VtableOffset,
};
use crate::marshal::{CallTarget, CallablePlanner, MarshalContext, MarshallerRegistry};
use crate::model::{DeclarationTree, Directives, SourceFunction, SourceMethod};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Maps native interfaces onto managed ones.
///
/// Interfaces live in an arena indexed by [`InterfaceId`]. Each one is mapped
/// at most once per run; bases are mapped before the interfaces deriving from
/// them, and a base reached again through a cycle is left as it stands.
pub struct InterfaceMapper<'a> {
    tree: &'a DeclarationTree,
    directives: &'a Directives,
    config: &'a Config,
    resolver: TypeResolver<'a>,
    registry: MarshallerRegistry,
    router: InnerInterfaceRouter,
    shadowed: &'a HashSet<String>,
    interfaces: Vec<TargetInterface>,
    index: IndexMap<String, InterfaceId>,
}

impl<'a> InterfaceMapper<'a> {
    pub fn new(
        tree: &'a DeclarationTree,
        directives: &'a Directives,
        bindings: &'a BindingTable,
        config: &'a Config,
        shadowed: &'a HashSet<String>,
    ) -> Result<Self, InterfaceError> {
        let router = InnerInterfaceRouter::from_rules(&config.inner_interfaces)?;
        let mut mapper = Self {
            tree,
            directives,
            config,
            resolver: TypeResolver::new(bindings, directives, tree),
            registry: MarshallerRegistry::new(),
            router,
            shadowed,
            interfaces: Vec::new(),
            index: IndexMap::new(),
        };
        mapper.prepare();
        Ok(mapper)
    }

    fn prepare(&mut self) {
        for source in &self.tree.interfaces {
            if self.index.contains_key(&source.name) {
                log::warn!("Interface {} declared twice, keeping the first", source.name);
                continue;
            }
            let mut interface = TargetInterface::new(&source.name, &source.name);
            interface.include = source.include.clone();
            if let Some(rule) = self.directives.interface(&source.name) {
                interface.is_callback = rule.callback || rule.dual_callback;
                interface.is_dual_callback = rule.dual_callback;
            }
            self.push(interface);
        }
    }

    fn push(&mut self, interface: TargetInterface) -> InterfaceId {
        let id = InterfaceId(self.interfaces.len());
        self.index.entry(interface.name.clone()).or_insert(id);
        self.interfaces.push(interface);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<InterfaceId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: InterfaceId) -> &TargetInterface {
        &self.interfaces[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&TargetInterface> {
        self.id_of(name).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetInterface> {
        self.interfaces.iter()
    }

    pub fn into_interfaces(self) -> Vec<TargetInterface> {
        self.interfaces
    }

    pub fn map_all(&mut self, sink: &mut DiagnosticSink) {
        let declared: Vec<InterfaceId> = (0..self.interfaces.len()).map(InterfaceId).collect();
        for id in declared {
            self.map_interface(id, sink);
        }
    }

    pub fn map_interface(&mut self, id: InterfaceId, sink: &mut DiagnosticSink) {
        if self.interfaces[id.0].fully_mapped {
            return;
        }
        self.interfaces[id.0].fully_mapped = true;

        let tree = self.tree;
        let name = self.interfaces[id.0].name.clone();
        let Some(source) = tree.interface(&name) else {
            return;
        };
        let is_callback = self.interfaces[id.0].is_callback;

        let base_id = source.base.as_deref().and_then(|b| self.id_of(b)).filter(|b| *b != id);
        if let Some(base_id) = base_id {
            self.map_interface(base_id, sink);
        }
        let (mut base_name, base_slots) = match base_id {
            Some(b) => (Some(self.interfaces[b.0].name.clone()), self.interfaces[b.0].vtable.totals()),
            None => (
                (!is_callback).then(|| self.config.object_type.clone()),
                SlotTotals {
                    default: self.config.root_slots.default,
                    windows: self.config.root_slots.windows,
                },
            ),
        };
        let mut resolved_base_id = base_id;

        let vtable = source
            .methods
            .iter()
            .fold(
                VTableBuilder::new(&name, base_slots).with_msvc_ordering(self.config.msvc_overload_ordering),
                |builder, method| builder.add_method(&method.name),
            )
            .build();

        let mut methods = Vec::new();
        for (source_method, entry) in source.methods.iter().zip(vtable.entries.iter()) {
            let method = self.map_method(&name, source_method, entry, sink);
            let overloads = special_overloads(&method, &self.config.interface_array_type);
            methods.push(method);
            for mut overload in overloads {
                if overload.kind == MethodKind::RawOverload {
                    self.plan_method(&name, &mut overload, sink);
                }
                methods.push(overload);
            }
        }

        let mut kept = Vec::with_capacity(methods.len());
        for method in methods {
            match self.router.route(&name, &method.native_name).cloned() {
                Some(rule) => {
                    let inner = self.inner_interface(id, &rule, &source.include);
                    log::debug!("Moving {}::{} to {}", name, method.name, rule.inner_interface);
                    self.interfaces[inner.0].methods.push(method);
                }
                None => kept.push(method),
            }
        }

        let guid = GuidResolver::new(tree).resolve(source);
        let base_dual = base_id
            .map(|b| &self.interfaces[b.0])
            .filter(|b| b.is_dual_callback && !b.is_native_shadow)
            .map(|b| b.native_shadow.clone().unwrap_or_else(|| b.name.clone()));

        {
            let interface = &mut self.interfaces[id.0];
            interface.guid = guid;
            interface.vtable = vtable;
            interface.methods = kept;
        }

        if self.interfaces[id.0].is_dual_callback {
            let shadow_base = base_dual
                .clone()
                .or_else(|| base_name.clone())
                .unwrap_or_else(|| self.config.object_type.clone());
            let mut shadow = native_shadow(
                &self.interfaces[id.0],
                self.directives.interface(&name),
                shadow_base.clone(),
                &self.config.native_callback_suffix,
                &self.config.reserved_suffix,
            );
            shadow.base_id = self.id_of(&shadow_base);
            let shadow_name = shadow.name.clone();
            self.push(shadow);
            self.interfaces[id.0].native_shadow = Some(shadow_name);
        } else {
            if !is_callback {
                if let Some(shadow) = base_dual {
                    resolved_base_id = self.id_of(&shadow);
                    base_name = Some(shadow);
                }
            }
            let synthesizer = PropertySynthesizer::new(&self.config.status_code_type, &self.config.reserved_suffix)
                .with_strict(self.config.strict_properties);
            let interface = &mut self.interfaces[id.0];
            interface.properties = synthesizer.synthesize(&name, &mut interface.methods, sink);
        }

        if is_callback && base_name.is_none() {
            base_name = Some(self.config.callbackable_type.clone());
        }

        let interface = &mut self.interfaces[id.0];
        interface.base = base_name;
        interface.base_id = resolved_base_id;
        log::debug!("Mapped {}", interface);
    }

    fn map_method(
        &self,
        owner: &str,
        source: &SourceMethod,
        entry: &VTableEntry,
        sink: &mut DiagnosticSink,
    ) -> TargetMethod {
        let signature = self.resolver.resolve_signature(
            Some(owner),
            &source.name,
            &source.parameters,
            source.return_type.as_ref(),
            sink,
        );
        let mut method = TargetMethod::new(&source.name, signature);
        let rule = self.directives.method(Some(owner), &source.name);
        let translate = rule.map(|r| r.vtable_offset_translate).unwrap_or(0);
        method.offset = entry.index as i32 + translate;
        method.windows_offset = entry.windows_index as i32 + translate;
        method.vtable_offset = Some(VtableOffset::resolve(
            method.offset,
            method.windows_offset,
            self.config.platforms,
        ));

        if let Some(rule) = rule {
            method.allow_property = rule.property;
            method.is_persistent = rule.persist.unwrap_or(false);
            method.hidden = rule.hidden.unwrap_or(false);
            method.keep_implement_public = rule.keep_implement_public.unwrap_or(false);
            method.request_raw_ptr = rule.request_raw_ptr;
            method.check_return = rule.check_return.unwrap_or(true);
            if let Some(rename) = &rule.rename {
                method.name = rename.clone();
            }
        }

        self.plan_method(owner, &mut method, sink);
        method
    }

    fn plan_method(&self, owner: &str, method: &mut TargetMethod, sink: &mut DiagnosticSink) {
        let offset = method.vtable_offset.unwrap_or(VtableOffset::Constant(method.offset));
        let location = format!("{}::{}", owner, method.native_name);
        let ctx = MarshalContext::for_callable(self.shadowed);
        let planner = CallablePlanner::new(&self.registry, &self.config.status_code_type);
        method.plan = Some(planner.plan(
            &mut method.signature,
            CallTarget::Vtable(offset),
            method.check_return,
            &location,
            &ctx,
            sink,
        ));
    }

    /// Finds or creates the inner interface a relocation rule names.
    fn inner_interface(&mut self, outer: InterfaceId, rule: &InnerInterfaceRule, include: &str) -> InterfaceId {
        let id = match self.id_of(&rule.inner_interface) {
            Some(existing) => existing,
            None => {
                let mut inner = TargetInterface::new(&rule.inner_interface, &self.interfaces[outer.0].native_name);
                inner.include = include.to_string();
                inner.is_inner = true;
                inner.fully_mapped = true;
                inner.base = Some(
                    rule.inherited_interface
                        .clone()
                        .unwrap_or_else(|| self.config.object_type.clone()),
                );
                inner.base_id = rule.inherited_interface.as_deref().and_then(|b| self.id_of(b));
                self.push(inner)
            }
        };

        let access = InnerAccess {
            property_name: rule.property_name().to_string(),
            interface: rule.inner_interface.clone(),
        };
        let outer = &mut self.interfaces[outer.0];
        if !outer.inner_interfaces.contains(&access) {
            outer.inner_interfaces.push(access);
        }
        id
    }

    /// Maps a free function; the call goes through its exported symbol.
    pub fn map_function(&self, source: &SourceFunction, sink: &mut DiagnosticSink) -> TargetFunction {
        let mut signature = self.resolver.resolve_signature(
            None,
            &source.name,
            &source.parameters,
            source.return_type.as_ref(),
            sink,
        );
        let rule = self.directives.method(None, &source.name);
        let name = rule.and_then(|r| r.rename.clone()).unwrap_or_else(|| source.name.clone());
        let check_return = rule.and_then(|r| r.check_return).unwrap_or(true);

        let ctx = MarshalContext::for_callable(self.shadowed);
        let planner = CallablePlanner::new(&self.registry, &self.config.status_code_type);
        let plan = planner.plan(
            &mut signature,
            CallTarget::Function(source.symbol().to_string()),
            check_return,
            &source.name,
            &ctx,
            sink,
        );

        let mut function = TargetFunction::new(&name, source.symbol(), signature);
        function.check_return = check_return;
        function.plan = Some(plan);
        function
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{PlatformDetection, VtableOffset};
    use crate::model::{InterfaceRule, MethodRule, ParamDirection, SourceEnum, SourceInterface, SourceParameter, Visibility};

    fn value_interface() -> SourceInterface {
        SourceInterface::new("IValue")
            .with_include("core")
            .with_base("IUnknown")
            .with_method(SourceMethod::new("GetValue").returning("int"))
            .with_method(SourceMethod::new("SetValue").with_parameter(SourceParameter::new("value", "int")))
    }

    struct Fixture {
        tree: DeclarationTree,
        directives: Directives,
        bindings: BindingTable,
        config: Config,
        shadowed: HashSet<String>,
    }

    impl Fixture {
        fn new(tree: DeclarationTree) -> Self {
            let mut bindings = BindingTable::with_fundamentals();
            bindings.bind_declarations(&tree);
            Self {
                tree,
                directives: Directives::new(),
                bindings,
                config: Config::default(),
                shadowed: HashSet::new(),
            }
        }

        fn with_directives(mut self, directives: Directives) -> Self {
            self.directives = directives;
            self
        }

        fn with_config(mut self, config: Config) -> Self {
            self.config = config;
            self
        }

        fn mapper(&self) -> InterfaceMapper<'_> {
            InterfaceMapper::new(&self.tree, &self.directives, &self.bindings, &self.config, &self.shadowed).unwrap()
        }
    }

    #[test]
    fn test_slots_follow_root_interface() {
        let fixture = Fixture::new(DeclarationTree::new().with_interface(value_interface()));
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let iface = mapper.by_name("IValue").unwrap();
        assert_eq!(iface.base.as_deref(), Some("CppObject"));
        let get = iface.method("GetValue").unwrap();
        assert_eq!(get.offset, 3);
        assert_eq!(get.vtable_offset, Some(VtableOffset::Constant(3)));
        assert!(get.plan.as_ref().map(|p| p.is_valid).unwrap_or(false));
        assert_eq!(iface.properties.len(), 1);
        assert_eq!(iface.properties[0].name, "Value");
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_platform_dependent_slots() {
        let fixture = Fixture::new(DeclarationTree::new().with_interface(value_interface()))
            .with_config(Config::default().with_root_slots(4, 3).with_platforms(PlatformDetection::ANY));
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let set = mapper.by_name("IValue").unwrap().method("SetValue").unwrap();
        assert_eq!(set.vtable_offset, Some(VtableOffset::PlatformDependent { windows: 5, default: 4 }));
    }

    #[test]
    fn test_derived_interface_continues_base_slots() {
        let tree = DeclarationTree::new()
            .with_interface(
                SourceInterface::new("IDerived")
                    .with_base("IValue")
                    .with_method(SourceMethod::new("Reset")),
            )
            .with_interface(value_interface());
        let fixture = Fixture::new(tree);
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let derived = mapper.by_name("IDerived").unwrap();
        assert_eq!(derived.base.as_deref(), Some("IValue"));
        assert_eq!(derived.method("Reset").unwrap().offset, 5);
    }

    #[test]
    fn test_mapping_twice_is_idempotent() {
        let tree = DeclarationTree::new()
            .with_interface(SourceInterface::new("IDerived").with_base("IValue").with_method(SourceMethod::new("Reset")))
            .with_interface(value_interface());
        let fixture = Fixture::new(tree);
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);
        let counts: Vec<(usize, usize)> = mapper.iter().map(|i| (i.methods.len(), i.properties.len())).collect();

        let id = mapper.id_of("IValue").unwrap();
        mapper.map_interface(id, &mut sink);
        mapper.map_all(&mut sink);
        let again: Vec<(usize, usize)> = mapper.iter().map(|i| (i.methods.len(), i.properties.len())).collect();
        assert_eq!(counts, again);
    }

    #[test]
    fn test_cyclic_bases_terminate() {
        let tree = DeclarationTree::new()
            .with_interface(SourceInterface::new("IA").with_base("IB").with_method(SourceMethod::new("A")))
            .with_interface(SourceInterface::new("IB").with_base("IA").with_method(SourceMethod::new("B")));
        let fixture = Fixture::new(tree);
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);
        assert_eq!(mapper.by_name("IA").unwrap().methods.len(), 1);
        assert_eq!(mapper.by_name("IB").unwrap().methods.len(), 1);
    }

    #[test]
    fn test_dual_callback_gets_native_shadow() {
        let tree = DeclarationTree::new().with_interface(
            SourceInterface::new("IHandler")
                .with_method(SourceMethod::new("OnEvent"))
                .with_method(SourceMethod::new("Release")),
        );
        let fixture = Fixture::new(tree).with_directives(
            Directives::new()
                .with_interface("IHandler", InterfaceRule::dual_callback())
                .with_method("IHandler::Release", MethodRule::default().keep_public()),
        );
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let handler = mapper.by_name("IHandler").unwrap();
        assert_eq!(handler.base.as_deref(), Some("ICallbackable"));
        assert_eq!(handler.native_shadow.as_deref(), Some("IHandlerNative"));

        let shadow = mapper.by_name("IHandlerNative").unwrap();
        assert_eq!(shadow.base.as_deref(), Some("CppObject"));
        assert_eq!(shadow.methods[0].name, "OnEvent_");
        assert_eq!(shadow.methods[0].visibility, Visibility::Internal);
        assert_eq!(shadow.methods[1].name, "Release");
        assert_eq!(shadow.methods[1].visibility, Visibility::Public);
    }

    #[test]
    fn test_interface_deriving_from_dual_uses_shadow() {
        let tree = DeclarationTree::new()
            .with_interface(SourceInterface::new("IHandler").with_method(SourceMethod::new("OnEvent")))
            .with_interface(SourceInterface::new("IExtended").with_base("IHandler").with_method(SourceMethod::new("More")));
        let fixture = Fixture::new(tree)
            .with_directives(Directives::new().with_interface("IHandler", InterfaceRule::dual_callback()));
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);
        assert_eq!(mapper.by_name("IExtended").unwrap().base.as_deref(), Some("IHandlerNative"));
    }

    #[test]
    fn test_inner_interface_relocation() {
        let tree = DeclarationTree::new().with_interface(
            SourceInterface::new("IDevice")
                .with_method(SourceMethod::new("VideoDecode"))
                .with_method(SourceMethod::new("Flush")),
        );
        let rule = InnerInterfaceRule::new("IDevice::Video.*", "IVideo")
            .with_property_access_name("Video")
            .with_inherited_interface("IVideoBase");
        let config = Config::default().with_inner_interface(rule);
        let fixture = Fixture::new(tree).with_config(config);
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let device = mapper.by_name("IDevice").unwrap();
        assert_eq!(device.methods.len(), 1);
        assert_eq!(device.inner_interfaces[0].property_name, "Video");
        let video = mapper.by_name("IVideo").unwrap();
        assert!(video.is_inner);
        assert_eq!(video.base.as_deref(), Some("IVideoBase"));
        assert_eq!(video.methods[0].name, "VideoDecode");
        assert_eq!(video.methods[0].offset, 3);
    }

    #[test]
    fn test_guid_recovered_from_include() {
        let tree = DeclarationTree::new()
            .with_interface(value_interface())
            .with_guid("core", "IID_IValue", "1234");
        let fixture = Fixture::new(tree);
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);
        assert_eq!(mapper.by_name("IValue").unwrap().guid.as_deref(), Some("1234"));
    }

    #[test]
    fn test_interface_array_parameter_adds_overloads() {
        let tree = DeclarationTree::new()
            .with_interface(SourceInterface::new("IView"))
            .with_interface(
                SourceInterface::new("IContext").with_method(
                    SourceMethod::new("SetViews")
                        .with_parameter(SourceParameter::new("count", "unsigned int"))
                        .with_parameter(SourceParameter::new("views", "IView").with_pointer(2).with_array()),
                ),
            );
        let fixture = Fixture::new(tree).with_directives(
            Directives::new().with_parameter(
                "IContext::SetViews::count",
                crate::model::ParameterRule::default().with_relation("length(views)"),
            ),
        );
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let context = mapper.by_name("IContext").unwrap();
        let kinds: Vec<MethodKind> = context.methods.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MethodKind::Declared, MethodKind::InterfaceArrayOverload, MethodKind::RawOverload]
        );
        assert!(context.methods.iter().all(|m| m.offset == 3));
        assert!(context.methods[2].plan.is_some());
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_method_rule_translates_offset_and_disables_check() {
        let tree = DeclarationTree::new()
            .with_enum(SourceEnum::new("Result", "int"))
            .with_interface(SourceInterface::new("IFoo").with_method(SourceMethod::new("Run").returning("Result")));
        let rule = MethodRule {
            vtable_offset_translate: 2,
            check_return: Some(false),
            ..MethodRule::default()
        };
        let fixture = Fixture::new(tree).with_directives(Directives::new().with_method("IFoo::Run", rule));
        let mut mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        mapper.map_all(&mut sink);

        let run = mapper.by_name("IFoo").unwrap().method("Run").unwrap();
        assert_eq!(run.offset, 5);
        let text = run.plan.as_ref().map(|p| p.to_string()).unwrap_or_default();
        assert!(text.contains("vtbl[5]()"));
        assert!(!text.contains("check_error"));
    }

    #[test]
    fn test_free_function_calls_symbol() {
        let tree = DeclarationTree::new().with_function(
            SourceFunction::new("CreateDevice")
                .with_parameter(SourceParameter::new("flags", "unsigned int"))
                .with_parameter(SourceParameter::out("device", "IValue").with_pointer(2))
                .returning("int"),
        ).with_interface(value_interface());
        let fixture = Fixture::new(tree);
        let mapper = fixture.mapper();
        let mut sink = DiagnosticSink::new();
        let function = mapper.map_function(&fixture.tree.functions[0], &mut sink);

        assert_eq!(function.symbol, "CreateDevice");
        let text = function.plan.as_ref().map(|p| p.to_string()).unwrap_or_default();
        assert!(text.contains("__result = CreateDevice(flags, &device_);"));
        assert!(text.contains("device = wrap<IValue>(device_);"));
        assert_eq!(function.signature.parameters[1].direction, ParamDirection::Out);
    }
}
