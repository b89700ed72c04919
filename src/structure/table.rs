// Mon Oct 12 2026 - Alex

use crate::binding::TargetType;
use crate::structure::{LayoutError, TargetAggregate};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Non-owning handle into an [`AggregateTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AggregateId(pub usize);

/// Arena of every aggregate in a run, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    aggregates: Vec<TargetAggregate>,
    index: IndexMap<String, AggregateId>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregate. A second aggregate with an existing name is ignored.
    pub fn insert(&mut self, aggregate: TargetAggregate) -> AggregateId {
        if let Some(&id) = self.index.get(&aggregate.name) {
            log::warn!("Duplicate aggregate '{}' ignored", aggregate.name);
            return id;
        }
        let id = AggregateId(self.aggregates.len());
        self.index.insert(aggregate.name.clone(), id);
        self.aggregates.push(aggregate);
        id
    }

    pub fn get(&self, id: AggregateId) -> &TargetAggregate {
        &self.aggregates[id.0]
    }

    pub fn get_mut(&mut self, id: AggregateId) -> &mut TargetAggregate {
        &mut self.aggregates[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<AggregateId> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&TargetAggregate> {
        self.id_of(name).map(|id| self.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = AggregateId> {
        (0..self.aggregates.len()).map(AggregateId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetAggregate> {
        self.aggregates.iter()
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn into_aggregates(self) -> Vec<TargetAggregate> {
        self.aggregates
    }

    /// Resolves every `base_name` to a handle.
    pub fn link_bases(&mut self) -> Vec<LayoutError> {
        let mut errors = Vec::new();
        for i in 0..self.aggregates.len() {
            let Some(base_name) = self.aggregates[i].base_name.clone() else {
                continue;
            };
            match self.id_of(&base_name) {
                Some(base) if base.0 != i => self.aggregates[i].base = Some(base),
                _ => errors.push(LayoutError::UnknownBase {
                    aggregate: self.aggregates[i].name.clone(),
                    base: base_name,
                }),
            }
        }
        errors
    }

    /// Aggregates this one needs laid out first: its base and by-value nested aggregates.
    pub fn dependencies(&self, id: AggregateId) -> Vec<AggregateId> {
        let aggregate = self.get(id);
        let mut deps: Vec<AggregateId> = aggregate.base.into_iter().collect();
        for field in aggregate.fields() {
            if field.is_pointer_slot() {
                continue;
            }
            if let TargetType::Struct(name) = &field.marshal_type {
                if let Some(dep) = self.id_of(name) {
                    if !deps.contains(&dep) {
                        deps.push(dep);
                    }
                }
            }
        }
        deps
    }

    /// Orders aggregates so dependencies come first. Members of a by-value
    /// cycle are reported and left out of the order.
    pub fn dependency_order(&self) -> (Vec<AggregateId>, Vec<LayoutError>) {
        let mut marks = vec![Mark::Unvisited; self.aggregates.len()];
        let mut order = Vec::with_capacity(self.aggregates.len());
        let mut cyclic = HashSet::new();
        let mut stack = Vec::new();

        for id in self.ids() {
            self.visit(id, &mut marks, &mut stack, &mut cyclic, &mut order);
        }

        let mut errors: Vec<LayoutError> = cyclic
            .iter()
            .map(|id: &AggregateId| LayoutError::CyclicAggregate(self.get(*id).name.clone()))
            .collect();
        errors.sort_by(|a, b| a.location().cmp(&b.location()));
        order.retain(|id| !cyclic.contains(id));
        (order, errors)
    }

    fn visit(
        &self,
        id: AggregateId,
        marks: &mut [Mark],
        stack: &mut Vec<AggregateId>,
        cyclic: &mut HashSet<AggregateId>,
        order: &mut Vec<AggregateId>,
    ) {
        match marks[id.0] {
            Mark::Done => return,
            Mark::InProgress => {
                if let Some(start) = stack.iter().position(|&s| s == id) {
                    cyclic.extend(stack[start..].iter().copied());
                }
                return;
            }
            Mark::Unvisited => {}
        }

        marks[id.0] = Mark::InProgress;
        stack.push(id);
        for dep in self.dependencies(id) {
            self.visit(dep, marks, stack, cyclic, order);
        }
        stack.pop();
        marks[id.0] = Mark::Done;
        order.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::TargetField;

    fn aggregate_with_nested(name: &str, nested: &str) -> TargetAggregate {
        let mut aggregate = TargetAggregate::new(name);
        aggregate.add_field(TargetField::new("inner", TargetType::Struct(nested.to_string())));
        aggregate
    }

    #[test]
    fn test_dependencies_come_first() {
        let mut table = AggregateTable::new();
        let outer = table.insert(aggregate_with_nested("Outer", "Inner"));
        let inner = table.insert(TargetAggregate::new("Inner"));

        let (order, errors) = table.dependency_order();
        assert!(errors.is_empty());
        assert_eq!(order, vec![inner, outer]);
    }

    #[test]
    fn test_cycles_are_reported_and_excluded() {
        let mut table = AggregateTable::new();
        table.insert(aggregate_with_nested("A", "B"));
        table.insert(aggregate_with_nested("B", "A"));
        let standalone = table.insert(TargetAggregate::new("C"));

        let (order, errors) = table.dependency_order();
        assert_eq!(order, vec![standalone]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_pointer_members_are_not_dependencies() {
        let mut table = AggregateTable::new();
        let mut node = TargetAggregate::new("Node");
        let mut next = TargetField::new("next", TargetType::Struct("Node".to_string()));
        next.pointer_depth = 1;
        node.add_field(next);
        let id = table.insert(node);

        let (order, errors) = table.dependency_order();
        assert!(errors.is_empty());
        assert_eq!(order, vec![id]);
    }

    #[test]
    fn test_link_bases_reports_unknown_base() {
        let mut table = AggregateTable::new();
        let mut derived = TargetAggregate::new("Derived");
        derived.base_name = Some("Missing".to_string());
        table.insert(derived);

        let errors = table.link_bases();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), crate::diagnostics::DiagnosticCode::UnknownBase);
    }
}
