// Mon Oct 12 2026 - Alex

use crate::binding::{ArraySpecification, TargetType};
use crate::structure::bitfield::BitfieldAllocator;
use crate::structure::{
    AggregateTable, Alignment, LayoutError, LayoutMetrics, Offset, PortabilityValidator, Size, TargetAggregate,
    TargetField,
};

/// Where one field landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlacement {
    pub offset: Offset,
    pub size: Size,
    pub alignment: Alignment,
    pub bit_offset: u32,
    pub bit_mask: u64,
    pub storage: Option<String>,
}

/// Layout of one aggregate at one pointer width, in field order.
#[derive(Debug, Clone)]
pub struct ComputedLayout {
    pub metrics: LayoutMetrics,
    pub placements: Vec<FieldPlacement>,
    pub issues: Vec<LayoutError>,
}

impl ComputedLayout {
    pub fn offset_of(&self, index: usize) -> Option<Offset> {
        self.placements.get(index).map(|p| p.offset)
    }
}

/// Primary and alternate-width layouts plus everything worth reporting.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub primary: ComputedLayout,
    pub alternate: ComputedLayout,
    pub errors: Vec<LayoutError>,
}

impl LayoutResult {
    /// Writes the primary placements back into the aggregate's fields.
    pub fn apply(self, aggregate: &mut TargetAggregate) {
        for (field, placement) in aggregate.fields_mut().iter_mut().zip(self.primary.placements) {
            field.offset = placement.offset;
            field.size = placement.size;
            field.alignment = placement.alignment;
            field.bit_offset = placement.bit_offset;
            field.bit_mask = placement.bit_mask;
            field.storage = placement.storage;
        }
        aggregate.layout = self.primary.metrics;
        aggregate.alternate_layout = self.alternate.metrics;
        aggregate.is_laid_out = true;
    }
}

/// Computes byte offsets, sizes and bit placement for aggregates.
///
/// Nested and base aggregates are read from the table and must already be
/// laid out; callers walk the table in dependency order.
pub struct LayoutEngine<'a> {
    table: &'a AggregateTable,
    pointer_size: usize,
    alternate_pointer_size: usize,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(table: &'a AggregateTable, pointer_size: usize) -> Self {
        Self {
            table,
            pointer_size,
            alternate_pointer_size: if pointer_size == 8 { 4 } else { 8 },
        }
    }

    pub fn with_alternate_pointer_size(mut self, size: usize) -> Self {
        self.alternate_pointer_size = size;
        self
    }

    /// Lays the aggregate out at both pointer widths and checks portability.
    pub fn layout(&self, aggregate: &TargetAggregate) -> LayoutResult {
        let primary = self.compute_layout(aggregate, self.pointer_size);
        let alternate = self.compute_layout(aggregate, self.alternate_pointer_size);

        let mut errors = primary.issues.clone();
        errors.extend(PortabilityValidator::new().check(aggregate, &primary, &alternate));

        let misaligned = PortabilityValidator::misaligned_fields(aggregate, &primary);
        if !misaligned.is_empty() {
            log::debug!("{} has packed members: {}", aggregate.name, misaligned.join(", "));
        }

        LayoutResult {
            primary,
            alternate,
            errors,
        }
    }

    /// Pure layout of one aggregate at the given pointer width.
    pub fn compute_layout(&self, aggregate: &TargetAggregate, pointer_size: usize) -> ComputedLayout {
        let (start, base_alignment) = match aggregate.base.map(|id| self.table.get(id)) {
            Some(base) => {
                let metrics = base.metrics_for(pointer_size);
                (metrics.data_size.as_u64(), metrics.alignment)
            }
            None => (0, Alignment::one()),
        };

        if aggregate.is_union {
            self.compute_union(aggregate, pointer_size, start, base_alignment)
        } else {
            self.compute_sequential(aggregate, pointer_size, start, base_alignment)
        }
    }

    fn compute_sequential(
        &self,
        aggregate: &TargetAggregate,
        pointer_size: usize,
        start: u64,
        base_alignment: Alignment,
    ) -> ComputedLayout {
        let mut placements = Vec::with_capacity(aggregate.fields().len());
        let mut issues = Vec::new();
        let mut max_alignment = base_alignment;
        let mut bits = BitfieldAllocator::new();

        let mut unit_start = start;
        let mut unit_size = 0u64;
        let mut previous_rank: Option<u32> = None;

        for field in aggregate.fields() {
            let (size, natural, issue) = self.field_metrics(aggregate, field, pointer_size);
            issues.extend(issue);
            let alignment = natural.packed(aggregate.pack);
            max_alignment = max_alignment.max(alignment);

            let rank = field.rank.unwrap_or_else(|| previous_rank.map(|r| r + 1).unwrap_or(0));
            if previous_rank == Some(rank) {
                unit_size = unit_size.max(size.as_u64());
            } else {
                unit_start = alignment.align(unit_start + unit_size);
                unit_size = size.as_u64();
                previous_rank = Some(rank);
                bits.close_run();
            }

            let mut placement = FieldPlacement {
                offset: Offset::new(unit_start),
                size,
                alignment,
                bit_offset: 0,
                bit_mask: 0,
                storage: None,
            };
            if let Some(decl) = &field.bitfield {
                let placed = bits.place(decl);
                placement.bit_offset = placed.bit_offset;
                placement.bit_mask = placed.bit_mask;
                placement.storage = Some(placed.storage);
            }
            placements.push(placement);
        }

        let data_size = unit_start + unit_size;
        ComputedLayout {
            metrics: LayoutMetrics {
                pointer_size,
                size: Size::new(max_alignment.align(data_size) as usize),
                data_size: Size::new(data_size as usize),
                alignment: max_alignment,
            },
            placements,
            issues,
        }
    }

    fn compute_union(
        &self,
        aggregate: &TargetAggregate,
        pointer_size: usize,
        start: u64,
        base_alignment: Alignment,
    ) -> ComputedLayout {
        let mut placements = Vec::with_capacity(aggregate.fields().len());
        let mut issues = Vec::new();
        let mut max_alignment = base_alignment;
        let mut largest = 0u64;

        for field in aggregate.fields() {
            let (size, natural, issue) = self.field_metrics(aggregate, field, pointer_size);
            issues.extend(issue);
            let alignment = natural.packed(aggregate.pack);
            max_alignment = max_alignment.max(alignment);
            largest = largest.max(size.as_u64());

            let (bit_offset, bit_mask, storage) = match &field.bitfield {
                Some(decl) => (
                    decl.position.unwrap_or(0),
                    super::bitfield::mask_for(decl.width),
                    Some(format!("_bitfield{}", placements.len())),
                ),
                None => (0, 0, None),
            };
            placements.push(FieldPlacement {
                offset: Offset::new(start),
                size,
                alignment,
                bit_offset,
                bit_mask,
                storage,
            });
        }

        let data_size = start + largest;
        ComputedLayout {
            metrics: LayoutMetrics {
                pointer_size,
                size: Size::new(max_alignment.align(data_size) as usize),
                data_size: Size::new(data_size as usize),
                alignment: max_alignment,
            },
            placements,
            issues,
        }
    }

    /// Size and natural alignment of a field at the given pointer width.
    pub fn field_metrics(
        &self,
        aggregate: &TargetAggregate,
        field: &TargetField,
        pointer_size: usize,
    ) -> (Size, Alignment, Option<LayoutError>) {
        if !field.is_valid {
            return (Size::zero(), Alignment::one(), None);
        }
        if field.is_pointer_slot() {
            return (Size::new(pointer_size), Alignment::from_size(pointer_size), None);
        }

        let (element_size, element_alignment) = self.element_metrics(&field.marshal_type, pointer_size);
        match &field.array {
            ArraySpecification::Constant(dimension) => {
                (element_size.times(*dimension as usize), element_alignment, None)
            }
            ArraySpecification::Undefined if field.is_array => {
                let issue = LayoutError::UnknownArrayDimension {
                    aggregate: aggregate.name.clone(),
                    field: field.name.clone(),
                };
                (element_size, element_alignment, Some(issue))
            }
            _ => (element_size, element_alignment, None),
        }
    }

    fn element_metrics(&self, target: &TargetType, pointer_size: usize) -> (Size, Alignment) {
        match target {
            TargetType::Struct(name) => match self.table.by_name(name) {
                Some(nested) if nested.is_laid_out && nested.is_valid => {
                    let metrics = nested.metrics_for(pointer_size);
                    (metrics.size, metrics.alignment)
                }
                _ => {
                    log::warn!("Aggregate '{}' used by value before it was laid out", name);
                    (Size::zero(), Alignment::one())
                }
            },
            other => {
                let size = other.scalar_size(pointer_size).unwrap_or(0);
                (Size::new(size), Alignment::from_size(size))
            }
        }
    }
}
