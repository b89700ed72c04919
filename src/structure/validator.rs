// Mon Oct 12 2026 - Alex

use crate::structure::{ComputedLayout, LayoutError, TargetAggregate};

/// Checks that explicitly laid out aggregates keep their offsets across pointer widths.
pub struct PortabilityValidator;

impl PortabilityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Reports the first field whose offset moves between the two layouts.
    /// Custom-marshalled aggregates are exempt.
    pub fn check(
        &self,
        aggregate: &TargetAggregate,
        primary: &ComputedLayout,
        alternate: &ComputedLayout,
    ) -> Option<LayoutError> {
        if !aggregate.explicit_layout || aggregate.custom_marshal {
            return None;
        }

        aggregate
            .fields()
            .iter()
            .zip(primary.placements.iter().zip(alternate.placements.iter()))
            .find(|(_, (a, b))| a.offset != b.offset)
            .map(|(field, (a, b))| LayoutError::NonPortableAlignment {
                aggregate: aggregate.name.clone(),
                field: field.name.clone(),
                offset: a.offset.as_u64(),
                alternate_offset: b.offset.as_u64(),
                pointer_size: primary.metrics.pointer_size,
                alternate_pointer_size: alternate.metrics.pointer_size,
            })
    }

    /// Fields whose offset is not a multiple of their natural alignment.
    pub fn misaligned_fields(aggregate: &TargetAggregate, layout: &ComputedLayout) -> Vec<String> {
        aggregate
            .fields()
            .iter()
            .zip(layout.placements.iter())
            .filter(|(_, placement)| !placement.offset.is_aligned(placement.alignment.as_usize()))
            .map(|(field, _)| field.name.clone())
            .collect()
    }
}

impl Default for PortabilityValidator {
    fn default() -> Self {
        Self::new()
    }
}
