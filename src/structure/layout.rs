// Mon Oct 12 2026 - Alex

use crate::marshal::{DefaultConstructorPlan, NativeStructPlan};
use crate::structure::{AggregateId, Alignment, Size, TargetField};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Size and alignment of an aggregate at one pointer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LayoutMetrics {
    pub pointer_size: usize,
    pub size: Size,
    /// End of the last field, before trailing padding. Derived aggregates start here.
    pub data_size: Size,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetAggregate {
    pub name: String,
    fields: Vec<TargetField>,
    #[serde(skip)]
    field_map: HashMap<String, usize>,
    pub base_name: Option<String>,
    pub base: Option<AggregateId>,
    pub is_union: bool,
    pub explicit_layout: bool,
    pub pack: Option<Alignment>,
    pub custom_marshal: bool,
    pub generate_as_class: bool,
    pub layout: LayoutMetrics,
    pub alternate_layout: LayoutMetrics,
    pub is_laid_out: bool,
    pub is_valid: bool,
    pub needs_native_shadow: bool,
    pub native: Option<NativeStructPlan>,
    pub default_constructor: Option<DefaultConstructorPlan>,
}

impl TargetAggregate {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            field_map: HashMap::new(),
            base_name: None,
            base: None,
            is_union: false,
            explicit_layout: false,
            pack: None,
            custom_marshal: false,
            generate_as_class: false,
            layout: LayoutMetrics::default(),
            alternate_layout: LayoutMetrics::default(),
            is_laid_out: false,
            is_valid: true,
            needs_native_shadow: false,
            native: None,
            default_constructor: None,
        }
    }

    pub fn add_field(&mut self, field: TargetField) {
        let index = self.fields.len();
        self.field_map.insert(field.native_name.clone(), index);
        self.fields.push(field);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [TargetField] {
        &mut self.fields
    }

    /// Looks a member up by its native name.
    pub fn get_field(&self, name: &str) -> Option<&TargetField> {
        self.field_map.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_map.get(name).copied()
    }

    pub fn size(&self) -> Size {
        self.layout.size
    }

    pub fn alignment(&self) -> Alignment {
        self.layout.alignment
    }

    pub fn metrics_for(&self, pointer_size: usize) -> LayoutMetrics {
        if self.alternate_layout.pointer_size == pointer_size {
            self.alternate_layout
        } else {
            self.layout
        }
    }

    pub fn has_bitfields(&self) -> bool {
        self.fields.iter().any(|f| f.is_bit_field())
    }
}

impl fmt::Display for TargetAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_union { "union" } else { "struct" };
        write!(f, "{} {}", kind, self.name)?;
        if let Some(base) = &self.base_name {
            write!(f, " : {}", base)?;
        }
        writeln!(f, " (size {}, align {})", self.layout.size, self.layout.alignment.as_usize())?;
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        Ok(())
    }
}
