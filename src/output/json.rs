// Mon Oct 12 2026 - Alex

use crate::orchestration::{RunOutcome, TargetModel};
use crate::structure::TargetAggregate;
use serde_json::{json, to_string, to_string_pretty, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const FORMAT_VERSION: &str = "1";

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

/// Writes a run's target model, plus optional layout table and diagnostics, as JSON.
pub struct JsonExporter {
    pretty_print: bool,
    include_layouts: bool,
    include_diagnostics: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self {
            pretty_print: true,
            include_layouts: true,
            include_diagnostics: true,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_layouts(mut self, include: bool) -> Self {
        self.include_layouts = include;
        self
    }

    pub fn with_diagnostics(mut self, include: bool) -> Self {
        self.include_diagnostics = include;
        self
    }

    pub fn serialize(&self, outcome: &RunOutcome) -> Result<String, JsonError> {
        let value = self.build_json_value(outcome)?;

        if self.pretty_print {
            to_string_pretty(&value).map_err(|e| JsonError::SerializationError(e.to_string()))
        } else {
            to_string(&value).map_err(|e| JsonError::SerializationError(e.to_string()))
        }
    }

    pub fn serialize_to_file<P: AsRef<Path>>(&self, outcome: &RunOutcome, path: P) -> Result<(), JsonError> {
        let json_str = self.serialize(outcome)?;
        let file = File::create(path.as_ref()).map_err(|e| JsonError::IoError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(json_str.as_bytes())
            .map_err(|e| JsonError::IoError(e.to_string()))?;
        writer.flush().map_err(|e| JsonError::IoError(e.to_string()))?;
        Ok(())
    }

    fn build_json_value(&self, outcome: &RunOutcome) -> Result<Value, JsonError> {
        let mut root = serde_json::Map::new();
        root.insert("version".to_string(), json!(FORMAT_VERSION));
        root.insert("model".to_string(), self.serialize_model(&outcome.model)?);

        if self.include_layouts {
            root.insert("layouts".to_string(), self.serialize_layouts(&outcome.model));
        }
        if self.include_diagnostics {
            let report = serde_json::to_value(&outcome.report).map_err(|e| JsonError::SerializationError(e.to_string()))?;
            root.insert("diagnostics".to_string(), report);
        }

        Ok(Value::Object(root))
    }

    fn serialize_model(&self, model: &TargetModel) -> Result<Value, JsonError> {
        serde_json::to_value(model).map_err(|e| JsonError::SerializationError(e.to_string()))
    }

    /// Compact offset table, one entry per aggregate.
    fn serialize_layouts(&self, model: &TargetModel) -> Value {
        let mut map = serde_json::Map::new();
        for aggregate in &model.aggregates {
            map.insert(aggregate.name.clone(), self.serialize_layout(aggregate));
        }
        Value::Object(map)
    }

    fn serialize_layout(&self, aggregate: &TargetAggregate) -> Value {
        let fields: Vec<Value> = aggregate
            .fields()
            .iter()
            .map(|field| {
                let mut entry = json!({
                    "name": field.name,
                    "offset": format!("0x{:x}", field.offset.as_u64()),
                    "size": field.size.as_usize(),
                    "type": field.public_type.qualified_name(),
                    "strategy": field.strategy.map(|s| s.name()),
                });
                if field.is_bit_field() {
                    entry["bit_offset"] = json!(field.bit_offset);
                    entry["bit_mask"] = json!(format!("0x{:x}", field.bit_mask));
                }
                entry
            })
            .collect();

        json!({
            "size": aggregate.size().as_usize(),
            "alignment": aggregate.alignment().as_usize(),
            "valid": aggregate.is_valid,
            "native_shadow": aggregate.needs_native_shadow,
            "fields": fields,
        })
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_json_string(outcome: &RunOutcome) -> Result<String, JsonError> {
    JsonExporter::new().serialize(outcome)
}

pub fn to_json_file<P: AsRef<Path>>(outcome: &RunOutcome, path: P) -> Result<(), JsonError> {
    JsonExporter::new().serialize_to_file(outcome, path)
}
