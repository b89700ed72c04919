// Mon Oct 12 2026 - Alex

use crate::binding::{BindingTable, TargetType};
use crate::model::{DeclarationTree, Directives};
use crate::orchestration::RunError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a run consumes, as produced by the header parser and the
/// directive loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInput {
    pub tree: DeclarationTree,
    #[serde(default)]
    pub directives: Directives,
    /// Bindings layered over the fundamental defaults.
    #[serde(default)]
    pub bindings: IndexMap<String, TargetType>,
}

impl RunInput {
    pub fn new(tree: DeclarationTree, directives: Directives) -> Self {
        Self {
            tree,
            directives,
            bindings: IndexMap::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, RunError> {
        serde_json::from_str(text).map_err(|e| RunError::Input(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, RunError> {
        let text = std::fs::read_to_string(path).map_err(|e| RunError::Input(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn binding_table(&self) -> BindingTable {
        let mut table = BindingTable::with_fundamentals();
        for (native_name, target) in &self.bindings {
            table.bind(native_name, target.clone());
        }
        table
    }
}
