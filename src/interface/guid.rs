// Mon Oct 12 2026 - Alex

use crate::model::{DeclarationTree, SourceInterface};
use std::collections::HashSet;

pub fn iid_key(interface: &str) -> String {
    format!("IID_{}", interface)
}

/// Recovers interface identities from declared `IID_<name>` constants.
pub struct GuidResolver<'a> {
    tree: &'a DeclarationTree,
}

impl<'a> GuidResolver<'a> {
    pub fn new(tree: &'a DeclarationTree) -> Self {
        Self { tree }
    }

    /// Explicit identity first, then the `IID_` constant in the interface's
    /// own include, then in each ancestor's include. `None` is not an error.
    pub fn resolve(&self, interface: &SourceInterface) -> Option<String> {
        if let Some(guid) = interface.guid.as_ref().filter(|g| !g.is_empty()) {
            return Some(guid.clone());
        }

        let key = iid_key(&interface.name);
        let mut visited = HashSet::new();
        let mut current = Some(interface);
        while let Some(scope) = current {
            if !visited.insert(scope.name.as_str()) {
                break;
            }
            if let Some(guid) = self.tree.guid_in(&scope.include, &key) {
                return Some(guid.to_string());
            }
            current = scope.base.as_deref().and_then(|base| self.tree.interface(base));
        }

        log::debug!("No identity found for {}", interface.name);
        None
    }
}
