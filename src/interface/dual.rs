// Mon Oct 12 2026 - Alex

use crate::interface::TargetInterface;
use crate::model::{InterfaceRule, Visibility};

/// Internal twin of a dual-callback interface, dispatching straight through the vtable.
///
/// Every method is cloned; those not kept public get the reserved suffix and
/// internal visibility so they do not collide with the public surface.
pub fn native_shadow(
    interface: &TargetInterface,
    rule: Option<&InterfaceRule>,
    base: String,
    name_suffix: &str,
    reserved_suffix: &str,
) -> TargetInterface {
    let name = rule
        .and_then(|r| r.native_callback_name.clone())
        .unwrap_or_else(|| format!("{}{}", interface.name, name_suffix));

    let mut shadow = TargetInterface::new(&name, &interface.native_name);
    shadow.include = interface.include.clone();
    shadow.guid = interface.guid.clone();
    shadow.base = Some(base);
    shadow.visibility = rule
        .and_then(|r| r.native_callback_visibility)
        .unwrap_or(Visibility::Internal);
    shadow.is_callback = false;
    shadow.is_dual_callback = true;
    shadow.is_native_shadow = true;
    shadow.shadow_of = Some(interface.name.clone());
    shadow.vtable = interface.vtable.clone();
    shadow.fully_mapped = true;

    shadow.methods = interface
        .methods
        .iter()
        .map(|method| {
            let mut clone = method.clone();
            if !method.keep_implement_public {
                clone.visibility = Visibility::Internal;
                clone.name.push_str(reserved_suffix);
            }
            clone
        })
        .collect();

    log::debug!("Created native shadow {} for {}", shadow.name, interface.name);
    shadow
}
