//! Descriptor ordering policy.

use std::sync::Arc;

use crate::modules::info::ModuleInfo;

/// Sort descriptors by `(name, description)` and move the home page
/// (`path == "/"`) to the front, preserving the relative order of the
/// rest.
///
/// Only one descriptor is expected to claim the root path; if several
/// do, the first in the sorted sequence wins the pin.
pub fn sort_module_infos(infos: &mut Vec<Arc<ModuleInfo>>) {
    infos.sort();

    if let Some(position) = infos.iter().position(|info| info.path() == Some("/")) {
        let home = infos.remove(position);
        infos.insert(0, home);
    }
}
