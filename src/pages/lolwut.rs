//! LOLWUT, presented by Redis.
//!
//! Registered but on the built-in ignore list: the page renders art via
//! a Redis `LOLWUT` command, and this deployment carries no Redis.
//! Removing `lolwut.*` from the ignore list without providing one makes
//! the loader report the violation below.

use crate::modules::info::ModuleInfo;
use crate::modules::loader::ModuleError;

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    Err(ModuleError::Unavailable(
        "the LOLWUT page needs a configured Redis connection".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_unavailable() {
        let err = module_info().unwrap_err();
        assert!(matches!(err, ModuleError::Unavailable(_)));
    }
}
