//! Static instance catalog
//!
//! The catalog is compiled-in constant data. It is never mutated, so lookups
//! from any number of threads need no synchronization.

use cluster_cost_core::{CostError, Result, VmInstance};

/// Every machine the estimator knows about, keyed by `name`
pub static CATALOG: [VmInstance; 5] = [
    VmInstance { name: "DS4_V2", vcpus: 8, dbus: 1.5, cost_per_hour: 0.5219, ram_gb: 32.0 },
    VmInstance { name: "D4A_V4", vcpus: 4, dbus: 0.75, cost_per_hour: 0.2207, ram_gb: 16.0 },
    VmInstance { name: "D8A_V4", vcpus: 8, dbus: 1.5, cost_per_hour: 0.4414, ram_gb: 32.0 },
    VmInstance { name: "E4DS_V5", vcpus: 4, dbus: 1.5, cost_per_hour: 0.3320, ram_gb: 24.0 },
    VmInstance { name: "D4DS_V5", vcpus: 4, dbus: 1.0, cost_per_hour: 0.2610, ram_gb: 16.0 },
];

/// Look up an instance by its exact catalog name
pub fn resolve(name: &str) -> Result<&'static VmInstance> {
    CATALOG
        .iter()
        .find(|instance| instance.name == name)
        .ok_or_else(|| CostError::unknown_instance(name))
}

/// All catalog entries, in catalog order
pub fn instances() -> &'static [VmInstance] {
    &CATALOG
}

/// Catalog names, in catalog order
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|instance| instance.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_known_instance() {
        let instance = resolve("D4A_V4").unwrap();
        assert_eq!(instance.vcpus, 4);
        assert_eq!(instance.dbus, 0.75);
        assert_eq!(instance.cost_per_hour, 0.2207);
        assert_eq!(instance.ram_gb, 16.0);
    }

    #[test]
    fn test_resolve_unknown_instance() {
        let err = resolve("M5_XLARGE").unwrap_err();
        assert_eq!(err, CostError::UnknownInstance("M5_XLARGE".to_string()));

        // Names are exact keys
        assert!(resolve("d4a_v4").is_err());
    }

    #[test]
    fn test_names_are_unique() {
        let unique: HashSet<&str> = names().collect();
        assert_eq!(unique.len(), CATALOG.len());
        assert_eq!(instances().len(), 5);
    }

    #[test]
    fn test_entries_are_positive() {
        for instance in instances() {
            assert!(instance.vcpus > 0, "{}", instance.name);
            assert!(instance.dbus > 0.0, "{}", instance.name);
            assert!(instance.cost_per_hour > 0.0, "{}", instance.name);
            assert!(instance.ram_gb > 0.0, "{}", instance.name);
        }
    }
}
