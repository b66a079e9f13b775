//! Table of live editor instances keyed by element id.

use std::collections::HashMap;

use smol_str::SmolStr;

/// At most one instance per id.
///
/// The registry only stores; tearing an instance down is the caller's job,
/// done on whatever `insert` or `remove` hands back.
#[derive(Debug)]
pub struct InstanceRegistry<S> {
    instances: HashMap<SmolStr, S>,
}

impl<S> Default for InstanceRegistry<S> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

impl<S> InstanceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance` under `id`, returning the one it replaces.
    pub fn insert(&mut self, id: &str, instance: S) -> Option<S> {
        self.instances.insert(SmolStr::new(id), instance)
    }

    pub fn remove(&mut self, id: &str) -> Option<S> {
        self.instances.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&S> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut S> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(SmolStr::as_str)
    }

    /// Remove every instance, e.g. on page unload.
    pub fn drain(&mut self) -> Vec<(SmolStr, S)> {
        self.instances.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_prior_instance() {
        let mut registry = InstanceRegistry::new();
        assert_eq!(registry.insert("editor", 1), None);
        assert_eq!(registry.insert("editor", 2), Some(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("editor"), Some(&2));
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut registry: InstanceRegistry<u32> = InstanceRegistry::new();
        assert_eq!(registry.remove("nope"), None);
        registry.insert("a", 7);
        assert_eq!(registry.remove("a"), Some(7));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_and_drain() {
        let mut registry = InstanceRegistry::new();
        registry.insert("a", ());
        registry.insert("b", ());
        let mut ids: Vec<_> = registry.ids().collect();
        ids.sort();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(registry.drain().len(), 2);
        assert!(!registry.contains("a"));
    }
}
