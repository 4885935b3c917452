//! In-memory copy of the server's module list
//!
//! The collection mirrors server state and is only changed through the four
//! reconciliation operations below. Ids are not checked for uniqueness.

use mlmod_protocol::common::MachineLearningModule;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleCollection {
    modules: Vec<MachineLearningModule>,
}

impl ModuleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh server listing
    pub fn replace_all(&mut self, modules: Vec<MachineLearningModule>) {
        self.modules = modules;
    }

    /// Add a newly created module at the end
    pub fn append(&mut self, module: MachineLearningModule) {
        self.modules.push(module);
    }

    /// Swap in the server's copy of a module, keeping its position
    ///
    /// Every element whose id matches is replaced; if none match the
    /// collection is left as it was. Returns the number of replaced elements.
    pub fn replace_by_id(&mut self, module: &MachineLearningModule) -> usize {
        let mut replaced = 0;
        for slot in self.modules.iter_mut().filter(|m| m.id == module.id) {
            *slot = module.clone();
            replaced += 1;
        }
        replaced
    }

    /// Drop every module with the given id. Returns the number removed.
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let before = self.modules.len();
        self.modules.retain(|m| m.id != id);
        before - self.modules.len()
    }

    pub fn get(&self, id: &str) -> Option<&MachineLearningModule> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn as_slice(&self) -> &[MachineLearningModule] {
        &self.modules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MachineLearningModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModuleCollection {
    type Item = &'a MachineLearningModule;
    type IntoIter = std::slice::Iter<'a, MachineLearningModule>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::*;
    use proptest::prelude::*;

    fn ids(collection: &ModuleCollection) -> Vec<String> {
        collection.iter().map(|m| m.id.clone()).collect()
    }

    mod unit {
        use super::*;

        #[test]
        fn test_replace_all_discards_previous_contents() {
            let mut collection = ModuleCollection::new();
            collection.append(sample_module("old", "random_forest"));

            collection.replace_all(vec![
                sample_module("b", "neural_network"),
                sample_module("a", "random_forest"),
            ]);

            assert_eq!(ids(&collection), vec!["b", "a"]);
        }

        #[test]
        fn test_append_keeps_insertion_order() {
            let mut collection = ModuleCollection::new();
            collection.append(sample_module("1", "random_forest"));
            collection.append(sample_module("2", "neural_network"));
            assert_eq!(ids(&collection), vec!["1", "2"]);
        }

        #[test]
        fn test_replace_by_id_keeps_position() {
            let mut collection = ModuleCollection::new();
            collection.replace_all(vec![
                sample_module("1", "random_forest"),
                sample_module("2", "random_forest"),
                sample_module("3", "random_forest"),
            ]);

            let replaced = collection.replace_by_id(&sample_module("2", "linear_regression"));

            assert_eq!(replaced, 1);
            assert_eq!(ids(&collection), vec!["1", "2", "3"]);
            assert_eq!(collection.get("2").unwrap().model_type, "linear_regression");
            assert_eq!(collection.get("1").unwrap().model_type, "random_forest");
        }

        #[test]
        fn test_replace_unknown_id_is_noop() {
            let mut collection = ModuleCollection::new();
            collection.append(sample_module("1", "random_forest"));
            let before = collection.clone();

            assert_eq!(collection.replace_by_id(&sample_module("9", "neural_network")), 0);
            assert_eq!(collection, before);
        }

        #[test]
        fn test_remove_last_module_empties_collection() {
            let mut collection = ModuleCollection::new();
            collection.append(sample_module("1", "random_forest"));

            assert_eq!(collection.remove_by_id("1"), 1);
            assert!(collection.is_empty());
        }

        #[test]
        fn test_duplicate_ids_are_all_reconciled() {
            let mut collection = ModuleCollection::new();
            collection.replace_all(vec![
                sample_module("1", "random_forest"),
                sample_module("1", "random_forest"),
            ]);

            assert_eq!(collection.replace_by_id(&sample_module("1", "neural_network")), 2);
            assert_eq!(collection.remove_by_id("1"), 2);
        }
    }

    mod properties {
        use super::*;

        fn id_list() -> impl Strategy<Value = Vec<String>> {
            prop::collection::hash_set("[a-z0-9]{1,6}", 0..12)
                .prop_map(|set| set.into_iter().collect())
        }

        fn collection_of(ids: &[String]) -> ModuleCollection {
            let mut collection = ModuleCollection::new();
            collection.replace_all(
                ids.iter()
                    .map(|id| sample_module(id, "random_forest"))
                    .collect(),
            );
            collection
        }

        proptest! {
            #[test]
            fn test_remove_drops_exactly_one(ids in id_list(), pick in any::<prop::sample::Index>()) {
                prop_assume!(!ids.is_empty());
                let target = ids[pick.index(ids.len())].clone();
                let mut collection = collection_of(&ids);

                collection.remove_by_id(&target);

                let expected: Vec<String> = ids.iter().filter(|id| **id != target).cloned().collect();
                prop_assert_eq!(super::ids(&collection), expected);
            }

            #[test]
            fn test_replace_changes_only_target(ids in id_list(), pick in any::<prop::sample::Index>()) {
                prop_assume!(!ids.is_empty());
                let target = ids[pick.index(ids.len())].clone();
                let original = collection_of(&ids);
                let mut collection = original.clone();

                collection.replace_by_id(&sample_module(&target, "neural_network"));

                prop_assert_eq!(super::ids(&collection), ids.clone());
                for (before, after) in original.iter().zip(collection.iter()) {
                    if before.id == target {
                        prop_assert_eq!(after.model_type.as_str(), "neural_network");
                    } else {
                        prop_assert_eq!(before, after);
                    }
                }
            }

            #[test]
            fn test_append_puts_module_last(ids in id_list()) {
                let mut collection = collection_of(&ids);
                collection.append(sample_module("appended", "neural_network"));

                prop_assert_eq!(collection.len(), ids.len() + 1);
                prop_assert_eq!(collection.as_slice().last().unwrap().id.as_str(), "appended");
            }
        }
    }
}
