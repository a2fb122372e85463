use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::model::Named;

/// Named definitions of one kind, unique per name.
///
/// Merging replaces whole definitions; a redefinition never merges
/// field-by-field with the version it shadows.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionCollection<T> {
    definitions: BTreeMap<String, T>,
}

impl<T> Default for DefinitionCollection<T> {
    fn default() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }
}

impl<T: Named> DefinitionCollection<T> {
    /// Build a collection from a name-keyed map, stamping each key into
    /// the definition it points at.
    pub fn from_map(mut definitions: BTreeMap<String, T>) -> Self {
        for (name, definition) in definitions.iter_mut() {
            definition.set_name(name);
        }
        Self { definitions }
    }
}

impl<T> DefinitionCollection<T> {
    /// Look up a definition by name. Absence is expected; callers decide
    /// whether a miss is an error.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.definitions.iter()
    }

    /// Layer `other` on top of this collection. Every name present in
    /// `other` replaces this collection's entry outright; names only
    /// present here are kept.
    pub fn merge(mut self, other: Self) -> Self {
        self.definitions.extend(other.definitions);
        self
    }
}

impl<'de, T> Deserialize<'de> for DefinitionCollection<T>
where
    T: Deserialize<'de> + Named,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let definitions = BTreeMap::<String, T>::deserialize(deserializer)?;
        Ok(DefinitionCollection::from_map(definitions))
    }
}
