/// Ordered key/value metadata with unique keys
///
/// Insertion order is preserved so that a file re-serializes in the same
/// order it was read. Setting an existing key replaces its value in place
/// (last write wins) and keeps the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: Vec<(String, String)>,
}

impl MetaData {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if the key existed
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetaData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = MetaData::new();
        metadata.extend(iter);
        metadata
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MetaData {
    /// Set every entry in turn; later values win
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl IntoIterator for MetaData {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Well-known metadata keys used by GIFTI producers
pub mod names {
    /// Primary anatomical structure (e.g. `CortexLeft`)
    pub const ANATOMICAL_STRUCTURE_PRIMARY: &str = "AnatomicalStructurePrimary";
    /// Secondary anatomical structure (e.g. `Pial`)
    pub const ANATOMICAL_STRUCTURE_SECONDARY: &str = "AnatomicalStructureSecondary";
    /// Geometric type of a surface (e.g. `Anatomical`, `Inflated`)
    pub const GEOMETRIC_TYPE: &str = "GeometricType";
    /// Topological type of a surface (e.g. `Closed`)
    pub const TOPOLOGICAL_TYPE: &str = "TopologicalType";
    /// Display name of a file or array
    pub const NAME: &str = "Name";
    /// Free-text description
    pub const DESCRIPTION: &str = "Description";
    /// Creation date
    pub const DATE: &str = "Date";
    /// Creating user
    pub const USER_NAME: &str = "UserName";
    /// Unique identifier
    pub const UNIQUE_ID: &str = "UniqueID";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_merges_entries() {
        let mut metadata: MetaData = [("a", "1"), ("b", "2")].into_iter().collect();
        let later: MetaData = [("b", "3"), ("c", "4")].into_iter().collect();
        metadata.extend(later);
        assert_eq!(
            metadata.into_iter().collect::<Vec<_>>(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
                ("c".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_write_wins_and_keeps_position() {
        let mut metadata = MetaData::new();
        assert_eq!(metadata.set("a", "1"), None);
        assert_eq!(metadata.set("b", "2"), None);
        assert_eq!(metadata.set("a", "3"), Some("1".to_string()));

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("a"), Some("3"));
        assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_and_collect() {
        let mut metadata: MetaData = [("x", "1"), ("y", "2")].into_iter().collect();
        assert!(metadata.contains_key("x"));
        assert_eq!(metadata.remove("x"), Some("1".to_string()));
        assert_eq!(metadata.remove("x"), None);
        assert_eq!(metadata.iter().collect::<Vec<_>>(), vec![("y", "2")]);
    }
}
