use std::fmt;

use ir::HashMap;

use crate::IdentifierGenerator;

/// A bijection between the names of some local literals and fresh names.
#[derive(Debug, Clone, Default)]
pub struct RenamingTable {
    unique_by_original: HashMap<String, String>,
    original_by_unique: HashMap<String, String>,
}

impl RenamingTable {
    /// Assign a fresh name to every distinct name, in iteration order.
    pub fn new<'a, I>(names: I, ids: &mut IdentifierGenerator) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::default();
        for name in names {
            if table.unique_by_original.contains_key(name) {
                continue;
            }
            let unique = ids.fresh();
            table.original_by_unique.insert(unique.clone(), name.to_owned());
            table.unique_by_original.insert(name.to_owned(), unique);
        }
        table
    }

    pub fn unique(&self, original: &str) -> Option<&str> {
        self.unique_by_original.get(original).map(String::as_str)
    }

    pub fn original(&self, unique: &str) -> Option<&str> {
        self.original_by_unique.get(unique).map(String::as_str)
    }

    pub fn is_unique_name(&self, name: &str) -> bool {
        self.original_by_unique.contains_key(name)
    }

    /// Pairs of original and fresh name, sorted by original name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut pairs: Vec<_> =
            self.unique_by_original.iter().map(|(o, u)| (o.as_str(), u.as_str())).collect();
        pairs.sort();
        pairs.into_iter()
    }

    pub fn forward(&self) -> &HashMap<String, String> {
        &self.unique_by_original
    }

    pub fn inverse(&self) -> &HashMap<String, String> {
        &self.original_by_unique
    }
}

impl fmt::Display for RenamingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<_> = self.iter().map(|(original, unique)| format!("{original} -> {unique}")).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renaming_is_bijective() {
        let mut ids = IdentifierGenerator::new();
        let table = RenamingTable::new(["T", "U", "T"], &mut ids);
        assert_eq!(table.unique("T"), Some("X_0"));
        assert_eq!(table.unique("U"), Some("X_1"));
        assert_eq!(table.original("X_1"), Some("U"));
        assert!(table.is_unique_name("X_0"));
        assert!(!table.is_unique_name("T"));
        assert_eq!(ids.counter(), 2);
        assert_eq!(table.to_string(), "{T -> X_0, U -> X_1}");
    }
}
