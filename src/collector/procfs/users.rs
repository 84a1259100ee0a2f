//! uid -> user name table.

use std::collections::HashMap;

use super::parser::parse_passwd;

/// Lookup table from numeric uid to account name.
///
/// Built once, usually from `/etc/passwd`, and handed to the process registry
/// on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserTable {
    uid_to_name: HashMap<u32, String>,
}

impl UserTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `/etc/passwd` content.
    pub fn from_passwd(content: &str) -> Self {
        Self {
            uid_to_name: parse_passwd(content),
        }
    }

    /// Adds or replaces one mapping.
    pub fn insert(&mut self, uid: u32, name: impl Into<String>) {
        self.uid_to_name.insert(uid, name.into());
    }

    /// Resolves uid to a name, returns the uid as string if not found.
    pub fn resolve(&self, uid: u32) -> String {
        self.uid_to_name
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| uid.to_string())
    }

    /// Returns true if the table has any mappings.
    pub fn is_loaded(&self) -> bool {
        !self.uid_to_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.uid_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uid_to_name.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for UserTable {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            uid_to_name: iter
                .into_iter()
                .map(|(uid, name)| (uid, name.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_table_from_passwd() {
        let table = UserTable::from_passwd(
            "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/zsh\n",
        );

        assert!(table.is_loaded());
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(0), "root");
        assert_eq!(table.resolve(1000), "alice");
        assert_eq!(table.resolve(4242), "4242");
    }

    #[test]
    fn test_user_table_insert_and_collect() {
        let mut table: UserTable = [(0, "root")].into_iter().collect();
        table.insert(33, "www-data");

        assert_eq!(table.resolve(33), "www-data");
        assert_eq!(table.resolve(0), "root");
        assert!(!UserTable::new().is_loaded());
        assert!(UserTable::new().is_empty());
    }
}
