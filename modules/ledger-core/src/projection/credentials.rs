use std::collections::BTreeMap;

/// Username to clear-text password. Entries are never replaced or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    users: BTreeMap<String, String>,
}

impl Credentials {
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn password(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    /// Insert a user unless the name is taken. Returns whether it was added.
    pub fn insert_new(&mut self, username: &str, password: &str) -> bool {
        if self.users.contains_key(username) {
            return false;
        }
        self.users.insert(username.to_string(), password.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }
}
