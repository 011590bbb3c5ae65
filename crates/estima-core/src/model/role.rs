use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A staffing role: a unique name plus an hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub rate: Money,
}

/// Ordered role → hourly-rate mapping. Insertion order is column order in
/// every report; names are unique after whitespace trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    roles: Vec<Role>,
}

impl RateTable {
    /// Insert a role. Returns `false` (no-op) when the trimmed name is empty
    /// or already present; the existing rate is left untouched.
    pub fn insert(&mut self, name: &str, rate: Money) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.roles.push(Role {
            name: name.to_string(),
            rate,
        });
        true
    }

    /// Remove a role by name. Returns `false` when absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.roles.len();
        self.roles.retain(|role| role.name != name);
        self.roles.len() != before
    }

    /// Update the hourly rate of an existing role. Returns `false` when the
    /// role is unknown.
    pub fn set_rate(&mut self, name: &str, rate: Money) -> bool {
        let name = name.trim();
        match self.roles.iter_mut().find(|role| role.name == name) {
            Some(role) => {
                role.rate = rate;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn rate(&self, name: &str) -> Option<Money> {
        let name = name.trim();
        self.roles
            .iter()
            .find(|role| role.name == name)
            .map(|role| role.rate)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.roles.iter().any(|role| role.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|role| role.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
