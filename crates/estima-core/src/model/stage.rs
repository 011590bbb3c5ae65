use serde::{Deserialize, Serialize};

/// Ordered list of unique stage names. Insertion order defines row order in
/// the hour matrix and in every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageList {
    stages: Vec<String>,
}

impl StageList {
    /// Append a stage. Returns `false` (no-op) when the trimmed name is
    /// empty or already present.
    pub fn push(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.stages.push(name.to_string());
        true
    }

    /// Remove a stage by name. Returns `false` when absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.stages.len();
        self.stages.retain(|stage| stage != name);
        self.stages.len() != before
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.stages.iter().any(|stage| stage == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
