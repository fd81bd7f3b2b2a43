use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyboard key → lane mapping. Keys are matched case-insensitively on the
/// `KeyboardEvent.key` string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, usize>", into = "HashMap<String, usize>")]
pub struct KeyMap {
    keys: HashMap<String, usize>,
}

impl From<HashMap<String, usize>> for KeyMap {
    fn from(keys: HashMap<String, usize>) -> Self {
        Self {
            keys: keys.into_iter().map(|(k, c)| (k.to_lowercase(), c)).collect(),
        }
    }
}

impl From<KeyMap> for HashMap<String, usize> {
    fn from(map: KeyMap) -> Self {
        map.keys
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_keys(["d", "f", "j", "k"])
    }
}

impl KeyMap {
    /// Map the n-th key to lane n.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            keys: keys
                .into_iter()
                .enumerate()
                .map(|(column, key)| (key.to_lowercase(), column))
                .collect(),
        }
    }

    pub fn column(&self, key: &str) -> Option<usize> {
        self.keys.get(&key.to_lowercase()).copied()
    }

    /// The key bound to `column`, if any.
    pub fn key_for(&self, column: usize) -> Option<&str> {
        self.keys
            .iter()
            .find(|&(_, &c)| c == column)
            .map(|(k, _)| k.as_str())
    }

    /// Largest lane index any key maps to.
    pub fn max_column(&self) -> Option<usize> {
        self.keys.values().copied().max()
    }
}
