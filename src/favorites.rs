//! Favorites set and its persistence
//!
//! Favorite status lives only here: a coin is a favorite iff its id is in
//! the set. Coin records never carry a flag of their own.

use crate::{error::StorageError, storage::KeyValueStorage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique coin ids in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is a favorite
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|f| f == id)
    }

    /// Flips membership of `id`
    ///
    /// # Returns
    /// True if `id` is a favorite after the call
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|f| f == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl FromIterator<String> for Favorites {
    /// Collects ids, keeping the first occurrence of duplicates
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut favorites = Favorites::new();
        for id in iter {
            if !favorites.contains(&id) {
                favorites.0.push(id);
            }
        }
        favorites
    }
}

/// Loads and persists the favorites set under one storage key
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Reads the persisted set
    ///
    /// Absent, unreadable or unparseable data yields an empty set.
    pub fn load(&self) -> Favorites {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Favorites::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read favorites, starting empty");
                return Favorites::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                let favorites: Favorites = ids.into_iter().collect();
                tracing::debug!(count = favorites.len(), "Loaded favorites");
                favorites
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Corrupt favorites data, starting empty");
                Favorites::new()
            }
        }
    }

    /// Writes the full set, replacing what was stored
    pub fn persist(&self, favorites: &Favorites) -> Result<(), StorageError> {
        let raw = serde_json::to_string(favorites)?;
        self.storage.set(&self.key, &raw)?;
        tracing::debug!(count = favorites.len(), "Persisted favorites");
        Ok(())
    }
}
