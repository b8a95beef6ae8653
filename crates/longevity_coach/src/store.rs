//! Single-slot profile persistence.
//!
//! One named JSON file holds the serialized profile: read once at startup,
//! overwritten wholesale on save, removed on reset. There is no history and
//! no multi-user storage.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::CoachResult;
use chrono::Utc;
use fitbit_client::UserProfile;

pub struct ProfileStore {
    path: PathBuf,
    slot: RwLock<Option<UserProfile>>,
}

impl ProfileStore {
    /// Open the store, loading an existing slot from disk. A missing file
    /// starts empty; an unreadable or corrupt file is logged and discarded
    /// rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slot = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "discarding corrupt profile slot");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "profile slot unreadable");
                None
            }
        };
        Self {
            path,
            slot: RwLock::new(slot),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_profile(&self) -> bool {
        self.read_slot().is_some()
    }

    pub fn load(&self) -> Option<UserProfile> {
        self.read_slot()
    }

    /// Overwrite the slot wholesale. `createdAt` is stamped on first save
    /// and preserved afterwards.
    pub fn save(&self, mut profile: UserProfile) -> CoachResult<UserProfile> {
        if profile.created_at.is_empty() {
            profile.created_at = Utc::now().to_rfc3339();
        }
        let serialized = serde_json::to_string_pretty(&profile)?;
        std::fs::write(&self.path, serialized)?;
        *self.write_slot() = Some(profile.clone());
        tracing::debug!(id = %profile.id, "profile slot saved");
        Ok(profile)
    }

    /// Delete the slot and its backing file.
    pub fn reset(&self) -> CoachResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        *self.write_slot() = None;
        tracing::debug!("profile slot reset");
        Ok(())
    }

    fn read_slot(&self) -> Option<UserProfile> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<UserProfile>> {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitbit_client::sample_profile;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::open(dir.path().join("profile.json"));
        assert!(store.load().is_none());

        let saved = store.save(sample_profile()).expect("save");
        assert_eq!(store.load(), Some(saved.clone()));

        // A fresh store over the same file sees the same profile.
        let reopened = ProfileStore::open(store.path().to_path_buf());
        assert_eq!(reopened.load(), Some(saved));
    }

    #[test]
    fn save_stamps_created_at_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::open(dir.path().join("profile.json"));

        let mut profile = sample_profile();
        profile.created_at = String::new();
        let first = store.save(profile).expect("save");
        assert!(!first.created_at.is_empty());

        let again = store.save(first.clone()).expect("save");
        assert_eq!(again.created_at, first.created_at);
    }

    #[test]
    fn reset_clears_slot_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::open(dir.path().join("profile.json"));
        store.save(sample_profile()).expect("save");

        store.reset().expect("reset");
        assert!(store.load().is_none());
        assert!(!store.path().exists());

        // Resetting an already-empty slot is fine.
        store.reset().expect("reset again");
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").expect("write");
        let store = ProfileStore::open(path);
        assert!(store.load().is_none());
    }
}
