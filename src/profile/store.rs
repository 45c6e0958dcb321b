// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Keyed JSON store for sensor profiles

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SensorProfile;

/// On-disk envelope around a stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Key the profile was stored under.
    pub name: String,
    /// When the document was last written.
    pub saved_at: DateTime<Utc>,
    /// The profile itself.
    pub profile: SensorProfile,
}

/// A directory of profile documents, one JSON file per key.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create profile directory {:?}", dir))?;
        Ok(Self { dir })
    }

    /// Directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of all stored profiles.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read profile directory {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load the profile stored under `name`.
    pub fn load(&self, name: &str) -> Result<SensorProfile> {
        let path = self.path_for(name)?;
        let content = fs::read_to_string(&path)
            .with_context(|| format!("profile {} not found at {:?}", name, path))?;
        let doc: ProfileDocument = serde_json::from_str(&content)
            .with_context(|| format!("profile {} is not a valid document", name))?;
        info!("Loaded sensor profile {}", name);
        Ok(doc.profile)
    }

    /// Store `profile` under `name`, replacing any previous document.
    pub fn save(&self, name: &str, profile: &SensorProfile) -> Result<()> {
        let path = self.path_for(name)?;
        let doc = ProfileDocument {
            name: name.to_string(),
            saved_at: Utc::now(),
            profile: profile.clone(),
        };
        let content = serde_json::to_string_pretty(&doc)?;
        fs::write(&path, content)
            .with_context(|| format!("failed to write profile {} to {:?}", name, path))?;
        info!("Saved sensor profile {}", name);
        Ok(())
    }

    /// Remove the document stored under `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path)
            .with_context(|| format!("failed to delete profile {} at {:?}", name, path))?;
        info!("Deleted sensor profile {}", name);
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name
                .chars()
                .any(|c| matches!(c, '/' | '\\' | '.') || c.is_control())
        {
            bail!("invalid profile name: {:?}", name);
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityType, DevicePosition, DeviceType};

    #[test]
    fn save_load_list_delete_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(tmp.path()).unwrap();

        let profile = SensorProfile::for_device(
            DeviceType::Smartwatch,
            ActivityType::Running,
            DevicePosition::Tilted,
        );
        store.save("wrist_runner", &profile).unwrap();

        assert_eq!(store.list().unwrap(), vec!["wrist_runner".to_string()]);

        let loaded = store.load("wrist_runner").unwrap();
        assert_eq!(loaded.device_type, DeviceType::Smartwatch);
        assert_eq!(loaded.activity_type, ActivityType::Running);

        store.delete("wrist_runner").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn missing_profile_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(tmp.path()).unwrap();
        assert!(store.load("nope").is_err());
    }

    #[test]
    fn path_traversal_names_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(tmp.path()).unwrap();
        let profile = SensorProfile::for_device(
            DeviceType::Tablet,
            ActivityType::Stationary,
            DevicePosition::Flat,
        );
        assert!(store.save("../escape", &profile).is_err());
        assert!(store.save("", &profile).is_err());
    }
}
