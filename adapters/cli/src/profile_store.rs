use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::info;
use train_match_world::Profile;

/// Keeps the player profile on disk as an opaque bincode blob.
#[derive(Debug)]
pub(crate) struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved profile, falling back to defaults when none exists.
    pub(crate) fn load(&self) -> Result<Profile> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no saved profile, using defaults");
                return Ok(Profile::default());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("failed to read profile at {}", self.path.display())
                })
            }
        };

        let profile = bincode::deserialize(&bytes)
            .with_context(|| format!("failed to decode profile at {}", self.path.display()))?;
        info!(path = %self.path.display(), "profile loaded");
        Ok(profile)
    }

    pub(crate) fn save(&self, profile: &Profile) -> Result<()> {
        let bytes = bincode::serialize(profile).context("failed to encode profile")?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, bytes)
            .with_context(|| format!("failed to write profile to {}", self.path.display()))?;
        info!(path = %self.path.display(), "profile saved");
        Ok(())
    }

    /// Deletes the saved profile and returns a fresh default one.
    pub(crate) fn reset(&self) -> Result<Profile> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "profile deleted"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("failed to delete profile at {}", self.path.display())
                })
            }
        }
        Ok(Profile::default())
    }
}
