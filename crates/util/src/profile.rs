//! Connection profile persistence.
//!
//! A tiny JSON file (`~/.config/mcpdash/profile.json` on most platforms)
//! remembers the API base URL, role, and user id between runs so they do not
//! have to be passed on every invocation. The access token is never written
//! here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable allowing callers to override the profile path.
pub const PROFILE_PATH_ENV: &str = "MCPDASH_PROFILE_PATH";

pub const PROFILE_FILE_NAME: &str = "profile.json";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Values remembered between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Profile {
    /// Load from `path`. A missing file yields the default profile; a corrupt
    /// one is logged and ignored.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(profile) => Ok(profile),
                Err(error) => {
                    warn!(path = %path.display(), %error, "failed to parse profile; using defaults");
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ProfileError::Io(error)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Resolve the profile location, honoring [`PROFILE_PATH_ENV`].
pub fn default_profile_path() -> PathBuf {
    if let Ok(path) = env::var(PROFILE_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mcpdash")
        .join(PROFILE_FILE_NAME)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    let rest = match path {
        "~" => "",
        _ => match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
    };
    match home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = Profile::load(&dir.path().join("absent.json")).expect("load");
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn save_then_load_in_nested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(PROFILE_FILE_NAME);
        let profile = Profile {
            base_url: Some("https://proxy.example.com".into()),
            user_role: Some("proxy_admin".into()),
            user_id: None,
        };
        profile.save(&path).expect("save");

        let written = fs::read_to_string(&path).expect("read back");
        assert!(!written.contains("user_id"), "unset fields are omitted: {written}");
        assert_eq!(Profile::load(&path).expect("load"), profile);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(PROFILE_FILE_NAME);
        fs::write(&path, "{not json").expect("write");
        assert_eq!(Profile::load(&path).expect("load"), Profile::default());
    }

    #[test]
    fn env_override_is_used() {
        temp_env::with_var(PROFILE_PATH_ENV, Some("/tmp/mcpdash-test/profile.json"), || {
            assert_eq!(default_profile_path(), PathBuf::from("/tmp/mcpdash-test/profile.json"));
        });
    }
}
