//! Preference store: durable key-value file holding the access token.
//!
//! DESIGN
//! ======
//! The file is a flat JSON object of string values. Writes go to a sibling
//! temp file which is then renamed over the target, so a crash never leaves
//! a half-written file. Readers observe the token through a
//! `tokio::sync::watch` channel: each receiver sees the current value first
//! and wakes on every save. Rapid saves may coalesce to the latest value.
//!
//! A file that cannot be read or parsed is logged and treated as empty; the
//! store never fails to open.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, watch};
use tracing::{error, info};

pub const ACCESS_TOKEN_KEY: &str = "acc_token";

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct PreferenceStore {
    path: PathBuf,
    /// Last successfully persisted contents. Held across the write so saves
    /// are serialized.
    values: Mutex<BTreeMap<String, String>>,
    access_token: watch::Sender<String>,
}

impl PreferenceStore {
    /// Open the store backed by `path`. Missing or unreadable files yield an
    /// empty token.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match load_values(&path).await {
            Ok(values) => values,
            Err(e) => {
                error!(path = %path.display(), error = %e, "error reading preferences, using defaults");
                BTreeMap::new()
            }
        };
        let token = values.get(ACCESS_TOKEN_KEY).cloned().unwrap_or_default();
        let (access_token, _) = watch::channel(token);
        Self { path, values: Mutex::new(values), access_token }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, replacing any previous value, then notify readers.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. Readers keep the old
    /// value in that case.
    pub async fn save_access_token(&self, token: &str) -> Result<(), PrefsError> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        next.insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        write_values(&self.path, &next).await?;
        *values = next;
        drop(values);

        self.access_token.send_replace(token.to_string());
        info!(path = %self.path.display(), "access token saved");
        Ok(())
    }

    /// Stream of the access token: current value first, then every change.
    #[must_use]
    pub fn access_token(&self) -> watch::Receiver<String> {
        self.access_token.subscribe()
    }

    /// The access token right now, or `""` if none was ever saved.
    #[must_use]
    pub fn current_access_token(&self) -> String {
        self.access_token.borrow().clone()
    }
}

async fn load_values(path: &Path) -> Result<BTreeMap<String, String>, PrefsError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_values(path: &Path, values: &BTreeMap<String, String>) -> Result<(), PrefsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let raw = serde_json::to_string_pretty(values)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;
