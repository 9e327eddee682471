//! Local state file: tracked users keyed by a caller-chosen name.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use litellm_user_sdk::UserState;
use serde::{Deserialize, Serialize};

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateFile {
    pub version: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, UserState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state file; a missing file is an empty state.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed JSON or an unsupported version.
    pub fn load(&self) -> Result<StateFile> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StateFile::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let state: StateFile = serde_json::from_slice(&raw)
            .with_context(|| format!("parsing state file {}", self.path.display()))?;
        if state.version != STATE_VERSION {
            bail!(
                "unsupported state file version {} in {} (expected {STATE_VERSION})",
                state.version,
                self.path.display()
            );
        }
        Ok(state)
    }

    /// Write the state atomically: temp file in the same directory, then rename.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors.
    pub fn save(&self, state: &StateFile) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, state).context("serializing state")?;
        tmp.write_all(b"\n").context("writing state")?;
        tmp.as_file().sync_all().context("syncing state")?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
