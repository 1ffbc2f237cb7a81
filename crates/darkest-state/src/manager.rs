//! The state manager: one gate in front of the persisted state.
//!
//! Every change to [`PersistedState`] goes through
//! [`StateManager::modify`], which holds an async mutex for the whole
//! "mutate, then save" sequence. That gives two guarantees:
//!
//! - No two mutators ever run at the same time.
//! - Mutation N is saved (or the save fails and is logged) before
//!   mutation N+1 starts, so the file never mixes two changes.
//!
//! The in-memory state is the source of truth. A failed save is logged
//! and the mutation stands.
//!
//! # Why a `tokio::sync::Mutex`?
//!
//! The guard is held across the file write, which is an `.await`. A
//! `std::sync::Mutex` guard can't be held across an await point in a
//! `Send` future; tokio's can.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{PersistedState, StateConfig, StateError, TransientState};

/// Owns the bot's persisted and transient state.
///
/// Share it as `Arc<StateManager>`; all methods take `&self`.
#[derive(Debug)]
pub struct StateManager {
    state: Mutex<PersistedState>,
    transient: TransientState,
    path: PathBuf,
}

impl StateManager {
    /// Wraps an already-loaded state. Saves go to `path`.
    pub fn new(state: PersistedState, path: impl Into<PathBuf>) -> Self {
        Self {
            state: Mutex::new(state),
            transient: TransientState::new(),
            path: path.into(),
        }
    }

    /// Loads state from `config.path`, or seeds a fresh state if the file
    /// doesn't exist yet.
    ///
    /// A fresh state isn't written until the first mutation.
    ///
    /// # Errors
    /// - [`StateError::Read`]: the file exists but can't be read
    /// - [`StateError::Malformed`]: the file isn't valid state JSON
    /// - [`StateError::Null`]: the file holds `null`
    pub async fn load_or_init(config: StateConfig) -> Result<Self, StateError> {
        let path = config.path;

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "state file does not exist yet, seeding");
                let state = PersistedState::seeded(&config.operators);
                return Ok(Self::new(state, path));
            }
            Err(source) => return Err(StateError::Read { path, source }),
        };

        let parsed: Option<PersistedState> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(source) => return Err(StateError::Malformed { path, source }),
        };
        let Some(state) = parsed else {
            return Err(StateError::Null { path });
        };

        tracing::info!(
            path = %path.display(),
            characters = state.characters.len(),
            room = ?state.room_id,
            "state loaded"
        );
        Ok(Self::new(state, path))
    }

    /// Applies `mutator` to the persisted state and saves the result.
    ///
    /// Waits for any in-flight mutation (including its save) to finish
    /// first. The save failing doesn't undo the mutation; it's logged
    /// at `error` and `modify` still returns the mutator's result.
    pub async fn modify<F, R>(&self, mutator: F) -> R
    where
        F: FnOnce(&mut PersistedState) -> R,
    {
        let mut state = self.state.lock().await;
        let result = mutator(&mut state);

        if let Err(e) = self.save(&state).await {
            tracing::error!(error = %e, "unable to save state");
        }
        result
    }

    /// Runs `reader` against the current state.
    ///
    /// Takes the same gate as [`modify`](Self::modify), so readers never
    /// see a half-applied mutation.
    pub async fn read<F, R>(&self, reader: F) -> R
    where
        F: FnOnce(&PersistedState) -> R,
    {
        let state = self.state.lock().await;
        reader(&state)
    }

    /// A clone of the current persisted state.
    pub async fn snapshot(&self) -> PersistedState {
        self.read(PersistedState::clone).await
    }

    /// The negotiated runtime values. Not behind the gate.
    pub fn transient(&self) -> &TransientState {
        &self.transient
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `state` to a temp file next to the target, then renames it
    /// over the target so readers see either the old file or the new one.
    async fn save(&self, state: &PersistedState) -> Result<(), StateError> {
        let json = serde_json::to_vec(state).map_err(StateError::Encode)?;
        let temp = temp_path(&self.path);

        tokio::fs::write(&temp, &json)
            .await
            .map_err(|source| StateError::Write {
                path: temp.clone(),
                source,
            })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| StateError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "state saved");
        Ok(())
    }
}

/// `state.json` → `state.json.tmp`, in the same directory.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".tmp");
    path.with_file_name(name)
}
