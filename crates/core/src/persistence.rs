//! Saving and restoring session progress.
//!
//! Progress is kept in an opaque key-value store under `vets-pref-{storage_key}`. Persistence is
//! best effort: every failure is logged and reported as "nothing saved" / "no saved progress",
//! never as an error that could block the questionnaire.
//!
//! A snapshot is never applied blindly. Restoring replays the recorded answers through the current
//! graph (see [`ProgressSnapshot::restore`]), so progress saved against an older questionnaire is
//! discarded instead of producing an inconsistent session.

use crate::constants::{SNAPSHOT_FORMAT_VERSION, STORAGE_KEY_PREFIX};
use crate::flow::{self, Step};
use crate::navigation::{AnswerRecord, NavigationState};
use crate::{ToolError, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use vpref_graph::{AnswerMap, DecisionGraph};
use vpref_types::NodeId;

// ============================================================================
// Stores
// ============================================================================

/// A key-value store for serialized progress.
pub trait ProgressStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> io::Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProgressStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written snapshot behind.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Serialized form of a session's progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub format_version: u32,
    /// Version of the graph document the answers were recorded against.
    pub graph_version: String,
    pub saved_at: DateTime<Utc>,
    pub answer_path: Vec<AnswerRecord>,
    pub answers: AnswerMap,
    /// `None` while a result is displayed.
    pub current_question_id: Option<NodeId>,
}

impl ProgressSnapshot {
    pub fn capture(graph: &DecisionGraph, state: &NavigationState) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            graph_version: graph.version().to_owned(),
            saved_at: Utc::now(),
            answer_path: state.answer_path().to_vec(),
            answers: state.answers().clone(),
            current_question_id: state.current_question_id().cloned(),
        }
    }

    /// Rebuilds the session this snapshot describes against `graph`.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::SnapshotMismatch` when the snapshot was written by another format or
    /// graph version, or is internally inconsistent, and any replay error when a recorded answer
    /// no longer fits the graph.
    pub fn restore(
        &self,
        graph: &DecisionGraph,
        total_steps: usize,
    ) -> ToolResult<(NavigationState, Step)> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(ToolError::SnapshotMismatch(format!(
                "unsupported snapshot format {}",
                self.format_version
            )));
        }

        if self.graph_version != graph.version() {
            return Err(ToolError::SnapshotMismatch(format!(
                "saved against questionnaire version '{}', current is '{}'",
                self.graph_version,
                graph.version()
            )));
        }

        let derived: AnswerMap = self
            .answer_path
            .iter()
            .map(|record| (record.question_id.clone(), record.answer_text.clone()))
            .collect();
        if derived != self.answers {
            return Err(ToolError::SnapshotMismatch(
                "answers do not match the answer path".into(),
            ));
        }

        let (state, step) = flow::replay(graph, &self.answer_path, total_steps)?;
        if state.current_question_id() != self.current_question_id.as_ref() {
            return Err(ToolError::SnapshotMismatch(
                "current question does not match the replayed answers".into(),
            ));
        }

        Ok((state, step))
    }
}

// ============================================================================
// Service
// ============================================================================

/// Best-effort progress persistence for one storage key.
#[derive(Debug)]
pub struct ProgressService<S> {
    store: S,
    key: String,
}

impl<S: ProgressStore> ProgressService<S> {
    /// `storage_key` is expected to be validated already (see `ToolConfig`).
    pub fn new(store: S, storage_key: &str) -> Self {
        Self {
            store,
            key: format!("{STORAGE_KEY_PREFIX}{storage_key}"),
        }
    }

    /// Full key used in the store.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` when the snapshot was written.
    pub fn save(&mut self, snapshot: &ProgressSnapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to save progress under '{}': {}", self.key, e);
                false
            }
        }
    }

    /// Returns the saved snapshot, or `None` when there is none or it cannot be read.
    pub fn load(&self) -> Option<ProgressSnapshot> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("ignoring saved progress under '{}': {}", self.key, e);
                None
            }
        }
    }

    /// Returns `true` when nothing is stored under the key afterwards.
    pub fn clear(&mut self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to clear progress under '{}': {}", self.key, e);
                false
            }
        }
    }

    fn try_save(&mut self, snapshot: &ProgressSnapshot) -> ToolResult<()> {
        let json = serde_json::to_string(snapshot).map_err(ToolError::Serialization)?;
        self.store.save(&self.key, &json).map_err(ToolError::Storage)
    }

    fn try_load(&self) -> ToolResult<Option<ProgressSnapshot>> {
        let Some(json) = self.store.load(&self.key).map_err(ToolError::Storage)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&json).map_err(ToolError::Deserialization)?;
        Ok(Some(snapshot))
    }
}
