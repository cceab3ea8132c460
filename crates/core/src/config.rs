//! Tool runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the controller. The
//! library never reads environment variables itself; the binary reads them and hands the raw
//! values to the parsing helpers below.

use crate::constants::DEFAULT_STATE_KEY;
use crate::validation::validate_storage_key;
use crate::{ToolError, ToolResult};
use vpref_graph::DecisionGraph;

/// Tool configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    total_steps: Option<usize>,
    storage_key: String,
    persist_progress: bool,
}

impl ToolConfig {
    /// Create a new `ToolConfig`.
    ///
    /// `total_steps`, when given, overrides the progress estimate derived from the graph and must
    /// be greater than zero.
    pub fn new(
        total_steps: Option<usize>,
        storage_key: String,
        persist_progress: bool,
    ) -> ToolResult<Self> {
        if total_steps == Some(0) {
            return Err(ToolError::InvalidInput(
                "total_steps override must be greater than zero".into(),
            ));
        }
        validate_storage_key(&storage_key)?;

        Ok(Self {
            total_steps,
            storage_key,
            persist_progress,
        })
    }

    pub fn total_steps(&self) -> Option<usize> {
        self.total_steps
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn persist_progress(&self) -> bool {
        self.persist_progress
    }

    /// Progress denominator for a session on `graph`.
    ///
    /// The configured override wins, then the document's own hint, then the longest path from
    /// the start question.
    pub fn effective_total_steps(&self, graph: &DecisionGraph) -> usize {
        self.total_steps
            .or_else(|| graph.total_steps_hint())
            .unwrap_or_else(|| graph.longest_path_len())
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            total_steps: None,
            storage_key: DEFAULT_STATE_KEY.to_owned(),
            persist_progress: true,
        }
    }
}

/// Parse a total-steps override from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `None` so the graph decides.
pub fn total_steps_from_env_value(value: Option<String>) -> ToolResult<Option<usize>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<usize>().map_err(|e| {
                ToolError::InvalidInput(format!("invalid total steps value '{v}': {e}"))
            })
        })
        .transpose()
}

/// Parse the persistence flag from an optional string value.
///
/// Persistence is on unless explicitly disabled.
pub fn persist_from_env_value(value: Option<String>) -> ToolResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(true),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ToolError::InvalidInput(format!(
            "invalid persistence flag '{other}'"
        ))),
    }
}
