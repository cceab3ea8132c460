//! Input validation utilities.
//!
//! This module contains functions for validating configuration inputs before they are used to
//! address persisted state.

use crate::{ToolError, ToolResult};

/// Validates that a storage key is safe to use as a file name and store key.
///
/// The key is embedded into `vets-pref-{key}`, which the file-backed store turns into
/// `{dir}/vets-pref-{key}.json`. Guardrails:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Restricts characters to a conservative ASCII set, so no path separators get through
///
/// # Errors
///
/// Returns a `ToolError::InvalidInput` if the key is invalid.
pub fn validate_storage_key(key: &str) -> ToolResult<()> {
    const MAX_STORAGE_KEY_LEN: usize = 64;

    if key.trim().is_empty() {
        return Err(ToolError::InvalidInput("storage key cannot be empty".into()));
    }

    if key.len() > MAX_STORAGE_KEY_LEN {
        return Err(ToolError::InvalidInput(format!(
            "storage key exceeds maximum length of {} characters",
            MAX_STORAGE_KEY_LEN
        )));
    }

    if !key.is_ascii() {
        return Err(ToolError::InvalidInput(
            "storage key must contain only ASCII characters".into(),
        ));
    }

    let ok = key
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));

    if !ok {
        return Err(ToolError::InvalidInput(
            "storage key contains invalid characters (only alphanumeric, '.', '-', '_' allowed)"
                .into(),
        ));
    }

    if key.starts_with('.') {
        return Err(ToolError::InvalidInput(
            "storage key cannot start with '.'".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_default_style_keys() {
        validate_storage_key("tool-state").unwrap();
        validate_storage_key("session_2.v1").unwrap();
    }

    #[test]
    fn rejects_unsafe_keys() {
        for key in ["", "   ", "../escape", "a/b", "naïve", ".hidden"] {
            let err = validate_storage_key(key).expect_err("key should be rejected");
            assert!(matches!(err, ToolError::InvalidInput(_)), "key: {key:?}");
        }

        let long = "k".repeat(65);
        assert!(validate_storage_key(&long).is_err());
    }
}
