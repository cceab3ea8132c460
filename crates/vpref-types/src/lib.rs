//! Validated primitive types shared by the questionnaire crates.
//!
//! - [`NonEmptyText`] for prompts, labels and result copy that must never render blank.
//! - [`NodeId`] for question and result identifiers in a decision graph.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input was not a usable node identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a question or result node in a decision graph.
///
/// Identifiers are authored once and never regenerated, so they are kept exactly as written:
/// no trimming, no case folding. Allowed characters are ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Maximum accepted identifier length.
    pub const MAX_LEN: usize = 128;

    /// Validates and wraps a node identifier.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for an empty input and `TextError::InvalidIdentifier` when the
    /// input is too long or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }

        if input.len() > Self::MAX_LEN {
            return Err(TextError::InvalidIdentifier(format!(
                "identifier exceeds maximum length of {} characters",
                Self::MAX_LEN
            )));
        }

        let ok = input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'-'));
        if !ok {
            return Err(TextError::InvalidIdentifier(format!(
                "'{input}' contains invalid characters (only alphanumeric, '_', '-' allowed)"
            )));
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lets maps keyed by `NodeId` be queried with a plain `&str`.
impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NodeId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NodeId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Honorable  ").expect("should accept padded text");
        assert_eq!(text.as_str(), "Honorable");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        let err = NonEmptyText::new("   ").expect_err("should reject whitespace");
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn node_id_accepts_authored_identifiers() {
        assert!(NodeId::new("START").is_ok());
        assert!(NodeId::new("VERIFY_WARTIME_PERIOD").is_ok());
        assert!(NodeId::new("result-10-point-cps").is_ok());
    }

    #[test]
    fn node_id_rejects_invalid_characters() {
        let err = NodeId::new("BAD ID").expect_err("should reject space");
        assert!(matches!(err, TextError::InvalidIdentifier(msg) if msg.contains("invalid characters")));

        let err = NodeId::new("../etc").expect_err("should reject path characters");
        assert!(matches!(err, TextError::InvalidIdentifier(_)));
    }

    #[test]
    fn node_id_rejects_empty_and_overlong() {
        assert_eq!(NodeId::new("").expect_err("empty"), TextError::Empty);

        let long = "A".repeat(NodeId::MAX_LEN + 1);
        let err = NodeId::new(long).expect_err("should reject overlong id");
        assert!(matches!(err, TextError::InvalidIdentifier(msg) if msg.contains("maximum length")));
    }

    #[test]
    fn node_id_deserialization_validates() {
        let id: NodeId = serde_json::from_str("\"DISCHARGE_TYPE\"").expect("valid id");
        assert_eq!(id.as_str(), "DISCHARGE_TYPE");

        assert!(serde_json::from_str::<NodeId>("\"no spaces allowed\"").is_err());
    }
}
