//! Constants shared by graph loading and the built-in questionnaire.

/// Identifier of the question every session starts from.
pub const START_QUESTION_ID: &str = "START";

/// The built-in Veterans' Preference questionnaire document.
pub const BUILTIN_GRAPH_JSON: &str = include_str!("../data/veterans_preference.json");
