//! Decision graph boundary support.
//!
//! This crate owns the authored questionnaire document: the network of questions and terminal
//! results that a session walks through. It provides:
//! - strict **wire models** for the JSON (or YAML) data document,
//! - the immutable **domain model** ([`DecisionGraph`], [`Question`], [`EligibilityResult`]),
//! - **construction-time integrity checks** so that dangling references, ambiguous options and
//!   cycles are rejected before any session starts,
//! - the built-in Veterans' Preference graph ([`DecisionGraph::builtin`]).
//!
//! Navigation, evaluation and persistence live in `vpref-core`. This crate never mutates a graph
//! after construction.

mod constants;
mod graph;
pub mod model;
mod wire;

pub use constants::{BUILTIN_GRAPH_JSON, START_QUESTION_ID};
pub use graph::DecisionGraph;
pub use model::{
    AnswerMap, AnswerOption, DisplayCondition, EligibilityResult, EligibilityType, Node, Outcome,
    Question, ReferenceLink,
};
pub use vpref_types::{NodeId, NonEmptyText, TextError};

/// Errors returned while loading or checking a decision graph.
///
/// Every variant except [`GraphError::Io`] is a data-authoring error: the document itself is
/// wrong and no session can safely run against it.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("start question '{0}' is not defined")]
    MissingStart(NodeId),

    #[error("question '{question}' has no options")]
    NoOptions { question: NodeId },

    #[error("question '{question}' lists the answer '{answer}' more than once")]
    DuplicateAnswer { question: NodeId, answer: String },

    #[error("answer '{answer}' of question '{question}' must have exactly one of nextQuestionId, resultId or evaluate")]
    AmbiguousOutcome { question: NodeId, answer: String },

    #[error("question '{from}' references undefined question '{target}'")]
    DanglingReference { from: NodeId, target: NodeId },

    #[error("question '{from}' references undefined result '{result}'")]
    MissingResult { from: NodeId, result: NodeId },

    #[error("condition of question '{question}' expects '{answer}', which is not an option of '{when}'")]
    UnknownConditionAnswer {
        question: NodeId,
        when: NodeId,
        answer: String,
    },

    #[error("decision graph contains a cycle: {}", format_path(.0))]
    Cycle(Vec<NodeId>),
}

/// Type alias for Results that can fail with a [`GraphError`].
pub type GraphResult<T> = Result<T, GraphError>;

fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
