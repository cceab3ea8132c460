use vpref_graph::GraphError;
use vpref_types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("decision graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("stale transition: expected an answer to '{expected}', got '{answered}'")]
    StaleQuestion { expected: String, answered: NodeId },
    #[error("no question is currently displayed")]
    NotAtQuestion,
    #[error("unknown question: {0}")]
    UnknownQuestion(NodeId),
    #[error("question '{question}' has no answer '{answer}'")]
    UnknownAnswer { question: NodeId, answer: String },

    #[error("failed to access progress storage: {0}")]
    Storage(std::io::Error),
    #[error("failed to serialize progress: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize progress: {0}")]
    Deserialization(serde_json::Error),
    #[error("saved progress does not match the current questionnaire: {0}")]
    SnapshotMismatch(String),
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
