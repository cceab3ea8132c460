//! The navigation state machine: where the user is in the questionnaire.
//!
//! All operations are synchronous. The state knows nothing about the graph beyond question ids;
//! deciding *where* an answer leads is the job of [`crate::flow`].

use crate::{ToolError, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vpref_graph::AnswerMap;
use vpref_types::NodeId;

/// What is currently displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cursor {
    Question(NodeId),
    /// A result is displayed; no question is awaiting an answer.
    Finished,
}

impl Cursor {
    pub fn question_id(&self) -> Option<&NodeId> {
        match self {
            Self::Question(id) => Some(id),
            Self::Finished => None,
        }
    }
}

/// One recorded answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: NodeId,
    pub answer_text: String,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(question_id: NodeId, answer_text: impl Into<String>) -> Self {
        Self {
            question_id,
            answer_text: answer_text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    start_id: NodeId,
    cursor: Cursor,
    answer_path: Vec<AnswerRecord>,
    answers: AnswerMap,
    total_steps: usize,
}

impl NavigationState {
    /// Creates a state positioned at `start_id` with no answers.
    pub fn new(start_id: NodeId, total_steps: usize) -> Self {
        Self {
            cursor: Cursor::Question(start_id.clone()),
            start_id,
            answer_path: Vec::new(),
            answers: AnswerMap::new(),
            total_steps,
        }
    }

    /// Positions the cursor at the start question and empties the history.
    pub fn start(&mut self) {
        self.cursor = Cursor::Question(self.start_id.clone());
        self.answer_path.clear();
        self.answers.clear();
    }

    /// Re-initialises as in [`NavigationState::start`], keeping `total_steps`.
    pub fn reset(&mut self) {
        self.start();
    }

    /// Records `answer_text` for `answered` and moves the cursor to `next`.
    ///
    /// Fails with [`ToolError::StaleQuestion`] without mutating anything if `answered` is not the
    /// question currently displayed.
    pub fn advance(&mut self, answered: &NodeId, answer_text: &str, next: Cursor) -> ToolResult<()> {
        self.advance_at(answered, answer_text, next, Utc::now())
    }

    /// [`NavigationState::advance`] with an explicit timestamp, used when replaying saved progress.
    pub(crate) fn advance_at(
        &mut self,
        answered: &NodeId,
        answer_text: &str,
        next: Cursor,
        timestamp: DateTime<Utc>,
    ) -> ToolResult<()> {
        match &self.cursor {
            Cursor::Question(current) if current == answered => {}
            Cursor::Question(current) => {
                return Err(ToolError::StaleQuestion {
                    expected: current.to_string(),
                    answered: answered.clone(),
                });
            }
            Cursor::Finished => {
                return Err(ToolError::StaleQuestion {
                    expected: "<result>".into(),
                    answered: answered.clone(),
                });
            }
        }

        self.answer_path.push(AnswerRecord {
            question_id: answered.clone(),
            answer_text: answer_text.to_owned(),
            timestamp,
        });
        self.answers.insert(answered.clone(), answer_text.to_owned());
        self.cursor = next;
        Ok(())
    }

    /// Undoes the most recent answer and redisplays the question it answered.
    ///
    /// Returns `false` and changes nothing when there is no history.
    pub fn go_back(&mut self) -> bool {
        let Some(popped) = self.answer_path.pop() else {
            return false;
        };

        // Keep `answers` derived from the path, even if the question appears earlier too.
        match self
            .answer_path
            .iter()
            .rev()
            .find(|record| record.question_id == popped.question_id)
        {
            Some(earlier) => {
                self.answers
                    .insert(earlier.question_id.clone(), earlier.answer_text.clone());
            }
            None => {
                self.answers.remove(&popped.question_id);
            }
        }

        self.cursor = Cursor::Question(popped.question_id);
        true
    }

    /// Share of `total_steps` answered so far, clamped to `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        (self.answer_path.len() as f64 / self.total_steps as f64).min(1.0)
    }

    pub fn current_step(&self) -> usize {
        self.answer_path.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.answer_path.is_empty()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn current_question_id(&self) -> Option<&NodeId> {
        self.cursor.question_id()
    }

    pub fn start_id(&self) -> &NodeId {
        &self.start_id
    }

    pub fn answer_path(&self) -> &[AnswerRecord] {
        &self.answer_path
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }
}
