//! Domain-level decision graph types.
//!
//! These types are independent of the on-disk document format. They are produced by the wire
//! translation in this crate and consumed read-only by `vpref-core`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vpref_types::NodeId;

/// Answers recorded so far, keyed by question id.
///
/// The value is the answer text exactly as displayed; the label *is* the stored answer.
pub type AnswerMap = BTreeMap<NodeId, String>;

// ============================================================================
// Results
// ============================================================================

/// Eligibility category of a result. Also used as the display style tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EligibilityType {
    #[serde(rename = "eligible-5-point")]
    Eligible5Point,
    #[serde(rename = "eligible-10-point")]
    Eligible10Point,
    #[serde(rename = "eligible-10-point-cps")]
    Eligible10PointCps,
    #[serde(rename = "eligible-10-point-derivative")]
    Eligible10PointDerivative,
    #[serde(rename = "not-eligible")]
    NotEligible,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "complex")]
    Complex,
}

impl EligibilityType {
    /// The tag as written in the data document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eligible5Point => "eligible-5-point",
            Self::Eligible10Point => "eligible-10-point",
            Self::Eligible10PointCps => "eligible-10-point-cps",
            Self::Eligible10PointDerivative => "eligible-10-point-derivative",
            Self::NotEligible => "not-eligible",
            Self::Info => "info",
            Self::Complex => "complex",
        }
    }

    /// True for every preference-granting category.
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            Self::Eligible5Point
                | Self::Eligible10Point
                | Self::Eligible10PointCps
                | Self::Eligible10PointDerivative
        )
    }

    /// True for the 10-point categories, derivative preference included.
    pub fn is_ten_point(&self) -> bool {
        matches!(
            self,
            Self::Eligible10Point | Self::Eligible10PointCps | Self::Eligible10PointDerivative
        )
    }
}

impl std::fmt::Display for EligibilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external reference (usually OPM guidance) attached to a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub url: String,
    pub text: String,
}

impl ReferenceLink {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// A terminal outcome shown to the user.
///
/// Authored results come from the document's results table. Derived results are produced by the
/// eligibility evaluator in `vpref-core` and additionally carry `reasoning` lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibilityResult {
    pub result_type: EligibilityType,
    pub title: String,
    pub description: String,
    pub reasoning: Vec<String>,
    pub required_documents: Vec<String>,
    pub additional_info: Vec<String>,
    pub links: Vec<ReferenceLink>,
}

impl EligibilityResult {
    /// Creates a result with empty lists.
    pub fn new(
        result_type: EligibilityType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            result_type,
            title: title.into(),
            description: description.into(),
            reasoning: Vec::new(),
            required_documents: Vec::new(),
            additional_info: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Adds a link unless one with the same url is already present.
    ///
    /// Returns `true` when the link was added.
    pub fn push_link(&mut self, link: ReferenceLink) -> bool {
        if self.links.iter().any(|existing| existing.url == link.url) {
            return false;
        }
        self.links.push(link);
        true
    }
}

// ============================================================================
// Questions
// ============================================================================

/// Where selecting an option leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Continue with another question.
    Next(NodeId),
    /// Finish with an authored result from the results table.
    Result(NodeId),
    /// Finish with a result derived from the whole answer history.
    Evaluate,
}

/// One selectable answer of a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    /// Label shown to the user, also the recorded answer value.
    pub answer_text: String,
    pub outcome: Outcome,
}

/// Guard evaluated before a question is displayed.
///
/// The condition holds when the `when` question is unanswered, or its recorded answer is one of
/// `equals`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayCondition {
    pub when: NodeId,
    pub equals: Vec<String>,
}

impl DisplayCondition {
    pub fn is_satisfied(&self, answers: &AnswerMap) -> bool {
        match answers.get(&self.when) {
            Some(answer) => self.equals.iter().any(|allowed| allowed == answer),
            None => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: NodeId,
    pub text: String,
    pub help_text: Option<String>,
    /// Display and keyboard-navigation order.
    pub options: Vec<AnswerOption>,
    pub conditions: Vec<DisplayCondition>,
}

impl Question {
    /// Finds the option whose label matches `answer_text` exactly.
    pub fn option_by_text(&self, answer_text: &str) -> Option<&AnswerOption> {
        self.options
            .iter()
            .find(|option| option.answer_text == answer_text)
    }

    /// Labels in display order.
    pub fn option_labels(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|option| option.answer_text.clone())
            .collect()
    }

    /// Whether every display condition holds for the given answers.
    pub fn should_display(&self, answers: &AnswerMap) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.is_satisfied(answers))
    }

    /// Question ids reachable through a single option.
    pub fn successors(&self) -> impl Iterator<Item = &NodeId> {
        self.options.iter().filter_map(|option| match &option.outcome {
            Outcome::Next(next) => Some(next),
            _ => None,
        })
    }
}

/// Result of looking up an id in a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    Question(&'a Question),
    Result(&'a EligibilityResult),
}
