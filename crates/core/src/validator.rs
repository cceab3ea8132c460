//! Cross-question consistency checks on the recorded answers.
//!
//! The graph only knows about single edges. These rules look at combinations of answers that a
//! path could reach through direct links and that must end the flow (or at least be flagged).

use crate::evaluator::facts::{Facts, RetirementRank, ServiceStatus};
use serde::{Deserialize, Serialize};
use vpref_graph::AnswerMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The answers already rule out preference; the flow must end.
    NotEligible,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub reason: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, reason: &str, message: &str) -> Self {
        Self {
            kind,
            reason: reason.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Checks the answers recorded so far.
pub fn validate(answers: &AnswerMap) -> Vec<ValidationIssue> {
    let facts = Facts::from_answers(answers);
    let mut issues = Vec::new();

    if facts.service_status == Some(ServiceStatus::Retired)
        && facts.retirement_rank == Some(RetirementRank::O4OrAbove)
        && facts.officer_disabled == Some(false)
    {
        issues.push(ValidationIssue::new(
            IssueKind::NotEligible,
            "retired_officer_without_disability",
            "Retired officers at O-4 or above are generally only eligible for Veterans' Preference if they are disabled veterans.",
        ));
    }

    if facts.discharge.is_some_and(|d| d.is_disqualifying()) {
        issues.push(ValidationIssue::new(
            IssueKind::NotEligible,
            "disqualifying_discharge",
            "Veterans' Preference requires a discharge under honorable conditions.",
        ));
    }

    if facts.is_family_path() && facts.has_own_service_answers() {
        issues.push(ValidationIssue::new(
            IssueKind::Warning,
            "mixed_self_and_family_answers",
            "Answers describe both your own service and a family member's. Preference is assessed on one or the other.",
        ));
    }

    issues
}

/// The first issue that must end the flow, if any.
pub fn first_blocking(issues: &[ValidationIssue]) -> Option<&ValidationIssue> {
    issues
        .iter()
        .find(|issue| issue.kind == IssueKind::NotEligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpref_types::NodeId;

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(question, answer)| (NodeId::new(question).unwrap(), (*answer).to_owned()))
            .collect()
    }

    #[test]
    fn flags_retired_senior_officer_without_disability() {
        let issues = validate(&answers(&[
            ("VETERAN_STATUS", "Retired military"),
            ("RETIREMENT_TYPE", "Major/Lt. Commander (O-4) or above"),
            ("RETIRED_OFFICER_DISABILITY", "No"),
        ]));

        let blocking = first_blocking(&issues).expect("should block");
        assert_eq!(blocking.reason, "retired_officer_without_disability");
        assert!(blocking.message.contains("O-4 or above"));
    }

    #[test]
    fn disabled_senior_officer_is_not_flagged() {
        let issues = validate(&answers(&[
            ("VETERAN_STATUS", "Retired military"),
            ("RETIREMENT_TYPE", "Major/Lt. Commander (O-4) or above"),
            ("RETIRED_OFFICER_DISABILITY", "Yes"),
        ]));
        assert!(issues.is_empty());
    }

    #[test]
    fn flags_disqualifying_discharge() {
        let issues = validate(&answers(&[("DISCHARGE_TYPE", "Other Than Honorable (OTH)")]));
        assert!(matches!(
            first_blocking(&issues),
            Some(issue) if issue.reason == "disqualifying_discharge"
        ));
    }

    #[test]
    fn mixed_paths_only_warn() {
        let issues = validate(&answers(&[
            ("FAMILY_RELATIONSHIP", "Mother"),
            ("DISCHARGE_TYPE", "Honorable"),
        ]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Warning);
        assert!(first_blocking(&issues).is_none());
    }

    #[test]
    fn issue_kind_uses_snake_case_tags() {
        let json = serde_json::to_string(&IssueKind::NotEligible).unwrap();
        assert_eq!(json, "\"not_eligible\"");
    }
}
