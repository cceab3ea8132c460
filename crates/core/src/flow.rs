//! Flow resolution: what comes after an answer.
//!
//! Combines the graph edge chosen by the user with the cross-question checks:
//! - a blocking validator issue ends the flow with a not-eligible result,
//! - a next question whose display conditions fail ends the flow with a not-eligible result,
//! - `evaluate` outcomes are derived by the evaluator from the whole path.

use crate::constants::{OPM_VET_GUIDE_URL, PATH_BLOCKED_DESCRIPTION, PATH_BLOCKED_TITLE};
use crate::evaluator;
use crate::navigation::{AnswerRecord, Cursor, NavigationState};
use crate::validator::{self, IssueKind, ValidationIssue};
use crate::{ToolError, ToolResult};
use chrono::{DateTime, Utc};
use vpref_graph::{
    AnswerMap, DecisionGraph, EligibilityResult, EligibilityType, GraphError, Outcome,
    ReferenceLink,
};
use vpref_types::NodeId;

/// Where the session is after an answer.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Question(NodeId),
    Result(EligibilityResult),
}

impl Step {
    pub fn cursor(&self) -> Cursor {
        match self {
            Self::Question(id) => Cursor::Question(id.clone()),
            Self::Result(_) => Cursor::Finished,
        }
    }
}

/// Resolves `outcome`, chosen on question `from`, against answers that already include it.
pub fn resolve(
    graph: &DecisionGraph,
    from: &NodeId,
    path: &[AnswerRecord],
    answers: &AnswerMap,
    outcome: &Outcome,
) -> ToolResult<Step> {
    let issues = validator::validate(answers);
    for issue in issues.iter().filter(|issue| issue.kind == IssueKind::Warning) {
        tracing::warn!("answer validation warning ({}): {}", issue.reason, issue.message);
    }
    let blocking = validator::first_blocking(&issues);

    match outcome {
        Outcome::Next(next) => {
            let question = graph
                .question(next)
                .ok_or_else(|| GraphError::DanglingReference {
                    from: from.clone(),
                    target: next.clone(),
                })?;

            if let Some(issue) = blocking {
                tracing::info!("validator ended the flow before '{}': {}", next, issue.reason);
                return Ok(Step::Result(blocked_result(issue, path)));
            }

            if !question.should_display(answers) {
                tracing::info!("display conditions for '{}' failed; ending the flow", next);
                return Ok(Step::Result(path_blocked_result()));
            }

            Ok(Step::Question(next.clone()))
        }
        Outcome::Result(id) => {
            let result = graph.result(id).ok_or_else(|| GraphError::MissingResult {
                from: from.clone(),
                result: id.clone(),
            })?;
            Ok(Step::Result(override_if_blocked(result.clone(), blocking, path)))
        }
        Outcome::Evaluate => Ok(Step::Result(override_if_blocked(
            evaluator::evaluate(path),
            blocking,
            path,
        ))),
    }
}

/// Records `answer_text` for the displayed question and moves the state to the resolved step.
///
/// Nothing is mutated when the answer is stale, unknown, or cannot be resolved.
pub fn answer(
    graph: &DecisionGraph,
    state: &mut NavigationState,
    question_id: &NodeId,
    answer_text: &str,
) -> ToolResult<Step> {
    answer_at(graph, state, question_id, answer_text, Utc::now())
}

fn answer_at(
    graph: &DecisionGraph,
    state: &mut NavigationState,
    question_id: &NodeId,
    answer_text: &str,
    timestamp: DateTime<Utc>,
) -> ToolResult<Step> {
    match state.current_question_id() {
        Some(current) if current == question_id => {}
        current => {
            return Err(ToolError::StaleQuestion {
                expected: current.map_or_else(|| "<result>".to_owned(), NodeId::to_string),
                answered: question_id.clone(),
            });
        }
    }

    let question = graph
        .question(question_id)
        .ok_or_else(|| ToolError::UnknownQuestion(question_id.clone()))?;
    let option = question
        .option_by_text(answer_text)
        .ok_or_else(|| ToolError::UnknownAnswer {
            question: question_id.clone(),
            answer: answer_text.to_owned(),
        })?;

    let record = AnswerRecord {
        question_id: question_id.clone(),
        answer_text: answer_text.to_owned(),
        timestamp,
    };
    let mut path = state.answer_path().to_vec();
    path.push(record);
    let mut answers = state.answers().clone();
    answers.insert(question_id.clone(), answer_text.to_owned());

    let step = resolve(graph, question_id, &path, &answers, &option.outcome)?;
    state.advance_at(question_id, answer_text, step.cursor(), timestamp)?;
    Ok(step)
}

/// Rebuilds a session from saved answers by replaying them through the graph.
///
/// Returns the rebuilt state and the step it ends on. Any answer that no longer fits the graph
/// fails the whole replay.
pub fn replay(
    graph: &DecisionGraph,
    records: &[AnswerRecord],
    total_steps: usize,
) -> ToolResult<(NavigationState, Step)> {
    let mut state = NavigationState::new(graph.start_id().clone(), total_steps);
    let mut step = Step::Question(graph.start_id().clone());

    for (index, record) in records.iter().enumerate() {
        if matches!(step, Step::Result(_)) {
            return Err(ToolError::SnapshotMismatch(format!(
                "answer {} recorded after the flow had finished",
                index + 1
            )));
        }
        step = answer_at(
            graph,
            &mut state,
            &record.question_id,
            &record.answer_text,
            record.timestamp,
        )?;
    }

    Ok((state, step))
}

fn override_if_blocked(
    result: EligibilityResult,
    blocking: Option<&ValidationIssue>,
    path: &[AnswerRecord],
) -> EligibilityResult {
    match blocking {
        Some(issue) if result.result_type != EligibilityType::NotEligible => {
            tracing::info!("validator overrode a '{}' result: {}", result.result_type, issue.reason);
            blocked_result(issue, path)
        }
        _ => result,
    }
}

fn blocked_result(issue: &ValidationIssue, path: &[AnswerRecord]) -> EligibilityResult {
    let mut result = evaluator::evaluate(path);
    if result.result_type != EligibilityType::NotEligible {
        result = not_eligible(PATH_BLOCKED_TITLE, &issue.message);
        result.reasoning.push(format!("✗ {}", issue.message));
    }
    result.description = issue.message.clone();
    result
}

fn path_blocked_result() -> EligibilityResult {
    not_eligible(PATH_BLOCKED_TITLE, PATH_BLOCKED_DESCRIPTION)
}

fn not_eligible(title: &str, description: &str) -> EligibilityResult {
    let mut result = EligibilityResult::new(EligibilityType::NotEligible, title, description);
    result.additional_info.push(
        "Please review your answers or consult official OPM guidance for more details.".to_owned(),
    );
    result.push_link(ReferenceLink::new(
        OPM_VET_GUIDE_URL,
        "OPM Vet Guide for HR Professionals (Main)",
    ));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> NodeId {
        NodeId::new(value).unwrap()
    }

    fn builtin_state(graph: &DecisionGraph) -> NavigationState {
        NavigationState::new(graph.start_id().clone(), graph.longest_path_len())
    }

    #[test]
    fn follows_next_question_edges() {
        let graph = DecisionGraph::builtin().unwrap();
        let mut state = builtin_state(&graph);

        let step = answer(
            &graph,
            &mut state,
            &id("START"),
            "For myself (I am a veteran or current service member)",
        )
        .unwrap();
        assert_eq!(step, Step::Question(id("VETERAN_STATUS")));
        assert_eq!(state.current_question_id(), Some(&id("VETERAN_STATUS")));
    }

    #[test]
    fn direct_results_come_from_the_results_table() {
        let graph = DecisionGraph::builtin().unwrap();
        let mut state = builtin_state(&graph);

        let step = answer(
            &graph,
            &mut state,
            &id("START"),
            "I am an HR professional seeking general information",
        )
        .unwrap();
        match step {
            Step::Result(result) => assert_eq!(result.result_type, EligibilityType::Info),
            other => panic!("expected a result, got {other:?}"),
        }
        assert_eq!(state.cursor(), &Cursor::Finished);
    }

    #[test]
    fn unknown_answer_leaves_state_untouched() {
        let graph = DecisionGraph::builtin().unwrap();
        let mut state = builtin_state(&graph);
        let before = state.clone();

        let err = answer(&graph, &mut state, &id("START"), "Maybe").expect_err("unknown answer");
        assert!(matches!(err, ToolError::UnknownAnswer { .. }));
        assert_eq!(state, before);

        let err = answer(&graph, &mut state, &id("DISCHARGE_TYPE"), "Honorable")
            .expect_err("stale question");
        assert!(matches!(err, ToolError::StaleQuestion { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn failing_display_condition_ends_the_flow() {
        let graph = DecisionGraph::from_json_str(
            r#"{ "version": "t", "questions": [
  { "id": "START", "text": "Status?", "options": [
    { "answerText": "Retired", "nextQuestionId": "RANK" },
    { "answerText": "Civilian", "nextQuestionId": "RANK" }
  ] },
  { "id": "RANK", "text": "Rank?", "conditions": [ { "when": "START", "equals": ["Retired"] } ],
    "options": [ { "answerText": "O-1", "evaluate": true } ] }
] }"#,
        )
        .unwrap();

        let mut state = builtin_state(&graph);
        let step = answer(&graph, &mut state, &id("START"), "Civilian").unwrap();
        match step {
            Step::Result(result) => {
                assert_eq!(result.result_type, EligibilityType::NotEligible);
                assert_eq!(result.description, PATH_BLOCKED_DESCRIPTION);
            }
            other => panic!("expected a result, got {other:?}"),
        }

        state.reset();
        let step = answer(&graph, &mut state, &id("START"), "Retired").unwrap();
        assert_eq!(step, Step::Question(id("RANK")));
    }

    #[test]
    fn replay_rebuilds_state_and_final_step() {
        let graph = DecisionGraph::builtin().unwrap();
        let mut state = builtin_state(&graph);
        for (question, text) in [
            ("START", "For myself (I am a veteran or current service member)"),
            ("VETERAN_STATUS", "Discharged/Separated veteran"),
            ("DISCHARGE_TYPE", "Honorable"),
        ] {
            answer(&graph, &mut state, &id(question), text).unwrap();
        }

        let (replayed, step) = replay(&graph, state.answer_path(), state.total_steps()).unwrap();
        assert_eq!(replayed, state);
        assert_eq!(step, Step::Question(id("SERVICE_DATES")));
    }

    #[test]
    fn replay_rejects_answers_that_no_longer_fit() {
        let graph = DecisionGraph::builtin().unwrap();
        let records = vec![
            AnswerRecord::new(id("START"), "For a family member"),
            AnswerRecord::new(id("VETERAN_STATUS"), "Retired military"),
        ];
        assert!(matches!(
            replay(&graph, &records, 7),
            Err(ToolError::StaleQuestion { .. })
        ));

        let records = vec![
            AnswerRecord::new(id("START"), "I am an HR professional seeking general information"),
            AnswerRecord::new(id("START"), "For a family member"),
        ];
        assert!(matches!(
            replay(&graph, &records, 7),
            Err(ToolError::SnapshotMismatch(_))
        ));
    }
}
