//! Wire models for the decision graph data document and their translation to domain types.
//!
//! The document is authored as JSON (the format the site ships) or YAML. Both formats share the
//! same strict schema: unknown keys are rejected and schema mismatches report the path of the
//! failing field.

use crate::constants::START_QUESTION_ID;
use crate::model::{
    AnswerOption, DisplayCondition, EligibilityResult, EligibilityType, Outcome, Question,
    ReferenceLink,
};
use crate::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use vpref_types::{NodeId, NonEmptyText};

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub(crate) struct GraphDocumentWire {
    pub version: NonEmptyText,
    #[serde(default = "default_start_id")]
    pub start_id: String,
    #[serde(default)]
    pub total_steps: Option<usize>,
    pub questions: Vec<QuestionWire>,
    #[serde(default)]
    pub results: Vec<ResultWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub(crate) struct QuestionWire {
    pub id: NodeId,
    pub text: NonEmptyText,
    #[serde(default)]
    pub help_text: Option<NonEmptyText>,
    #[serde(default)]
    pub conditions: Vec<ConditionWire>,
    pub options: Vec<OptionWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub(crate) struct OptionWire {
    pub answer_text: NonEmptyText,
    #[serde(default)]
    pub next_question_id: Option<NodeId>,
    #[serde(default)]
    pub result_id: Option<NodeId>,
    #[serde(default)]
    pub evaluate: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConditionWire {
    pub when: NodeId,
    pub equals: Vec<NonEmptyText>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub(crate) struct ResultWire {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub result_type: EligibilityType,
    pub title: NonEmptyText,
    pub description: NonEmptyText,
    #[serde(default)]
    pub required_documents: Vec<NonEmptyText>,
    #[serde(default)]
    pub additional_info: Vec<NonEmptyText>,
    #[serde(default)]
    pub links: Vec<LinkWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LinkWire {
    pub url: NonEmptyText,
    pub text: NonEmptyText,
}

fn default_start_id() -> String {
    START_QUESTION_ID.to_owned()
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a JSON graph document, reporting the failing field path on schema mismatch.
pub(crate) fn parse_json(text: &str) -> GraphResult<GraphDocumentWire> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(&mut deserializer).map_err(schema_mismatch)
}

/// Parse a YAML graph document, reporting the failing field path on schema mismatch.
pub(crate) fn parse_yaml(text: &str) -> GraphResult<GraphDocumentWire> {
    let deserializer = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserializer).map_err(schema_mismatch)
}

fn schema_mismatch<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> GraphError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    GraphError::Translation(format!("Graph document schema mismatch at {path}: {source}"))
}

// ============================================================================
// Translation helpers
// ============================================================================

/// Domain parts extracted from a document, ready for integrity checking.
pub(crate) struct GraphParts {
    pub version: String,
    pub start_id: NodeId,
    pub total_steps: Option<usize>,
    pub questions: Vec<Question>,
    pub results: Vec<(NodeId, EligibilityResult)>,
}

pub(crate) fn wire_to_domain(wire: GraphDocumentWire) -> GraphResult<GraphParts> {
    let start_id = NodeId::new(&wire.start_id)
        .map_err(|e| GraphError::InvalidInput(format!("invalid startId: {e}")))?;

    let questions = wire
        .questions
        .into_iter()
        .map(question_to_domain)
        .collect::<GraphResult<Vec<_>>>()?;

    let results = wire.results.into_iter().map(result_to_domain).collect();

    Ok(GraphParts {
        version: wire.version.into_inner(),
        start_id,
        total_steps: wire.total_steps,
        questions,
        results,
    })
}

fn question_to_domain(wire: QuestionWire) -> GraphResult<Question> {
    let id = wire.id;
    let options = wire
        .options
        .into_iter()
        .map(|option| option_to_domain(&id, option))
        .collect::<GraphResult<Vec<_>>>()?;

    let conditions = wire
        .conditions
        .into_iter()
        .map(|c| DisplayCondition {
            when: c.when,
            equals: c.equals.into_iter().map(NonEmptyText::into_inner).collect(),
        })
        .collect();

    Ok(Question {
        id,
        text: wire.text.into_inner(),
        help_text: wire.help_text.map(NonEmptyText::into_inner),
        options,
        conditions,
    })
}

fn option_to_domain(question: &NodeId, wire: OptionWire) -> GraphResult<AnswerOption> {
    let answer_text = wire.answer_text.into_inner();
    let outcome = match (wire.next_question_id, wire.result_id, wire.evaluate) {
        (Some(next), None, false) => Outcome::Next(next),
        (None, Some(result), false) => Outcome::Result(result),
        (None, None, true) => Outcome::Evaluate,
        _ => {
            return Err(GraphError::AmbiguousOutcome {
                question: question.clone(),
                answer: answer_text,
            })
        }
    };

    Ok(AnswerOption {
        answer_text,
        outcome,
    })
}

fn result_to_domain(wire: ResultWire) -> (NodeId, EligibilityResult) {
    let mut result = EligibilityResult::new(
        wire.result_type,
        wire.title.into_inner(),
        wire.description.into_inner(),
    );
    result.required_documents = wire
        .required_documents
        .into_iter()
        .map(NonEmptyText::into_inner)
        .collect();
    result.additional_info = wire
        .additional_info
        .into_iter()
        .map(NonEmptyText::into_inner)
        .collect();
    for link in wire.links {
        result.push_link(ReferenceLink::new(
            link.url.into_inner(),
            link.text.into_inner(),
        ));
    }

    (wire.id, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_json_document() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?", "options": [ { "answerText": "Yes", "evaluate": true } ] }
  ]
}"#;

        let wire = parse_json(input).expect("should parse");
        assert_eq!(wire.start_id, "START");
        assert!(wire.results.is_empty());

        let parts = wire_to_domain(wire).expect("should translate");
        assert_eq!(parts.questions[0].options[0].outcome, Outcome::Evaluate);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?", "colour": "red", "options": [] }
  ]
}"#;

        let err = parse_json(input).expect_err("should reject unknown key");
        match err {
            GraphError::Translation(msg) => {
                assert!(msg.contains("questions[0]"), "unexpected message: {msg}");
                assert!(msg.contains("colour"), "unexpected message: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_validation_rejects_blank_answer_text() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?", "options": [ { "answerText": "  ", "evaluate": true } ] }
  ]
}"#;

        let err = parse_json(input).expect_err("should reject blank answer");
        assert!(matches!(err, GraphError::Translation(msg) if msg.contains("answerText")));
    }

    #[test]
    fn condition_values_are_trimmed() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?",
      "conditions": [ { "when": "START", "equals": ["  Yes "] } ],
      "options": [ { "answerText": " Yes", "evaluate": true } ] }
  ]
}"#;

        let parts = wire_to_domain(parse_json(input).expect("should parse")).unwrap();
        let question = &parts.questions[0];
        assert_eq!(question.conditions[0].equals, vec!["Yes".to_owned()]);
        assert_eq!(question.options[0].answer_text, "Yes");
    }

    #[test]
    fn rejects_option_with_two_outcomes() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?", "options": [
      { "answerText": "Yes", "nextQuestionId": "NEXT", "resultId": "DONE" }
    ] }
  ]
}"#;

        let wire = parse_json(input).expect("schema is valid");
        let err = match wire_to_domain(wire) {
            Ok(_) => panic!("should reject ambiguous option"),
            Err(err) => err,
        };
        assert!(matches!(err, GraphError::AmbiguousOutcome { answer, .. } if answer == "Yes"));
    }

    #[test]
    fn rejects_option_without_outcome() {
        let input = r#"{
  "version": "test",
  "questions": [
    { "id": "START", "text": "Ready?", "options": [ { "answerText": "Yes" } ] }
  ]
}"#;

        let wire = parse_json(input).expect("schema is valid");
        assert!(matches!(
            wire_to_domain(wire),
            Err(GraphError::AmbiguousOutcome { .. })
        ));
    }

    #[test]
    fn parses_yaml_document_with_results() {
        let input = r#"version: "yaml-test"
startId: BEGIN
questions:
  - id: BEGIN
    text: Are you a veteran?
    options:
      - answerText: "No"
        resultId: NON_VETERAN
results:
  - id: NON_VETERAN
    type: not-eligible
    title: Not Eligible
    description: Only veterans qualify.
    links:
      - url: https://example.test/guide
        text: Guide
      - url: https://example.test/guide
        text: Guide again
"#;

        let parts = wire_to_domain(parse_yaml(input).expect("should parse yaml")).unwrap();
        assert_eq!(parts.start_id.as_str(), "BEGIN");
        let (id, result) = &parts.results[0];
        assert_eq!(id.as_str(), "NON_VETERAN");
        assert_eq!(result.result_type, EligibilityType::NotEligible);
        assert_eq!(result.links.len(), 1, "links are de-duplicated by url");
    }

    #[test]
    fn yaml_schema_mismatch_reports_path() {
        let input = r#"version: "yaml-test"
questions:
  - id: START
    text: Ready?
    options:
      - answerText: "Yes"
        evaluate: "sometimes"
"#;

        let err = parse_yaml(input).expect_err("should reject wrong type");
        assert!(matches!(err, GraphError::Translation(msg) if msg.contains("evaluate")));
    }
}
