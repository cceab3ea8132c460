//! The immutable decision graph and its construction-time integrity checks.
//!
//! A [`DecisionGraph`] can only be obtained through a loader that runs every check, so code
//! holding one may rely on:
//! - the start question exists,
//! - every `nextQuestionId`, `resultId` and condition `when` resolves,
//! - every condition value is an option label of its `when` question,
//! - every question has at least one option and no repeated answer text,
//! - no question can be reached from itself.

use crate::constants::BUILTIN_GRAPH_JSON;
use crate::model::{EligibilityResult, Node, Outcome, Question};
use crate::wire::{self, GraphParts};
use crate::{GraphError, GraphResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use vpref_types::NodeId;

#[derive(Clone, Debug)]
pub struct DecisionGraph {
    version: String,
    start_id: NodeId,
    total_steps_hint: Option<usize>,
    questions: HashMap<NodeId, Question>,
    /// Authoring order, used for deterministic checks and reporting.
    question_order: Vec<NodeId>,
    results: HashMap<NodeId, EligibilityResult>,
    longest_path_len: usize,
}

impl DecisionGraph {
    /// Loads the built-in Veterans' Preference questionnaire.
    pub fn builtin() -> GraphResult<Self> {
        Self::from_json_str(BUILTIN_GRAPH_JSON)
    }

    /// Parses and checks a JSON graph document.
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        Self::from_parts(wire::wire_to_domain(wire::parse_json(text)?)?)
    }

    /// Parses and checks a YAML graph document.
    pub fn from_yaml_str(text: &str) -> GraphResult<Self> {
        Self::from_parts(wire::wire_to_domain(wire::parse_yaml(text)?)?)
    }

    /// Reads a graph document from disk. `.yaml`/`.yml` files are parsed as YAML, anything else
    /// as JSON.
    pub fn from_path(path: &Path) -> GraphResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    fn from_parts(parts: GraphParts) -> GraphResult<Self> {
        let GraphParts {
            version,
            start_id,
            total_steps,
            questions: question_list,
            results: result_list,
        } = parts;

        let mut questions = HashMap::with_capacity(question_list.len());
        let mut question_order = Vec::with_capacity(question_list.len());
        for question in question_list {
            if questions.contains_key(&question.id) {
                return Err(GraphError::DuplicateNode(question.id));
            }
            question_order.push(question.id.clone());
            questions.insert(question.id.clone(), question);
        }

        let mut results = HashMap::with_capacity(result_list.len());
        for (id, result) in result_list {
            if questions.contains_key(&id) || results.contains_key(&id) {
                return Err(GraphError::DuplicateNode(id));
            }
            results.insert(id, result);
        }

        if !questions.contains_key(&start_id) {
            return Err(GraphError::MissingStart(start_id));
        }

        for id in &question_order {
            check_question(&questions[id], &questions, &results)?;
        }

        if let Some(cycle) = find_cycle(&questions, &question_order) {
            return Err(GraphError::Cycle(cycle));
        }

        warn_unreachable(&start_id, &questions, &question_order, &results);

        let longest_path_len = longest_path(&start_id, &questions, &mut HashMap::new());

        Ok(Self {
            version,
            start_id,
            total_steps_hint: total_steps,
            questions,
            question_order,
            results,
            longest_path_len,
        })
    }

    /// Document version, recorded in saved progress.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn start_id(&self) -> &NodeId {
        &self.start_id
    }

    /// `totalSteps` as authored in the document, if any.
    pub fn total_steps_hint(&self) -> Option<usize> {
        self.total_steps_hint
    }

    /// Number of answers on the longest path from the start question to a terminal option.
    pub fn longest_path_len(&self) -> usize {
        self.longest_path_len
    }

    pub fn lookup(&self, id: &NodeId) -> Option<Node<'_>> {
        if let Some(question) = self.questions.get(id) {
            return Some(Node::Question(question));
        }
        self.results.get(id).map(Node::Result)
    }

    pub fn question(&self, id: &NodeId) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn result(&self, id: &NodeId) -> Option<&EligibilityResult> {
        self.results.get(id)
    }

    /// Questions in authoring order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.question_order.iter().map(|id| &self.questions[id])
    }
}

fn check_question(
    question: &Question,
    questions: &HashMap<NodeId, Question>,
    results: &HashMap<NodeId, EligibilityResult>,
) -> GraphResult<()> {
    if question.options.is_empty() {
        return Err(GraphError::NoOptions {
            question: question.id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for option in &question.options {
        if !seen.insert(option.answer_text.as_str()) {
            return Err(GraphError::DuplicateAnswer {
                question: question.id.clone(),
                answer: option.answer_text.clone(),
            });
        }

        match &option.outcome {
            Outcome::Next(next) if !questions.contains_key(next) => {
                return Err(GraphError::DanglingReference {
                    from: question.id.clone(),
                    target: next.clone(),
                });
            }
            Outcome::Result(result) if !results.contains_key(result) => {
                return Err(GraphError::MissingResult {
                    from: question.id.clone(),
                    result: result.clone(),
                });
            }
            _ => {}
        }
    }

    for condition in &question.conditions {
        let Some(when) = questions.get(&condition.when) else {
            return Err(GraphError::DanglingReference {
                from: question.id.clone(),
                target: condition.when.clone(),
            });
        };
        if let Some(answer) = condition
            .equals
            .iter()
            .find(|answer| when.option_by_text(answer).is_none())
        {
            return Err(GraphError::UnknownConditionAnswer {
                question: question.id.clone(),
                when: condition.when.clone(),
                answer: answer.clone(),
            });
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search for a back edge. Returns the cycle as a closed path.
fn find_cycle(questions: &HashMap<NodeId, Question>, order: &[NodeId]) -> Option<Vec<NodeId>> {
    fn visit<'a>(
        id: &'a NodeId,
        questions: &'a HashMap<NodeId, Question>,
        marks: &mut HashMap<&'a NodeId, Mark>,
        stack: &mut Vec<&'a NodeId>,
    ) -> Option<Vec<NodeId>> {
        match marks.get(id) {
            Some(Mark::Done) => return None,
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|entry| *entry == id).unwrap_or(0);
                let mut cycle: Vec<NodeId> = stack[start..].iter().map(|e| (*e).clone()).collect();
                cycle.push(id.clone());
                return Some(cycle);
            }
            None => {}
        }

        marks.insert(id, Mark::Visiting);
        stack.push(id);
        if let Some(question) = questions.get(id) {
            for next in question.successors() {
                if let Some(cycle) = visit(next, questions, marks, stack) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        marks.insert(id, Mark::Done);
        None
    }

    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    order
        .iter()
        .find_map(|id| visit(id, questions, &mut marks, &mut stack))
}

/// Longest number of answers from `id` to a terminal option. Requires an acyclic graph.
fn longest_path<'a>(
    id: &'a NodeId,
    questions: &'a HashMap<NodeId, Question>,
    memo: &mut HashMap<&'a NodeId, usize>,
) -> usize {
    if let Some(len) = memo.get(id) {
        return *len;
    }

    let len = match questions.get(id) {
        Some(question) => {
            1 + question
                .successors()
                .map(|next| longest_path(next, questions, memo))
                .max()
                .unwrap_or(0)
        }
        None => 0,
    };
    memo.insert(id, len);
    len
}

fn warn_unreachable(
    start_id: &NodeId,
    questions: &HashMap<NodeId, Question>,
    order: &[NodeId],
    results: &HashMap<NodeId, EligibilityResult>,
) {
    let mut reachable: HashSet<&NodeId> = HashSet::new();
    let mut pending = vec![start_id];
    while let Some(id) = pending.pop() {
        if !reachable.insert(id) {
            continue;
        }
        if let Some(question) = questions.get(id) {
            for option in &question.options {
                match &option.outcome {
                    Outcome::Next(next) => pending.push(next),
                    Outcome::Result(result) => {
                        reachable.insert(result);
                    }
                    Outcome::Evaluate => {}
                }
            }
        }
    }

    for id in order {
        if !reachable.contains(id) {
            tracing::warn!("question '{}' is not reachable from '{}'", id, start_id);
        }
    }

    let mut unreachable_results: Vec<&NodeId> = results
        .keys()
        .filter(|id| !reachable.contains(id))
        .collect();
    unreachable_results.sort();
    for id in unreachable_results {
        tracing::warn!("result '{}' is not reachable from '{}'", id, start_id);
    }
}
