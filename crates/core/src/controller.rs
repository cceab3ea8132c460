//! The session controller: turns user actions into state transitions and renderer calls.
//!
//! The controller owns one session. State changes are synchronous; the visual transition that
//! follows is the renderer's business. While a transition is in flight the controller is
//! "animating" and ignores every action except `Print`, so a double click can never advance
//! twice.
//!
//! A renderer that animates returns `true` from [`Renderer::defers_transitions`] and calls
//! [`ToolController::finish_transition`] (or [`ToolController::abort_transition`]) when its
//! effect ends. Otherwise the controller clears the lock itself right after rendering.

use crate::config::ToolConfig;
use crate::constants::{CONFIGURATION_ERROR_MESSAGE, RESTORE_PROMPT};
use crate::flow::{self, Step};
use crate::navigation::NavigationState;
use crate::persistence::{ProgressService, ProgressSnapshot, ProgressStore};
use crate::view::{QuestionView, ResultView};
use crate::ToolError;
use std::sync::Arc;
use uuid::Uuid;
use vpref_graph::{DecisionGraph, EligibilityResult};

/// Output side of a session.
pub trait Renderer {
    fn on_question_change(&mut self, question: &QuestionView);
    fn on_result(&mut self, result: &ResultView);
    fn on_progress(&mut self, fraction: f64);
    /// Shows a fatal message. The session can only be restarted afterwards.
    fn on_error(&mut self, message: &str);

    /// Screen-reader announcement.
    fn announce(&mut self, _message: &str) {}

    /// Keyboard focus moved to the option at `index`.
    fn on_focus(&mut self, _index: usize) {}

    /// Receives the printable form of the displayed result.
    fn on_print(&mut self, _document: &str) {}

    /// Asks whether saved progress should be restored. Declining discards it.
    fn confirm_restore(&mut self, _prompt: &str) -> bool {
        false
    }

    /// `true` if the renderer reports the end of each transition itself.
    fn defers_transitions(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolAction {
    /// Accept the notice and begin (or resume) the questionnaire.
    Start,
    /// Select the option at this index of the displayed question.
    SelectAnswer(usize),
    Back,
    Restart,
    Print,
    Key(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    Ignored,
}

#[derive(Clone, Debug)]
enum Screen {
    Notice,
    Question(QuestionView),
    Result(ResultView),
    Error,
}

pub struct ToolController<R> {
    graph: Arc<DecisionGraph>,
    config: Arc<ToolConfig>,
    navigation: NavigationState,
    progress: Option<ProgressService<Box<dyn ProgressStore>>>,
    renderer: R,
    animating: bool,
    focus: Option<usize>,
    screen: Screen,
    session_id: Uuid,
}

impl<R: Renderer> ToolController<R> {
    /// Creates a session on the notice screen. Nothing is rendered until `Start`.
    pub fn new(graph: Arc<DecisionGraph>, config: Arc<ToolConfig>, renderer: R) -> Self {
        let total_steps = config.effective_total_steps(&graph);
        let navigation = NavigationState::new(graph.start_id().clone(), total_steps);
        let session_id = Uuid::new_v4();
        tracing::debug!(session = %session_id, total_steps, "session created");

        Self {
            graph,
            config,
            navigation,
            progress: None,
            renderer,
            animating: false,
            focus: None,
            screen: Screen::Notice,
            session_id,
        }
    }

    /// Attaches a progress store. Ignored when the configuration disables persistence.
    pub fn with_store(mut self, store: Box<dyn ProgressStore>) -> Self {
        if self.config.persist_progress() {
            self.progress = Some(ProgressService::new(store, self.config.storage_key()));
        } else {
            tracing::debug!(session = %self.session_id, "progress persistence disabled");
        }
        self
    }

    pub fn handle_action(&mut self, action: ToolAction) -> Dispatch {
        if self.animating && action != ToolAction::Print {
            tracing::debug!(session = %self.session_id, ?action, "ignored while animating");
            return Dispatch::Ignored;
        }

        match action {
            ToolAction::Start => self.start(),
            ToolAction::SelectAnswer(index) => self.select_answer(index),
            ToolAction::Back => self.back(),
            ToolAction::Restart => self.restart(),
            ToolAction::Print => self.print(),
            ToolAction::Key(key) => self.handle_key(key),
        }
    }

    /// Marks the current visual transition as complete.
    pub fn finish_transition(&mut self) {
        self.animating = false;
    }

    /// Marks the current visual transition as failed. The lock is released all the same.
    pub fn abort_transition(&mut self, reason: &str) {
        if self.animating {
            tracing::warn!(session = %self.session_id, "transition aborted: {}", reason);
        }
        self.animating = false;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Option index that currently has keyboard focus.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn current_question(&self) -> Option<&QuestionView> {
        match &self.screen {
            Screen::Question(view) => Some(view),
            _ => None,
        }
    }

    pub fn current_result(&self) -> Option<&ResultView> {
        match &self.screen {
            Screen::Result(view) => Some(view),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn start(&mut self) -> Dispatch {
        if !matches!(self.screen, Screen::Notice) {
            return Dispatch::Ignored;
        }

        self.animating = true;
        tracing::info!(
            session = %self.session_id,
            graph_version = self.graph.version(),
            "session started"
        );

        match self.offer_restore() {
            Some(step) => self.show_step(step),
            None => self.show_current_question(),
        }
        Dispatch::Applied
    }

    fn select_answer(&mut self, index: usize) -> Dispatch {
        let Screen::Question(view) = &self.screen else {
            return Dispatch::Ignored;
        };
        let Some(answer_text) = view.options.get(index).cloned() else {
            return Dispatch::Ignored;
        };
        let question_id = view.question_id.clone();

        self.animating = true;
        match flow::answer(&self.graph, &mut self.navigation, &question_id, &answer_text) {
            Ok(step) => {
                tracing::debug!(
                    session = %self.session_id,
                    question = %question_id,
                    answer = %answer_text,
                    "answer recorded"
                );
                self.save_progress();
                self.show_step(step);
                Dispatch::Applied
            }
            Err(e @ (ToolError::StaleQuestion { .. } | ToolError::UnknownAnswer { .. })) => {
                tracing::warn!(session = %self.session_id, "ignored invalid transition: {}", e);
                self.animating = false;
                Dispatch::Ignored
            }
            Err(e) => {
                self.fail(e);
                Dispatch::Applied
            }
        }
    }

    fn back(&mut self) -> Dispatch {
        // Results only offer restart.
        if !matches!(self.screen, Screen::Question(_)) || !self.navigation.can_go_back() {
            return Dispatch::Ignored;
        }

        self.animating = true;
        if !self.navigation.go_back() {
            self.animating = false;
            return Dispatch::Ignored;
        }
        tracing::debug!(session = %self.session_id, "went back one question");
        self.save_progress();
        self.show_current_question();
        Dispatch::Applied
    }

    fn restart(&mut self) -> Dispatch {
        if matches!(self.screen, Screen::Notice) {
            return Dispatch::Ignored;
        }

        self.animating = true;
        self.navigation.reset();
        if let Some(progress) = self.progress.as_mut() {
            progress.clear();
        }
        tracing::info!(session = %self.session_id, "session restarted");
        self.show_current_question();
        Dispatch::Applied
    }

    fn print(&mut self) -> Dispatch {
        match &self.screen {
            Screen::Result(view) => {
                let document = view.to_plain_text();
                self.renderer.on_print(&document);
                Dispatch::Applied
            }
            _ => Dispatch::Ignored,
        }
    }

    fn handle_key(&mut self, key: Key) -> Dispatch {
        let Screen::Question(view) = &self.screen else {
            return Dispatch::Ignored;
        };
        let option_count = view.options.len();
        let can_go_back = view.can_go_back;

        match key {
            Key::Down | Key::Right => self.move_focus(option_count, true),
            Key::Up | Key::Left => self.move_focus(option_count, false),
            Key::Enter | Key::Space => match self.focus {
                Some(index) => self.select_answer(index),
                None => Dispatch::Ignored,
            },
            Key::Escape if can_go_back => self.back(),
            Key::Escape => Dispatch::Ignored,
        }
    }

    fn move_focus(&mut self, option_count: usize, forward: bool) -> Dispatch {
        if option_count == 0 {
            return Dispatch::Ignored;
        }

        let next = match (self.focus, forward) {
            (None, true) => 0,
            (None, false) => option_count - 1,
            (Some(index), true) => (index + 1) % option_count,
            (Some(index), false) => (index + option_count - 1) % option_count,
        };
        self.focus = Some(next);
        self.renderer.on_focus(next);
        Dispatch::Applied
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Offers saved progress that still replays on the current graph. Anything else is discarded
    /// without asking.
    fn offer_restore(&mut self) -> Option<Step> {
        let progress = self.progress.as_mut()?;
        let snapshot = progress.load()?;

        let (state, step) = match snapshot.restore(&self.graph, self.navigation.total_steps()) {
            Ok(rebuilt) => rebuilt,
            Err(e) => {
                tracing::warn!(session = %self.session_id, "discarding saved progress: {}", e);
                progress.clear();
                return None;
            }
        };

        if !self.renderer.confirm_restore(RESTORE_PROMPT) {
            tracing::info!(session = %self.session_id, "saved progress declined");
            progress.clear();
            return None;
        }

        tracing::info!(
            session = %self.session_id,
            answers = state.current_step(),
            "restored saved progress"
        );
        self.navigation = state;
        Some(step)
    }

    fn show_step(&mut self, step: Step) {
        match step {
            Step::Question(_) => self.show_current_question(),
            Step::Result(result) => self.show_result(result),
        }
    }

    fn show_current_question(&mut self) {
        let graph = Arc::clone(&self.graph);
        let Some(question_id) = self.navigation.current_question_id() else {
            self.fail(ToolError::NotAtQuestion);
            return;
        };
        let Some(question) = graph.question(question_id) else {
            let missing = question_id.clone();
            self.fail(ToolError::UnknownQuestion(missing));
            return;
        };

        let view = QuestionView::new(
            question,
            self.navigation.current_step(),
            self.navigation.total_steps(),
            self.navigation.progress_fraction(),
        );
        self.focus = None;
        self.renderer.on_question_change(&view);
        self.renderer.on_progress(view.progress);
        self.renderer.announce(&view.announcement());
        self.screen = Screen::Question(view);
        self.end_transition();
    }

    fn show_result(&mut self, result: EligibilityResult) {
        let view = ResultView::new(result);
        tracing::info!(
            session = %self.session_id,
            result_type = %view.style(),
            answers = self.navigation.current_step(),
            "result displayed"
        );

        self.focus = None;
        self.renderer.on_result(&view);
        self.renderer.on_progress(view.progress);
        self.renderer.announce(&view.announcement());
        self.screen = Screen::Result(view);
        self.end_transition();
    }

    fn fail(&mut self, error: ToolError) {
        tracing::error!(session = %self.session_id, "questionnaire error: {}", error);
        self.screen = Screen::Error;
        self.focus = None;
        self.animating = false;
        self.renderer.on_error(CONFIGURATION_ERROR_MESSAGE);
    }

    fn end_transition(&mut self) {
        if !self.renderer.defers_transitions() {
            self.animating = false;
        }
    }

    fn save_progress(&mut self) {
        if let Some(progress) = self.progress.as_mut() {
            let snapshot = ProgressSnapshot::capture(&self.graph, &self.navigation);
            progress.save(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use vpref_graph::EligibilityType;
    use vpref_types::NodeId;

    #[derive(Default)]
    struct Recorder {
        questions: Vec<QuestionView>,
        results: Vec<ResultView>,
        progress: Vec<f64>,
        errors: Vec<String>,
        announcements: Vec<String>,
        focus: Vec<usize>,
        printed: Vec<String>,
        prompts: Vec<String>,
        accept_restore: bool,
        defer: bool,
    }

    impl Renderer for Recorder {
        fn on_question_change(&mut self, question: &QuestionView) {
            self.questions.push(question.clone());
        }

        fn on_result(&mut self, result: &ResultView) {
            self.results.push(result.clone());
        }

        fn on_progress(&mut self, fraction: f64) {
            self.progress.push(fraction);
        }

        fn on_error(&mut self, message: &str) {
            self.errors.push(message.to_owned());
        }

        fn announce(&mut self, message: &str) {
            self.announcements.push(message.to_owned());
        }

        fn on_focus(&mut self, index: usize) {
            self.focus.push(index);
        }

        fn on_print(&mut self, document: &str) {
            self.printed.push(document.to_owned());
        }

        fn confirm_restore(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_owned());
            self.accept_restore
        }

        fn defers_transitions(&self) -> bool {
            self.defer
        }
    }

    fn controller(recorder: Recorder) -> ToolController<Recorder> {
        let graph = Arc::new(DecisionGraph::builtin().unwrap());
        ToolController::new(graph, Arc::new(ToolConfig::default()), recorder)
    }

    fn select(controller: &mut ToolController<Recorder>, answer: &str) -> Dispatch {
        let view = controller.current_question().expect("a question is displayed");
        let index = view
            .options
            .iter()
            .position(|option| option == answer)
            .expect("answer is offered");
        controller.handle_action(ToolAction::SelectAnswer(index))
    }

    fn id(value: &str) -> NodeId {
        NodeId::new(value).unwrap()
    }

    #[test]
    fn notice_gates_the_questionnaire() {
        let mut tool = controller(Recorder::default());
        assert_eq!(tool.handle_action(ToolAction::SelectAnswer(0)), Dispatch::Ignored);
        assert!(tool.renderer().questions.is_empty());

        assert_eq!(tool.handle_action(ToolAction::Start), Dispatch::Applied);
        let first = &tool.renderer().questions[0];
        assert_eq!(first.question_id, id("START"));
        assert_eq!(first.step, 1);
        assert!(!first.can_go_back);
        assert_eq!(
            tool.renderer().announcements[0],
            format!("New question: {}", first.text)
        );

        assert_eq!(tool.handle_action(ToolAction::Start), Dispatch::Ignored);
    }

    #[test]
    fn animating_lock_ignores_answers_until_transition_completes() {
        let mut tool = controller(Recorder {
            defer: true,
            ..Recorder::default()
        });
        tool.handle_action(ToolAction::Start);
        assert!(tool.is_animating());
        assert_eq!(tool.handle_action(ToolAction::SelectAnswer(0)), Dispatch::Ignored);

        tool.finish_transition();
        assert_eq!(tool.handle_action(ToolAction::SelectAnswer(0)), Dispatch::Applied);
        assert_eq!(tool.handle_action(ToolAction::SelectAnswer(0)), Dispatch::Ignored);
        assert_eq!(tool.navigation().current_step(), 1);

        tool.abort_transition("renderer detached");
        assert!(!tool.is_animating());
        assert_eq!(tool.handle_action(ToolAction::Back), Dispatch::Applied);
    }

    #[test]
    fn restart_redisplays_the_first_question_identically() {
        let mut tool = controller(Recorder::default());
        tool.handle_action(ToolAction::Start);
        select(&mut tool, "For myself (I am a veteran or current service member)");
        select(&mut tool, "Discharged/Separated veteran");

        assert_eq!(tool.handle_action(ToolAction::Restart), Dispatch::Applied);
        let questions = &tool.renderer().questions;
        assert_eq!(questions.first(), questions.last());
        assert_eq!(tool.navigation().progress_fraction(), 0.0);
        assert_eq!(tool.renderer().progress.last(), Some(&0.0));
    }

    #[test]
    fn honorable_wartime_with_high_rating_reaches_cps_result() {
        let mut tool = controller(Recorder::default());
        tool.handle_action(ToolAction::Start);
        for answer in [
            "For myself (I am a veteran or current service member)",
            "Discharged/Separated veteran",
            "Honorable",
            "Wartime service (WWII, Korea, Vietnam, Gulf War, Iraq/Afghanistan)",
            "Yes",
            "Yes, rated 30% or more",
        ] {
            assert_eq!(select(&mut tool, answer), Dispatch::Applied);
        }

        let result = tool.current_result().expect("a result is displayed");
        assert_eq!(result.style(), EligibilityType::Eligible10PointCps);
        assert_eq!(tool.renderer().progress.last(), Some(&1.0));
        assert!(tool
            .renderer()
            .announcements
            .last()
            .is_some_and(|a| a.starts_with("Result: Eligible for 10-Point Preference (CPS).")));

        // Results offer restart and print, not back.
        assert_eq!(tool.handle_action(ToolAction::Back), Dispatch::Ignored);
        assert_eq!(tool.handle_action(ToolAction::Key(Key::Escape)), Dispatch::Ignored);
        assert_eq!(tool.handle_action(ToolAction::Print), Dispatch::Applied);
        assert!(tool.renderer().printed[0].contains("Required Documents"));
    }

    #[test]
    fn validator_ends_flow_even_when_graph_continues() {
        let graph = DecisionGraph::from_json_str(
            r#"{ "version": "t", "questions": [
  { "id": "START", "text": "Who?", "options": [ { "answerText": "For myself", "nextQuestionId": "VETERAN_STATUS" } ] },
  { "id": "VETERAN_STATUS", "text": "Status?", "options": [
    { "answerText": "Retired military", "nextQuestionId": "RETIREMENT_TYPE" } ] },
  { "id": "RETIREMENT_TYPE", "text": "Rank?", "options": [
    { "answerText": "Major/Lt. Commander (O-4) or above", "nextQuestionId": "RETIRED_OFFICER_DISABILITY" } ] },
  { "id": "RETIRED_OFFICER_DISABILITY", "text": "Disabled?", "options": [
    { "answerText": "Yes", "nextQuestionId": "DISCHARGE_TYPE" },
    { "answerText": "No", "nextQuestionId": "DISCHARGE_TYPE" } ] },
  { "id": "DISCHARGE_TYPE", "text": "Discharge?", "options": [
    { "answerText": "Honorable", "evaluate": true } ] }
] }"#,
        )
        .unwrap();
        let mut tool = ToolController::new(
            Arc::new(graph),
            Arc::new(ToolConfig::default()),
            Recorder::default(),
        );
        tool.handle_action(ToolAction::Start);
        select(&mut tool, "For myself");
        select(&mut tool, "Retired military");
        select(&mut tool, "Major/Lt. Commander (O-4) or above");
        select(&mut tool, "No");

        let result = tool.current_result().expect("flow should end early");
        assert_eq!(result.style(), EligibilityType::NotEligible);
        assert!(result.description().contains("O-4 or above"));
        assert_eq!(tool.navigation().current_question_id(), None);
    }

    #[test]
    fn keyboard_cycles_focus_and_selects() {
        let mut tool = controller(Recorder::default());
        tool.handle_action(ToolAction::Start);

        tool.handle_action(ToolAction::Key(Key::Up));
        assert_eq!(tool.focus(), Some(2), "up from nothing wraps to the last option");
        tool.handle_action(ToolAction::Key(Key::Down));
        assert_eq!(tool.focus(), Some(0), "down from the last option wraps to the first");
        tool.handle_action(ToolAction::Key(Key::Right));
        assert_eq!(tool.renderer().focus, vec![2, 0, 1]);

        assert_eq!(tool.handle_action(ToolAction::Key(Key::Enter)), Dispatch::Applied);
        assert_eq!(
            tool.current_question().map(|q| q.question_id.clone()),
            Some(id("FAMILY_RELATIONSHIP"))
        );
        assert_eq!(tool.focus(), None);

        assert_eq!(tool.handle_action(ToolAction::Key(Key::Escape)), Dispatch::Applied);
        assert_eq!(
            tool.current_question().map(|q| q.question_id.clone()),
            Some(id("START"))
        );
        assert_eq!(tool.handle_action(ToolAction::Key(Key::Escape)), Dispatch::Ignored);
    }

    #[test]
    fn accepted_restore_resumes_saved_progress() {
        let store = MemoryStore::new();
        let mut first = controller(Recorder::default()).with_store(Box::new(store.clone()));
        first.handle_action(ToolAction::Start);
        select(&mut first, "For a family member");
        select(&mut first, "Mother");
        assert!(store.get("vets-pref-tool-state").is_some());

        let mut second = controller(Recorder {
            accept_restore: true,
            ..Recorder::default()
        })
        .with_store(Box::new(store.clone()));
        second.handle_action(ToolAction::Start);

        assert_eq!(second.renderer().prompts, vec![RESTORE_PROMPT.to_owned()]);
        let resumed = second.current_question().expect("a question is displayed");
        assert_eq!(resumed.question_id, id("MOTHER_ELIGIBILITY"));
        assert_eq!(resumed.step, 3);
        assert!(resumed.can_go_back);
        assert_eq!(second.navigation(), first.navigation());
    }

    #[test]
    fn declined_restore_starts_fresh_and_discards_progress() {
        let store = MemoryStore::new();
        let mut first = controller(Recorder::default()).with_store(Box::new(store.clone()));
        first.handle_action(ToolAction::Start);
        select(&mut first, "For a family member");

        let mut second = controller(Recorder::default()).with_store(Box::new(store.clone()));
        second.handle_action(ToolAction::Start);

        assert_eq!(second.renderer().prompts.len(), 1);
        assert_eq!(
            second.current_question().map(|q| q.question_id.clone()),
            Some(id("START"))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn stale_snapshot_is_discarded_without_prompting() {
        let store = MemoryStore::new();
        let mut first = controller(Recorder::default()).with_store(Box::new(store.clone()));
        first.handle_action(ToolAction::Start);
        select(&mut first, "For a family member");

        let key = "vets-pref-tool-state";
        let saved = store.get(key).expect("progress was saved");
        let mut snapshot: serde_json::Value = serde_json::from_str(&saved).unwrap();
        snapshot["graphVersion"] = serde_json::Value::from("1999.1");
        let mut writer = store.clone();
        ProgressStore::save(&mut writer, key, &snapshot.to_string()).unwrap();

        let mut second = controller(Recorder {
            accept_restore: true,
            ..Recorder::default()
        })
        .with_store(Box::new(store.clone()));
        second.handle_action(ToolAction::Start);

        assert!(second.renderer().prompts.is_empty());
        assert_eq!(second.navigation().current_step(), 0);
        assert_eq!(
            second.current_question().map(|q| q.question_id.clone()),
            Some(id("START"))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn restart_clears_saved_progress_and_no_prompt_without_it() {
        let store = MemoryStore::new();
        let mut tool = controller(Recorder::default()).with_store(Box::new(store.clone()));
        tool.handle_action(ToolAction::Start);
        assert!(tool.renderer().prompts.is_empty());

        select(&mut tool, "For a family member");
        assert!(!store.is_empty());
        tool.handle_action(ToolAction::Restart);
        assert!(store.is_empty());
    }

    #[test]
    fn disabled_persistence_never_touches_the_store() {
        let store = MemoryStore::new();
        let config = ToolConfig::new(None, "tool-state".into(), false).unwrap();
        let mut tool = ToolController::new(
            Arc::new(DecisionGraph::builtin().unwrap()),
            Arc::new(config),
            Recorder::default(),
        )
        .with_store(Box::new(store.clone()));

        tool.handle_action(ToolAction::Start);
        select(&mut tool, "For a family member");
        assert!(store.is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = controller(Recorder::default());
        let b = controller(Recorder::default());
        assert_ne!(a.session_id(), b.session_id());

        a.handle_action(ToolAction::Start);
        select(&mut a, "For a family member");
        assert_eq!(a.navigation().current_step(), 1);
        assert_eq!(b.navigation().current_step(), 0);
        assert!(b.renderer().errors.is_empty());
    }

    #[test]
    fn print_is_ignored_outside_results() {
        let mut tool = controller(Recorder::default());
        tool.handle_action(ToolAction::Start);
        assert_eq!(tool.handle_action(ToolAction::Print), Dispatch::Ignored);
        assert!(tool.renderer().printed.is_empty());
        assert_eq!(tool.handle_action(ToolAction::SelectAnswer(99)), Dispatch::Ignored);
    }
}
