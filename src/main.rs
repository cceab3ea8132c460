use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vpref_core::config::{persist_from_env_value, total_steps_from_env_value};
use vpref_core::constants::{CONFIGURATION_ERROR_MESSAGE, DEFAULT_PROGRESS_DIR, DEFAULT_STATE_KEY};
use vpref_core::{
    Dispatch, FileStore, Key, QuestionView, Renderer, ResultView, Section, ToolAction, ToolConfig,
    ToolController,
};
use vpref_graph::DecisionGraph;

const NOTICE: &str = "\
Veterans' Preference Eligibility Tool

This tool gives general guidance only. It is not an official determination of
eligibility. Your agency's HR office makes the final decision based on your
documentation.
";

const HELP: &str = "\
Commands: <number> select an answer, j/k move focus, <enter> select the focused
answer, b back, r restart, p print result, q quit";

/// Plays the questionnaire on a line-oriented terminal.
struct TerminalRenderer<I, O> {
    input: I,
    output: O,
    options: Vec<String>,
}

impl<I: BufRead, O: Write> TerminalRenderer<I, O> {
    fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            options: Vec::new(),
        }
    }

    /// Next trimmed input line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}").and_then(|()| self.output.flush()) {
            tracing::warn!("failed to write to terminal: {}", e);
        }
    }
}

impl<I: BufRead, O: Write> Renderer for TerminalRenderer<I, O> {
    fn on_question_change(&mut self, question: &QuestionView) {
        let mut text = format!(
            "\nQuestion {} of about {}\n{}\n",
            question.step, question.total_steps, question.text
        );
        if let Some(help) = &question.help_text {
            text.push_str(&format!("({help})\n"));
        }
        for (index, option) in question.options.iter().enumerate() {
            text.push_str(&format!("  {}. {}\n", index + 1, option));
        }
        if question.can_go_back {
            text.push_str("  b. Back\n");
        }
        self.options = question.options.clone();
        self.write(&text);
    }

    fn on_result(&mut self, result: &ResultView) {
        let mut text = format!("\n{}\n{}\n", result.title(), result.description());
        for section in result.sections() {
            text.push_str(&format!("\n{}:\n", section.heading()));
            match section {
                Section::Reasoning(lines) => {
                    for line in lines {
                        text.push_str(&format!("  {line}\n"));
                    }
                }
                Section::RequiredDocuments(items) | Section::AdditionalInformation(items) => {
                    for item in items {
                        text.push_str(&format!("  - {item}\n"));
                    }
                }
                Section::OfficialResources(links) => {
                    for link in links {
                        text.push_str(&format!("  - {} <{}>\n", link.text, link.url));
                    }
                }
            }
        }
        text.push_str("\n  r. Start over    p. Print\n");
        self.options.clear();
        self.write(&text);
    }

    fn on_progress(&mut self, fraction: f64) {
        let width = 20;
        let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
        let bar = format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(width - filled),
            fraction * 100.0
        );
        self.write(&bar);
    }

    fn on_error(&mut self, message: &str) {
        self.options.clear();
        self.write(&format!("\n{message}\n  r. Restart"));
    }

    fn on_focus(&mut self, index: usize) {
        if let Some(option) = self.options.get(index).cloned() {
            self.write(&format!("> {}. {}", index + 1, option));
        }
    }

    fn on_print(&mut self, document: &str) {
        self.write(&format!("\n{}", "-".repeat(72)));
        self.write(document);
        self.write(&"-".repeat(72));
    }

    fn confirm_restore(&mut self, prompt: &str) -> bool {
        self.write(&format!("{prompt} [y/N]"));
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("failed to read restore answer: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    Action(ToolAction),
}

fn parse_command(input: &str) -> Command {
    match input.to_ascii_lowercase().as_str() {
        "" => Command::Action(ToolAction::Key(Key::Enter)),
        "q" | "quit" | "exit" => Command::Quit,
        "b" | "back" => Command::Action(ToolAction::Back),
        "r" | "restart" => Command::Action(ToolAction::Restart),
        "p" | "print" => Command::Action(ToolAction::Print),
        "j" | "down" => Command::Action(ToolAction::Key(Key::Down)),
        "k" | "up" => Command::Action(ToolAction::Key(Key::Up)),
        "esc" => Command::Action(ToolAction::Key(Key::Escape)),
        other => match other.parse::<usize>() {
            Ok(number) if number > 0 => Command::Action(ToolAction::SelectAnswer(number - 1)),
            _ => Command::Help,
        },
    }
}

fn load_graph(path: Option<&str>) -> anyhow::Result<DecisionGraph> {
    match path {
        Some(path) => {
            tracing::info!("loading decision graph from {}", path);
            DecisionGraph::from_path(Path::new(path))
                .with_context(|| format!("failed to load decision graph from {path}"))
        }
        None => Ok(DecisionGraph::builtin()?),
    }
}

/// Loads the graph, showing the configuration error message on `out` when the document is broken.
fn load_graph_or_report<W: Write>(path: Option<&str>, out: &mut W) -> anyhow::Result<DecisionGraph> {
    load_graph(path).inspect_err(|e| {
        tracing::error!("{:#}", e);
        if let Err(write_err) = writeln!(out, "{CONFIGURATION_ERROR_MESSAGE}") {
            tracing::warn!("failed to write to terminal: {}", write_err);
        }
    })
}

/// Main entry point for the Veterans' Preference terminal tool
///
/// Shows the notice, then plays one questionnaire session on stdin/stdout. Logs go to stderr.
///
/// # Environment Variables
/// - `VPREF_GRAPH_PATH`: JSON or YAML decision graph (default: built-in graph)
/// - `VPREF_PROGRESS_DIR`: directory for saved progress (default: ".vpref_progress")
/// - `VPREF_STORAGE_KEY`: progress storage key (default: "tool-state")
/// - `VPREF_TOTAL_STEPS`: override for the progress bar denominator
/// - `VPREF_PERSIST`: save progress between runs (default: true)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("vpref=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let graph_path = std::env::var("VPREF_GRAPH_PATH").ok();
    let graph = load_graph_or_report(graph_path.as_deref(), &mut io::stdout())?;
    let config = ToolConfig::new(
        total_steps_from_env_value(std::env::var("VPREF_TOTAL_STEPS").ok())?,
        std::env::var("VPREF_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STATE_KEY.into()),
        persist_from_env_value(std::env::var("VPREF_PERSIST").ok())?,
    )?;
    let progress_dir =
        std::env::var("VPREF_PROGRESS_DIR").unwrap_or_else(|_| DEFAULT_PROGRESS_DIR.into());

    let renderer = TerminalRenderer::new(io::stdin().lock(), io::stdout());
    let mut controller = ToolController::new(Arc::new(graph), Arc::new(config), renderer)
        .with_store(Box::new(FileStore::new(progress_dir)));

    controller.renderer_mut().write(NOTICE);
    controller
        .renderer_mut()
        .write("Press Enter to begin, or q to quit.");
    match controller.renderer_mut().read_line()? {
        Some(line) if parse_command(&line) == Command::Quit => return Ok(()),
        Some(_) => {}
        None => return Ok(()),
    }
    controller.handle_action(ToolAction::Start);

    while let Some(line) = controller.renderer_mut().read_line()? {
        let action = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                controller.renderer_mut().write(HELP);
                continue;
            }
            Command::Action(action) => action,
        };

        if controller.handle_action(action) == Dispatch::Ignored {
            controller
                .renderer_mut()
                .write("That isn't available right now. Type ? for help.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("2"), Command::Action(ToolAction::SelectAnswer(1)));
        assert_eq!(parse_command("B"), Command::Action(ToolAction::Back));
        assert_eq!(parse_command(""), Command::Action(ToolAction::Key(Key::Enter)));
        assert_eq!(parse_command("0"), Command::Help);
        assert_eq!(parse_command("?"), Command::Help);
    }

    #[test]
    fn broken_graph_document_shows_configuration_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(
            &path,
            r#"{ "version": "t", "questions": [
  { "id": "START", "text": "Q", "options": [ { "answerText": "A", "nextQuestionId": "MISSING" } ] }
] }"#,
        )
        .unwrap();

        let mut output = Vec::new();
        let err = load_graph_or_report(path.to_str(), &mut output).expect_err("dangling reference");
        assert!(format!("{err:#}").contains("MISSING"));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("{CONFIGURATION_ERROR_MESSAGE}\n")
        );
    }

    #[test]
    fn builtin_graph_loads_silently() {
        let mut output = Vec::new();
        let graph = load_graph_or_report(None, &mut output).unwrap();
        assert_eq!(graph.start_id().as_str(), "START");
        assert!(output.is_empty());
    }

    #[test]
    fn terminal_session_reaches_a_result() {
        let input = io::Cursor::new("y\n");
        let mut output = Vec::new();
        {
            let renderer = TerminalRenderer::new(input, &mut output);
            let mut controller = ToolController::new(
                Arc::new(DecisionGraph::builtin().unwrap()),
                Arc::new(ToolConfig::default()),
                renderer,
            );
            controller.handle_action(ToolAction::Start);
            assert_eq!(
                controller.handle_action(ToolAction::SelectAnswer(2)),
                Dispatch::Applied
            );
            assert_eq!(controller.handle_action(ToolAction::Print), Dispatch::Applied);
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Question 1 of about 7"));
        assert!(text.contains("  3. I am an HR professional seeking general information"));
        assert!(text.contains("[####################] 100%"));
        assert!(text.contains("Official Resources"));
    }
}
