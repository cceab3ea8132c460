//! # VPref Core
//!
//! Session logic for the Veterans' Preference questionnaire.
//!
//! This crate walks a [`vpref_graph::DecisionGraph`] on behalf of one user:
//! - navigation state with an answer history and back/restart support,
//! - cross-question validation and the eligibility evaluator,
//! - best-effort progress persistence,
//! - the [`ToolController`] that turns user actions into [`Renderer`] calls.
//!
//! **No UI concerns**: rendering is delegated to a [`Renderer`] implementation supplied by the
//! caller. The terminal front end lives in the `vpref-run` binary.

pub mod config;
pub mod constants;
pub mod controller;
mod error;
pub mod evaluator;
pub mod flow;
pub mod navigation;
pub mod persistence;
mod validation;
pub mod validator;
pub mod view;

pub use config::ToolConfig;
pub use controller::{Dispatch, Key, Renderer, ToolAction, ToolController};
pub use error::{ToolError, ToolResult};
pub use evaluator::{evaluate, Confidence};
pub use flow::Step;
pub use navigation::{AnswerRecord, Cursor, NavigationState};
pub use persistence::{FileStore, MemoryStore, ProgressService, ProgressSnapshot, ProgressStore};
pub use validator::{IssueKind, ValidationIssue};
pub use view::{QuestionView, ResultView, Section};
