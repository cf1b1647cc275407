//! Applicant document organisation and AI-assisted background checks.
//!
//! The crate exposes the workspace layout, document classification, prompt
//! assembly, and the chat-completion adapter, plus the orchestrators in
//! [`workflows`] that tie them together. Presentation is left to callers
//! through the [`progress::ProgressSink`] contract.

pub mod ai;
pub mod config;
pub mod documents;
pub mod error;
pub mod progress;
pub mod prompts;
pub mod results;
pub mod roster;
pub mod sanitize;
pub mod telemetry;
pub mod workflows;
pub mod workspace;
