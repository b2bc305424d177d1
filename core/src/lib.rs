//! Root of the `autoheal-core` library.
//!
//! The crate wires a retrieval-augmented suggestion pipeline for broken
//! UI-test locators: load mapping records, gather evidence (app-repo diffs,
//! an optional Appium snapshot, past failures), retrieve the closest context
//! by embedding distance, ask a model for a replacement locator, apply it to
//! the mappings file and publish the change on a review branch.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output must go through the CLI layer or the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod api;
pub mod config;
pub mod history;
pub mod mappings;
pub mod patch;
pub mod pipeline;
pub mod prompt;
pub mod publish;
pub mod retrieval;
pub mod sandbox;
pub mod snapshot;

mod error;

pub use api::{ApiError, CompletionProvider, Embedder, ModelClient, OpenAiEmbedder};
pub use config::Config;
pub use error::HealError;
pub use mappings::MappingRecord;
pub use patch::LocatorSuggestion;
pub use pipeline::{HealOutcome, Pipeline, ValidateOutcome};
pub use prompt::Prompt;
