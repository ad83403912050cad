//! Explain is a terminal chat client that keeps one streaming conversation
//! going across invocations.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the persisted state, the conversation lifecycle
//!   (seeding, staleness, appends, clearing), model validation, and the
//!   write-through stream accumulator.
//! - [`api`] defines the chat-completions wire payloads and the pull-based
//!   SSE fragment stream.
//! - [`cli`] parses arguments and drives the load → mutate → stream → save
//!   cycle that makes up one invocation.
//! - [`utils`] holds small helpers for URLs, prompt assembly, and transcript
//!   colors.
//!
//! The binary entrypoint (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
