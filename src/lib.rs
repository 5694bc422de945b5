//! Punctuation and spelling practice for Lithuanian learners.
//!
//! The library holds everything below the terminal UI: the text editing and
//! grading engine, exercise sessions, task packs and progress storage.

pub mod config;
pub mod engine;
pub mod session;
pub mod store;
pub mod task;
pub mod telemetry;
