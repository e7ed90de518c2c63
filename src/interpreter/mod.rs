//! Lesson execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`engine::Interpreter`] that runs the lesson and keeps history
//! - [`errors`]: Runtime error types
//! - [`constants`]: Address bases, the lesson's global, limits and exit codes
//!
//! # Execution Model
//!
//! The lesson executes one listing statement at a time. After each statement
//! a snapshot is taken so the viewer can step backward and forward.

pub mod constants;
pub mod engine;
pub mod errors;
