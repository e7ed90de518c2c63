//! # Introduction
//!
//! ptrlab replays the classic "pointers in C" lesson (address-of,
//! dereference, pass-by-reference, pointer-to-pointer and the dangling
//! pointer returned from a function) on a memory model where every
//! dereference is checked. The mistake C leaves undefined is reported as
//! an error here, and every step of the lesson can be inspected in a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Lesson listing → Interpreter (checked memory) → Snapshots → TUI / console
//! ```
//!
//! 1. [`memory`]: values in generational arenas, typed [`memory::alias::Alias`]es,
//!    the call [`memory::stack::Stack`] and the process-lifetime
//!    [`memory::statics::ProcessContext`].
//! 2. [`lesson`]: the C listing and the program that walks through it, plus
//!    the lesson's functions (`distance`, `swap`, `dangling_local`, `global_alias`).
//! 3. [`interpreter`]: runs the lesson, records [`snapshot::Snapshot`]s, and
//!    defines [`interpreter::errors::RuntimeError`].
//! 4. [`snapshot`]: snapshot history and the [`snapshot::Console`] that records `printf` output.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use ptrlab::lesson::functions::{dangling_local, swap};
//! use ptrlab::memory::{statics::ProcessContext, Memory};
//!
//! let mut memory = Memory::new(ProcessContext::new());
//! memory.push_frame("main");
//! let x = memory.declare("x", 42).unwrap();
//! let y = memory.declare("y", 24).unwrap();
//! swap(&mut memory, x, y).unwrap();
//! assert_eq!(memory.read(x).unwrap(), 24);
//!
//! let dangling = dangling_local(&mut memory).unwrap();
//! assert!(memory.read(dangling).unwrap_err().is_invalid_reference());
//! ```

pub mod interpreter;
pub mod lesson;
pub mod memory;
pub mod snapshot;
pub mod ui;
