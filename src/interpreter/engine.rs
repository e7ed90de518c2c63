// Execution engine for the pointer lesson

use crate::interpreter::constants::{GLOBAL_INITIAL_VALUE, GLOBAL_NAME};
use crate::interpreter::errors::RuntimeError;
use crate::lesson::{self, source, Input, LessonOptions, SourceLocation};
use crate::memory::statics::ProcessContext;
use crate::memory::Memory;
use crate::snapshot::{Console, Snapshot, SnapshotManager};

/// A fault that stopped the lesson
#[derive(Debug, Clone)]
pub struct ErrorState {
    pub error: RuntimeError,
    pub location: SourceLocation,
}

/// Runs the lesson and keeps its execution history
pub struct Interpreter {
    /// Stack arenas and the process context
    memory: Memory,

    /// Console for printf output
    console: Console,

    /// Current line of the lesson listing
    current_location: SourceLocation,

    /// Snapshot manager for stepping back and forth
    snapshot_manager: SnapshotManager,

    /// Current position in execution history
    history_position: usize,

    options: LessonOptions,

    /// Whether the lesson has run
    finished: bool,

    /// Set when the lesson stopped on an error
    error: Option<ErrorState>,
}

impl Interpreter {
    /// Create an interpreter. The process context (with the lesson's global)
    /// is created here, once, and lives as long as the interpreter.
    pub fn new(options: LessonOptions) -> Self {
        let mut statics = ProcessContext::new();
        statics.define(GLOBAL_NAME, GLOBAL_INITIAL_VALUE);

        let console = if options.echo {
            Console::echoing()
        } else {
            Console::new()
        };

        Interpreter {
            memory: Memory::new(statics),
            console,
            current_location: SourceLocation::new(1),
            snapshot_manager: SnapshotManager::new(options.snapshot_limit),
            history_position: 0,
            options,
            finished: false,
            error: None,
        }
    }

    /// Run the lesson from start to finish
    pub fn run(&mut self, input: Input<'_>) -> Result<(), RuntimeError> {
        // Take initial snapshot
        self.take_snapshot()?;

        let result = lesson::run(self, input);
        self.finished = true;

        if let Err(e) = &result {
            self.error = Some(ErrorState {
                error: e.clone(),
                location: self.current_location,
            });
        }
        result
    }

    /// Execute one statement of the listing: move to the line containing
    /// `snippet`, run `f`, and snapshot the result. A failing statement is
    /// still snapshotted so the fault can be inspected.
    pub fn step<R>(
        &mut self,
        snippet: &str,
        f: impl FnOnce(&mut Self) -> Result<R, RuntimeError>,
    ) -> Result<R, RuntimeError> {
        let line = source::line_of(snippet).ok_or_else(|| RuntimeError::UnknownSourceLine {
            snippet: snippet.to_string(),
        })?;
        self.current_location = SourceLocation::new(line);

        let result = f(self);
        let snapshot = self.take_snapshot();
        let value = result?;
        snapshot?;
        Ok(value)
    }

    /// printf
    pub fn print(&mut self, text: &str) {
        self.console.print(text, self.current_location);
    }

    /// Record typed input in the console
    pub fn record_input(&mut self, text: &str) {
        self.console.record_input(text, self.current_location);
    }

    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot {
            memory: self.memory.clone(),
            console: self.console.clone(),
            history_index: self.snapshot_manager.len(),
            source_location: self.current_location,
        };

        self.snapshot_manager
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: self.snapshot_manager.memory_usage(),
                limit: self.snapshot_manager.memory_limit(),
            })?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.memory = snapshot.memory.clone();
        self.console = snapshot.console.clone();
        self.current_location = snapshot.source_location;
        self.history_position = snapshot.history_index;
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.restore_at(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.restore_at(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_at(0)
    }

    /// Jump to the last recorded step
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self.snapshot_manager.len().saturating_sub(1);
        self.restore_at(last)
    }

    fn restore_at(&mut self, index: usize) -> Result<(), RuntimeError> {
        // Clone the snapshot to avoid borrow checker issues
        let snapshot = self.snapshot_manager.get(index).cloned().ok_or_else(|| {
            RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
            }
        })?;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    // ========== Getter methods ==========

    /// Get the current source location
    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn options(&self) -> &LessonOptions {
        &self.options
    }

    /// Get the current position in history
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    /// Check if execution has finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The fault that stopped the lesson, if any
    pub fn error_state(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    /// Whether the viewer is showing the step that faulted
    pub fn at_error(&self) -> bool {
        self.error.is_some() && self.history_position + 1 == self.snapshot_manager.len()
    }
}
