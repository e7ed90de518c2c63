// Snapshot management for stepping back and forth through the lesson

use crate::lesson::SourceLocation;
use crate::memory::Memory;
use std::io::{self, Write};

/// Console capturing the lesson's printf output
#[derive(Debug, Clone, Default)]
pub struct Console {
    pub lines: Vec<ConsoleLine>,
    echo: bool, // Also write to stdout as output is produced
}

impl Console {
    pub fn new() -> Self {
        Console {
            lines: Vec::new(),
            echo: false,
        }
    }

    /// A console that mirrors everything to stdout
    pub fn echoing() -> Self {
        Console {
            lines: Vec::new(),
            echo: true,
        }
    }

    /// Print without newline. Text continues an unfinished line the way a
    /// terminal would, even when it comes from a later statement (a `scanf`
    /// answer after its prompt). The chunk keeps the earlier location.
    pub fn print(&mut self, text: &str, location: SourceLocation) {
        if self.echo {
            let mut stdout = io::stdout();
            // Lesson output is best effort; a closed stdout must not abort the run
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }

        if let Some(last) = self.lines.last_mut() {
            if !last.text.ends_with('\n') {
                last.text.push_str(text);
                return;
            }
        }
        self.lines.push(ConsoleLine {
            text: text.to_string(),
            location,
        });
    }

    /// Record text the user typed; the real terminal already echoed it
    pub fn record_input(&mut self, text: &str, location: SourceLocation) {
        let echo = std::mem::replace(&mut self.echo, false);
        self.print(text, location);
        self.echo = echo;
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|cl| {
                // Split by newlines to handle multiple prints from same source line
                let mut result: Vec<String> = cl.text.split('\n').map(|s| s.to_string()).collect();
                // Remove trailing empty string if text ended with newline
                if result.last().is_some_and(|s| s.is_empty()) {
                    result.pop();
                }
                result
            })
            .collect()
    }

    /// Whole output as one string
    pub fn text(&self) -> String {
        self.lines.iter().map(|cl| cl.text.as_str()).collect()
    }
}

/// A chunk of console output with source location tracking
#[derive(Debug, Clone)]
pub struct ConsoleLine {
    pub text: String,
    pub location: SourceLocation,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub memory: Memory,
    pub console: Console,
    pub history_index: usize,
    pub source_location: SourceLocation,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough estimate: 64 bytes per slot, 50 per console chunk
        let stack_slots: usize = self
            .memory
            .stack()
            .arenas()
            .iter()
            .map(|arena| arena.slots().len())
            .sum();
        let static_slots = self.memory.statics().arena().slots().len();
        let console_size: usize = self.console.lines.iter().map(|l| l.text.len() + 50).sum();

        (stack_slots + static_slots) * 64 + console_size
    }
}

/// Manages execution history
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_joins_same_line_prints() {
        let mut console = Console::new();
        console.print("Enter a number: ", SourceLocation::new(5));
        console.print("7\n", SourceLocation::new(5));
        console.print("done\n", SourceLocation::new(6));

        assert_eq!(console.get_output(), vec!["Enter a number: 7", "done"]);
        assert_eq!(console.text(), "Enter a number: 7\ndone\n");
    }

    #[test]
    fn test_console_continues_unfinished_line() {
        let mut console = Console::new();
        console.print("Enter a number: ", SourceLocation::new(5));
        console.record_input("7\n", SourceLocation::new(6));
        console.print("you entered 7\n", SourceLocation::new(7));

        assert_eq!(console.get_output(), vec!["Enter a number: 7", "you entered 7"]);
        assert_eq!(console.lines.len(), 2);
        assert_eq!(console.lines[1].location.line, 7);
    }

    #[test]
    fn test_snapshot_limit() {
        let snapshot = Snapshot {
            memory: Memory::default(),
            console: Console::new(),
            history_index: 0,
            source_location: SourceLocation::new(1),
        };
        let mut manager = SnapshotManager::new(0);
        assert_eq!(snapshot.estimated_size(), 0);
        assert!(manager.push(snapshot.clone()).is_ok());

        let mut console = Console::new();
        console.print("x\n", SourceLocation::new(1));
        let bigger = Snapshot { console, ..snapshot };
        assert!(manager.push(bigger).is_err());
        assert_eq!(manager.len(), 1);
    }
}
