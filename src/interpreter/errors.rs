//! Runtime error types
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while running the lesson, and [`InvalidReason`], which says why an alias could
//! not be dereferenced.
//!
//! All runtime errors are fatal - they halt the lesson and display diagnostic information.

use crate::memory::alias::RawAlias;
use std::fmt;

/// Why an alias does not designate usable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The alias is `NULL`
    Null,

    /// The slot's scope ended (and it may have been reused since)
    Expired { expected: u32, current: u32 },

    /// No such slot or region
    OutOfBounds,

    /// The slot holds a different type than the access asked for
    TypeMismatch { expected: String, got: String },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Null => write!(f, "null pointer"),
            InvalidReason::Expired { expected, current } => write!(
                f,
                "storage went out of scope (alias expects generation {}, slot is at generation {})",
                expected, current
            ),
            InvalidReason::OutOfBounds => write!(f, "no storage at this address"),
            InvalidReason::TypeMismatch { expected, got } => {
                write!(f, "expected {}, storage holds {}", expected, got)
            }
        }
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Read or write through a null, dangling or ill-typed alias
    InvalidReference {
        alias: Option<RawAlias>,
        reason: InvalidReason,
    },

    /// Attempted to read storage that was declared but never assigned
    UninitializedRead { var: String, alias: RawAlias },

    /// Undefined variable reference
    UndefinedVariable { name: String },

    /// No stack frame available
    NoStackFrame,

    /// A name declared twice in the same scope
    Redeclaration { name: String },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History/snapshot operation failed
    HistoryOperationFailed { message: String },

    /// A lesson step points at text missing from the listing
    UnknownSourceLine { snippet: String },
}

impl RuntimeError {
    pub fn invalid(alias: RawAlias, reason: InvalidReason) -> Self {
        RuntimeError::InvalidReference {
            alias: Some(alias),
            reason,
        }
    }

    pub fn null() -> Self {
        RuntimeError::InvalidReference {
            alias: None,
            reason: InvalidReason::Null,
        }
    }

    /// The segmentation-fault class of errors
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, RuntimeError::InvalidReference { .. })
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::InvalidReference { alias, reason } => match alias {
                Some(alias) => write!(f, "Invalid reference {}: {}", alias, reason),
                None => write!(f, "Invalid reference: {}", reason),
            },
            RuntimeError::UninitializedRead { var, alias } => {
                write!(
                    f,
                    "Read from uninitialized variable '{}' at {}",
                    var, alias
                )
            }
            RuntimeError::UndefinedVariable { name } => {
                write!(f, "Undefined variable '{}'", name)
            }
            RuntimeError::NoStackFrame => write!(f, "No stack frame available"),
            RuntimeError::Redeclaration { name } => {
                write!(f, "Redeclaration of '{}' in the same scope", name)
            }
            RuntimeError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            RuntimeError::HistoryOperationFailed { message } => {
                write!(f, "History operation failed: {}", message)
            }
            RuntimeError::UnknownSourceLine { snippet } => {
                write!(f, "Lesson listing has no line containing '{}'", snippet)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
