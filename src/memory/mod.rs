//! Memory model for the pointer lesson
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Double, Struct, Pointer)
//! - [`alias`]: Typed, nullable, generation-checked aliases
//! - [`arena`]: Generational slot arenas with bulk expiry
//! - [`stack`]: Call stack, one arena per call depth
//! - [`statics`]: The process-lifetime context
//!
//! [`Memory`] ties these together and implements the reference layer:
//! `address_of`, `read` and `write`. Every dereference checks that the alias
//! is non-null, that its slot exists, that the slot's generation still
//! matches the alias, and that the stored type is the one asked for.
//!
//! # Validity
//!
//! ```text
//! declared ──(scope active)──> in-scope ──(frame popped)──> out-of-scope
//!                                                           generation += 1
//! ```

pub mod alias;
pub mod arena;
pub mod stack;
pub mod statics;
pub mod value;

use crate::interpreter::errors::{InvalidReason, RuntimeError};
use alias::{Alias, RawAlias, Region};
use arena::Slot;
use stack::Stack;
use statics::ProcessContext;
use value::Storable;

/// Stack plus process-lifetime storage
#[derive(Debug, Clone, Default)]
pub struct Memory {
    stack: Stack,
    statics: ProcessContext,
}

impl Memory {
    pub fn new(statics: ProcessContext) -> Self {
        Memory {
            stack: Stack::new(),
            statics,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn statics(&self) -> &ProcessContext {
        &self.statics
    }

    pub fn statics_mut(&mut self) -> &mut ProcessContext {
        &mut self.statics
    }

    /// Enter a function
    pub fn push_frame(&mut self, function_name: &str) {
        self.stack.push_frame(function_name.to_string());
    }

    /// Return from the current function, ending the lifetime of its locals
    pub fn pop_frame(&mut self) -> Result<(), RuntimeError> {
        self.stack
            .pop_frame()
            .map(|_| ())
            .ok_or(RuntimeError::NoStackFrame)
    }

    /// Enter a block scope inside the current function
    pub fn push_scope(&mut self) -> Result<(), RuntimeError> {
        if self.stack.push_scope() {
            Ok(())
        } else {
            Err(RuntimeError::NoStackFrame)
        }
    }

    /// Leave the innermost block scope
    pub fn pop_scope(&mut self) -> Result<(), RuntimeError> {
        if self.stack.pop_scope() {
            Ok(())
        } else {
            Err(RuntimeError::NoStackFrame)
        }
    }

    /// Declare an initialized local, returns `&name`
    pub fn declare<T: Storable>(&mut self, name: &str, value: T) -> Result<Alias<T>, RuntimeError> {
        self.stack
            .declare_var(name, &T::c_type(), value.into_value())
            .map(Alias::from_raw)
    }

    /// Declare a local without initializer (`int* pt1;`)
    pub fn declare_uninit<T: Storable>(&mut self, name: &str) -> Result<Alias<T>, RuntimeError> {
        self.stack
            .declare_var(name, &T::c_type(), T::uninit_value())
            .map(Alias::from_raw)
    }

    /// `&name`: locals of the current frame first, then globals
    pub fn address_of<T: Storable>(&self, name: &str) -> Result<Alias<T>, RuntimeError> {
        let raw = self
            .stack
            .lookup_var(name)
            .or_else(|| self.statics.lookup(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })?;
        self.typed(raw)
    }

    /// `&name` for a global only
    pub fn global<T: Storable>(&self, name: &str) -> Result<Alias<T>, RuntimeError> {
        let raw = self
            .statics
            .lookup(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })?;
        self.typed(raw)
    }

    fn typed<T: Storable>(&self, raw: RawAlias) -> Result<Alias<T>, RuntimeError> {
        let slot = self.slot(raw).map_err(|reason| RuntimeError::invalid(raw, reason))?;
        if slot.c_type != T::c_type() {
            return Err(RuntimeError::invalid(
                raw,
                InvalidReason::TypeMismatch {
                    expected: T::c_type(),
                    got: slot.c_type.clone(),
                },
            ));
        }
        Ok(Alias::from_raw(raw))
    }

    /// `*alias`
    pub fn read<T: Storable>(&self, alias: Alias<T>) -> Result<T, RuntimeError> {
        let raw = alias.raw().ok_or_else(RuntimeError::null)?;
        let slot = self.slot(raw).map_err(|reason| RuntimeError::invalid(raw, reason))?;

        let stored = match raw.field {
            None => {
                if slot.c_type != T::c_type() {
                    return Err(RuntimeError::invalid(
                        raw,
                        InvalidReason::TypeMismatch {
                            expected: T::c_type(),
                            got: slot.c_type.clone(),
                        },
                    ));
                }
                &slot.value
            }
            Some(field) => {
                check_field::<T>(raw, &slot.c_type, field)?;
                slot.value.field(field).ok_or_else(|| {
                    RuntimeError::invalid(raw, missing_field(field, &slot.c_type))
                })?
            }
        };

        if !stored.is_initialized() {
            return Err(RuntimeError::UninitializedRead {
                var: display_name(slot, raw),
                alias: raw,
            });
        }

        T::from_value(stored).ok_or_else(|| {
            RuntimeError::invalid(
                raw,
                InvalidReason::TypeMismatch {
                    expected: T::c_type(),
                    got: stored.kind_name().to_string(),
                },
            )
        })
    }

    /// `*alias = value`
    pub fn write<T: Storable>(&mut self, alias: Alias<T>, value: T) -> Result<(), RuntimeError> {
        let raw = alias.raw().ok_or_else(RuntimeError::null)?;
        let expected = T::c_type();
        let slot = self
            .slot_mut(raw)
            .map_err(|reason| RuntimeError::invalid(raw, reason))?;

        match raw.field {
            None => {
                if slot.c_type != expected {
                    return Err(RuntimeError::invalid(
                        raw,
                        InvalidReason::TypeMismatch {
                            expected,
                            got: slot.c_type.clone(),
                        },
                    ));
                }
                slot.value = value.into_value();
            }
            Some(field) => {
                // Checked against the declared field type, even before first assignment
                check_field::<T>(raw, &slot.c_type, field)?;
                let reason = missing_field(field, &slot.c_type);
                let target = slot
                    .value
                    .field_mut(field)
                    .ok_or_else(|| RuntimeError::invalid(raw, reason))?;
                *target = value.into_value();
            }
        }
        Ok(())
    }

    /// Whether `alias` could be dereferenced right now
    pub fn is_valid<T>(&self, alias: Alias<T>) -> bool {
        alias.raw().is_some_and(|raw| self.slot(raw).is_ok())
    }

    /// Resolve an alias to its slot, checking its generation
    pub fn slot(&self, raw: RawAlias) -> Result<&Slot, InvalidReason> {
        match raw.region {
            Region::Static => self.statics.arena().get(raw.slot, raw.generation),
            Region::Frame(depth) => self
                .stack
                .arena(depth)
                .ok_or(InvalidReason::OutOfBounds)?
                .get(raw.slot, raw.generation),
        }
    }

    fn slot_mut(&mut self, raw: RawAlias) -> Result<&mut Slot, InvalidReason> {
        match raw.region {
            Region::Static => self.statics.arena_mut().get_mut(raw.slot, raw.generation),
            Region::Frame(depth) => self
                .stack
                .arena_mut(depth)
                .ok_or(InvalidReason::OutOfBounds)?
                .get_mut(raw.slot, raw.generation),
        }
    }
}

/// The field must exist on the slot's struct type and be declared as `T`
fn check_field<T: Storable>(
    raw: RawAlias,
    struct_type: &str,
    field: &str,
) -> Result<(), RuntimeError> {
    let declared = value::field_c_type(struct_type, field)
        .ok_or_else(|| RuntimeError::invalid(raw, missing_field(field, struct_type)))?;
    if declared != T::c_type() {
        return Err(RuntimeError::invalid(
            raw,
            InvalidReason::TypeMismatch {
                expected: T::c_type(),
                got: format!("{} {}.{}", declared, struct_type, field),
            },
        ));
    }
    Ok(())
}

fn missing_field(field: &str, c_type: &str) -> InvalidReason {
    InvalidReason::TypeMismatch {
        expected: format!("struct with field '{}'", field),
        got: c_type.to_string(),
    }
}

fn display_name(slot: &Slot, raw: RawAlias) -> String {
    match raw.field {
        Some(field) => format!("{}.{}", slot.name, field),
        None => slot.name.clone(),
    }
}
