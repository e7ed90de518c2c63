//! The lesson's helper functions, written against checked aliases
//!
//! Each takes its arguments the way the C listing does: by alias. None of
//! them can touch storage through an alias that is null or out of scope.

use crate::interpreter::constants::{DANGLING_LOCAL_VALUE, GLOBAL_NAME};
use crate::interpreter::errors::RuntimeError;
use crate::memory::alias::Alias;
use crate::memory::value::{Point, Storable};
use crate::memory::Memory;

/// Euclidean distance between two points, read-only through both aliases
pub fn distance(memory: &Memory, a: Alias<Point>, b: Alias<Point>) -> Result<f64, RuntimeError> {
    let a = memory.read(a)?;
    let b = memory.read(b)?;
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    Ok((dx * dx + dy * dy).sqrt())
}

/// Exchange the values behind two aliases.
///
/// Both values are read before anything is written, so a bad alias leaves
/// memory untouched.
pub fn swap<T: Storable>(memory: &mut Memory, a: Alias<T>, b: Alias<T>) -> Result<(), RuntimeError> {
    let first = memory.read(a)?;
    let second = memory.read(b)?;
    memory.write(a, second)?;
    memory.write(b, first)
}

/// Returns the address of one of its own locals. The alias is dangling as
/// soon as the call returns.
pub fn dangling_local(memory: &mut Memory) -> Result<Alias<i32>, RuntimeError> {
    memory.push_frame("dangling_local");
    let local = memory.declare("local", DANGLING_LOCAL_VALUE)?;
    memory.pop_frame()?;
    Ok(local)
}

/// Returns the address of the process-lifetime global; always valid
pub fn global_alias(memory: &Memory) -> Result<Alias<i32>, RuntimeError> {
    memory.global(GLOBAL_NAME)
}
