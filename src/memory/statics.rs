//! Process-lifetime storage
//!
//! [`ProcessContext`] is the explicit replacement for C globals. It is
//! created once at startup, owns a single [`Arena`] that is never expired,
//! and lives until the program exits. Aliases into it are therefore valid
//! for the rest of the run.
//!
//! The lesson is single-threaded. Sharing a context between threads would
//! need it wrapped in a lock; nothing here provides that.

use super::alias::{Alias, RawAlias, Region};
use super::arena::Arena;
use super::value::Storable;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
    arena: Arena,
    globals: FxHashMap<String, usize>,
    insertion_order: Vec<String>,
}

impl ProcessContext {
    pub fn new() -> Self {
        ProcessContext {
            arena: Arena::new(),
            globals: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }

    /// Define a global. Redefining a name rebinds it to fresh storage.
    pub fn define<T: Storable>(&mut self, name: &str, value: T) -> Alias<T> {
        let (slot, generation) = self.arena.allocate(name, &T::c_type(), value.into_value());
        if self.globals.insert(name.to_string(), slot).is_none() {
            self.insertion_order.push(name.to_string());
        }
        Alias::from_raw(RawAlias::new(Region::Static, slot, generation))
    }

    /// Untyped alias to a global (`&name`)
    pub fn lookup(&self, name: &str) -> Option<RawAlias> {
        let slot = *self.globals.get(name)?;
        let generation = self.arena.slots()[slot].generation;
        Some(RawAlias::new(Region::Static, slot, generation))
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Global names in definition order (for UI display)
    pub fn names(&self) -> &[String] {
        &self.insertion_order
    }
}
