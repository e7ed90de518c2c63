//! Call stack implementation
//!
//! This module provides the call stack for the lesson's function calls:
//! - [`Stack`]: the call stack, owning one [`Arena`] per call depth
//! - [`StackFrame`]: a single function's activation record (name -> slot)
//!
//! # Lifetimes
//!
//! Popping a frame expires every slot in the arena at its depth. The arena
//! itself is kept so the next call at that depth reuses it, just as a new C
//! call reuses the stack memory a returned call left behind. Nested block
//! scopes expire only the slots declared since the scope was entered.

use super::alias::{RawAlias, Region};
use super::arena::Arena;
use super::value::Value;
use crate::interpreter::errors::RuntimeError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub locals: FxHashMap<String, usize>, // Variable name -> slot index
    pub insertion_order: Vec<String>,     // Track order of variable declarations
    scope_stack: Vec<ScopeData>,
}

#[derive(Debug, Clone)]
struct ScopeData {
    mark: usize, // First arena slot owned by this scope
    shadowed: Vec<(String, usize)>,
    declared: Vec<String>,
}

impl StackFrame {
    pub fn new(function_name: String) -> Self {
        StackFrame {
            function_name,
            locals: FxHashMap::default(),
            insertion_order: Vec::new(),
            scope_stack: Vec::new(),
        }
    }

    /// Get the slot index of a local variable
    pub fn get_var(&self, name: &str) -> Option<usize> {
        self.locals.get(name).copied()
    }

    /// Whether `name` was already declared in the innermost scope
    fn declared_in_scope(&self, name: &str) -> bool {
        match self.scope_stack.last() {
            Some(scope) => {
                scope.declared.iter().any(|n| n == name)
                    || scope.shadowed.iter().any(|(n, _)| n == name)
            }
            None => self.locals.contains_key(name),
        }
    }

    fn bind(&mut self, name: String, slot: usize) {
        if let Some(scope) = self.scope_stack.last_mut() {
            if let Some(old_slot) = self.locals.insert(name.clone(), slot) {
                scope.shadowed.push((name, old_slot));
            } else {
                scope.declared.push(name.clone());
                self.insertion_order.push(name);
            }
        } else {
            if !self.locals.contains_key(&name) {
                self.insertion_order.push(name.clone());
            }
            self.locals.insert(name, slot);
        }
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<StackFrame>,
    arenas: Vec<Arena>, // Indexed by depth, outlives the frames using them
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: Vec::new(),
            arenas: Vec::new(),
        }
    }

    /// Push a new stack frame
    pub fn push_frame(&mut self, function_name: String) {
        let depth = self.frames.len();
        if self.arenas.len() <= depth {
            self.arenas.push(Arena::new());
        }
        self.frames.push(StackFrame::new(function_name));
    }

    /// Pop the top stack frame, expiring every slot it owned
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        let frame = self.frames.pop()?;
        let depth = self.frames.len();
        if let Some(arena) = self.arenas.get_mut(depth) {
            arena.expire_all();
        }
        Some(frame)
    }

    /// Enter a nested block scope in the current frame
    pub fn push_scope(&mut self) -> bool {
        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        let mark = self.arenas[depth - 1].live_len();
        frame.scope_stack.push(ScopeData {
            mark,
            shadowed: Vec::new(),
            declared: Vec::new(),
        });
        true
    }

    /// Exit the innermost block scope of the current frame
    pub fn pop_scope(&mut self) -> bool {
        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        let Some(scope) = frame.scope_stack.pop() else {
            return false;
        };

        for name in scope.declared {
            frame.locals.remove(&name);
            if let Some(pos) = frame.insertion_order.iter().rposition(|x| x == &name) {
                frame.insertion_order.remove(pos);
            }
        }
        for (name, slot) in scope.shadowed.into_iter().rev() {
            frame.locals.insert(name, slot);
        }
        self.arenas[depth - 1].expire_from(scope.mark);
        true
    }

    /// Declare a local in the current frame, returns an alias to it.
    /// A name can be declared once per scope; inner scopes may shadow it.
    pub fn declare_var(
        &mut self,
        name: &str,
        c_type: &str,
        value: Value,
    ) -> Result<RawAlias, RuntimeError> {
        let depth = self
            .frames
            .len()
            .checked_sub(1)
            .ok_or(RuntimeError::NoStackFrame)?;
        if self.frames[depth].declared_in_scope(name) {
            return Err(RuntimeError::Redeclaration {
                name: name.to_string(),
            });
        }
        let (slot, generation) = self.arenas[depth].allocate(name, c_type, value);
        self.frames[depth].bind(name.to_string(), slot);
        Ok(RawAlias::new(Region::Frame(depth), slot, generation))
    }

    /// Alias to a named local of the current frame
    pub fn lookup_var(&self, name: &str) -> Option<RawAlias> {
        let depth = self.frames.len().checked_sub(1)?;
        let slot = self.frames[depth].get_var(name)?;
        let generation = self.arenas[depth].slots()[slot].generation;
        Some(RawAlias::new(Region::Frame(depth), slot, generation))
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get all frames (for UI display)
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Get the arena at a depth, live or left behind by a popped frame
    pub fn arena(&self, depth: usize) -> Option<&Arena> {
        self.arenas.get(depth)
    }

    pub fn arena_mut(&mut self, depth: usize) -> Option<&mut Arena> {
        self.arenas.get_mut(depth)
    }

    /// Get all arenas (for UI display, includes ones past the top frame)
    pub fn arenas(&self) -> &[Arena] {
        &self.arenas
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_without_frame() {
        let mut stack = Stack::new();
        assert_eq!(
            stack.declare_var("a", "int", Value::Int(1)),
            Err(RuntimeError::NoStackFrame)
        );
        assert!(!stack.push_scope());
    }

    #[test]
    fn test_pop_frame_expires_arena() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        stack.push_frame("callee".to_string());
        let alias = stack.declare_var("x", "int", Value::Int(42)).unwrap();
        stack.pop_frame();

        assert_eq!(alias.region, Region::Frame(1));
        let arena = stack.arena(1).unwrap();
        assert!(arena.get(alias.slot, alias.generation).is_err());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_shadowing_in_nested_scope() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        let outer = stack.declare_var("i", "int", Value::Int(1)).unwrap();

        assert!(stack.push_scope());
        let inner = stack.declare_var("i", "int", Value::Int(2)).unwrap();
        assert_eq!(stack.lookup_var("i"), Some(inner));

        assert!(stack.pop_scope());
        assert_eq!(stack.lookup_var("i"), Some(outer));
        assert!(stack.arena(0).unwrap().get(inner.slot, inner.generation).is_err());
        assert!(stack.arena(0).unwrap().get(outer.slot, outer.generation).is_ok());
        assert_eq!(stack.current_frame().unwrap().insertion_order, vec!["i"]);
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        let outer = stack.declare_var("i", "int", Value::Int(1)).unwrap();
        assert_eq!(
            stack.declare_var("i", "int", Value::Int(9)),
            Err(RuntimeError::Redeclaration {
                name: "i".to_string()
            })
        );

        assert!(stack.push_scope());
        stack.declare_var("i", "int", Value::Int(2)).unwrap();
        assert!(matches!(
            stack.declare_var("i", "int", Value::Int(3)),
            Err(RuntimeError::Redeclaration { .. })
        ));
        assert!(stack.pop_scope());

        // The outer binding is back and still live
        assert_eq!(stack.lookup_var("i"), Some(outer));
        let slot = stack.arena(0).unwrap().get(outer.slot, outer.generation).unwrap();
        assert_eq!(slot.value, Value::Int(1));
    }

    #[test]
    fn test_nested_shadowing_restores_each_level() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        let outer = stack.declare_var("i", "int", Value::Int(1)).unwrap();

        assert!(stack.push_scope());
        let middle = stack.declare_var("i", "int", Value::Int(2)).unwrap();
        assert!(stack.push_scope());
        stack.declare_var("i", "int", Value::Int(3)).unwrap();

        assert!(stack.pop_scope());
        assert_eq!(stack.lookup_var("i"), Some(middle));
        assert!(stack.pop_scope());
        assert_eq!(stack.lookup_var("i"), Some(outer));
    }
}
