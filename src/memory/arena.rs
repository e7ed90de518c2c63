//! Generational slot arena
//!
//! Every stack frame (and the static region) stores its values in an
//! [`Arena`]. Slots are handed out in order and invalidated in bulk:
//!
//! - [`Arena::allocate`] hands out the next slot, reusing an expired one if
//!   available (the way a new call reuses the stack memory of a returned one)
//! - [`Arena::expire_from`] bumps the generation of every slot past a mark
//!
//! An alias remembers the generation it was taken at; [`Arena::get`] refuses
//! any access whose generation no longer matches. Expired slots keep their
//! last contents so the viewer can show what a dangling pointer would have
//! "seen".

use super::value::Value;
use crate::interpreter::errors::InvalidReason;

/// State of an arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Live,
    Expired, // Scope ended, contents are stale
}

/// One storage slot
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    pub c_type: String,
    pub value: Value,
    pub generation: u32,
    pub state: SlotState,
}

impl Slot {
    pub fn is_live(&self) -> bool {
        self.state == SlotState::Live
    }
}

/// Region of storage for same-lifetime values
#[derive(Debug, Clone, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    live_len: usize,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            live_len: 0,
        }
    }

    /// Allocate the next slot, returns (slot index, generation)
    pub fn allocate(&mut self, name: &str, c_type: &str, value: Value) -> (usize, u32) {
        let index = self.live_len;
        if let Some(slot) = self.slots.get_mut(index) {
            // Reuse expired storage; its generation was bumped on expiry
            slot.name = name.to_string();
            slot.c_type = c_type.to_string();
            slot.value = value;
            slot.state = SlotState::Live;
        } else {
            self.slots.push(Slot {
                name: name.to_string(),
                c_type: c_type.to_string(),
                value,
                generation: 0,
                state: SlotState::Live,
            });
        }
        self.live_len += 1;
        (index, self.slots[index].generation)
    }

    /// Expire every live slot at index `mark` and above
    pub fn expire_from(&mut self, mark: usize) {
        for slot in self.slots.iter_mut().take(self.live_len).skip(mark) {
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = SlotState::Expired;
        }
        self.live_len = self.live_len.min(mark);
    }

    /// Expire everything (scope exit of the owning frame)
    pub fn expire_all(&mut self) {
        self.expire_from(0);
    }

    /// Get a slot if `generation` is still current
    pub fn get(&self, index: usize, generation: u32) -> Result<&Slot, InvalidReason> {
        let slot = self.slots.get(index).ok_or(InvalidReason::OutOfBounds)?;
        Self::check(slot, generation)?;
        Ok(slot)
    }

    /// Get a mutable slot if `generation` is still current
    pub fn get_mut(&mut self, index: usize, generation: u32) -> Result<&mut Slot, InvalidReason> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InvalidReason::OutOfBounds)?;
        Self::check(slot, generation)?;
        Ok(slot)
    }

    fn check(slot: &Slot, generation: u32) -> Result<(), InvalidReason> {
        if slot.generation != generation || !slot.is_live() {
            return Err(InvalidReason::Expired {
                expected: generation,
                current: slot.generation,
            });
        }
        Ok(())
    }

    /// Number of live slots (also the next allocation index)
    pub fn live_len(&self) -> usize {
        self.live_len
    }

    /// All slots, including expired ones (for UI display)
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_get() {
        let mut arena = Arena::new();
        let (index, generation) = arena.allocate("a", "int", Value::Int(10));

        assert_eq!((index, generation), (0, 0));
        assert_eq!(arena.get(index, generation).unwrap().value, Value::Int(10));
        assert_eq!(arena.live_len(), 1);
    }

    #[test]
    fn test_expired_slot_is_rejected() {
        let mut arena = Arena::new();
        let (index, generation) = arena.allocate("x", "int", Value::Int(42));
        arena.expire_all();

        match arena.get(index, generation) {
            Err(InvalidReason::Expired { expected, current }) => {
                assert_eq!(expected, 0);
                assert_eq!(current, 1);
            }
            other => panic!("Expected expired slot, got {:?}", other),
        }
        // Stale contents stay visible
        assert_eq!(arena.slots()[index].value, Value::Int(42));
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut arena = Arena::new();
        let (old_index, old_gen) = arena.allocate("x", "int", Value::Int(42));
        arena.expire_all();
        let (new_index, new_gen) = arena.allocate("y", "double", Value::Double(1.5));

        assert_eq!(old_index, new_index);
        assert_ne!(old_gen, new_gen);
        assert!(arena.get(old_index, old_gen).is_err());
        assert_eq!(
            arena.get(new_index, new_gen).unwrap().value,
            Value::Double(1.5)
        );
    }

    #[test]
    fn test_expire_from_mark_keeps_lower_slots() {
        let mut arena = Arena::new();
        let (a, a_gen) = arena.allocate("a", "int", Value::Int(1));
        let (b, b_gen) = arena.allocate("b", "int", Value::Int(2));
        arena.expire_from(1);

        assert!(arena.get(a, a_gen).is_ok());
        assert!(arena.get(b, b_gen).is_err());
        assert_eq!(arena.live_len(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let arena = Arena::new();
        assert_eq!(arena.get(3, 0).unwrap_err(), InvalidReason::OutOfBounds);
    }
}
