//! Checked aliases (the safe stand-in for C pointers)
//!
//! A [`RawAlias`] names a storage slot by region, slot index and the
//! generation the slot had when the alias was taken. [`Alias<T>`] adds the
//! pointee type and the possibility of being null.
//!
//! # Addresses
//!
//! Aliases print like `%p` would, using a synthetic address derived from the
//! region and slot, followed by the expected generation:
//!
//! ```text
//! 0x00000414#g0   frame 1, slot 1, generation 0
//! 0x08000000#g0   static slot 0
//! ```

use crate::interpreter::constants::{
    FRAME_ADDRESS_STRIDE, SLOT_SIZE, STACK_ADDRESS_START, STATIC_ADDRESS_START,
};
use std::fmt;
use std::marker::PhantomData;

/// Memory address type (synthetic, display only)
pub type Address = u64;

/// Where a slot lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Process-lifetime storage, never expires
    Static,
    /// The arena of the stack frame at this depth
    Frame(usize),
}

/// Untyped alias: slot coordinates plus the generation they were valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawAlias {
    pub region: Region,
    pub slot: usize,
    pub generation: u32,
    /// Struct field this alias was projected onto (`&p->x`)
    pub field: Option<&'static str>,
}

impl RawAlias {
    pub fn new(region: Region, slot: usize, generation: u32) -> Self {
        RawAlias {
            region,
            slot,
            generation,
            field: None,
        }
    }

    /// Synthetic address of the designated storage
    pub fn address(&self) -> Address {
        let base = match self.region {
            Region::Static => STATIC_ADDRESS_START,
            Region::Frame(depth) => STACK_ADDRESS_START + depth as u64 * FRAME_ADDRESS_STRIDE,
        };
        // Point fields are two doubles, y sits 8 bytes after x
        let field_offset = match self.field {
            Some("y") => 8,
            _ => 0,
        };
        base + self.slot as u64 * SLOT_SIZE + field_offset
    }
}

impl fmt::Display for RawAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}#g{}", self.address(), self.generation)
    }
}

/// A typed, nullable alias to a `T` stored in some slot
pub struct Alias<T> {
    raw: Option<RawAlias>,
    _pointee: PhantomData<fn() -> T>,
}

impl<T> Alias<T> {
    pub fn from_raw(raw: RawAlias) -> Self {
        Alias {
            raw: Some(raw),
            _pointee: PhantomData,
        }
    }

    /// The null alias (`NULL`)
    pub fn null() -> Self {
        Alias {
            raw: None,
            _pointee: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    pub fn raw(&self) -> Option<RawAlias> {
        self.raw
    }

    /// Project onto a named struct field, keeping the base slot and generation
    pub fn field<F>(self, name: &'static str) -> Alias<F> {
        Alias {
            raw: self.raw.map(|raw| RawAlias {
                field: Some(name),
                ..raw
            }),
            _pointee: PhantomData,
        }
    }
}

impl Alias<super::value::Point> {
    /// `&p->x`
    pub fn x(self) -> Alias<f64> {
        self.field("x")
    }

    /// `&p->y`
    pub fn y(self) -> Alias<f64> {
        self.field("y")
    }
}

// Manual impls: derives would demand `T: Clone` etc. on the pointee
impl<T> Clone for Alias<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Alias<T> {}

impl<T> PartialEq for Alias<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Alias<T> {}

impl<T> fmt::Debug for Alias<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.debug_tuple("Alias").field(raw).finish(),
            None => f.write_str("Alias(NULL)"),
        }
    }
}

impl<T> fmt::Display for Alias<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => raw.fmt(f),
            None => f.write_str("(nil)"),
        }
    }
}
