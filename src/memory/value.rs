//! Runtime value representation
//!
//! This module defines the [`Value`] enum stored in every arena slot, plus the
//! [`Storable`] trait that maps Rust types onto it. Unlike C's raw memory model,
//! values are tagged and type-safe.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer (`int`)
//! - [`Value::Double`]: 64-bit float (`double`)
//! - [`Value::Struct`]: struct with named fields (the lesson's `Point`)
//! - [`Value::Pointer`]: an alias to another slot
//! - [`Value::Null`]: null pointer
//! - [`Value::Uninitialized`]: marker for declared-but-unassigned storage

use super::alias::{Alias, RawAlias};
use rustc_hash::FxHashMap;

/// Runtime values stored in arena slots
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i32),
    Double(f64),
    Struct(FxHashMap<String, Value>), // Field name -> field value
    Pointer(RawAlias),
    Null,
    #[default]
    Uninitialized,
}

impl Value {
    /// Check if this value is initialized (structs: every field)
    pub fn is_initialized(&self) -> bool {
        match self {
            Value::Uninitialized => false,
            Value::Struct(fields) => fields.values().all(Value::is_initialized),
            _ => true,
        }
    }

    /// Get a struct field, returns None if not a struct or no such field
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Get a mutable struct field
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Value::Struct(fields) => fields.get_mut(name),
            _ => None,
        }
    }

    /// Check if this value is a pointer (including null)
    pub fn is_pointer(&self) -> bool {
        matches!(self, Value::Pointer(_) | Value::Null)
    }

    /// Short description of what is stored, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Struct(_) => "struct",
            Value::Pointer(_) | Value::Null => "pointer",
            Value::Uninitialized => "uninitialized",
        }
    }
}

/// A 2D point: the lesson's `typedef struct { double x; double y; } Point;`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Field names with their C types, in declaration order
    pub const FIELDS: [(&'static str, &'static str); 2] = [("x", "double"), ("y", "double")];

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// C type of `field` in a struct declared as `struct_type`
pub fn field_c_type(struct_type: &str, field: &str) -> Option<&'static str> {
    match struct_type {
        "Point" => Point::FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, c_type)| *c_type),
        _ => None,
    }
}

/// Rust types that can live in an arena slot.
///
/// `c_type` is the C spelling of the type; slots remember it so a typed
/// access can be checked against what was declared.
pub trait Storable: Sized {
    fn c_type() -> String;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;

    /// Storage for a declaration without initializer
    fn uninit_value() -> Value {
        Value::Uninitialized
    }
}

impl Storable for i32 {
    fn c_type() -> String {
        "int".to_string()
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl Storable for f64 {
    fn c_type() -> String {
        "double".to_string()
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl Storable for Point {
    fn c_type() -> String {
        "Point".to_string()
    }

    fn into_value(self) -> Value {
        let mut fields = FxHashMap::default();
        fields.insert("x".to_string(), Value::Double(self.x));
        fields.insert("y".to_string(), Value::Double(self.y));
        Value::Struct(fields)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let x = f64::from_value(value.field("x")?)?;
        let y = f64::from_value(value.field("y")?)?;
        Some(Point { x, y })
    }

    // Fields are tracked individually so `u.x = ...` can initialize one at a time
    fn uninit_value() -> Value {
        let fields = Point::FIELDS
            .iter()
            .map(|(name, _)| (name.to_string(), Value::Uninitialized))
            .collect();
        Value::Struct(fields)
    }
}

impl<T: Storable> Storable for Alias<T> {
    fn c_type() -> String {
        format!("{}*", T::c_type())
    }

    fn into_value(self) -> Value {
        match self.raw() {
            Some(raw) => Value::Pointer(raw),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Pointer(raw) => Some(Alias::from_raw(*raw)),
            Value::Null => Some(Alias::null()),
            _ => None,
        }
    }
}
