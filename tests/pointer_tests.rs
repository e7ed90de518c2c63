// Integration tests for the checked reference layer

use ptrlab::interpreter::errors::{InvalidReason, RuntimeError};
use ptrlab::lesson::functions::{dangling_local, distance, global_alias, swap};
use ptrlab::memory::alias::Alias;
use ptrlab::memory::statics::ProcessContext;
use ptrlab::memory::value::Point;
use ptrlab::memory::Memory;

fn memory_with_main() -> Memory {
    let mut statics = ProcessContext::new();
    statics.define("global_value", 101);
    let mut memory = Memory::new(statics);
    memory.push_frame("main");
    memory
}

fn expect_reason(result: Result<impl std::fmt::Debug, RuntimeError>) -> InvalidReason {
    match result {
        Err(RuntimeError::InvalidReference { reason, .. }) => reason,
        other => panic!("Expected InvalidReference, got {:?}", other),
    }
}

#[test]
fn test_read_after_declare() {
    let mut memory = memory_with_main();
    let a = memory.declare("a", 10).unwrap();
    let b = memory.declare("b", std::f64::consts::PI).unwrap();

    assert_eq!(memory.read(a).unwrap(), 10);
    assert_eq!(memory.read(b).unwrap(), std::f64::consts::PI);
    assert_eq!(memory.address_of::<i32>("a").unwrap(), a);
}

#[test]
fn test_write_then_read() {
    let mut memory = memory_with_main();
    let a = memory.declare("a", 10).unwrap();
    let pt1 = memory.declare("pt1", a).unwrap();

    let target = memory.read(pt1).unwrap();
    let value = memory.read(target).unwrap();
    memory.write(target, value + 2).unwrap();

    assert_eq!(memory.read(a).unwrap(), 12);
}

#[test]
fn test_double_alias_composition() {
    let mut memory = memory_with_main();
    let a = memory.declare("a", 12).unwrap();
    let pt1 = memory.declare("pt1", a).unwrap();
    let pt4 = memory.declare("pt4", pt1).unwrap();

    let value = memory.read(memory.read(memory.read(pt4).unwrap()).unwrap()).unwrap();
    assert_eq!(value, 12);
}

#[test]
fn test_swap() {
    let mut memory = memory_with_main();
    let x = memory.declare("x", 42).unwrap();
    let y = memory.declare("y", 24).unwrap();

    swap(&mut memory, x, y).unwrap();
    assert_eq!(memory.read(x).unwrap(), 24);
    assert_eq!(memory.read(y).unwrap(), 42);

    swap(&mut memory, x, y).unwrap();
    assert_eq!(memory.read(x).unwrap(), 42);
    assert_eq!(memory.read(y).unwrap(), 24);
}

#[test]
fn test_swap_with_itself() {
    let mut memory = memory_with_main();
    let x = memory.declare("x", 7).unwrap();

    swap(&mut memory, x, x).unwrap();
    assert_eq!(memory.read(x).unwrap(), 7);
}

#[test]
fn test_failed_swap_leaves_values_untouched() {
    let mut memory = memory_with_main();
    let x = memory.declare("x", 42).unwrap();
    let dangling = dangling_local(&mut memory).unwrap();

    let result = swap(&mut memory, x, dangling);
    assert!(matches!(
        expect_reason(result),
        InvalidReason::Expired { .. }
    ));
    assert_eq!(memory.read(x).unwrap(), 42);

    let result = swap(&mut memory, Alias::null(), x);
    assert_eq!(expect_reason(result), InvalidReason::Null);
    assert_eq!(memory.read(x).unwrap(), 42);
}

#[test]
fn test_distance() {
    let mut memory = memory_with_main();
    let u = memory.declare("u", Point::new(10.4, -23.4)).unwrap();
    let v = memory.declare("v", Point::new(0.0, 6.4)).unwrap();

    let d = distance(&memory, u, v).unwrap();
    assert!((d - 31.5626).abs() < 1e-3, "distance was {}", d);
    assert_eq!(distance(&memory, v, u).unwrap(), d);
    assert_eq!(distance(&memory, u, u).unwrap(), 0.0);
}

#[test]
fn test_distance_through_field_writes() {
    let mut memory = memory_with_main();
    let u = memory.declare_uninit::<Point>("u").unwrap();
    let v = memory.declare("v", Point::new(0.0, 6.4)).unwrap();

    memory.write(u.x(), 10.4).unwrap();
    match distance(&memory, u, v) {
        Err(RuntimeError::UninitializedRead { var, .. }) => assert_eq!(var, "u"),
        other => panic!("Expected UninitializedRead, got {:?}", other),
    }

    memory.write(u.y(), -23.4).unwrap();
    assert_eq!(memory.read(u).unwrap(), Point::new(10.4, -23.4));
    assert_eq!(memory.read(u.y()).unwrap(), -23.4);
}

#[test]
fn test_dangling_local_is_rejected() {
    let mut memory = memory_with_main();
    let dangling = dangling_local(&mut memory).unwrap();

    assert!(!dangling.is_null());
    assert!(!memory.is_valid(dangling));
    match expect_reason(memory.read(dangling)) {
        InvalidReason::Expired { expected, current } => assert!(current > expected),
        other => panic!("Expected Expired, got {:?}", other),
    }
    assert!(memory.write(dangling, 1).unwrap_err().is_invalid_reference());
}

#[test]
fn test_stale_alias_fails_after_slot_reuse() {
    let mut memory = memory_with_main();
    let dangling = dangling_local(&mut memory).unwrap();

    // A new call at the same depth takes over the old storage
    memory.push_frame("other_call");
    let fresh = memory.declare("fresh", 7).unwrap();
    let (old, new) = (dangling.raw().unwrap(), fresh.raw().unwrap());
    assert_eq!((old.region, old.slot), (new.region, new.slot));

    assert!(memory.read(dangling).unwrap_err().is_invalid_reference());
    assert_eq!(memory.read(fresh).unwrap(), 7);
    memory.pop_frame().unwrap();
}

#[test]
fn test_global_alias_tracks_writes() {
    let mut memory = memory_with_main();
    let global = global_alias(&memory).unwrap();
    assert_eq!(memory.read(global).unwrap(), 101);

    memory.write(global, 5).unwrap();
    assert_eq!(memory.read(global_alias(&memory).unwrap()).unwrap(), 5);

    // Survives every frame
    memory.pop_frame().unwrap();
    assert!(memory.is_valid(global));
    assert_eq!(memory.read(global).unwrap(), 5);
}

#[test]
fn test_null_alias() {
    let mut memory = memory_with_main();
    let pt3 = memory.declare("pt3", Alias::<i32>::null()).unwrap();
    let null = memory.read(pt3).unwrap();

    assert!(null.is_null());
    assert_eq!(expect_reason(memory.read(null)), InvalidReason::Null);
    assert_eq!(expect_reason(memory.write(null, 3)), InvalidReason::Null);
}

#[test]
fn test_uninitialized_pointer_read() {
    let mut memory = memory_with_main();
    let pt1 = memory.declare_uninit::<Alias<i32>>("pt1").unwrap();

    match memory.read(pt1) {
        Err(RuntimeError::UninitializedRead { var, .. }) => assert_eq!(var, "pt1"),
        other => panic!("Expected UninitializedRead, got {:?}", other),
    }
}

#[test]
fn test_type_mismatch() {
    let mut memory = memory_with_main();
    memory.declare("b", 2.5).unwrap();

    match expect_reason(memory.address_of::<i32>("b")) {
        InvalidReason::TypeMismatch { expected, got } => {
            assert_eq!(expected, "int");
            assert_eq!(got, "double");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_field_access_checks_declared_field_type() {
    let mut memory = memory_with_main();
    let u = memory.declare_uninit::<Point>("u").unwrap();

    // Rejected before the field was ever assigned
    match expect_reason(memory.write(u.field::<i32>("x"), 7)) {
        InvalidReason::TypeMismatch { expected, .. } => assert_eq!(expected, "int"),
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
    assert!(matches!(
        expect_reason(memory.write(u.field::<f64>("z"), 1.0)),
        InvalidReason::TypeMismatch { .. }
    ));

    // The struct is untouched and still usable
    memory.write(u.x(), 10.4).unwrap();
    memory.write(u.y(), -23.4).unwrap();
    assert_eq!(memory.read(u).unwrap(), Point::new(10.4, -23.4));
    assert!(matches!(
        expect_reason(memory.read(u.field::<i32>("y"))),
        InvalidReason::TypeMismatch { .. }
    ));
}

#[test]
fn test_redeclaration_keeps_outer_binding() {
    let mut memory = memory_with_main();
    memory.declare("i", 1).unwrap();

    memory.push_scope().unwrap();
    memory.declare("i", 2).unwrap();
    assert_eq!(
        memory.declare("i", 3),
        Err(RuntimeError::Redeclaration {
            name: "i".to_string()
        })
    );
    memory.pop_scope().unwrap();

    let i = memory.address_of::<i32>("i").unwrap();
    assert_eq!(memory.read(i).unwrap(), 1);
}

#[test]
fn test_nested_scope_expires_only_its_slots() {
    let mut memory = memory_with_main();
    let outer = memory.declare("outer", 1).unwrap();

    memory.push_scope().unwrap();
    let inner = memory.declare("inner", 2).unwrap();
    assert_eq!(memory.read(inner).unwrap(), 2);
    memory.pop_scope().unwrap();

    assert!(memory.read(inner).unwrap_err().is_invalid_reference());
    assert_eq!(memory.read(outer).unwrap(), 1);
    assert!(matches!(
        memory.address_of::<i32>("inner"),
        Err(RuntimeError::UndefinedVariable { .. })
    ));
}

#[test]
fn test_no_frame() {
    let mut memory = Memory::new(ProcessContext::new());
    assert_eq!(memory.declare("a", 1), Err(RuntimeError::NoStackFrame));
    assert_eq!(memory.pop_frame(), Err(RuntimeError::NoStackFrame));
    assert_eq!(memory.pop_scope(), Err(RuntimeError::NoStackFrame));
}
