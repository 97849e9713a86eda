//! Integration tests for Value
//!
//! Tests typing, accessors, equality and the total sort order.

use std::cmp::Ordering;

use hwcatalog_foundation::{EntityId, EntityKind, LaptopId, Type, Value};

// =============================================================================
// Typing
// =============================================================================

#[test]
fn value_types() {
    assert_eq!(Value::Nil.value_type(), Type::Nil);
    assert_eq!(Value::from(true).value_type(), Type::Bool);
    assert_eq!(Value::from(3i64).value_type(), Type::Int);
    assert_eq!(Value::from(2.5).value_type(), Type::Float);
    assert_eq!(Value::from("Acme").value_type(), Type::String);

    let laptop = LaptopId::from_entity(EntityId::new(4, 1));
    assert_eq!(
        Value::from(laptop).value_type(),
        Type::Entity(EntityKind::Laptop)
    );
}

#[test]
fn numeric_types_are_comparable() {
    assert!(Type::Int.comparable_with(Type::Float));
    assert!(Type::Nil.comparable_with(Type::String));
    assert!(!Type::String.comparable_with(Type::Int));
    assert!(!Type::Entity(EntityKind::Laptop).comparable_with(Type::Entity(EntityKind::Company)));
}

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn accessors() {
    assert_eq!(Value::from(7i64).as_int(), Some(7));
    assert_eq!(Value::from(7i64).as_number(), Some(7.0));
    assert_eq!(Value::from(1.5).as_number(), Some(1.5));
    assert_eq!(Value::from("x").as_number(), None);
    assert!(Value::Nil.is_nil());
    assert_eq!(Value::from("x").as_int(), None);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn sort_order_promotes_ints() {
    assert_eq!(Value::Int(2).sort_cmp(&Value::Float(2.5)), Ordering::Less);
    assert_eq!(Value::Float(3.0).sort_cmp(&Value::Int(2)), Ordering::Greater);
}

#[test]
fn sort_order_is_total_over_floats() {
    let nan = Value::Float(f64::NAN);
    assert_eq!(nan.sort_cmp(&nan), Ordering::Equal);
    assert_eq!(Value::Float(1.0e300).sort_cmp(&nan), Ordering::Less);
    assert_eq!(Value::Float(-0.0).sort_cmp(&Value::Float(0.0)), Ordering::Less);
}

#[test]
fn nil_sorts_first() {
    for value in [Value::from(false), Value::from(0i64), Value::from("")] {
        assert_eq!(Value::Nil.sort_cmp(&value), Ordering::Less);
    }
}

#[test]
fn strings_sort_case_sensitively() {
    assert_eq!(Value::from("Zeta").sort_cmp(&Value::from("acme")), Ordering::Less);
}
