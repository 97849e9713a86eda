//! Integration tests for predicate evaluation

use hwcatalog_engine::{
    Attribute, CmpOp, Collection, Evaluator, Link, Operand, Params, Path, Predicate, Range,
    compare,
};
use hwcatalog_foundation::{EntityKind, ErrorKind, Value};
use hwcatalog_storage::EntityRef;

use crate::fixtures::store;

fn laptop<'a>(catalog: &'a hwcatalog_storage::Catalog, model: &str) -> EntityRef<'a> {
    EntityRef::from(catalog.find_laptop_by_model(model).unwrap())
}

#[test]
fn navigation_chain_comparison() {
    let s = store();
    let params = Params::new().with("cName", "Zeta");
    let evaluator = Evaluator::new(&s.catalog, &params);
    let predicate = Predicate::compare(
        Path::this()
            .via(Link::Processor)
            .via(Link::MadeBy)
            .attr(Attribute::Name),
        CmpOp::Eq,
        Operand::param("cName"),
    );

    assert!(evaluator.test(&predicate, laptop(&s.catalog, "Bolt")).unwrap());
    assert!(!evaluator.test(&predicate, laptop(&s.catalog, "Aero")).unwrap());
}

#[test]
fn string_equality_is_case_sensitive() {
    let s = store();
    let params = Params::new().with("cName", "zeta");
    let evaluator = Evaluator::new(&s.catalog, &params);
    let predicate = Predicate::compare(
        Path::this().via(Link::MadeBy).attr(Attribute::Name),
        CmpOp::Eq,
        Operand::param("cName"),
    );
    assert!(!evaluator.test(&predicate, laptop(&s.catalog, "Comet")).unwrap());
}

#[test]
fn float_boundary_is_inclusive() {
    let s = store();
    let params = Params::new().with("c", 3.3);
    let evaluator = Evaluator::new(&s.catalog, &params);
    let predicate = Predicate::compare(
        Path::this().via(Link::Processor).attr(Attribute::ClockSpeed),
        CmpOp::Ge,
        Operand::param("c"),
    );
    assert!(evaluator.test(&predicate, laptop(&s.catalog, "Bolt")).unwrap());
}

#[test]
fn int_parameter_against_float_attribute() {
    let s = store();
    let params = Params::new().with("c", 3);
    let evaluator = Evaluator::new(&s.catalog, &params);
    let predicate = Predicate::compare(
        Path::this().via(Link::Processor).attr(Attribute::ClockSpeed),
        CmpOp::Gt,
        Operand::param("c"),
    );
    assert!(evaluator.test(&predicate, laptop(&s.catalog, "Comet")).unwrap());
    assert!(!evaluator.test(&predicate, laptop(&s.catalog, "Dash")).unwrap());
}

#[test]
fn self_join_excludes_this() {
    let s = store();
    let params = Params::new();
    let evaluator = Evaluator::new(&s.catalog, &params);
    let shares = Predicate::exists(
        "other",
        Range::Extent(EntityKind::Laptop),
        Predicate::all([
            Predicate::compare(
                Path::var("other").via(Link::Memory),
                CmpOp::Eq,
                Path::this().via(Link::Memory),
            ),
            Predicate::compare(Path::var("other"), CmpOp::Ne, Path::this()),
        ]),
    );

    // Comet and Dash share the 8 GB module; Aero's module is its own.
    assert!(evaluator.test(&shares, laptop(&s.catalog, "Comet")).unwrap());
    assert!(evaluator.test(&shares, laptop(&s.catalog, "Dash")).unwrap());
    assert!(!evaluator.test(&shares, laptop(&s.catalog, "Aero")).unwrap());
}

#[test]
fn nested_quantifiers_see_outer_variables() {
    let s = store();
    let params = Params::new();
    let evaluator = Evaluator::new(&s.catalog, &params);
    // Some laptop of this company uses a processor installed in a laptop of
    // a different company.
    let predicate = Predicate::exists(
        "l",
        Range::collection(Path::this(), Collection::MakeLaptops),
        Predicate::exists(
            "peer",
            Range::collection(Path::var("l").via(Link::Processor), Collection::InstalledIn),
            Predicate::compare(
                Path::var("peer").via(Link::MadeBy),
                CmpOp::Ne,
                Path::this(),
            ),
        ),
    );

    let acme = EntityRef::from(s.catalog.company(s.acme).unwrap());
    let nova = EntityRef::from(s.catalog.company(s.nova).unwrap());
    assert!(evaluator.test(&predicate, acme).unwrap());
    assert!(evaluator.test(&predicate, nova).unwrap());
}

#[test]
fn size_compare_counts_collection() {
    let s = store();
    let params = Params::new();
    let evaluator = Evaluator::new(&s.catalog, &params);
    let two_laptops = Predicate::size(Path::this(), Collection::MakeLaptops, CmpOp::Ge, 2);

    let acme = EntityRef::from(s.catalog.company(s.acme).unwrap());
    let zeta = EntityRef::from(s.catalog.company(s.zeta).unwrap());
    assert!(evaluator.test(&two_laptops, acme).unwrap());
    assert!(!evaluator.test(&two_laptops, zeta).unwrap());
}

#[test]
fn contains_checks_membership() {
    let s = store();
    let params = Params::new();
    let evaluator = Evaluator::new(&s.catalog, &params);
    let makes_own = Predicate::contains(
        Path::this().via(Link::MadeBy),
        Collection::MakeLaptops,
        Path::this(),
    );
    for model in ["Aero", "Bolt", "Comet", "Dash"] {
        assert!(evaluator.test(&makes_own, laptop(&s.catalog, model)).unwrap());
    }
}

#[test]
fn negation_and_disjunction() {
    let s = store();
    let params = Params::new();
    let evaluator = Evaluator::new(&s.catalog, &params);
    let cheap_or_no_hd = Predicate::any([
        Predicate::compare(
            Path::this().attr(Attribute::Price),
            CmpOp::Lt,
            Operand::value(700),
        ),
        Predicate::compare(
            Path::this().attr(Attribute::HasHdScreen),
            CmpOp::Eq,
            Operand::value(true),
        )
        .negate(),
    ]);
    assert!(evaluator.test(&cheap_or_no_hd, laptop(&s.catalog, "Dash")).unwrap());
    assert!(evaluator.test(&cheap_or_no_hd, laptop(&s.catalog, "Comet")).unwrap());
    assert!(!evaluator.test(&cheap_or_no_hd, laptop(&s.catalog, "Aero")).unwrap());
}

#[test]
fn runtime_type_mismatch() {
    let s = store();
    let params = Params::new().with("p", "cheap");
    let evaluator = Evaluator::new(&s.catalog, &params);
    let predicate = Predicate::compare(
        Path::this().attr(Attribute::Price),
        CmpOp::Lt,
        Operand::param("p"),
    );
    let err = evaluator
        .test(&predicate, laptop(&s.catalog, "Dash"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn compare_is_exposed_for_values() {
    assert!(compare(&Value::from("a"), CmpOp::Lt, &Value::from("b")).unwrap());
    assert!(!compare(&Value::Nil, CmpOp::Eq, &Value::Nil).unwrap());
}
