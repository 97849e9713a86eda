//! Integration tests for grouped queries

use hwcatalog_engine::{
    Aggregate, Attribute, CmpOp, GroupQuery, Link, Operand, OrderKey, Params, Path, Predicate,
    QueryConfig, QueryExecutor,
};
use hwcatalog_foundation::{EntityKind, Value};
use hwcatalog_storage::Catalog;

use crate::fixtures::store;

fn by_processor_maker() -> GroupQuery {
    GroupQuery::new(
        "byProcessorMaker",
        EntityKind::Laptop,
        Path::this().via(Link::Processor).via(Link::MadeBy),
    )
    .aggregate(Aggregate::Count)
    .aggregate(Aggregate::Min(Path::this().attr(Attribute::Price)))
    .aggregate(Aggregate::Max(Path::this().attr(Attribute::HardDriveCapacity)))
    .order_by(OrderKey::desc(Path::this().attr(Attribute::Name)))
}

#[test]
fn groups_by_navigated_key() {
    let s = store();
    let groups = QueryExecutor::execute_grouped(
        &by_processor_maker(),
        &s.catalog,
        &Params::new(),
        &QueryConfig::default(),
    )
    .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key.id(), s.zeta.entity());
    assert_eq!(
        groups[0].values,
        vec![Value::Int(2), Value::Int(900), Value::Int(1024)]
    );
    assert_eq!(groups[1].key.id(), s.acme.entity());
    assert_eq!(
        groups[1].values,
        vec![Value::Int(2), Value::Int(600), Value::Int(512)]
    );
}

#[test]
fn members_keep_extent_order() {
    let s = store();
    let groups = QueryExecutor::execute_grouped(
        &by_processor_maker(),
        &s.catalog,
        &Params::new(),
        &QueryConfig::default(),
    )
    .unwrap();
    let acme_members: Vec<_> = groups[1].members.iter().map(|m| m.id()).collect();
    assert_eq!(acme_members, vec![s.aero.entity(), s.dash.entity()]);
}

#[test]
fn every_selected_member_lands_in_one_group() {
    let s = store();
    let query = GroupQuery::new(
        "byMaker",
        EntityKind::Laptop,
        Path::this().via(Link::MadeBy),
    )
    .filter(Predicate::compare(
        Path::this().attr(Attribute::Price),
        CmpOp::Ge,
        Operand::param("p"),
    ));
    let params = Params::new().with("p", 800);
    let groups =
        QueryExecutor::execute_grouped(&query, &s.catalog, &params, &QueryConfig::default())
            .unwrap();

    let total: usize = groups.iter().map(|g| g.members.len()).sum();
    assert_eq!(total, 3);
    // Nova's only laptop is filtered out, so Nova has no group.
    assert!(groups.iter().all(|g| g.key.id() != s.nova.entity()));
}

#[test]
fn empty_catalog_has_no_groups() {
    let empty = Catalog::new();
    let groups = QueryExecutor::execute_grouped(
        &by_processor_maker(),
        &empty,
        &Params::new(),
        &QueryConfig::default(),
    )
    .unwrap();
    assert!(groups.is_empty());
}

#[test]
fn non_ordered_aggregate_is_rejected() {
    let query = GroupQuery::new("bad", EntityKind::Laptop, Path::this().via(Link::MadeBy))
        .aggregate(Aggregate::Max(Path::this().attr(Attribute::HasHdScreen)));
    let err = QueryExecutor::execute_grouped(
        &query,
        &Catalog::new(),
        &Params::new(),
        &QueryConfig::default(),
    )
    .unwrap_err();
    assert!(err.is_invalid_query());
}

#[test]
fn group_count_bound() {
    let s = store();
    let err = QueryExecutor::execute_grouped(
        &by_processor_maker(),
        &s.catalog,
        &Params::new(),
        &QueryConfig::bounded(1),
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        hwcatalog_foundation::ErrorKind::LimitExceeded(_)
    ));
}
