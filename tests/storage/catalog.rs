//! Integration tests for catalog construction and lookup

use hwcatalog_foundation::{EntityKind, ErrorKind};
use hwcatalog_storage::{Catalog, Company, Laptop, Memory, Processor};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn new_catalog_is_empty() {
    let catalog = Catalog::new();
    assert!(catalog.is_empty());
    assert_eq!(catalog.all_laptops().count(), 0);
    catalog.verify_integrity().unwrap();
}

#[test]
fn adding_a_laptop_links_every_relationship() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, zeta) = catalog.add_company(Company::new("Zeta")).unwrap();
    let (catalog, chip) = catalog.add_processor(Processor::new(3.1), zeta).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(16)).unwrap();
    let (catalog, laptop) = catalog
        .add_laptop(Laptop::new("Aero 15", 1499, true, 1024), acme, chip, ram)
        .unwrap();

    let view = catalog.laptop(laptop).unwrap();
    assert_eq!(view.made_by().unwrap().id(), acme);
    assert_eq!(view.processor().unwrap().id(), chip);
    assert_eq!(view.memory().unwrap().id(), ram);

    assert!(catalog.company(acme).unwrap().makes_laptop(laptop));
    assert!(catalog.company(zeta).unwrap().makes_processor(chip));
    assert_eq!(catalog.processor(chip).unwrap().install_count(), 1);
    assert_eq!(catalog.entity_count(), 5);
    catalog.verify_integrity().unwrap();
}

#[test]
fn mutations_leave_old_snapshots_untouched() {
    let empty = Catalog::new();
    let (one, _) = empty.add_company(Company::new("Acme")).unwrap();
    let (two, _) = one.add_company(Company::new("Zeta")).unwrap();

    assert_eq!(empty.all_companies().count(), 0);
    assert_eq!(one.all_companies().count(), 1);
    assert_eq!(two.all_companies().count(), 2);
}

#[test]
fn duplicate_company_name_is_rejected() {
    let (catalog, _) = Catalog::new().add_company(Company::new("Acme")).unwrap();
    let err = catalog.add_company(Company::new("Acme")).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateKey {
            kind: EntityKind::Company,
            ..
        }
    ));
}

#[test]
fn duplicate_model_name_is_rejected_without_partial_mutation() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, chip) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("X1", 999, false, 256), acme, chip, ram)
        .unwrap();

    let err = catalog
        .add_laptop(Laptop::new("X1", 1099, true, 512), acme, chip, ram)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
    assert_eq!(catalog.company(acme).unwrap().laptop_count(), 1);
    assert_eq!(catalog.processor(chip).unwrap().install_count(), 1);
}

#[test]
fn linking_to_a_foreign_id_fails() {
    let (_, ghost) = Catalog::new().add_company(Company::new("Ghost")).unwrap();

    let catalog = Catalog::new();
    let (catalog, _) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, _) = catalog.add_memory(Memory::new(16)).unwrap();
    assert!(catalog.add_processor(Processor::new(2.0), ghost).is_err());
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn find_by_identity_key() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, chip) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, laptop) = catalog
        .add_laptop(Laptop::new("X1", 999, false, 256), acme, chip, ram)
        .unwrap();

    assert_eq!(catalog.find_laptop_by_model("X1").unwrap().id(), laptop);
    assert_eq!(catalog.find_company("Acme").unwrap().id(), acme);
}

#[test]
fn lookup_is_case_sensitive() {
    let (catalog, _) = Catalog::new().add_company(Company::new("Acme")).unwrap();
    let err = catalog.find_company("acme").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::NotFound {
            kind: EntityKind::Company,
            ..
        }
    ));
}

#[test]
fn iterators_are_restartable() {
    let catalog = Catalog::new();
    let (catalog, _) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, _) = catalog.add_memory(Memory::new(16)).unwrap();

    let first: Vec<_> = catalog.all_memories().map(|m| m.id()).collect();
    let second: Vec<_> = catalog.all_memories().map(|m| m.id()).collect();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}
