//! Worked scenarios for the catalog queries.

use hwcatalog_engine::{CatalogQueries, CompanySummary, QueryConfig};
use hwcatalog_foundation::ErrorKind;
use hwcatalog_storage::{Catalog, Company, Laptop, Memory, Processor};

#[test]
fn speed_and_memory_thresholds() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, p) = catalog.add_processor(Processor::new(3.0), acme).unwrap();
    let (catalog, m) = catalog.add_memory(Memory::new(16)).unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("L1", 1000, true, 512), acme, p, m)
        .unwrap();

    let queries = CatalogQueries::new(&catalog);
    assert_eq!(queries.companies_by_speed_and_memory(2.5, 8).unwrap(), vec![acme]);
    assert_eq!(queries.companies_by_speed_and_memory(3.0, 16).unwrap(), vec![acme]);
    assert!(queries.companies_by_speed_and_memory(3.5, 8).unwrap().is_empty());
    assert!(queries.companies_by_speed_and_memory(2.5, 32).unwrap().is_empty());
}

#[test]
fn speed_and_memory_need_one_laptop_meeting_both() {
    // Fast laptop with little memory and slow laptop with lots of memory.
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, fast) = catalog.add_processor(Processor::new(3.5), acme).unwrap();
    let (catalog, slow) = catalog.add_processor(Processor::new(1.5), acme).unwrap();
    let (catalog, small) = catalog.add_memory(Memory::new(4)).unwrap();
    let (catalog, large) = catalog.add_memory(Memory::new(32)).unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("Fast", 1500, true, 512), acme, fast, small)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("Roomy", 900, true, 512), acme, slow, large)
        .unwrap();

    let queries = CatalogQueries::new(&catalog);
    assert!(queries.companies_by_speed_and_memory(3.0, 16).unwrap().is_empty());
}

#[test]
fn mixed_processor_makers() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, zeta) = catalog.add_company(Company::new("Zeta")).unwrap();
    let (catalog, solo) = catalog.add_company(Company::new("Solo")).unwrap();
    let (catalog, mono) = catalog.add_company(Company::new("Mono")).unwrap();
    let (catalog, acme_chip) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, zeta_chip) = catalog.add_processor(Processor::new(3.0), zeta).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let mut catalog = catalog;
    for (model, maker, chip) in [
        ("L1", acme, acme_chip),
        ("L2", acme, zeta_chip),
        ("S1", solo, zeta_chip),
        ("M1", mono, zeta_chip),
        ("M2", mono, zeta_chip),
    ] {
        catalog = catalog
            .add_laptop(Laptop::new(model, 1000, true, 256), maker, chip, ram)
            .unwrap()
            .0;
    }

    let found = CatalogQueries::new(&catalog)
        .companies_with_mixed_processors()
        .unwrap();
    // Solo has one laptop; Mono has two but both use Zeta processors.
    assert_eq!(found, vec![acme]);
}

#[test]
fn shared_processor_self_join() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, p) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, q) = catalog.add_processor(Processor::new(2.5), acme).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, l2) = catalog
        .add_laptop(Laptop::new("L2", 800, true, 256), acme, p, ram)
        .unwrap();
    let (catalog, l1) = catalog
        .add_laptop(Laptop::new("L1", 900, true, 256), acme, p, ram)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("L3", 700, true, 256), acme, q, ram)
        .unwrap();

    let found = CatalogQueries::new(&catalog).laptops_sharing_processor().unwrap();
    assert_eq!(found, vec![l1, l2]);
}

#[test]
fn group_by_company_summaries() {
    let catalog = Catalog::new();
    let (catalog, b) = catalog.add_company(Company::new("B")).unwrap();
    let (catalog, a) = catalog.add_company(Company::new("A")).unwrap();
    let (catalog, p2) = catalog.add_processor(Processor::new(2.0), a).unwrap();
    let (catalog, p3) = catalog.add_processor(Processor::new(3.0), a).unwrap();
    let (catalog, p4) = catalog.add_processor(Processor::new(4.0), b).unwrap();
    let (catalog, m4) = catalog.add_memory(Memory::new(4)).unwrap();
    let (catalog, m8) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, m16) = catalog.add_memory(Memory::new(16)).unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("B1", 500, false, 128), b, p4, m4)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("A1", 700, true, 256), a, p2, m16)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("A2", 900, true, 512), a, p3, m8)
        .unwrap();

    let summaries = CatalogQueries::new(&catalog).laptops_grouped_by_company().unwrap();
    assert_eq!(
        summaries,
        vec![
            CompanySummary {
                company: a,
                laptop_count: 2,
                min_clock_speed: 2.0,
                max_memory_size: 16,
            },
            CompanySummary {
                company: b,
                laptop_count: 1,
                min_clock_speed: 4.0,
                max_memory_size: 4,
            },
        ]
    );
}

#[test]
fn in_house_processor_triples() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, zeta) = catalog.add_company(Company::new("Zeta")).unwrap();
    let (catalog, acme_chip) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, zeta_chip) = catalog.add_processor(Processor::new(3.0), zeta).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, own) = catalog
        .add_laptop(Laptop::new("Own", 1000, true, 256), acme, acme_chip, ram)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("Borrowed", 1000, true, 256), acme, zeta_chip, ram)
        .unwrap();
    let (catalog, zeta_own) = catalog
        .add_laptop(Laptop::new("Native", 1000, true, 256), zeta, zeta_chip, ram)
        .unwrap();

    let triples = CatalogQueries::new(&catalog)
        .laptops_with_in_house_processor()
        .unwrap();
    let ids: Vec<_> = triples
        .iter()
        .map(|t| (t.laptop, t.processor, t.company))
        .collect();
    assert_eq!(
        ids,
        vec![(own, acme_chip, acme), (zeta_own, zeta_chip, zeta)]
    );
    assert!(triples[0].description.contains("Own"));
}

#[test]
fn processor_maker_lookup() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, zeta) = catalog.add_company(Company::new("Zeta")).unwrap();
    let (catalog, zeta_chip) = catalog.add_processor(Processor::new(3.0), zeta).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, z1) = catalog
        .add_laptop(Laptop::new("Z1", 1000, true, 256), zeta, zeta_chip, ram)
        .unwrap();
    let (catalog, a1) = catalog
        .add_laptop(Laptop::new("A1", 1000, true, 256), acme, zeta_chip, ram)
        .unwrap();

    let queries = CatalogQueries::new(&catalog);
    assert_eq!(queries.laptops_with_processor_from("Zeta").unwrap(), vec![a1, z1]);
    assert!(queries.laptops_with_processor_from("Acme").unwrap().is_empty());
    assert!(queries.laptops_with_processor_from("Nobody").unwrap().is_empty());
}

#[test]
fn storage_and_price_filters() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, slow) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, fast) = catalog.add_processor(Processor::new(3.0), acme).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, big) = catalog
        .add_laptop(Laptop::new("Big", 1200, true, 1024), acme, fast, ram)
        .unwrap();
    let (catalog, mid) = catalog
        .add_laptop(Laptop::new("Mid", 800, true, 512), acme, fast, ram)
        .unwrap();
    let (catalog, dim) = catalog
        .add_laptop(Laptop::new("Dim", 600, false, 2048), acme, slow, ram)
        .unwrap();

    let queries = CatalogQueries::new(&catalog);
    assert_eq!(queries.hd_laptops_with_storage(512).unwrap(), vec![mid, big]);
    assert_eq!(
        queries.laptops_by_speed_and_price(2.5, 800, 1200).unwrap(),
        vec![mid, big]
    );
    assert_eq!(
        queries.laptops_by_speed_and_price(1.0, 0, 10_000).unwrap(),
        vec![dim, mid, big]
    );
    assert!(queries.laptops_by_speed_and_price(1.0, 1200, 800).unwrap().is_empty());
}

#[test]
fn empty_catalog_answers_everything_with_nothing() {
    let catalog = Catalog::new();
    let queries = CatalogQueries::new(&catalog);
    assert!(queries.companies_by_speed_and_memory(1.0, 1).unwrap().is_empty());
    assert!(queries.companies_with_mixed_processors().unwrap().is_empty());
    assert!(queries.hd_laptops_with_storage(0).unwrap().is_empty());
    assert!(queries.laptops_by_speed_and_price(0.0, 0, 1).unwrap().is_empty());
    assert!(queries.laptops_with_processor_from("Acme").unwrap().is_empty());
    assert!(queries.laptops_with_in_house_processor().unwrap().is_empty());
    assert!(queries.laptops_sharing_processor().unwrap().is_empty());
    assert!(queries.laptops_grouped_by_company().unwrap().is_empty());
}

#[test]
fn lookups_report_not_found() {
    let catalog = Catalog::new();
    let queries = CatalogQueries::new(&catalog);
    let err = queries.find_laptop("X200").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound { .. }));
    assert!(queries.find_company("Acme").is_err());
}

#[test]
fn result_bound_applies_to_catalog_queries() {
    let catalog = Catalog::new();
    let (catalog, acme) = catalog.add_company(Company::new("Acme")).unwrap();
    let (catalog, p) = catalog.add_processor(Processor::new(2.0), acme).unwrap();
    let (catalog, ram) = catalog.add_memory(Memory::new(8)).unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("L1", 500, true, 256), acme, p, ram)
        .unwrap();
    let (catalog, _) = catalog
        .add_laptop(Laptop::new("L2", 500, true, 256), acme, p, ram)
        .unwrap();

    let bounded = CatalogQueries::with_config(&catalog, QueryConfig::bounded(1));
    let err = bounded.laptops_sharing_processor().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));

    let limited = CatalogQueries::with_config(&catalog, QueryConfig::default().with_limit(1));
    assert_eq!(limited.laptops_sharing_processor().unwrap().len(), 1);
}
