//! Integration tests for the shared catalog

use std::sync::Arc;
use std::thread;

use hwcatalog_storage::{Catalog, Company, Laptop, Memory, Processor, SharedCatalog};

#[test]
fn readers_never_see_half_linked_laptops() {
    let shared = Arc::new(SharedCatalog::default());
    let (acme, chip, ram) = shared
        .update(|catalog| {
            let (catalog, acme) = catalog.add_company(Company::new("Acme"))?;
            let (catalog, chip) = catalog.add_processor(Processor::new(2.0), acme)?;
            let (catalog, ram) = catalog.add_memory(Memory::new(8))?;
            Ok((catalog, (acme, chip, ram)))
        })
        .unwrap();

    let writer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for i in 0..100 {
                shared
                    .update(|catalog| {
                        catalog.add_laptop(
                            Laptop::new(format!("Model {i}"), 1000, true, 256),
                            acme,
                            chip,
                            ram,
                        )
                    })
                    .unwrap();
            }
        })
    };

    for _ in 0..100 {
        let snapshot = shared.snapshot();
        let laptops = snapshot.all_laptops().count();
        assert_eq!(snapshot.company(acme).unwrap().laptop_count(), laptops);
        assert_eq!(snapshot.processor(chip).unwrap().install_count(), laptops);
        snapshot.verify_integrity().unwrap();
    }

    writer.join().unwrap();
    assert_eq!(shared.snapshot().all_laptops().count(), 100);
}

#[test]
fn replace_swaps_the_snapshot() {
    let shared = SharedCatalog::default();
    let (catalog, _) = Catalog::new().add_company(Company::new("Acme")).unwrap();
    shared.replace(catalog);
    assert!(shared.snapshot().find_company("Acme").is_ok());
}
