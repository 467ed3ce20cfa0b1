mod fixtures;

use fixtures::{Banner, NamedBuilder, key, register_banner_updaters, versioned_banner_builder};
use sponge_data::{DataBuilder, DataManager, DataRegistration};
use sponge_domain::DataContainer;
use std::sync::Arc;
use std::thread;

const READERS: usize = 8;
const ROUNDS: usize = 250;

fn populated_manager() -> DataManager {
    let mut manager = DataManager::new();
    register_banner_updaters(&mut manager);
    manager.register_builder(key("banner"), versioned_banner_builder());
    let registration =
        manager.register_data_registration(DataRegistration::new(key("banner"), [key("data/title")])).unwrap();
    manager.register_legacy_id("SpongeBanner", registration).unwrap();
    manager.register_registry_type(key("banner"), key("registry/block_entity_type"));
    manager.declare_supertype(key("wall_banner"), key("banner"));
    manager
}

#[test]
fn concurrent_readers_observe_consistent_state() {
    let manager = Arc::new(populated_manager());
    let old = DataContainer::new().with("ContentVersion", 3).with("Name", "Gate");

    thread::scope(|scope| {
        for reader in 0..READERS {
            let manager = Arc::clone(&manager);
            let old = &old;
            thread::Builder::new()
                .name(format!("reader-{reader}"))
                .spawn_scoped(scope, move || {
                    for _ in 0..ROUNDS {
                        let banner = manager.deserialize::<Banner>(&key("banner"), old).unwrap();
                        assert_eq!(banner, Some(Banner { title: "Gate".to_owned(), layers: 0 }));

                        let chain = manager.update_chain(&key("banner"), 3, 1).unwrap().unwrap();
                        assert_eq!(chain.path(), [(3, 2), (2, 1)]);

                        let legacy = manager.registration_for_legacy_id("SpongeBanner").unwrap();
                        assert_eq!(legacy.key(), &key("banner"));

                        assert_eq!(
                            manager.find_registry_type(&key("wall_banner")),
                            Some(key("registry/block_entity_type"))
                        );
                    }
                })
                .unwrap();
        }
    });

    assert_eq!(old.content_version(), Some(3));
}

#[test]
fn late_immutable_registration_races_with_lookups() {
    let manager = populated_manager();
    let keys: Vec<_> = (0..32).map(|i| key(&format!("frozen_{i}"))).collect();

    thread::scope(|scope| {
        scope.spawn(|| {
            for k in &keys {
                manager.register_immutable_builder(k.clone(), NamedBuilder("frozen")).unwrap();
            }
        });
        for _ in 0..READERS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    for k in &keys {
                        if let Some(builder) = manager.get_builder::<Banner>(k).unwrap() {
                            let banner = builder.build(&manager, &DataContainer::new()).unwrap();
                            assert_eq!(banner.title, "frozen");
                        }
                    }
                }
            });
        }
    });

    for k in &keys {
        assert!(manager.get_immutable_builder::<Banner>(k).unwrap().is_some());
    }
}
