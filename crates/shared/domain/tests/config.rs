use serde_json::json;
use sponge_domain::config::{DataConfig, LoggingConfig, SpongeConfig};

#[test]
fn config_defaults_are_sane() {
    let data = DataConfig::default();
    assert_eq!(data.immutable_shards, 4);
    assert!(data.advise_unversioned_builders);
    assert!(data.log_resolution_failures);

    let logging = LoggingConfig::default();
    assert_eq!(logging.name, "sponge");
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());
}

#[test]
fn sponge_config_deserializes() {
    let raw = json!({
        "data": { "immutable_shards": 8, "advise_unversioned_builders": false },
        "logging": { "level": "debug", "directory": "/tmp/logs" }
    });

    let cfg: SpongeConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.data.immutable_shards, 8);
    assert!(!cfg.data.advise_unversioned_builders);
    assert!(cfg.data.log_resolution_failures);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.name, "sponge");
    assert_eq!(cfg.logging.directory, Some(std::path::PathBuf::from("/tmp/logs")));
}

#[test]
fn sponge_config_is_copy_on_write() {
    let base = SpongeConfig::default();
    let mut tuned = base.clone();
    tuned.data.immutable_shards = 16;

    assert_eq!(base.data.immutable_shards, 4);
    assert_eq!(tuned.data.immutable_shards, 16);
}
