use candor_domain::config::{
    CacheConfig, CompressionKind, CoreConfig, LoggingConfig, StorageConfig, VaultConfig,
    WriteStrategy,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let storage = StorageConfig::default();
    assert_eq!(storage.data_dir, std::path::PathBuf::from("./data"));
    assert_eq!(storage.compression, CompressionKind::None);
    assert!(storage.create);

    let cache = CacheConfig::default();
    assert!(cache.max_entries.is_none());
    assert_eq!(cache.write_strategy, WriteStrategy::CompareAndSwap);
    assert_eq!(cache.cas_retries, 3);

    assert_eq!(VaultConfig::default().iterations, 100_000);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.is_none());
    assert!(!logging.json);
}

#[test]
fn core_config_deserializes() {
    let raw = json!({
        "storage": { "data_dir": "/tmp/candor", "compression": "lz4" },
        "cache": { "max_entries": 50, "write_strategy": "last_write_wins" },
        "vault": { "iterations": 1000 }
    });

    let cfg: CoreConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from("/tmp/candor"));
    assert_eq!(cfg.storage.compression, CompressionKind::Lz4);
    assert!(cfg.storage.create);
    assert_eq!(cfg.cache.max_entries.map(std::num::NonZeroUsize::get), Some(50));
    assert_eq!(cfg.cache.write_strategy, WriteStrategy::LastWriteWins);
    assert_eq!(cfg.cache.cas_retries, 3);
    assert_eq!(cfg.vault.iterations, 1000);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn zero_max_entries_is_rejected() {
    let raw = json!({ "cache": { "max_entries": 0 } });
    assert!(serde_json::from_value::<CoreConfig>(raw).is_err());
}

#[test]
fn clone_on_write() {
    let base = CoreConfig::default();
    let mut tweaked = base.clone();
    tweaked.vault.iterations = 1;

    assert_eq!(base.vault.iterations, 100_000);
    assert_eq!(tweaked.vault.iterations, 1);
}
