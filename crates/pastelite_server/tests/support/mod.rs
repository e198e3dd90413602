//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use pastelite_core::{Config, MemoryStore, RecordStore, RedbStore, StoreKind};
use pastelite_server::{create_app, AppState};
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) const TEST_BASE_URL: &str = "paste.test";

pub(crate) fn test_config() -> Config {
    Config {
        db_path: String::from("/tmp/pastelite-test-unused"),
        port: 0,
        max_paste_size: 10_000_000,
        base_url: Some(TEST_BASE_URL.to_string()),
        store: StoreKind::Memory,
        test_mode: true,
        strict_view_limits: false,
    }
}

pub(crate) fn test_server_with_store(config: Config, store: Arc<dyn RecordStore>) -> TestServer {
    let state = AppState::new(config, store);
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    test_server_with_store(config, Arc::new(MemoryStore::default()))
}

pub(crate) fn setup_test_server() -> TestServer {
    test_server_for_config(test_config())
}

pub(crate) fn setup_redb_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let mut config = test_config();
    config.db_path = db_path.to_str().expect("db path").to_string();
    config.store = StoreKind::Redb;
    let store = Arc::new(RedbStore::open(&config.db_path).expect("open redb"));
    (test_server_with_store(config, store), temp_dir)
}
