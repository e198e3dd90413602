//! Lifecycle enforcement tests.

use super::*;
use crate::store::{MemoryStore, RedbStore};
use crate::test_support::FaultyStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use tempfile::TempDir;

const T0: i64 = 1_700_000_000_000;

fn setup_service() -> (PasteService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (PasteService::new(store.clone()), store)
}

fn stored_record(store: &dyn RecordStore, id: &str) -> Option<PasteRecord> {
    store
        .get(&paste_key(id))
        .expect("store get")
        .map(|bytes| decode(&bytes).expect("decode"))
}

#[test]
fn create_then_retrieve_returns_content_unmodified() {
    let (service, _store) = setup_service();
    let contents = [
        "hello",
        "  leading and trailing  \n",
        "<script>alert('x')</script> & \"quotes\"",
        "unicode: héllo wörld 🚀 \u{0000} nul",
    ];

    for content in contents {
        let id = service
            .create_at(NewPaste::unlimited(content), T0)
            .expect("create");
        let view = service.retrieve(&id, T0).expect("retrieve").expect("present");
        assert_eq!(view.content, content);
    }
}

#[test]
fn create_persists_fresh_record() {
    let (service, store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("body").with_ttl_seconds(60).with_max_views(3), T0)
        .expect("create");

    assert_eq!(id.len(), crate::constants::PASTE_ID_LEN);
    let record = stored_record(&*store, &id).expect("stored");
    assert_eq!(record.id, id);
    assert_eq!(record.created_at_ms, T0);
    assert_eq!(record.ttl_seconds, Some(60));
    assert_eq!(record.max_views, Some(3));
    assert_eq!(record.current_views, 0);
}

#[test]
fn max_views_scenario_serves_exactly_n_times() {
    let (service, store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("hello").with_max_views(2), T0)
        .expect("create");

    let first = service.retrieve(&id, T0).expect("retrieve").expect("first view");
    assert_eq!(first.content, "hello");
    assert_eq!(first.remaining_views, Some(1));
    assert_eq!(first.expires_at, None);

    let second = service.retrieve(&id, T0).expect("retrieve").expect("second view");
    assert_eq!(second.remaining_views, Some(0));

    assert!(service.retrieve(&id, T0).expect("retrieve").is_none());
    assert!(
        stored_record(&*store, &id).is_none(),
        "exhausted paste must be deleted by the retrieval that finds it"
    );
}

#[test]
fn remaining_views_count_down_to_zero() {
    let (service, _store) = setup_service();
    let limit = 5;
    let id = service
        .create_at(NewPaste::unlimited("count").with_max_views(limit), T0)
        .expect("create");

    for k in 1..=limit {
        let view = service.retrieve(&id, T0).expect("retrieve").expect("within limit");
        assert_eq!(view.remaining_views, Some(limit - k), "after view {}", k);
    }
    assert!(service.retrieve(&id, T0).expect("retrieve").is_none());
}

#[test]
fn ttl_boundary_is_last_millisecond_inclusive() {
    let (service, store) = setup_service();
    let ttl = 30;
    let id = service
        .create_at(NewPaste::unlimited("ttl").with_ttl_seconds(ttl), T0)
        .expect("create");
    let expires_at = T0 + (ttl as i64) * 1000;

    let view = service
        .retrieve(&id, expires_at - 1)
        .expect("retrieve")
        .expect("still alive one ms before expiry");
    assert_eq!(
        view.expires_at.map(|at| at.timestamp_millis()),
        Some(expires_at)
    );
    assert_eq!(view.remaining_views, None);

    assert!(service.retrieve(&id, expires_at).expect("retrieve").is_none());
    assert!(stored_record(&*store, &id).is_none());
}

#[test]
fn retrieval_long_after_expiry_is_not_found() {
    let (service, _store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("old").with_ttl_seconds(1), T0)
        .expect("create");
    assert!(service
        .retrieve(&id, T0 + 86_400_000)
        .expect("retrieve")
        .is_none());
}

#[test]
fn expired_record_stays_in_store_until_accessed() {
    let (service, store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("lazy").with_ttl_seconds(1), T0)
        .expect("create");

    // No background sweep: the record outlives its budget until read.
    assert!(stored_record(&*store, &id).is_some());
    assert!(service.retrieve(&id, T0 + 10_000).expect("retrieve").is_none());
    assert!(stored_record(&*store, &id).is_none());
}

#[test]
fn unlimited_paste_never_auto_deletes() {
    let (service, store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("forever"), T0)
        .expect("create");

    for offset in 0..200 {
        let view = service
            .retrieve(&id, T0 + offset * 1_000_000_000)
            .expect("retrieve")
            .expect("unlimited paste stays servable");
        assert_eq!(view.remaining_views, None);
        assert_eq!(view.expires_at, None);
    }
    let record = stored_record(&*store, &id).expect("still stored");
    assert_eq!(record.current_views, 200);
}

#[test]
fn both_limits_apply_independently() {
    let (service, _store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("both").with_ttl_seconds(10).with_max_views(5), T0)
        .expect("create");
    assert!(service.retrieve(&id, T0 + 1).expect("retrieve").is_some());
    assert!(
        service.retrieve(&id, T0 + 10_000).expect("retrieve").is_none(),
        "time limit wins even with views left"
    );

    let id = service
        .create_at(NewPaste::unlimited("both").with_ttl_seconds(10).with_max_views(1), T0)
        .expect("create");
    assert!(service.retrieve(&id, T0).expect("retrieve").is_some());
    assert!(
        service.retrieve(&id, T0 + 1).expect("retrieve").is_none(),
        "view limit wins even with time left"
    );
}

#[test]
fn missing_id_is_not_found_not_error() {
    let (service, _store) = setup_service();
    for id in ["", "does-not-exist", "abcdefghijkl", "../../etc/passwd"] {
        assert!(service.retrieve(id, T0).expect("retrieve").is_none());
        assert!(service.retrieve_content(id, T0).expect("retrieve").is_none());
    }
}

#[test]
fn content_only_retrieval_counts_as_a_view() {
    let (service, _store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("shared").with_max_views(2), T0)
        .expect("create");

    assert_eq!(
        service.retrieve_content(&id, T0).expect("retrieve").as_deref(),
        Some("shared")
    );
    let view = service.retrieve(&id, T0).expect("retrieve").expect("second view");
    assert_eq!(view.remaining_views, Some(0));
    assert!(service.retrieve_content(&id, T0).expect("retrieve").is_none());
}

#[test]
fn content_only_retrieval_honors_expiry() {
    let (service, _store) = setup_service();
    let id = service
        .create_at(NewPaste::unlimited("ttl").with_ttl_seconds(2), T0)
        .expect("create");
    assert!(service.retrieve_content(&id, T0 + 1_999).expect("retrieve").is_some());
    assert!(service.retrieve_content(&id, T0 + 2_000).expect("retrieve").is_none());
}

#[test]
fn exhausted_record_left_in_store_is_evicted_on_read() {
    let (service, store) = setup_service();
    let mut record = PasteRecord::new(
        "stalestale00".to_string(),
        NewPaste::unlimited("stale").with_max_views(1),
        T0,
    );
    record.current_views = 1;
    store
        .set(&paste_key(&record.id), &encode(&record).expect("encode"))
        .expect("seed");

    assert!(service.retrieve(&record.id, T0).expect("retrieve").is_none());
    assert!(stored_record(&*store, &record.id).is_none());
}

#[test]
fn malformed_stored_value_is_an_internal_error() {
    let (service, store) = setup_service();
    store
        .set(&paste_key("brokenbroken"), b"\x01not-bincode")
        .expect("seed");

    match service.retrieve("brokenbroken", T0) {
        Err(AppError::Serialization(_)) => {}
        other => panic!("expected serialization error, got {:?}", other),
    }
}

#[test]
fn store_failures_propagate_without_retry() {
    let store = Arc::new(FaultyStore::default());
    let service = PasteService::new(store.clone());
    let id = service
        .create_at(NewPaste::unlimited("body").with_max_views(3), T0)
        .expect("create");

    store.fail_reads(true);
    assert!(matches!(
        service.retrieve(&id, T0),
        Err(AppError::StorageMessage(_))
    ));
    store.fail_reads(false);

    store.fail_writes(true);
    assert!(matches!(
        service.retrieve(&id, T0),
        Err(AppError::StorageMessage(_))
    ));
    assert!(matches!(
        service.create_at(NewPaste::unlimited("x"), T0),
        Err(AppError::StorageMessage(_))
    ));
    store.fail_writes(false);

    // The failed write did not count a view.
    let view = service.retrieve(&id, T0).expect("retrieve").expect("present");
    assert_eq!(view.remaining_views, Some(2));
}

#[test]
fn redb_backed_service_enforces_view_limit() {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let store = Arc::new(RedbStore::open(db_path.to_str().expect("db path")).expect("open"));
    let service = PasteService::new(store.clone());

    let id = service
        .create_at(NewPaste::unlimited("durable").with_max_views(1), T0)
        .expect("create");
    let view = service.retrieve(&id, T0).expect("retrieve").expect("first view");
    assert_eq!(view.content, "durable");
    assert_eq!(view.remaining_views, Some(0));
    assert!(service.retrieve(&id, T0).expect("retrieve").is_none());
    assert!(store.get(&paste_key(&id)).expect("get").is_none());
}

#[test]
fn strict_mode_serves_single_view_paste_once_under_contention() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
    let service = Arc::new(PasteService::with_strict_view_limits(store));
    let id = service
        .create_at(NewPaste::unlimited("once").with_max_views(1), T0)
        .expect("create");

    let workers = 16;
    let served = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let service = service.clone();
            let served = served.clone();
            let barrier = barrier.clone();
            let id = id.clone();
            thread::spawn(move || {
                barrier.wait();
                if service.retrieve(&id, T0).expect("retrieve").is_some() {
                    served.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker join");
    }

    assert_eq!(served.load(Ordering::SeqCst), 1);
}

#[test]
fn from_config_selects_strict_mode() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
    let mut config = Config {
        db_path: String::from("/tmp/pastelite-unused"),
        port: 0,
        max_paste_size: 1024,
        base_url: None,
        store: crate::config::StoreKind::Memory,
        test_mode: false,
        strict_view_limits: true,
    };
    assert!(PasteService::from_config(store.clone(), &config).view_locks.is_some());
    config.strict_view_limits = false;
    assert!(PasteService::from_config(store, &config).view_locks.is_none());
}
