use std::sync::Arc;

use chrono::Utc;
use garden_cache::{CacheCoordinator, CacheHitTier, L2SqliteCache};
use garden_core::config::CacheConfig;
use garden_core::{Action, Analysis, Fingerprint};

fn analysis() -> Analysis {
    Analysis {
        relevance_1_month: 0.9,
        relevance_1_year: 0.7,
        attachment: 0.8,
        action: Action::Keep,
        confidence: 0.85,
        explanation: "Recent family photo with strong attachment".into(),
        model_derived: true,
        analyzed_at: Utc::now(),
        ..Default::default()
    }
}

#[test]
fn entries_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let config = CacheConfig::default();
    let fp = Fingerprint::from_hex("aa55");
    let stored = analysis();

    {
        let coord = CacheCoordinator::open(&config, &path).unwrap();
        coord.put(&fp, &stored);
    }

    let coord = CacheCoordinator::open(&config, &path).unwrap();
    let (got, tier) = coord.get(&fp);
    assert_eq!(tier, CacheHitTier::L2);
    assert_eq!(got.unwrap(), stored);
}

#[test]
fn l2_disabled_keeps_nothing_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let config = CacheConfig {
        l2_enabled: false,
        ..Default::default()
    };
    let coord = CacheCoordinator::open(&config, &path).unwrap();
    coord.put(&Fingerprint::from_hex("bb"), &analysis());
    assert!(coord.l2().is_none());
    assert!(!path.exists());
}

#[test]
fn corrupted_durable_entry_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let config = CacheConfig::default();
    let fp = Fingerprint::from_hex("cc");
    {
        let coord = CacheCoordinator::open(&config, &path).unwrap();
        coord.put(&fp, &analysis());
    }
    {
        let raw = rusqlite::Connection::open(&path).unwrap();
        raw.execute(
            "UPDATE analysis_cache SET payload = 'garbage' WHERE fingerprint = 'cc'",
            [],
        )
        .unwrap();
    }

    let coord = CacheCoordinator::open(&config, &path).unwrap();
    let (got, tier) = coord.get(&fp);
    assert!(got.is_none());
    assert_eq!(tier, CacheHitTier::Miss);
    assert_eq!(coord.l2().unwrap().len().unwrap(), 0);
}

#[test]
fn concurrent_readers_see_the_same_entry() {
    let config = CacheConfig::default();
    let coord = Arc::new(CacheCoordinator::with_l2(
        &config,
        L2SqliteCache::open_in_memory().unwrap(),
    ));
    let fp = Fingerprint::from_hex("dd");
    coord.put(&fp, &analysis());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let coord = Arc::clone(&coord);
            let fp = fp.clone();
            std::thread::spawn(move || coord.get(&fp).0.map(|a| a.action))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(Action::Keep));
    }
}

#[test]
fn oversized_ttl_is_clamped_instead_of_panicking() {
    let config = CacheConfig {
        ttl_secs: u64::MAX,
        ..Default::default()
    };
    let cache = CacheCoordinator::in_memory(&config);
    assert_eq!(
        cache.ttl(),
        chrono::Duration::seconds(garden_core::config::defaults::MAX_CACHE_TTL_SECS as i64)
    );

    let fp = Fingerprint::from_hex("ff00");
    cache.put(&fp, &analysis());
    assert!(cache.get(&fp).0.is_some());
}
