//! Integration tests for the rate limiter against real stores

use std::sync::Arc;
use std::time::Duration;

use bistro_forms::config::{RateLimitConfig, StorageConfig};
use bistro_forms::test_utils::valid_contact_submission;
use bistro_forms::{
    FormType, JsonFileStore, KeyValueStore, MemoryStore, MockClock, RateLimitDecision,
    RateLimiter, SubmissionService,
};

#[test]
fn test_cooldown_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form_state.json");
    let clock = MockClock::default();

    let first = SubmissionService::new(RateLimiter::new(JsonFileStore::new(&path), clock.clone()));
    assert!(first.submit(FormType::Contact, &valid_contact_submission()).is_accepted());
    drop(first);

    clock.advance(Duration::from_secs(10));
    let second = SubmissionService::new(RateLimiter::new(JsonFileStore::new(&path), clock.clone()));
    let outcome = second.submit(FormType::Contact, &valid_contact_submission());
    assert_eq!(outcome.wait_seconds(), Some(20));

    let written = std::fs::read_to_string(&path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert!(stored["lastSubmit_contact"].is_string());
}

#[test]
fn test_file_store_keeps_unrelated_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form_state.json");
    let store = JsonFileStore::new(&path);
    store.set("cookieConsent", "accepted").unwrap();

    let limiter = RateLimiter::new(JsonFileStore::new(&path), MockClock::default());
    limiter.record(FormType::Booking).unwrap();

    assert_eq!(store.get("cookieConsent").unwrap(), Some("accepted".to_string()));
    assert!(store.get("lastSubmit_booking").unwrap().is_some());
}

#[test]
fn test_shared_memory_store_between_limiters() {
    let store = Arc::new(MemoryStore::new());
    let clock = MockClock::default();
    let a = RateLimiter::new(Arc::clone(&store), clock.clone());
    let b = RateLimiter::new(Arc::clone(&store), clock.clone());

    a.record(FormType::Booking).unwrap();
    clock.advance(Duration::from_millis(29_001));

    assert_eq!(
        b.check(FormType::Booking).unwrap(),
        RateLimitDecision::Blocked { wait_seconds: 1 }
    );
    clock.advance(Duration::from_millis(999));
    assert!(b.check(FormType::Booking).unwrap().is_allowed());
}

#[test]
fn test_custom_cooldown_and_prefix() {
    let config = RateLimitConfig {
        cooldown_ms: 5_000,
        key_prefix: "bistro_".to_string(),
    };
    let store = MemoryStore::new();
    let clock = MockClock::default();
    let limiter = RateLimiter::with_config(store.clone(), clock.clone(), &config);

    limiter.record(FormType::Contact).unwrap();
    assert!(store.get("bistro_contact").unwrap().is_some());

    clock.advance(Duration::from_secs(2));
    assert_eq!(
        limiter.check(FormType::Contact).unwrap(),
        RateLimitDecision::Blocked { wait_seconds: 3 }
    );
}

#[test]
fn test_storage_config_opens_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        backend: "file".to_string(),
        path: dir.path().join("state.json").display().to_string(),
    };

    let store = config.open().unwrap();
    store.set("theme", "dark").unwrap();
    assert!(dir.path().join("state.json").exists());
}
