//! Credential cache lifecycle and concurrency tests
//!
//! The cache is shared through an `Arc` the way a test runner shares it
//! between parallel scenarios.

use super::init_test_env;
use chrono::{Duration, TimeZone, Utc};
use request_composer::auth::{AuthError, CredentialCache, ManualClock, TokenGrant};
use request_composer::config::ComposerConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn issuing_cache(calls: Arc<AtomicUsize>, clock: &ManualClock) -> CredentialCache {
    CredentialCache::new(move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        thread::sleep(std::time::Duration::from_millis(20));
        Ok(TokenGrant {
            access_token: format!("issued-{}", n),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        })
    })
    .with_clock(clock.clone())
}

#[test]
fn test_state_machine_absent_valid_expired_valid() {
    init_test_env();

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = issuing_cache(Arc::clone(&calls), &clock);

    // Absent
    assert!(cache.is_invalid());
    assert!(cache.record().is_none());

    // Valid
    assert_eq!(cache.get_token().unwrap(), "Bearer issued-1");
    assert_eq!(cache.get_token().unwrap(), "Bearer issued-1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Expired once the safety margin is reached, not the issuer's expiry
    clock.advance(Duration::seconds(3300));
    assert!(cache.is_invalid());

    // Valid again
    assert_eq!(cache.get_token().unwrap(), "Bearer issued-2");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_parallel_scenarios_trigger_one_renewal() {
    init_test_env();

    const SCENARIOS: usize = 8;

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(issuing_cache(Arc::clone(&calls), &clock));

    // Warm up, then expire
    cache.get_token().unwrap();
    clock.advance(Duration::hours(1));

    let barrier = Arc::new(Barrier::new(SCENARIOS));
    let handles: Vec<_> = (0..SCENARIOS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_token().unwrap()
            })
        })
        .collect();

    let tokens: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(tokens.iter().all(|t| t == "Bearer issued-2"));
}

#[test]
fn test_config_margin_applies() {
    init_test_env();

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    let config = ComposerConfig {
        safety_margin_secs: 0,
        ..Default::default()
    };
    let cache = CredentialCache::from_config(&config, || {
        Ok(TokenGrant {
            access_token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 60,
        })
    })
    .with_clock(clock.clone());

    cache.get_token().unwrap();
    clock.advance(Duration::seconds(59));
    assert!(!cache.is_invalid());
    clock.advance(Duration::seconds(1));
    assert!(cache.is_invalid());
}

#[test]
fn test_renewal_failure_is_retried_by_next_caller() {
    init_test_env();

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let cache = CredentialCache::new(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(AuthError::RenewalFailed("Token endpoint answered 503".to_string()));
        }
        Ok(TokenGrant {
            access_token: "second-try".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        })
    });

    assert!(matches!(cache.get_token(), Err(AuthError::RenewalFailed(_))));
    assert!(cache.is_invalid());
    assert_eq!(cache.get_token().unwrap(), "Bearer second-try");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
