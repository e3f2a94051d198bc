//! Refresh-token exchange tests against a mock accounts service

use super::init_test_env;
use mockito::Matcher;
use request_composer::auth::{
    AuthError, CredentialCache, CredentialSettings, RefreshTokenExchange, TokenRenewer,
};
use request_composer::config::ComposerConfig;
use std::collections::HashMap;
use std::time::Duration;

fn settings(base_uri: &str) -> CredentialSettings {
    CredentialSettings {
        accounts_base_uri: base_uri.to_string(),
        client_id: "client-123".to_string(),
        client_secret: "s3cr3t".to_string(),
        refresh_token: "AQD-refresh".to_string(),
        grant_type: "refresh_token".to_string(),
    }
}

fn form_matcher() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("client_id".into(), "client-123".into()),
        Matcher::UrlEncoded("client_secret".into(), "s3cr3t".into()),
        Matcher::UrlEncoded("refresh_token".into(), "AQD-refresh".into()),
        Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
    ])
}

#[test]
fn test_exchange_posts_form_and_reads_grant() {
    init_test_env();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(form_matcher())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "BQD-new", "token_type": "Bearer", "expires_in": 3600, "scope": "playlist-modify-private"}"#)
        .create();

    let exchange =
        RefreshTokenExchange::new(settings(&server.url()), "api/token", Duration::from_secs(5))
            .unwrap();
    let grant = exchange.renew().unwrap();

    assert_eq!(grant.access_token, "BQD-new");
    assert_eq!(grant.token_type, "Bearer");
    assert_eq!(grant.expires_in, 3600);
    mock.assert();
}

#[test]
fn test_exchange_non_200_is_renewal_failure() {
    init_test_env();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create();

    let exchange =
        RefreshTokenExchange::new(settings(&server.url()), "api/token", Duration::from_secs(5))
            .unwrap();

    match exchange.renew() {
        Err(AuthError::RenewalFailed(reason)) => assert!(reason.contains("400")),
        other => panic!("Expected RenewalFailed, got {:?}", other),
    }
    mock.assert();
}

#[test]
fn test_exchange_malformed_body_is_renewal_failure() {
    init_test_env();

    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_body(r#"{"token_type": "Bearer"}"#)
        .create();

    let exchange =
        RefreshTokenExchange::new(settings(&server.url()), "api/token", Duration::from_secs(5))
            .unwrap();
    assert!(matches!(exchange.renew(), Err(AuthError::RenewalFailed(_))));
}

#[test]
fn test_cache_renews_through_exchange_once() {
    init_test_env();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/oauth/token")
        .match_body(form_matcher())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "BQD-cached", "token_type": "Bearer", "expires_in": 3600}"#)
        .expect(1)
        .create();

    let mut properties = HashMap::new();
    properties.insert("accounts.base.uri".to_string(), server.url());
    properties.insert("client_id".to_string(), "client-123".to_string());
    properties.insert("client_secret".to_string(), "s3cr3t".to_string());
    properties.insert("refresh_token".to_string(), "AQD-refresh".to_string());
    properties.insert("grant_type".to_string(), "refresh_token".to_string());

    let config = ComposerConfig {
        token_path: "oauth/token".to_string(),
        properties,
        ..Default::default()
    };

    let exchange = RefreshTokenExchange::from_config(&config).unwrap();
    let cache = CredentialCache::from_config(&config, exchange);

    assert_eq!(cache.get_token().unwrap(), "Bearer BQD-cached");
    assert_eq!(cache.get_token().unwrap(), "Bearer BQD-cached");
    mock.assert();
}
