//! Request chaining workflow tests
//!
//! A response is captured into the variable store, its values flow into
//! the next endpoint and body, and the follow-up response is verified
//! against stored and literal expectations.

use super::{init_test_env, table};
use request_composer::auth::{CredentialCache, TokenGrant};
use request_composer::compose::{build_body, build_headers, parse_base_document, resolve_endpoint};
use request_composer::models::{TypedValue, VariableType};
use request_composer::variables::{parse_capture_rows, store_captures, VarError, VariableStore};
use request_composer::verify::{verify_fields, VerifyError};
use bigdecimal::BigDecimal;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;

fn properties() -> HashMap<String, String> {
    let mut props = HashMap::new();
    props.insert("user_id".to_string(), "smedjan".to_string());
    props.insert("content_type".to_string(), "application/json".to_string());
    props
}

/// Response of "create playlist"
fn create_playlist_response() -> serde_json::Value {
    json!({
        "id": "7d2D2S200NyUE5KYs80PwO",
        "name": "Road trip",
        "public": false,
        "tracks": {"total": 0},
        "owner": {"id": "smedjan", "followers": {"total": 12}},
        "popularity": 0.75
    })
}

#[test]
fn test_capture_then_resolve_endpoint() {
    init_test_env();

    let capture = table(&[
        &["variableName", "variableType", "responsePath"],
        &["playlistId", "String", "id"],
        &["followers", "Integer", "owner.followers.total"],
        &["isPublic", "Boolean", "public"],
        &["popularity", "Decimal", "popularity"],
    ]);
    let rows = parse_capture_rows(&capture).unwrap();

    let mut store = VariableStore::new();
    store_captures(&mut store, &rows, &create_playlist_response()).unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(
        store.get("popularity", VariableType::Decimal),
        Some(TypedValue::Decimal(BigDecimal::from_str("0.75").unwrap()))
    );

    let endpoint = resolve_endpoint(
        "users/{{user_id}}/playlists/{playlistId}/tracks?public={isPublic}&min={followers}",
        &properties(),
        &store,
    )
    .unwrap();
    assert_eq!(
        endpoint,
        "users/smedjan/playlists/7d2D2S200NyUE5KYs80PwO/tracks?public=false&min=12"
    );
}

#[test]
fn test_body_built_from_resolved_values() {
    init_test_env();

    let mut store = VariableStore::new();
    store.store("playlistId", VariableType::String, "7d2D2S200NyUE5KYs80PwO").unwrap();
    store.store("position", VariableType::Integer, "3").unwrap();

    let base = parse_base_document(r#"{"uris": [], "range_start": 0, "snapshot_id": null}"#).unwrap();
    let values = [
        store.resolve("{position}").unwrap(),
        store.resolve("spotify:playlist:{playlistId}").unwrap(),
        "1".to_string(),
    ];
    let overrides = table(&[
        &["range_start", "snapshot_id", "insert_before"],
        &[values[0].as_str(), values[1].as_str(), values[2].as_str()],
    ]);

    let body = build_body(base, &overrides).unwrap();
    assert_eq!(
        body,
        json!({
            "uris": [],
            "range_start": 3,
            "snapshot_id": "spotify:playlist:7d2D2S200NyUE5KYs80PwO",
            "insert_before": 1
        })
    );
}

#[test]
fn test_headers_use_cached_token() {
    init_test_env();

    let cache = CredentialCache::new(|| {
        Ok(TokenGrant {
            access_token: "BQDaf3".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        })
    });
    let headers_table = table(&[
        &["Authorization", "Content-Type"],
        &["{access_token}", "{{content_type}}"],
    ]);

    let headers = build_headers(&headers_table, &properties(), &cache).unwrap();
    let headers: HashMap<_, _> = headers.into_iter().collect();
    assert_eq!(headers["Authorization"], "Bearer BQDaf3");
    assert_eq!(headers["Content-Type"], "application/json");
}

#[test]
fn test_verify_against_captured_values() {
    init_test_env();

    let mut store = VariableStore::new();
    store.store("playlistId", VariableType::String, "7d2D2S200NyUE5KYs80PwO").unwrap();
    store.store("followers", VariableType::Integer, "12").unwrap();

    let assertions = table(&[
        &["id", "owner.followers.total", "tracks.total", "popularity", "description"],
        &["{playlistId}", "{followers}", "0", "0.750", "null"],
        &["String", "Integer", "Integer", "Decimal", "String"],
    ]);
    verify_fields(&assertions, &create_playlist_response(), &store).unwrap();

    let wrong = table(&[&["name"], &["Summer"], &["String"]]);
    match verify_fields(&wrong, &create_playlist_response(), &store) {
        Err(VerifyError::FieldMismatch { path, actual, .. }) => {
            assert_eq!(path, "name");
            assert_eq!(actual, "\"Road trip\"");
        }
        other => panic!("Expected FieldMismatch, got {:?}", other),
    }
}

#[test]
fn test_unknown_placeholder_aborts_whole_endpoint() {
    init_test_env();

    let mut store = VariableStore::new();
    store.store("playlistId", VariableType::String, "abc").unwrap();

    let result = store.resolve("playlists/{playlistId}/tracks/{trackId}");
    assert_eq!(result, Err(VarError::UnresolvedPlaceholder("trackId".to_string())));
}

#[test]
fn test_scenarios_do_not_share_stores() {
    init_test_env();

    let mut first = VariableStore::new();
    first.store("playlistId", VariableType::String, "abc").unwrap();

    let second = VariableStore::new();
    assert!(second.resolve("{playlistId}").is_err());
}
