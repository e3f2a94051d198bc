//! Data-driven request composition for API tests.
//!
//! Test steps describe requests and assertions as small string tables.
//! This crate turns those tables into JSON bodies, headers and endpoints,
//! keeps values captured from earlier responses, and hands out a cached
//! bearer token that is renewed before it expires.
//!
//! # Architecture
//!
//! - **models**: table and typed value structures
//! - **coercion**: string-to-value conversion by inference or by existing type
//! - **path**: dotted/indexed path expressions over JSON documents
//! - **body**: in-place mutation of JSON bodies from override tables
//! - **variables**: typed variable store and `{name}` placeholder resolution
//! - **auth**: expiry-aware credential cache and refresh-token exchange
//! - **config**: settings, properties and `{{key}}` resolution
//! - **compose**: endpoint, header and body assembly
//! - **verify**: field assertions on response bodies
//!
//! # Example
//!
//! ```
//! use request_composer::body::apply_table;
//! use request_composer::models::{DataTable, VariableType};
//! use request_composer::variables::VariableStore;
//! use serde_json::json;
//!
//! let mut body = json!({"name": "New Playlist", "public": false});
//! let table = DataTable::from_rows(&[
//!     &["name", "public", "tracks[1].position"],
//!     &["Road trip", "true", "2"],
//! ]);
//! apply_table(&mut body, &table).unwrap();
//! assert_eq!(body["public"], json!(true));
//! assert_eq!(body["tracks"][1]["position"], json!(2));
//!
//! let mut store = VariableStore::new();
//! store.store("playlistId", VariableType::String, "3cEYpjA9").unwrap();
//! assert_eq!(store.resolve("playlists/{playlistId}/tracks").unwrap(), "playlists/3cEYpjA9/tracks");
//! ```

pub mod auth;
pub mod body;
pub mod coercion;
pub mod compose;
pub mod config;
pub mod models;
pub mod path;
pub mod variables;
pub mod verify;

pub use auth::{AuthError, CredentialCache, TokenGrant, TokenRenewer};
pub use body::BodyError;
pub use config::{ComposerConfig, ConfigError};
pub use models::{DataTable, TypedValue, VariableType};
pub use path::PathExpression;
pub use variables::{VarError, VariableStore};
