//! HTTP daemon for the MultiVend order service.
//!
//! `main.rs` is intentionally thin: it wires config, the Postgres store, the
//! catalog client, and the payment simulator into [`state::AppState`], then
//! serves the router. All handlers live in `routes.rs`, request/response
//! types in `api_types.rs`, and bearer-token verification in `auth.rs`.

pub mod api_types;
pub mod auth;
pub mod routes;
pub mod state;
