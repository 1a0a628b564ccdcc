//! Async client core for the Luno users, sessions, events and analytics API.
//!
//! # Overview
//! Every client method is a one-to-one mapping onto a REST endpoint: it
//! shapes a path, a query map and an optional JSON body, hands them to the
//! shared `Connection`, and decodes the typed response. There is no caching,
//! retrying or auto-pagination in this crate.
//!
//! # Design
//! - `LunoClient` composes one client per resource family around a single
//!   `Connection`.
//! - `Connection` builds `HttpRequest` values and parses `HttpResponse`
//!   values; a `Transport` performs the I/O in between (host-does-IO).
//!   `ReqwestTransport` is the default, `RecordingTransport` is for tests.
//! - Entities are generic over the caller's custom data (`User<T>`,
//!   `Session<T, TUser>`, ...).
//! - Methods addressing an existing resource take `impl Key<R>`, so an id,
//!   an entity, or an `Option` of either can be passed. A missing entity
//!   fails with `ApiError::InvalidArgument` before any request is sent.
//!
//! ```rust,no_run
//! use luno_core::{CreateOptions, CreateUser, LunoClient, LunoConfig, User};
//! use serde_json::Value;
//!
//! # async fn example() -> luno_core::Result<()> {
//! let client = LunoClient::new(LunoConfig::new("api-key", "secret-key"))?;
//! let input: CreateUser<Value> = CreateUser {
//!     email: Some("alice@example.com".to_string()),
//!     ..CreateUser::default()
//! };
//! let user: User<Value> = client.users().create(&input, &CreateOptions::default()).await?;
//! client.users().deactivate(&user).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clients;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod key;
pub mod params;
pub mod transport;
pub mod types;

pub use client::LunoClient;
pub use clients::{AnalyticsClient, ApiAuthenticationClient, EventsClient, SessionsClient, UsersClient};
pub use config::LunoConfig;
pub use connection::Connection;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Query};
pub use key::Key;
pub use params::{AnalyticsRange, CreateOptions, ListOptions, UpdateOptions, DEFAULT_LIMIT};
pub use transport::{RecordingTransport, ReqwestTransport, Transport};
pub use types::*;
