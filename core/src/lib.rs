//! Client core for the water quality records service.
//!
//! # Overview
//! Lets a UI list, create, edit and soft-delete water quality records held
//! by a REST backend. The interesting part is [`RecordTable`], which keeps
//! an in-memory table of rows in step with the backend as the user adds,
//! edits, saves, cancels and deletes rows.
//!
//! # Design
//! - `RecordsClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `Transport` executes requests; `UreqTransport` is the real one.
//! - `HttpRecordsApi` glues the two together and reports every failure to
//!   an `ErrorSink` before handing the error back to the caller.
//! - `RecordTable` only sees the `RecordsApi` trait, so tests drive it with
//!   an in-memory fake.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod sink;
pub mod transport;
pub mod types;

pub use api::{HttpRecordsApi, RecordsApi};
pub use client::RecordsClient;
pub use config::ClientConfig;
pub use controller::{RecordTable, TableError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use sink::{ErrorSink, Notification, Severity, TracingSink};
pub use transport::{Transport, UreqTransport};
pub use types::{Record, RecordFields, RecordId, Row, UpdateRecord};
