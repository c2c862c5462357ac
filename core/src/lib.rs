//! Async API client core for the todo service.
//!
//! # Overview
//! Six operations (list, create, update, delete, search, filter) against a
//! REST backend, each one HTTP request with a bounded wait, plus the
//! front-end's single-route table.
//!
//! # Design
//! - `TodoClient` is stateless: it holds the base URL and a `Transport`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response); the transport sits in between, so the
//!   I/O boundary is explicit and swappable.
//! - Failures come back as `ApiError`, one of three kinds, and are logged
//!   through `tracing` before they are returned.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};
pub use router::{Route, Router, View};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
