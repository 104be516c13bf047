//! Client core for the todo service: API client, transport and state store.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). A `Transport`
//! executes the round-trip, and `TodoStore` folds every result into a
//! `TodoState` through a pure reducer.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoState::apply` is the only place state changes. `TodoStore` issues a
//!   `RequestToken` per operation so late responses cannot overwrite newer
//!   data.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod http;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use filters::{FiltersPatch, SortField, SortOrder, TodoFilters};
pub use forms::{parse_date, FilterForm, TodoForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Action, Operation, RequestToken, TodoState};
pub use store::TodoStore;
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, DeleteResponse, PageMeta, Todo, TodoResponse, TodosResponse, UpdateTodo};
