//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::filters::TodoFilters;
use crate::http::{encode_component, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateTodo, DeleteResponse, ErrorResponse, Todo, TodoResponse, TodosResponse, UpdateTodo,
};

/// Synchronous, stateless client for the todo API.
///
/// `base_url` points at the API root (for example `http://localhost:3000/api`);
/// every path is resolved under its `/todos` collection.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self, filters: &TodoFilters) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos/get", self.base_url),
            query: filters.to_query(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_todo(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_path(id),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos/", self.base_url),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update_todo(&self, id: &str, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_path(id),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_path(id),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<TodosResponse, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        parse_body::<TodoResponse>(&response).map(|envelope| envelope.data)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        parse_body::<TodoResponse>(&response).map(|envelope| envelope.data)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        parse_body::<TodoResponse>(&response).map(|envelope| envelope.data)
    }

    /// Any 2xx counts as deleted. The body's `message` is used when present.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeleteResponse, ApiError> {
        check_status(&response)?;
        Ok(parse_body(&response).unwrap_or_else(|_| DeleteResponse {
            message: DELETED_MESSAGE.to_string(),
        }))
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/todos/{}", self.base_url, encode_component(id))
    }
}

const DELETED_MESSAGE: &str = "Todo deleted successfully";

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant, carrying
/// the server's `message` when the body has one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorResponse>(&response.body)
        .ok()
        .and_then(|body| body.message);
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Server {
        status: response.status,
        message,
    })
}
