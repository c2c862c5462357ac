//! Stateless client for the todo API.
//!
//! # Design
//! `TodoClient` holds only the base URL and a `Transport`. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`; the async operation in
//! between hands the request to the transport exactly once. Both halves are
//! pure, so request shapes and response handling are testable without I/O.
//!
//! Successful responses are decoded from the body and returned as-is. Every
//! failure is logged once, in `send`, before it reaches the caller.

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Async, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient<T = HttpTransport> {
    base_url: String,
    transport: T,
}

impl TodoClient<HttpTransport> {
    /// Client backed by reqwest, honouring `config.timeout` per request.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(&config.base_url, transport))
    }
}

impl<T> TodoClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos".to_string())
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos".to_string(), input)
    }

    pub fn build_update_todo(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("/todos/{id}"), input)
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/todos/{id}"))
    }

    pub fn build_search_todos(&self, keyword: &str) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "/todos/search".to_string());
        request.query.push(("keyword".to_string(), keyword.to_string()));
        request
    }

    pub fn build_filter_todos(&self, completed: bool) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "/todos/filter".to_string());
        request.query.push(("completed".to_string(), completed.to_string()));
        request
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    /// The confirmation is whatever the backend sent: `null` for an empty
    /// body, the raw text if it isn't JSON.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        let response = check_status(response)?;
        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&response.body)
            .unwrap_or(serde_json::Value::String(response.body)))
    }

    pub fn parse_search_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_filter_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response)
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: serde::Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::request)?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

impl<T: Transport> TodoClient<T> {
    /// `GET /todos`
    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.build_list_todos();
        self.send(Ok(request), |r| self.parse_list_todos(r)).await
    }

    /// `POST /todos` with `{title, content}`.
    pub async fn create_todo(&self, title: &str, content: &str) -> Result<Todo, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
            content: content.to_string(),
        };
        let request = self.build_create_todo(&input);
        self.send(request, |r| self.parse_create_todo(r)).await
    }

    /// `PUT /todos/{id}` with exactly the fields set on `changes`.
    pub async fn update_todo(&self, id: TodoId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.build_update_todo(id, changes);
        self.send(request, |r| self.parse_update_todo(r)).await
    }

    /// `DELETE /todos/{id}`
    pub async fn delete_todo(&self, id: TodoId) -> Result<serde_json::Value, ApiError> {
        let request = self.build_delete_todo(id);
        self.send(Ok(request), |r| self.parse_delete_todo(r)).await
    }

    /// `GET /todos/search?keyword=...`
    pub async fn search_todos(&self, keyword: &str) -> Result<Vec<Todo>, ApiError> {
        let request = self.build_search_todos(keyword);
        self.send(Ok(request), |r| self.parse_search_todos(r)).await
    }

    /// `GET /todos/filter?completed=...`
    pub async fn filter_todos(&self, completed: bool) -> Result<Vec<Todo>, ApiError> {
        let request = self.build_filter_todos(completed);
        self.send(Ok(request), |r| self.parse_filter_todos(r)).await
    }

    async fn send<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                error!(kind = ?err.kind(), cause = ?err, "{err}");
                return Err(err);
            }
        };

        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, query = ?request.query, "dispatching request");

        let result = match self.transport.execute(request).await {
            Ok(response) => parse(response),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            error!(kind = ?err.kind(), %method, %url, cause = ?err, "{err}");
        }
        result
    }
}

fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_status(response.status, response.body))
    }
}

fn decode<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body).map_err(ApiError::request)
}
