use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Origin of the front-end dev server.
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct FilterParams {
    pub completed: bool,
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl Store {
    /// Store pre-filled with three sample items, one of them completed.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.insert("Learn axum", Some("Work through the official axum examples"), false);
        store.insert("Learn Leptos", Some("Learn the Leptos basics"), true);
        store.insert("Finish the project", Some("Finish building the todo system"), false);
        store
    }

    pub fn insert(&mut self, title: &str, content: Option<&str>, completed: bool) -> Todo {
        self.last_id += 1;
        let todo = Todo {
            id: self.last_id,
            title: title.to_string(),
            content: content.map(str::to_string),
            completed,
        };
        self.todos.insert(todo.id, todo.clone());
        todo
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the `{"detail": ...}` shape the client expects.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiFailure {
    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: format!("todo {id} not found"),
        }
    }

    fn unprocessable(detail: String) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(FRONTEND_ORIGIN))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/search", get(search_todos))
        .route("/todos/filter", get(filter_todos))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock todo backend listening");
    }
    axum::serve(listener, app_with(db)).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiFailure> {
    let Json(input) = input?;
    let todo = db
        .write()
        .await
        .insert(&input.title, input.content.as_deref(), false);
    Ok(Json(todo))
}

async fn update_todo(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiFailure> {
    let Path(id) = id?;
    let Json(input) = input?;
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(ApiFailure::not_found(id))?;
    // Empty strings leave the stored value alone.
    if let Some(title) = input.title.filter(|t| !t.is_empty()) {
        todo.title = title;
    }
    if let Some(content) = input.content.filter(|c| !c.is_empty()) {
        todo.content = Some(content);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let Path(id) = id?;
    let mut store = db.write().await;
    store
        .todos
        .remove(&id)
        .map(|_| Json(serde_json::Value::Null))
        .ok_or(ApiFailure::not_found(id))
}

async fn search_todos(
    State(db): State<Db>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiFailure> {
    let Query(params) = params?;
    let store = db.read().await;
    Ok(Json(
        store
            .todos
            .values()
            .filter(|todo| matches_keyword(todo, &params.keyword))
            .cloned()
            .collect(),
    ))
}

async fn filter_todos(
    State(db): State<Db>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiFailure> {
    let Query(params) = params?;
    let store = db.read().await;
    Ok(Json(
        store
            .todos
            .values()
            .filter(|todo| todo.completed == params.completed)
            .cloned()
            .collect(),
    ))
}

/// Substring match on title or content.
fn matches_keyword(todo: &Todo, keyword: &str) -> bool {
    todo.title.contains(keyword)
        || todo
            .content
            .as_deref()
            .is_some_and(|content| content.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_assigns_increasing_ids() {
        let mut store = Store::default();
        let first = store.insert("One", None, false);
        let second = store.insert("Two", Some("second"), false);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn seeded_store_has_one_completed_item() {
        let store = Store::seeded();
        assert_eq!(store.len(), 3);
        assert_eq!(store.todos.values().filter(|t| t.completed).count(), 1);
    }

    #[test]
    fn keyword_matches_title_or_content() {
        let todo = Todo {
            id: 1,
            title: "Buy milk".to_string(),
            content: Some("from the corner shop".to_string()),
            completed: false,
        };
        assert!(matches_keyword(&todo, "milk"));
        assert!(matches_keyword(&todo, "corner"));
        assert!(!matches_keyword(&todo, "bread"));
    }

    #[test]
    fn keyword_skips_missing_content() {
        let todo = Todo {
            id: 1,
            title: "Walk dog".to_string(),
            content: None,
            completed: false,
        };
        assert!(!matches_keyword(&todo, "park"));
    }

    #[test]
    fn create_todo_content_is_optional() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No content"}"#).unwrap();
        assert_eq!(input.title, "No content");
        assert!(input.content.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.content.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn failure_renders_detail_body() {
        let failure = ApiFailure::not_found(4);
        assert_eq!(failure.status, StatusCode::NOT_FOUND);
        assert_eq!(failure.detail, "todo 4 not found");
    }
}
