use std::{cmp::Ordering, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum SortField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "start_date")]
    StartDate,
    #[serde(rename = "end_date")]
    EndDate,
    #[serde(rename = "is_completed")]
    IsCompleted,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ListQuery {
    fn matches(&self, todo: &Todo) -> bool {
        contains_ci(&todo.title, self.title.as_deref())
            && contains_ci(&todo.description, self.description.as_deref())
            && self.is_completed.is_none_or(|done| todo.is_completed == done)
            && self.start_date.is_none_or(|from| todo.start_date >= from)
            && self.end_date.is_none_or(|until| todo.end_date <= until)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub message: String,
    pub data: Vec<Todo>,
    pub meta: Meta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub message: String,
    pub data: Todo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Failure answered with `{ "message": ... }`.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Rejected(StatusCode, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Todo not found".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Rejected(status, message) => (status, message),
        };
        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    router(Db::default())
}

/// Router over a pre-populated store.
pub fn app_with(todos: Vec<Todo>) -> Router {
    router(Arc::new(RwLock::new(todos)))
}

pub fn router(db: Db) -> Router {
    let todos = Router::new()
        .route("/todos/get", get(list_todos))
        .route("/todos/", post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo));
    Router::new()
        .nest("/api", todos)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Pagination summary for `total` matches viewed `limit` at a time.
pub fn page_meta(total: u64, page: u32, limit: u32) -> Meta {
    let total_pages = u32::try_from(total.div_ceil(u64::from(limit.max(1)))).unwrap_or(u32::MAX);
    Meta {
        total,
        page,
        limit,
        total_pages,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
    }
}

/// Sort in place. Equal keys keep insertion order ascending and newest-first
/// descending.
pub fn sort_todos(todos: &mut [Todo], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => todos.sort_by(|a, b| compare(a, b, field)),
        SortOrder::Desc => {
            todos.reverse();
            todos.sort_by(|a, b| compare(b, a, field));
        }
    }
}

fn compare(a: &Todo, b: &Todo, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Description => a.description.cmp(&b.description),
        SortField::StartDate => a.start_date.cmp(&b.start_date),
        SortField::EndDate => a.end_date.cmp(&b.end_date),
        SortField::IsCompleted => a.is_completed.cmp(&b.is_completed),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle.filter(|n| !n.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

async fn list_todos(
    State(db): State<Db>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut matching: Vec<Todo> = db
        .read()
        .await
        .iter()
        .filter(|todo| query.matches(todo))
        .cloned()
        .collect();
    sort_todos(
        &mut matching,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    );

    let meta = page_meta(matching.len() as u64, page, limit);
    let offset = (page as usize - 1) * limit as usize;
    let data = matching.into_iter().skip(offset).take(limit as usize).collect();
    debug!(page, limit, total = meta.total, "listed todos");

    Ok(Json(ListResponse {
        message: "Todos fetched successfully".to_string(),
        data,
        meta,
    }))
}

async fn create_todo(
    State(db): State<Db>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let Json(input) = input?;
    require_text("title", &input.title)?;
    require_text("description", &input.description)?;

    let now = Utc::now();
    let todo = Todo {
        id: Uuid::new_v4().simple().to_string(),
        title: input.title,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        is_completed: false,
        created_at: now,
        updated_at: now,
    };
    db.write().await.push(todo.clone());
    info!(id = %todo.id, "created todo");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            message: "Todo created successfully".to_string(),
            data: todo,
        }),
    ))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let todos = db.read().await;
    let todo = todos.iter().find(|t| t.id == id).cloned().ok_or(ApiError::NotFound)?;
    Ok(Json(ItemResponse {
        message: "Todo fetched successfully".to_string(),
        data: todo,
    }))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Json(input) = input?;
    let mut todos = db.write().await;
    let todo = todos.iter_mut().find(|t| t.id == id).ok_or(ApiError::NotFound)?;
    if let Some(title) = input.title {
        require_text("title", &title)?;
        todo.title = title;
    }
    if let Some(description) = input.description {
        require_text("description", &description)?;
        todo.description = description;
    }
    if let Some(start_date) = input.start_date {
        todo.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        todo.end_date = end_date;
    }
    if let Some(is_completed) = input.is_completed {
        todo.is_completed = is_completed;
    }
    todo.updated_at = Utc::now();
    info!(id = %todo.id, "updated todo");

    Ok(Json(ItemResponse {
        message: "Todo updated successfully".to_string(),
        data: todo.clone(),
    }))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut todos = db.write().await;
    let index = todos.iter().position(|t| t.id == id).ok_or(ApiError::NotFound)?;
    todos.remove(index);
    info!(%id, "deleted todo");
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}
