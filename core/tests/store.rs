//! `TodoStore` against in-memory transports.
//!
//! `Scripted` answers requests from a queue and records them; `Gated` holds
//! each list request until the test releases it, which lets tests finish
//! requests out of order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::sync::oneshot;
use todo_core::{
    ApiError, CreateTodo, FilterForm, FiltersPatch, HttpRequest, HttpResponse, SortField,
    SortOrder, Todo, TodoClient, TodoFilters, TodoForm, TodoStore, Transport, UpdateTodo,
};

#[derive(Default)]
struct Scripted {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn new(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for Scripted {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }
}

/// Holds list requests keyed by their `page` until the matching sender fires.
#[derive(Default)]
struct Gated {
    gates: Mutex<HashMap<String, oneshot::Receiver<HttpResponse>>>,
}

impl Gated {
    fn gate(&self, page: u32) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page.to_string(), rx);
        tx
    }
}

impl Transport for Gated {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let page = request.query_value("page").unwrap_or_default().to_string();
        let gate = self.gates.lock().unwrap().remove(&page);
        match gate {
            Some(rx) => rx.await.map_err(|e| ApiError::Transport(e.to_string())),
            None => Err(ApiError::Transport(format!("no gate for page {page}"))),
        }
    }
}

fn client() -> TodoClient {
    TodoClient::new("http://localhost:3000/api")
}

fn todo(id: &str, title: &str) -> Todo {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Todo {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        start_date: ts,
        end_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        is_completed: false,
        created_at: ts,
        updated_at: ts,
    }
}

fn ok(status: u16, body: serde_json::Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    })
}

fn list_body(items: &[Todo], page: u32) -> serde_json::Value {
    let total = items.len();
    json!({
        "message": "Todos fetched successfully",
        "data": items,
        "meta": {
            "total": total,
            "page": page,
            "limit": 10,
            "totalPages": total.div_ceil(10),
            "hasNextPage": false,
            "hasPrevPage": page > 1
        }
    })
}

fn item_body(item: &Todo) -> serde_json::Value {
    json!({ "message": "ok", "data": item })
}

fn ids(items: &[Todo]) -> Vec<&str> {
    items.iter().map(|t| t.id.as_str()).collect()
}

fn three() -> Vec<Todo> {
    vec![todo("a", "Alpha"), todo("b", "Bravo"), todo("c", "Charlie")]
}

fn default_filters() -> TodoFilters {
    TodoFilters {
        page: 1,
        limit: 10,
        sort: SortField::CreatedAt,
        order: SortOrder::Desc,
        ..TodoFilters::default()
    }
}

#[tokio::test]
async fn fetch_list_replaces_items_and_meta() {
    let transport = Arc::new(Scripted::new(vec![ok(200, list_body(&three(), 1))]));
    let store = TodoStore::new(client(), transport.clone());

    let list = store.fetch_list(default_filters()).await.unwrap();
    assert_eq!(list.data.len(), 3);

    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(ids(&state.items), vec!["a", "b", "c"]);
    let meta = state.meta.unwrap();
    assert_eq!(meta.total, 3);
    assert_eq!(meta.total_pages, 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_value("sort"), Some("createdAt"));
    assert_eq!(requests[0].query_value("title"), None);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_items() {
    let transport = Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        ok(500, json!({ "message": "Database unavailable" })),
    ]);
    let store = TodoStore::new(client(), transport);
    store.fetch_list(default_filters()).await.unwrap();

    let err = store.fetch_list(default_filters()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert_eq!(ids(&state.items), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn transport_failure_surfaces_transport_text() {
    let transport = Scripted::new(vec![Err(ApiError::Transport("connection refused".to_string()))]);
    let store = TodoStore::new(client(), transport);

    store.fetch_one("a").await.unwrap_err();
    assert_eq!(store.snapshot().error.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn new_attempt_clears_error() {
    let transport = Scripted::new(vec![
        ok(404, json!({ "message": "Todo not found" })),
        ok(200, item_body(&todo("a", "Alpha"))),
    ]);
    let store = TodoStore::new(client(), transport);

    store.fetch_one("zzz").await.unwrap_err();
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Todo not found"));
    assert!(state.selected.is_none());

    store.fetch_one("a").await.unwrap();
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.selected.unwrap().id, "a");
}

#[tokio::test]
async fn create_prepends_and_counts() {
    let created = todo("n", "New");
    let transport = Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        ok(201, item_body(&created)),
    ]);
    let store = TodoStore::new(client(), transport);
    store.fetch_list(default_filters()).await.unwrap();

    let form = TodoForm {
        title: "New".to_string(),
        description: "New description".to_string(),
        start_date: "2024-01-01".to_string(),
        end_date: "2024-01-03".to_string(),
        is_completed: false,
    };
    let result = store.create(form.to_create().unwrap()).await.unwrap();
    assert_eq!(result, created);

    let state = store.snapshot();
    assert_eq!(ids(&state.items), vec!["n", "a", "b", "c"]);
    assert_eq!(state.meta.unwrap().total, 4);
}

#[tokio::test]
async fn create_validation_never_reaches_transport() {
    let transport = Arc::new(Scripted::default());
    let store = TodoStore::new(client(), transport.clone());

    let input = CreateTodo {
        title: String::new(),
        description: "d".to_string(),
        start_date: Utc::now(),
        end_date: Utc::now(),
    };
    let err = store.create(input).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(transport.requests().is_empty());

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("title is required"));
}

#[tokio::test]
async fn update_replaces_in_place_and_selected() {
    let mut renamed = todo("b", "Bravo two");
    renamed.is_completed = true;
    let transport = Arc::new(Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        ok(200, item_body(&todo("b", "Bravo"))),
        ok(200, item_body(&renamed)),
    ]));
    let store = TodoStore::new(client(), transport.clone());
    store.fetch_list(default_filters()).await.unwrap();
    store.fetch_one("b").await.unwrap();

    store.update("b", UpdateTodo::completed(true)).await.unwrap();

    let state = store.snapshot();
    assert_eq!(ids(&state.items), vec!["a", "b", "c"]);
    assert_eq!(state.items[1], renamed);
    assert_eq!(state.selected.unwrap(), renamed);

    let body = transport.requests()[2].body.clone().unwrap();
    assert_eq!(body, r#"{"is_completed":true}"#);
}

#[tokio::test]
async fn update_failure_is_recorded() {
    let transport = Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        ok(400, json!({ "message": "title is required" })),
    ]);
    let store = TodoStore::new(client(), transport);
    store.fetch_list(default_filters()).await.unwrap();

    let patch = UpdateTodo {
        title: Some(" ".to_string()),
        ..UpdateTodo::default()
    };
    store.update("a", patch).await.unwrap_err();

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("title is required"));
    assert_eq!(state.items[0].title, "Alpha");
}

#[tokio::test]
async fn remove_from_three_item_page() {
    let transport = Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        ok(200, item_body(&todo("b", "Bravo"))),
        ok(200, json!({ "message": "Todo deleted successfully" })),
    ]);
    let store = TodoStore::new(client(), transport);
    store.fetch_list(default_filters()).await.unwrap();
    store.fetch_one("b").await.unwrap();

    let resp = store.remove("b").await.unwrap();
    assert_eq!(resp.message, "Todo deleted successfully");

    let state = store.snapshot();
    assert_eq!(ids(&state.items), vec!["a", "c"]);
    assert_eq!(state.meta.unwrap().total, 2);
    assert!(state.selected.is_none());
}

#[tokio::test]
async fn remove_with_empty_no_content_response() {
    let transport = Scripted::new(vec![
        ok(200, list_body(&three(), 1)),
        Ok(HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        }),
    ]);
    let store = TodoStore::new(client(), transport);
    store.fetch_list(default_filters()).await.unwrap();

    store.remove("a").await.unwrap();

    let state = store.snapshot();
    assert_eq!(ids(&state.items), vec!["b", "c"]);
    assert_eq!(state.meta.unwrap().total, 2);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn set_filters_then_refresh_uses_merged_parameters() {
    let transport = Arc::new(Scripted::new(vec![ok(200, list_body(&[], 2))]));
    let store = TodoStore::new(client(), transport.clone());

    store.set_filters(FiltersPatch::page(2));
    store.set_filters(FiltersPatch::limit(20));
    store.set_filters(
        FilterForm {
            title: "milk".to_string(),
            ..FilterForm::default()
        }
        .apply_patch(),
    );
    assert!(transport.requests().is_empty());

    let filters = store.snapshot().filters;
    assert_eq!(filters.page, 1);
    assert_eq!(filters.limit, 20);

    store.refresh().await.unwrap();
    let req = &transport.requests()[0];
    assert_eq!(req.query_value("page"), Some("1"));
    assert_eq!(req.query_value("limit"), Some("20"));
    assert_eq!(req.query_value("title"), Some("milk"));
}

#[tokio::test]
async fn clear_helpers() {
    let transport = Scripted::new(vec![ok(404, json!({ "message": "Todo not found" }))]);
    let store = TodoStore::new(client(), transport);
    store.fetch_one("x").await.unwrap_err();
    store.clear_error();
    store.clear_selected();
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert!(state.selected.is_none());
}

#[tokio::test]
async fn stale_list_response_does_not_overwrite_newer() {
    let transport = Gated::default();
    let slow_gate = transport.gate(1);
    let fast_gate = transport.gate(2);
    let store = Arc::new(TodoStore::new(client(), transport));
    let mut changes = store.subscribe();

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_list(default_filters()).await }
    });
    changes.changed().await.unwrap();
    assert!(changes.borrow_and_update().loading);

    let fast = tokio::spawn({
        let store = store.clone();
        async move {
            let filters = TodoFilters {
                page: 2,
                ..default_filters()
            };
            store.fetch_list(filters).await
        }
    });
    changes.changed().await.unwrap();

    fast_gate
        .send(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: list_body(&[todo("fresh", "Fresh")], 2).to_string(),
        })
        .unwrap();
    fast.await.unwrap().unwrap();
    assert!(!store.snapshot().loading);

    slow_gate
        .send(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: list_body(&[todo("stale", "Stale")], 1).to_string(),
        })
        .unwrap();
    // The caller still gets its own response back.
    let stale = slow.await.unwrap().unwrap();
    assert_eq!(stale.data[0].id, "stale");

    let state = store.snapshot();
    assert_eq!(ids(&state.items), vec!["fresh"]);
    assert_eq!(state.meta.unwrap().page, 2);
    assert!(!state.loading);
}
