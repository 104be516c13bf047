//! Async orchestration: API call, then fold the outcome into `TodoState`.
//!
//! # Design
//! `TodoStore` owns a `TodoClient`, a `Transport` and a
//! `tokio::sync::watch` channel holding the state. Every operation follows
//! the same shape: `begin` a token, run the round-trip, dispatch either the
//! success action or `Action::Failed`. Folds happen inside `send_modify`, so
//! each one is atomic with respect to the state it touches and subscribers
//! see every change.
//!
//! Operations return `Result` so the caller can report the outcome, but the
//! failure is always captured in `TodoState::error` as well.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::filters::{FiltersPatch, TodoFilters};
use crate::state::{Action, Operation, RequestToken, TodoState};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, DeleteResponse, Todo, TodosResponse, UpdateTodo};

pub struct TodoStore<T> {
    client: TodoClient,
    transport: T,
    state: watch::Sender<TodoState>,
}

impl TodoStore<ReqwestTransport> {
    /// Store over the network, configured from `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(TodoClient::new(&config.base_url), transport))
    }
}

impl<T: Transport> TodoStore<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self::with_state(client, transport, TodoState::default())
    }

    pub fn with_state(client: TodoClient, transport: T, initial: TodoState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            client,
            transport,
            state,
        }
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every fold.
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.state.send_modify(|state| state.apply(action));
    }

    /// Merge `patch` into the current parameters. Does not fetch; call
    /// `refresh` afterwards to load the matching page.
    pub fn set_filters(&self, patch: FiltersPatch) {
        self.dispatch(Action::SetFilters(patch));
    }

    pub fn clear_selected(&self) {
        self.dispatch(Action::ClearSelected);
    }

    pub fn clear_error(&self) {
        self.dispatch(Action::ClearError);
    }

    pub async fn fetch_list(&self, filters: TodoFilters) -> Result<TodosResponse, ApiError> {
        let token = self.begin(Operation::FetchList);
        debug!(seq = token.seq, page = filters.page, limit = filters.limit, "fetching todo list");
        let request = self.client.build_list_todos(&filters);
        let result = self
            .transport
            .execute(request)
            .await
            .and_then(|response| self.client.parse_list_todos(response));
        self.finish(token, result, |list| Action::ListLoaded(token, list.clone()))
    }

    /// Re-fetch the list with the parameters currently held in state.
    pub async fn refresh(&self) -> Result<TodosResponse, ApiError> {
        let filters = self.state.borrow().filters.clone();
        self.fetch_list(filters).await
    }

    pub async fn fetch_one(&self, id: &str) -> Result<Todo, ApiError> {
        let token = self.begin(Operation::FetchOne);
        debug!(seq = token.seq, id, "fetching todo");
        let request = self.client.build_get_todo(id);
        let result = self
            .transport
            .execute(request)
            .await
            .and_then(|response| self.client.parse_get_todo(response));
        self.finish(token, result, |todo| Action::TodoLoaded(token, todo.clone()))
    }

    pub async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError> {
        let token = self.begin(Operation::Create);
        debug!(seq = token.seq, title = %input.title, "creating todo");
        let result = async {
            let request = self.client.build_create_todo(&input)?;
            let response = self.transport.execute(request).await?;
            self.client.parse_create_todo(response)
        }
        .await;
        self.finish(token, result, |todo| Action::Created(token, todo.clone()))
    }

    pub async fn update(&self, id: &str, input: UpdateTodo) -> Result<Todo, ApiError> {
        let token = self.begin(Operation::Update);
        debug!(seq = token.seq, id, "updating todo");
        let result = async {
            let request = self.client.build_update_todo(id, &input)?;
            let response = self.transport.execute(request).await?;
            self.client.parse_update_todo(response)
        }
        .await;
        self.finish(token, result, |todo| Action::Updated(token, todo.clone()))
    }

    pub async fn remove(&self, id: &str) -> Result<DeleteResponse, ApiError> {
        let token = self.begin(Operation::Delete);
        debug!(seq = token.seq, id, "deleting todo");
        let request = self.client.build_delete_todo(id);
        let result = self
            .transport
            .execute(request)
            .await
            .and_then(|response| self.client.parse_delete_todo(response));
        self.finish(token, result, |_| Action::Deleted(token, id.to_string()))
    }

    fn begin(&self, op: Operation) -> RequestToken {
        let mut token = RequestToken { op, seq: 0 };
        self.state.send_modify(|state| token = state.begin(op));
        token
    }

    fn finish<R>(
        &self,
        token: RequestToken,
        result: Result<R, ApiError>,
        fold: impl FnOnce(&R) -> Action,
    ) -> Result<R, ApiError> {
        match &result {
            Ok(value) => self.dispatch(fold(value)),
            Err(err) => {
                warn!(op = ?token.op, seq = token.seq, error = %err, "todo operation failed");
                self.dispatch(Action::Failed(token, err.message()));
            }
        }
        if !self.state.borrow().is_current(token) {
            debug!(op = ?token.op, seq = token.seq, "response superseded by a newer request");
        }
        result
    }
}
