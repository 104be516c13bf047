//! Client-side todo state and its reducer.
//!
//! # Design
//! `TodoState` is a plain value. Every change goes through
//! `TodoState::apply` with an `Action`, so the same sequence of actions always
//! produces the same state and tests can drive the reducer without a runtime.
//!
//! Async operations are bracketed by a `RequestToken`. `begin` records the
//! newest token per `Operation`; a completion carrying an older token is
//! stale. Stale reads are dropped so a slow list fetch can never overwrite a
//! newer one. Stale mutations are still folded because the server already
//! applied them, but they leave `loading` and `error` alone.

use std::collections::BTreeMap;

use crate::filters::{FiltersPatch, TodoFilters};
use crate::types::{PageMeta, Todo, TodosResponse};

/// Kind of async operation the store can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    FetchList,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Reads replace state wholesale; their stale results are discarded.
    pub fn is_read(self) -> bool {
        matches!(self, Operation::FetchList | Operation::FetchOne)
    }
}

/// Identifies one issued async operation. `seq` is unique and increasing
/// across all operations of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub op: Operation,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetFilters(FiltersPatch),
    ClearSelected,
    ClearError,
    Started(RequestToken),
    ListLoaded(RequestToken, TodosResponse),
    TodoLoaded(RequestToken, Todo),
    Created(RequestToken, Todo),
    Updated(RequestToken, Todo),
    Deleted(RequestToken, String),
    Failed(RequestToken, String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoState {
    /// Current page in service order.
    pub items: Vec<Todo>,
    /// Item fetched on its own; independent of `items`.
    pub selected: Option<Todo>,
    pub meta: Option<PageMeta>,
    pub filters: TodoFilters,
    pub loading: bool,
    pub error: Option<String>,
    last_seq: u64,
    latest: BTreeMap<Operation, u64>,
    in_flight: BTreeMap<Operation, u64>,
}

impl TodoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(filters: TodoFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Issue a fresh token for `op` and mark it started.
    pub fn begin(&mut self, op: Operation) -> RequestToken {
        let token = RequestToken {
            op,
            seq: self.last_seq + 1,
        };
        self.apply(Action::Started(token));
        token
    }

    /// Whether `token` is the newest one issued for its operation.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.get(&token.op) == Some(&token.seq)
    }

    pub fn is_pending(&self, op: Operation) -> bool {
        self.in_flight.contains_key(&op)
    }

    pub fn reduce(mut self, action: Action) -> Self {
        self.apply(action);
        self
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetFilters(patch) => self.filters.merge(patch),
            Action::ClearSelected => self.selected = None,
            Action::ClearError => self.error = None,
            Action::Started(token) => {
                self.last_seq = self.last_seq.max(token.seq);
                let newest = self.latest.entry(token.op).or_insert(token.seq);
                *newest = (*newest).max(token.seq);
                if *newest == token.seq {
                    self.in_flight.insert(token.op, token.seq);
                }
                self.loading = true;
                self.error = None;
            }
            Action::ListLoaded(token, response) => {
                if self.settle(token) {
                    self.items = response.data;
                    self.meta = response.meta;
                }
            }
            Action::TodoLoaded(token, todo) => {
                if self.settle(token) {
                    self.selected = Some(todo);
                }
            }
            Action::Created(token, todo) => {
                self.settle(token);
                self.items.insert(0, todo);
                if let Some(meta) = self.meta.as_mut() {
                    meta.total += 1;
                }
            }
            Action::Updated(token, todo) => {
                self.settle(token);
                if let Some(slot) = self.items.iter_mut().find(|item| item.id == todo.id) {
                    *slot = todo.clone();
                }
                if self.selected.as_ref().is_some_and(|s| s.id == todo.id) {
                    self.selected = Some(todo);
                }
            }
            Action::Deleted(token, id) => {
                self.settle(token);
                self.items.retain(|item| item.id != id);
                if let Some(meta) = self.meta.as_mut() {
                    meta.total = meta.total.saturating_sub(1);
                }
                if self.selected.as_ref().is_some_and(|s| s.id == id) {
                    self.selected = None;
                }
            }
            Action::Failed(token, message) => {
                // A superseded read failure is noise; a failed mutation is not.
                if self.settle(token) || !token.op.is_read() {
                    self.error = Some(message);
                }
            }
        }
    }

    /// Close out `token`. Returns false when a newer token for the same
    /// operation exists, in which case nothing changes.
    fn settle(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        if self.in_flight.get(&token.op) == Some(&token.seq) {
            self.in_flight.remove(&token.op);
        }
        self.loading = !self.in_flight.is_empty();
        true
    }
}
