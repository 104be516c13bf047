//! Editable form state for creating, editing and filtering todos.
//!
//! Dates are edited as plain `YYYY-MM-DD` text and become midnight-UTC
//! timestamps on submit.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::ApiError;
use crate::filters::{FiltersPatch, SortField, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::types::{CreateTodo, Todo, UpdateTodo};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill all required fields";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Create/edit form for a single todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub is_completed: bool,
}

impl TodoForm {
    /// Pre-fill the form for editing an existing item.
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            start_date: todo.start_date.format(DATE_FORMAT).to_string(),
            end_date: todo.end_date.format(DATE_FORMAT).to_string(),
            is_completed: todo.is_completed,
        }
    }

    pub fn to_create(&self) -> Result<CreateTodo, ApiError> {
        if [&self.title, &self.description, &self.start_date, &self.end_date]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ApiError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }
        Ok(CreateTodo {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: parse_date("start date", &self.start_date)?,
            end_date: parse_date("end date", &self.end_date)?,
        })
    }

    /// Every field, completion flag included, as one patch.
    pub fn to_update(&self) -> Result<UpdateTodo, ApiError> {
        let create = self.to_create()?;
        Ok(UpdateTodo {
            title: Some(create.title),
            description: Some(create.description),
            start_date: Some(create.start_date),
            end_date: Some(create.end_date),
            is_completed: Some(self.is_completed),
        })
    }
}

/// Parse `YYYY-MM-DD` as midnight UTC. `label` names the field in the
/// validation message.
pub fn parse_date(label: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ApiError::Validation(format!("{label} must be a date like 2024-01-31")))
}

/// Filter panel state. Empty text means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub title: String,
    pub description: String,
    pub is_completed: Option<bool>,
}

impl FilterForm {
    /// Patch that jumps back to page one and sets every filled-in filter.
    /// Filters left empty keep whatever the store already has.
    pub fn apply_patch(&self) -> FiltersPatch {
        FiltersPatch {
            page: Some(DEFAULT_PAGE),
            title: non_empty(&self.title).map(Some),
            description: non_empty(&self.description).map(Some),
            is_completed: self.is_completed.map(Some),
            ..FiltersPatch::default()
        }
    }

    /// Patch restoring default paging and sort and dropping text and status
    /// filters.
    pub fn clear_patch() -> FiltersPatch {
        FiltersPatch {
            page: Some(DEFAULT_PAGE),
            limit: Some(DEFAULT_LIMIT),
            sort: Some(SortField::default()),
            order: Some(SortOrder::default()),
            title: Some(None),
            description: Some(None),
            is_completed: Some(None),
            ..FiltersPatch::default()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
