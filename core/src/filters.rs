//! Filter, sort and paging parameters for the list endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Field the list endpoint sorts by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Title,
        SortField::Description,
        SortField::StartDate,
        SortField::EndDate,
        SortField::IsCompleted,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// Wire name used in the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::StartDate => "start_date",
            SortField::EndDate => "end_date",
            SortField::IsCompleted => "is_completed",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Query configuration controlling which items the list endpoint returns and
/// in what order and slice.
///
/// Optional fields that are `None` or hold an empty string are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoFilters {
    pub page: u32,
    pub limit: u32,
    pub sort: SortField,
    pub order: SortOrder,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Default for TodoFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
            title: None,
            description: None,
            is_completed: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl TodoFilters {
    /// Query pairs in wire order, skipping absent and empty values.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sort".to_string(), self.sort.as_str().to_string()),
            ("order".to_string(), self.order.as_str().to_string()),
        ];
        let optional = [
            ("title", non_empty(self.title.as_deref())),
            ("description", non_empty(self.description.as_deref())),
            ("is_completed", self.is_completed.map(|b| b.to_string())),
            ("start_date", self.start_date.map(iso_timestamp)),
            ("end_date", self.end_date.map(iso_timestamp)),
        ];
        query.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key.to_string(), v))),
        );
        query
    }

    /// Shallow merge: every field the patch carries overwrites ours.
    pub fn merge(&mut self, patch: FiltersPatch) {
        if let Some(page) = patch.page {
            self.page = page;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
    }

    pub fn merged(mut self, patch: FiltersPatch) -> Self {
        self.merge(patch);
        self
    }
}

/// A partial update to `TodoFilters`.
///
/// `None` leaves a field untouched. For the optional filters, `Some(None)`
/// clears the field and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub is_completed: Option<Option<bool>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}

impl FiltersPatch {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn sort(sort: SortField, order: SortOrder) -> Self {
        Self {
            sort: Some(sort),
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Millisecond-precision UTC timestamp, e.g. `2024-03-01T00:00:00.000Z`.
pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
