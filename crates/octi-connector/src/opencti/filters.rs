//! Filter groups for list queries.

use serde::{Deserialize, Serialize};

/// Comparison applied by a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Gte,
    Lte,
}

/// How values (or filters) are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub values: Vec<String>,
    pub operator: FilterOperator,
    pub mode: FilterMode,
}

impl Filter {
    pub fn new(key: &str, values: Vec<String>, operator: FilterOperator) -> Self {
        Self {
            key: key.to_string(),
            values,
            operator,
            mode: FilterMode::Or,
        }
    }
}

/// The `FilterGroup` input type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub mode: FilterMode,
    pub filters: Vec<Filter>,
    #[serde(rename = "filterGroups")]
    pub filter_groups: Vec<FilterGroup>,
}

/// Collects filters and yields a group only when at least one was added.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push_if(self, filter: Option<Filter>) -> Self {
        match filter {
            Some(filter) => self.push(filter),
            None => self,
        }
    }

    /// An `and` group of the collected filters, or `None` when empty.
    pub fn build(self) -> Option<FilterGroup> {
        if self.filters.is_empty() {
            return None;
        }
        Some(FilterGroup {
            mode: FilterMode::And,
            filters: self.filters,
            filter_groups: Vec::new(),
        })
    }
}
