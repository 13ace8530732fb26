//! Saved device-list filters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clause::{Clause, ClauseType};
use crate::error::Error;
use crate::sql;

/// Id of the built-in filter that matches every registered device.
pub const DEFAULT_FILTER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Sort direction requested for the device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    /// Storage-layer fallback when a persisted value cannot be parsed.
    #[default]
    Descending,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ascending") {
            Ok(SortOrder::Ascending)
        } else if s.eq_ignore_ascii_case("descending") {
            Ok(SortOrder::Descending)
        } else {
            Err(Error::UnknownSortOrder(s.to_string()))
        }
    }
}

/// A saved filter over the device list: an ordered clause list plus sort
/// metadata and an optional hand-written SQL override.
///
/// These are value objects rebuilt from storage or a POST body on each
/// request; they carry no caching and are never mutated concurrently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceListFilter {
    pub id: String,
    pub name: String,
    /// Applied left to right; every clause narrows the result (logical AND).
    pub clauses: Vec<Clause>,
    pub sort_column: Option<String>,
    pub sort_order: SortOrder,
    /// Raw SQL condition edited directly by advanced users.
    pub advanced_clause: Option<String>,
    /// True when the UI is in raw SQL edit mode. Not consumed by the
    /// in-memory evaluator.
    pub is_advanced: bool,
    pub is_temporary: bool,
}

impl DeviceListFilter {
    /// The WHERE condition for this filter, or the raw override when the
    /// filter is in advanced mode. Empty string when there is nothing to
    /// filter on.
    pub fn sql_condition(&self) -> Result<String, Error> {
        if self.is_advanced {
            return Ok(self.advanced_clause.clone().unwrap_or_default());
        }
        sql::condition(&self.clauses)
    }

    /// The full device SELECT for this filter.
    pub fn sql_query(&self) -> Result<String, Error> {
        Ok(sql::select_query(&self.sql_condition()?))
    }

    /// The device count query for this filter.
    pub fn sql_count_query(&self) -> Result<String, Error> {
        Ok(sql::count_query(&self.sql_condition()?))
    }

    /// Clone this filter with one more clause appended.
    pub fn with_clause(&self, clause: Clause) -> Self {
        let mut filter = self.clone();
        filter.clauses.push(clause);
        filter
    }

    /// Reconcile the raw override against the freshly generated condition.
    ///
    /// When the two match apart from whitespace and case, the generated form
    /// wins so it keeps tracking future clause edits; otherwise the user's
    /// text is preserved verbatim (trimmed).
    pub fn reconciled_advanced_clause(&self) -> Result<String, Error> {
        let generated = sql::condition(&self.clauses)?.trim().to_string();
        match &self.advanced_clause {
            Some(raw) if !raw.trim().eq_ignore_ascii_case(&generated) => {
                Ok(raw.trim().to_string())
            }
            _ => Ok(generated),
        }
    }

    /// The built-in default filter matching every registered device.
    pub fn all_devices() -> Self {
        DeviceListFilter {
            id: DEFAULT_FILTER_ID.to_string(),
            name: "All Devices".to_string(),
            clauses: vec![Clause::new("deviceId", ClauseType::Ne, "")],
            ..Default::default()
        }
    }
}
