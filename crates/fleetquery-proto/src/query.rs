//! Ad-hoc device-list queries posted by the console UI.

use serde::{Deserialize, Serialize};

use crate::clause::{Clause, ClauseValue};
use crate::error::Error;
use crate::filter::SortOrder;
use crate::sql;

/// A one-off device-list query: filter clauses plus search, sort and paging
/// parameters consumed by the caller after filtering.
///
/// Unlike saved filters, values posted through the query editor get numeric
/// inference: a non-empty all-digit value renders unquoted in SQL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "QueryWire", into = "QueryWire")]
pub struct DeviceListQuery {
    pub filters: Vec<Clause>,
    /// General free-text search, not specific to a column. Not part of the
    /// generated SQL; the hub query dialect has no full-text operator.
    pub search_query: Option<String>,
    pub sort_column: Option<String>,
    pub sort_order: SortOrder,
    /// Number of devices to skip at the start of the list.
    pub skip: u32,
    /// Number of devices to return.
    pub take: u32,
    /// Raw SQL override captured from the query editor.
    pub sql: Option<String>,
}

impl DeviceListQuery {
    /// Create a query over the given clauses, applying numeric inference to
    /// each string-tagged value.
    pub fn new(filters: Vec<Clause>) -> Self {
        DeviceListQuery {
            filters: filters.into_iter().map(infer_value).collect(),
            ..Default::default()
        }
    }

    /// The WHERE condition for this query's clauses.
    pub fn sql_condition(&self) -> Result<String, Error> {
        sql::condition(&self.filters)
    }

    /// The full device SELECT for this query.
    pub fn sql_query(&self) -> Result<String, Error> {
        Ok(sql::select_query(&self.sql_condition()?))
    }

    /// Resolve the raw SQL override against the query generated from the
    /// structured clauses. When the two match apart from whitespace and case
    /// the generated form wins, keeping stored SQL in sync with later clause
    /// edits; otherwise the override is preserved verbatim (trimmed).
    pub fn reconciled_sql(&self) -> Result<String, Error> {
        let generated = self.sql_query()?.trim().to_string();
        match &self.sql {
            Some(raw) if !raw.trim().eq_ignore_ascii_case(&generated) => {
                Ok(raw.trim().to_string())
            }
            _ => Ok(generated),
        }
    }
}

fn infer_value(mut clause: Clause) -> Clause {
    if let ClauseValue::Str(raw) = clause.value {
        clause.value = ClauseValue::inferred(raw);
    }
    clause
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct QueryWire {
    filters: Vec<Clause>,
    search_query: Option<String>,
    sort_column: Option<String>,
    sort_order: SortOrder,
    skip: u32,
    take: u32,
    sql: Option<String>,
}

impl From<QueryWire> for DeviceListQuery {
    fn from(wire: QueryWire) -> Self {
        DeviceListQuery {
            filters: wire.filters.into_iter().map(infer_value).collect(),
            search_query: wire.search_query,
            sort_column: wire.sort_column,
            sort_order: wire.sort_order,
            skip: wire.skip,
            take: wire.take,
            sql: wire.sql,
        }
    }
}

impl From<DeviceListQuery> for QueryWire {
    fn from(query: DeviceListQuery) -> Self {
        QueryWire {
            filters: query.filters,
            search_query: query.search_query,
            sort_column: query.sort_column,
            sort_order: query.sort_order,
            skip: query.skip,
            take: query.take,
            sql: query.sql,
        }
    }
}
