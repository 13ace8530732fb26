//! The clause model for device-list filtering.
//!
//! A [`Clause`] is a single condition on one device column. An ordered list
//! of clauses is AND-joined by both evaluators: the SQL builder in [`crate::sql`]
//! and the in-memory evaluator in the core crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Comparison and matching operators for a clause.
///
/// The first seven map onto IoT hub SQL operators. `Status` and the
/// text-matching family only apply to in-memory filtering and are rejected by
/// the SQL builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClauseType {
    #[default]
    #[serde(rename = "EQ")]
    Eq,
    #[serde(rename = "NE")]
    Ne,
    #[serde(rename = "LT")]
    Lt,
    #[serde(rename = "GT")]
    Gt,
    #[serde(rename = "LE")]
    Le,
    #[serde(rename = "GE")]
    Ge,
    #[serde(rename = "IN")]
    In,
    Status,
    ContainsCaseInsensitive,
    ContainsCaseSensitive,
    ExactMatchCaseInsensitive,
    ExactMatchCaseSensitive,
    StartsWithCaseInsensitive,
    StartsWithCaseSensitive,
}

impl ClauseType {
    /// SQL operator text, or `None` for operators that only exist for
    /// in-memory matching.
    pub fn sql_operator(self) -> Option<&'static str> {
        match self {
            ClauseType::Eq => Some("="),
            ClauseType::Ne => Some("!="),
            ClauseType::Lt => Some("<"),
            ClauseType::Gt => Some(">"),
            ClauseType::Le => Some("<="),
            ClauseType::Ge => Some(">="),
            ClauseType::In => Some("IN"),
            _ => None,
        }
    }

    /// The wire name, as stored in table entities and clause JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseType::Eq => "EQ",
            ClauseType::Ne => "NE",
            ClauseType::Lt => "LT",
            ClauseType::Gt => "GT",
            ClauseType::Le => "LE",
            ClauseType::Ge => "GE",
            ClauseType::In => "IN",
            ClauseType::Status => "Status",
            ClauseType::ContainsCaseInsensitive => "ContainsCaseInsensitive",
            ClauseType::ContainsCaseSensitive => "ContainsCaseSensitive",
            ClauseType::ExactMatchCaseInsensitive => "ExactMatchCaseInsensitive",
            ClauseType::ExactMatchCaseSensitive => "ExactMatchCaseSensitive",
            ClauseType::StartsWithCaseInsensitive => "StartsWithCaseInsensitive",
            ClauseType::StartsWithCaseSensitive => "StartsWithCaseSensitive",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EQ" => Ok(ClauseType::Eq),
            "NE" => Ok(ClauseType::Ne),
            "LT" => Ok(ClauseType::Lt),
            "GT" => Ok(ClauseType::Gt),
            "LE" => Ok(ClauseType::Le),
            "GE" => Ok(ClauseType::Ge),
            "IN" => Ok(ClauseType::In),
            "Status" => Ok(ClauseType::Status),
            "ContainsCaseInsensitive" => Ok(ClauseType::ContainsCaseInsensitive),
            "ContainsCaseSensitive" => Ok(ClauseType::ContainsCaseSensitive),
            "ExactMatchCaseInsensitive" => Ok(ClauseType::ExactMatchCaseInsensitive),
            "ExactMatchCaseSensitive" => Ok(ClauseType::ExactMatchCaseSensitive),
            "StartsWithCaseInsensitive" => Ok(ClauseType::StartsWithCaseInsensitive),
            "StartsWithCaseSensitive" => Ok(ClauseType::StartsWithCaseSensitive),
            other => Err(Error::UnknownClauseType(other.to_string())),
        }
    }
}

/// Declared value type of a clause, a hint consumed by the UI layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseDataType {
    String,
    Number,
    Boolean,
}

/// A clause value tagged with how it renders in SQL.
///
/// The tag is decided when the clause is constructed (from the declared data
/// type, the clause operator, or digit inference for the query wire flavor)
/// rather than by inspecting the string at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseValue {
    /// Rendered as a SQL string literal unless the caller already quoted it.
    Str(String),
    /// Rendered without quotes.
    Num(String),
    /// Rendered verbatim, e.g. a pre-formatted bracketed IN list.
    Raw(String),
}

impl ClauseValue {
    /// Tag a value by inspecting it: non-empty all-digit text is numeric.
    ///
    /// Used by the query wire flavor; saved filters keep numeric-looking
    /// values as strings and quote them.
    pub fn inferred(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
            ClauseValue::Num(raw)
        } else {
            ClauseValue::Str(raw)
        }
    }

    /// The raw text, without any quoting applied.
    pub fn as_str(&self) -> &str {
        match self {
            ClauseValue::Str(s) | ClauseValue::Num(s) | ClauseValue::Raw(s) => s,
        }
    }

    /// Consume the tag and return the raw text.
    pub fn into_raw(self) -> String {
        match self {
            ClauseValue::Str(s) | ClauseValue::Num(s) | ClauseValue::Raw(s) => s,
        }
    }

    /// Render as a SQL literal.
    pub(crate) fn to_sql(&self) -> String {
        match self {
            ClauseValue::Raw(raw) => raw.clone(),
            ClauseValue::Num(raw) if raw.is_empty() => "''".to_string(),
            ClauseValue::Num(raw) => raw.clone(),
            ClauseValue::Str(raw) => {
                if raw.is_empty() {
                    "''".to_string()
                } else if raw.starts_with('\'') && raw.ends_with('\'') {
                    raw.clone()
                } else {
                    format!("'{raw}'")
                }
            }
        }
    }
}

impl Default for ClauseValue {
    fn default() -> Self {
        ClauseValue::Str(String::new())
    }
}

/// A single filter condition on a device column.
///
/// `column_name` is a dotted path such as `tags.location`,
/// `properties.reported.firmware`, `deviceId`, or the derived pseudo-column
/// `Status`. A clause with a blank column name is skipped by both evaluators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ClauseWire", into = "ClauseWire")]
pub struct Clause {
    pub column_name: String,
    pub clause_type: ClauseType,
    pub value: ClauseValue,
    pub data_type: Option<ClauseDataType>,
}

impl Clause {
    /// Create a clause whose value renders as a string literal.
    pub fn new(
        column_name: impl Into<String>,
        clause_type: ClauseType,
        value: impl Into<String>,
    ) -> Self {
        Clause {
            column_name: column_name.into(),
            clause_type,
            value: ClauseValue::Str(value.into()),
            data_type: None,
        }
    }

    /// Create a clause whose value renders unquoted.
    pub fn numeric(
        column_name: impl Into<String>,
        clause_type: ClauseType,
        value: impl Into<String>,
    ) -> Self {
        Clause {
            column_name: column_name.into(),
            clause_type,
            value: ClauseValue::Num(value.into()),
            data_type: Some(ClauseDataType::Number),
        }
    }

    /// Create an `IN` clause over a pre-formatted bracketed list, which is
    /// rendered verbatim.
    pub fn in_list(column_name: impl Into<String>, list: impl Into<String>) -> Self {
        Clause {
            column_name: column_name.into(),
            clause_type: ClauseType::In,
            value: ClauseValue::Raw(list.into()),
            data_type: None,
        }
    }

    /// Attach the UI data type hint.
    pub fn with_data_type(mut self, data_type: ClauseDataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Whether both evaluators should skip this clause.
    pub fn is_blank(&self) -> bool {
        self.column_name.trim().is_empty()
    }

    /// Parse a clause list from the JSON array string persisted by the
    /// storage layer.
    pub fn list_from_json(json: &str) -> Result<Vec<Clause>, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Serialize a clause list to the JSON array string persisted by the
    /// storage layer.
    pub fn list_to_json(clauses: &[Clause]) -> Result<String, Error> {
        serde_json::to_string(clauses).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Wire shape of a clause. Saved filters use the `clauseType`/`clauseValue`
/// field names; ad-hoc queries historically post `filterType`/`filterValue`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClauseWire {
    #[serde(default)]
    column_name: String,
    #[serde(default, alias = "filterType")]
    clause_type: ClauseType,
    #[serde(default, alias = "filterValue")]
    clause_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clause_data_type: Option<ClauseDataType>,
}

impl From<ClauseWire> for Clause {
    fn from(wire: ClauseWire) -> Self {
        let value = match (wire.clause_type, wire.clause_data_type) {
            (ClauseType::In, _) => ClauseValue::Raw(wire.clause_value),
            (_, Some(ClauseDataType::Number)) => ClauseValue::Num(wire.clause_value),
            _ => ClauseValue::Str(wire.clause_value),
        };
        Clause {
            column_name: wire.column_name,
            clause_type: wire.clause_type,
            value,
            data_type: wire.clause_data_type,
        }
    }
}

impl From<Clause> for ClauseWire {
    fn from(clause: Clause) -> Self {
        ClauseWire {
            column_name: clause.column_name,
            clause_type: clause.clause_type,
            clause_value: clause.value.into_raw(),
            clause_data_type: clause.data_type,
        }
    }
}
