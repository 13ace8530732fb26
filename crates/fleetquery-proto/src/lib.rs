//! Fleetquery protocol types.
//!
//! This crate defines the clause model shared by the two query evaluators of
//! the device administration console, together with its JSON wire formats:
//!
//! - [`clause`] - Single filter conditions and their operators
//! - [`sql`] - Rendering of clause lists into IoT hub SQL text
//! - [`filter`] - Saved device-list filters ([`DeviceListFilter`])
//! - [`query`] - Ad-hoc device-list queries ([`DeviceListQuery`])
//! - [`error`] - Protocol error types
//!
//! Clause lists are persisted as JSON arrays and posted by the UI in two
//! historical flavors (`clauseType`/`clauseValue` for saved filters,
//! `filterType`/`filterValue` for queries); both deserialize into the same
//! [`Clause`] type.

pub mod clause;
pub mod error;
pub mod filter;
pub mod query;
pub mod sql;

pub use clause::{Clause, ClauseDataType, ClauseType, ClauseValue};
pub use error::Error;
pub use filter::{DeviceListFilter, SortOrder};
pub use query::DeviceListQuery;
