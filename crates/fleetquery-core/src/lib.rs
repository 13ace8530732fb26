//! Fleetquery core - device records and in-memory filter evaluation.
//!
//! The IoT hub executes device queries server-side from the SQL text built in
//! `fleetquery-proto`; the document-database repository cannot, so it fetches
//! the full device collection and narrows it here with the same clause
//! semantics.

pub mod error;
pub mod filter;
pub mod model;

pub use error::Error;
pub use filter::FilterEvaluator;
pub use model::{device_list_from_json, DeviceModel, DeviceProperties, SystemProperties};

/// Re-export protocol types.
pub use fleetquery_proto as proto;
