//! In-memory device list filtering.
//!
//! This module applies the same clause semantics that `fleetquery_proto::sql`
//! renders into hub SQL, but directly against fetched device records. It is
//! used by the document-database repository, which cannot push filtering into
//! the store and must narrow a full collection scan client-side.

use fleetquery_proto::{Clause, ClauseType};
use tracing::debug;

use crate::error::Error;
use crate::model::DeviceModel;

/// Evaluates device-list clauses against in-memory device records.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Apply `clauses` in order, keeping the devices that match all of them.
    ///
    /// Clauses compose by intersection; input order of the surviving devices
    /// is preserved. Clauses with a blank column name are skipped. Devices
    /// with absent properties never match a clause (except a pending-status
    /// one) and never cause an error.
    pub fn filter_device_list(
        devices: Vec<DeviceModel>,
        clauses: &[Clause],
    ) -> Result<Vec<DeviceModel>, Error> {
        let input_len = devices.len();
        let mut devices = devices;
        for clause in clauses {
            if clause.is_blank() {
                continue;
            }
            let mut kept = Vec::with_capacity(devices.len());
            for device in devices {
                if Self::matches(&device, clause)? {
                    kept.push(device);
                }
            }
            devices = kept;
        }
        debug!(
            input = input_len,
            output = devices.len(),
            clauses = clauses.len(),
            "filtered device list"
        );
        Ok(devices)
    }

    fn matches(device: &DeviceModel, clause: &Clause) -> Result<bool, Error> {
        // The derived Status pseudo-column bypasses property lookup.
        if clause.clause_type == ClauseType::Status
            || clause.column_name.eq_ignore_ascii_case("status")
        {
            return Self::matches_status(device, clause.value.as_str());
        }

        let text = match &device.device_properties {
            Some(props) => props.display_value(&clause.column_name),
            None => return Ok(false),
        };
        Ok(Self::text_matches(&text, clause))
    }

    /// Match the tri-state hub registration flag against a status literal:
    /// Running, Disabled, or Pending (absent flag or absent properties).
    fn matches_status(device: &DeviceModel, status: &str) -> Result<bool, Error> {
        if status.is_empty() {
            return Ok(false);
        }
        let enabled = device.hub_enabled_state();
        match status.to_uppercase().as_str() {
            "RUNNING" => Ok(enabled == Some(true)),
            "DISABLED" => Ok(enabled == Some(false)),
            "PENDING" => Ok(enabled.is_none()),
            _ => Err(Error::UnknownStatus(status.to_string())),
        }
    }

    fn text_matches(text: &str, clause: &Clause) -> bool {
        let needle = clause.value.as_str();
        match clause.clause_type {
            ClauseType::ContainsCaseInsensitive => fold(text).contains(&fold(needle)),
            ClauseType::ContainsCaseSensitive => text.contains(needle),
            ClauseType::ExactMatchCaseInsensitive => fold(text) == fold(needle),
            ClauseType::ExactMatchCaseSensitive => text == needle,
            ClauseType::StartsWithCaseInsensitive => fold(text).starts_with(&fold(needle)),
            ClauseType::StartsWithCaseSensitive => text.starts_with(needle),
            // Comparison operators are pushed into hub SQL; they never match
            // during in-memory filtering.
            _ => false,
        }
    }
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}
