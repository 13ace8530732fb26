//! Device records as returned by the document database.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Error;

/// A device document.
///
/// Every field is optional: the store accepts partially provisioned devices,
/// and filtering must tolerate them without erroring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceModel {
    #[serde(rename = "DeviceProperties", skip_serializing_if = "Option::is_none")]
    pub device_properties: Option<DeviceProperties>,
    #[serde(rename = "SystemProperties", skip_serializing_if = "Option::is_none")]
    pub system_properties: Option<SystemProperties>,
    #[serde(rename = "IsSimulatedDevice")]
    pub is_simulated_device: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Version", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "ObjectType", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
}

impl DeviceModel {
    /// Tri-state hub registration flag: enabled, disabled, or `None` for a
    /// device that has not finished provisioning.
    pub fn hub_enabled_state(&self) -> Option<bool> {
        self.device_properties
            .as_ref()
            .and_then(|props| props.hub_enabled_state)
    }
}

/// Hardware-reported system properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemProperties {
    #[serde(rename = "ICCID", skip_serializing_if = "Option::is_none")]
    pub iccid: Option<String>,
}

/// Editable device metadata, the target of in-memory filtering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DeviceProperties {
    #[serde(rename = "DeviceID")]
    pub device_id: Option<String>,
    pub hub_enabled_state: Option<bool>,
    pub created_time: Option<DateTime<Utc>>,
    pub updated_time: Option<DateTime<Utc>>,
    pub device_state: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub platform: Option<String>,
    pub processor: Option<String>,
    #[serde(rename = "InstalledRAM")]
    pub installed_ram: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Customer-defined properties not covered by the schema above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl DeviceProperties {
    /// Case-insensitive lookup of a dotted property path, coerced to display
    /// text. Missing properties and JSON nulls both come back as the empty
    /// string, never an error.
    pub fn display_value(&self, path: &str) -> String {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        if let Some(text) = self.schema_field(head) {
            // Schema fields are scalars; a longer path cannot resolve.
            return if rest.is_some() { String::new() } else { text };
        }

        let mut value = match self.extra_value(head) {
            Some(value) => value,
            None => return String::new(),
        };
        if let Some(rest) = rest {
            for segment in rest.split('.') {
                value = match value {
                    JsonValue::Object(map) => {
                        match map.into_iter().find(|(k, _)| k.eq_ignore_ascii_case(segment)) {
                            Some((_, child)) => child,
                            None => return String::new(),
                        }
                    }
                    _ => return String::new(),
                };
            }
        }
        display_text(&value)
    }

    /// Display text for a schema field, or `None` when the name is not part
    /// of the schema.
    fn schema_field(&self, name: &str) -> Option<String> {
        let text = match name.to_ascii_lowercase().as_str() {
            "deviceid" => self.device_id.clone().unwrap_or_default(),
            "hubenabledstate" => self
                .hub_enabled_state
                .map(|b| b.to_string())
                .unwrap_or_default(),
            "createdtime" => self
                .created_time
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            "updatedtime" => self
                .updated_time
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            "devicestate" => self.device_state.clone().unwrap_or_default(),
            "manufacturer" => self.manufacturer.clone().unwrap_or_default(),
            "modelnumber" => self.model_number.clone().unwrap_or_default(),
            "serialnumber" => self.serial_number.clone().unwrap_or_default(),
            "firmwareversion" => self.firmware_version.clone().unwrap_or_default(),
            "platform" => self.platform.clone().unwrap_or_default(),
            "processor" => self.processor.clone().unwrap_or_default(),
            "installedram" => self.installed_ram.clone().unwrap_or_default(),
            "latitude" => self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            "longitude" => self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            _ => return None,
        };
        Some(text)
    }

    fn extra_value(&self, name: &str) -> Option<JsonValue> {
        self.extra
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

fn display_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Parse a document-database result set, dropping explicit JSON `null`
/// records before they reach the evaluator.
pub fn device_list_from_json(json: &str) -> Result<Vec<DeviceModel>, Error> {
    let records: Vec<Option<DeviceModel>> = serde_json::from_str(json)?;
    Ok(records.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props_with_device_id(id: &str) -> DeviceProperties {
        DeviceProperties {
            device_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_schema_lookup_is_case_insensitive() {
        let props = props_with_device_id("dev-01");
        assert_eq!(props.display_value("DeviceID"), "dev-01");
        assert_eq!(props.display_value("DEViceid"), "dev-01");
        assert_eq!(props.display_value("deviceid"), "dev-01");
    }

    #[test]
    fn test_missing_and_null_fields_are_empty_text() {
        let props = DeviceProperties::default();
        assert_eq!(props.display_value("DeviceID"), "");
        assert_eq!(props.display_value("NoSuchColumn"), "");
        assert_eq!(props.display_value(""), "");
    }

    #[test]
    fn test_schema_field_rejects_nested_path() {
        let props = props_with_device_id("dev-01");
        assert_eq!(props.display_value("DeviceID.length"), "");
    }

    #[test]
    fn test_extra_properties_with_dotted_path() {
        let props: DeviceProperties = serde_json::from_str(
            r#"{
                "DeviceID": "dev-01",
                "Building": {"Name": "B43", "Floor": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(props.display_value("building.name"), "B43");
        assert_eq!(props.display_value("Building.FLOOR"), "2");
        assert_eq!(props.display_value("building.wing"), "");
        assert_eq!(props.display_value("building.name.x"), "");
    }

    #[test]
    fn test_display_text_coercion() {
        assert_eq!(display_text(&JsonValue::Null), "");
        assert_eq!(display_text(&JsonValue::Bool(true)), "true");
        assert_eq!(display_text(&serde_json::json!(70)), "70");
        assert_eq!(display_text(&serde_json::json!("x")), "x");
    }

    #[test]
    fn test_device_document_parsing() {
        let device: DeviceModel = serde_json::from_str(
            r#"{
                "DeviceProperties": {
                    "DeviceID": "dev-01",
                    "HubEnabledState": true,
                    "CreatedTime": "2016-03-01T00:00:00Z",
                    "FirmwareVersion": "1.42",
                    "InstalledRAM": "8 GB"
                },
                "SystemProperties": {"ICCID": "8944"},
                "IsSimulatedDevice": true,
                "id": "doc-1"
            }"#,
        )
        .unwrap();
        assert_eq!(device.hub_enabled_state(), Some(true));
        assert!(device.is_simulated_device);
        let props = device.device_properties.unwrap();
        assert_eq!(props.display_value("FirmwareVersion"), "1.42");
        assert_eq!(props.display_value("InstalledRAM"), "8 GB");
    }

    #[test]
    fn test_device_list_drops_null_records() {
        let list = device_list_from_json(
            r#"[
                {"DeviceProperties": {"DeviceID": "a"}},
                null,
                {"DeviceProperties": {"DeviceID": "b"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[1].device_properties.as_ref().unwrap().display_value("DeviceID"),
            "b"
        );
    }

    #[test]
    fn test_device_list_bad_json() {
        assert!(matches!(
            device_list_from_json("not json"),
            Err(Error::Deserialization(_))
        ));
    }
}
