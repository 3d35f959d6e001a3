use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Charger identifier as used in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalId(String);

impl PhysicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id can be placed in a URL path segment verbatim:
    /// non-empty, not a dot segment, and made only of unreserved characters.
    pub fn is_path_safe(&self) -> bool {
        let id = self.0.as_str();
        !id.is_empty()
            && id != "."
            && id != ".."
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
    }
}

impl fmt::Display for PhysicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhysicalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PhysicalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Requested charging power in kilowatts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Power(pub f64);

/// One entry of `chargepoints/owned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub charge_point_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_loadbalanced: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectors: Option<Vec<Connector>>,
    /// Fields not modelled above, kept as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_point_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `chargepoints/{id}/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_statuses: Option<Vec<ConnectorStatus>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_point_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_consumption_kwh: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn path_safe_ids() {
        for id in ["abc123", "2012-000-123", "A_b.c~d"] {
            assert!(PhysicalId::from(id).is_path_safe(), "{id} should be accepted");
        }
        for id in ["", ".", "..", "a/b", "a b", "a?x=1", "%2e", "ä"] {
            assert!(!PhysicalId::from(id).is_path_safe(), "{id} should be rejected");
        }
    }

    #[test]
    fn unknown_status_fields_are_kept() {
        let status: ChargerStatus = serde_json::from_value(json!({"battery": 80})).unwrap();
        assert_eq!(status.extra.get("battery"), Some(&json!(80)));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!({"battery": 80}));
    }

    #[test]
    fn device_metadata_decodes_known_fields() {
        let device: DeviceMetadata = serde_json::from_value(json!({
            "id": "2012-000-123",
            "name": "Garage",
            "type": "HALO",
            "isLoadbalanced": false,
            "firmwareVersion": "5.3",
            "connectors": [{"chargePointId": "2012-000-123", "connectorId": 1, "type": "Type2"}],
            "serialNumber": "X1"
        }))
        .unwrap();
        assert_eq!(device.id, "2012-000-123");
        assert_eq!(device.charge_point_type.as_deref(), Some("HALO"));
        let connectors = device.connectors.unwrap();
        assert_eq!(connectors[0].connector_id, Some(1));
        assert_eq!(device.extra.get("serialNumber"), Some(&json!("X1")));
    }
}
