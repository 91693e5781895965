//! Detector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DetectError, Result};

/// Text shown to the user when the host asks for the phone state permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
}

impl Default for PermissionRationale {
    fn default() -> Self {
        Self {
            title: "Phone State Permission".to_string(),
            message: "This app needs access to your phone state in order to react and/or adapt to incoming calls.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Forward phone numbers to the host. Reading numbers needs the phone
    /// state permission, so this also makes the detector ask for it once
    /// before its first subscription. When false every payload carries an
    /// empty number and no permission is requested.
    pub read_phone_number: bool,
    pub permission_rationale: PermissionRationale,
}

impl DetectorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DetectError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DetectError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert!(!config.read_phone_number);
        assert_eq!(config.permission_rationale.title, "Phone State Permission");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DetectorConfig::from_json(r#"{"read_phone_number": true}"#).unwrap();
        assert!(config.read_phone_number);
        assert_eq!(config.permission_rationale, PermissionRationale::default());
    }

    #[test]
    fn test_custom_rationale() {
        let json = r#"{"permission_rationale": {"title": "Calls", "message": "Needed"}}"#;
        let config = DetectorConfig::from_json(json).unwrap();
        assert_eq!(config.permission_rationale.title, "Calls");
        assert_eq!(config.permission_rationale.message, "Needed");
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = DetectorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, DetectError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_flags() {
        let config = DetectorConfig {
            read_phone_number: true,
            permission_rationale: PermissionRationale {
                title: "Calls".to_string(),
                message: "Needed".to_string(),
            },
        };
        let parsed = DetectorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
