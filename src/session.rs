//! Wheel launch state
//!
//! The wheel view is entered with an opaque `{entries, customization}` state
//! object handed over by the configuration view. Anything missing or
//! malformed sends the user back there instead of rendering.

use serde::{Deserialize, Serialize};

use crate::customization::Customization;
use crate::entries::parse_entries;
use crate::error::ConfigurationMissingError;

/// Everything the wheel view needs to start a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelLaunch {
    pub entries: Vec<String>,
    pub customization: Customization,
}

impl WheelLaunch {
    /// Build a launch from already-validated parts
    pub fn new(
        entries: Vec<String>,
        customization: Customization,
    ) -> Result<Self, ConfigurationMissingError> {
        Self {
            entries,
            customization,
        }
        .validated()
    }

    /// Parse the navigation state object. `None` means no state was passed.
    pub fn from_state_json(state: Option<&str>) -> Result<Self, ConfigurationMissingError> {
        let json = match state.map(str::trim) {
            None | Some("") | Some("null") | Some("undefined") => {
                return Err(ConfigurationMissingError::Absent);
            }
            Some(json) => json,
        };
        let launch: Self = serde_json::from_str(json)
            .map_err(|e| ConfigurationMissingError::Malformed(e.to_string()))?;
        launch.validated()
    }

    /// Re-apply the entry rules (trimmed, non-empty) to whatever came in
    fn validated(mut self) -> Result<Self, ConfigurationMissingError> {
        self.entries = self
            .entries
            .iter()
            .flat_map(|entry| parse_entries(entry))
            .collect();
        if self.entries.is_empty() {
            return Err(ConfigurationMissingError::NoEntries);
        }
        Ok(self)
    }

    pub fn to_state_json(&self) -> String {
        // Plain strings and enums only; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
