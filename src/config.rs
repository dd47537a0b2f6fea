//! Gate configuration: storage key, sentinel, element ids and timings.

use crate::error::{ConsentError, Result};
use crate::{
    DEFAULT_FADE_IN_MS, DEFAULT_FADE_OUT_MS, DEFAULT_GRANTED_VALUE, DEFAULT_MAX_WIDTH_PX,
    DEFAULT_REMOVAL_DELAY_MS, DEFAULT_SCALE_IN_DELAY_MS, DEFAULT_SCALE_IN_MS, DEFAULT_STORAGE_KEY,
    DEFAULT_Z_INDEX,
};
use serde::{Deserialize, Serialize};

/// Ids of the three banner controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlIds {
    pub settings: String,
    pub reject: String,
    pub accept: String,
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            settings: "cookie-settings-btn".to_string(),
            reject: "cookie-reject-btn".to_string(),
            accept: "cookie-accept-btn".to_string(),
        }
    }
}

/// Animation timings (ms).
///
/// Entrance: the overlay fades in while the modal scales in after a short
/// delay. Exit: the overlay fades out and the nodes are removed once
/// `removal_delay_ms` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    pub fade_in_ms: u32,
    pub scale_in_ms: u32,
    pub scale_in_delay_ms: u32,
    pub fade_out_ms: u32,
    pub removal_delay_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            fade_in_ms: DEFAULT_FADE_IN_MS,
            scale_in_ms: DEFAULT_SCALE_IN_MS,
            scale_in_delay_ms: DEFAULT_SCALE_IN_DELAY_MS,
            fade_out_ms: DEFAULT_FADE_OUT_MS,
            removal_delay_ms: DEFAULT_REMOVAL_DELAY_MS,
        }
    }
}

/// Complete gate configuration.
///
/// Every field has a default, so a partial JSON object (or `undefined` from
/// JS) yields a usable config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    /// Store key holding the consent record.
    pub storage_key: String,

    /// Value meaning "consent flow completed".
    pub granted_value: String,

    pub overlay_id: String,
    pub modal_id: String,
    pub control_ids: ControlIds,

    /// Relative links, resolved by the host page.
    pub cookie_policy_href: String,
    pub privacy_policy_href: String,

    pub timing: Timing,

    /// Stacking order of the overlay. Must sit above everything on the page.
    pub z_index: u32,

    pub max_width_px: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            granted_value: DEFAULT_GRANTED_VALUE.to_string(),
            overlay_id: "cookie-consent-overlay".to_string(),
            modal_id: "cookie-consent-modal".to_string(),
            control_ids: ControlIds::default(),
            cookie_policy_href: "cookie-policy.html".to_string(),
            privacy_policy_href: "privacy-policy.html".to_string(),
            timing: Timing::default(),
            z_index: DEFAULT_Z_INDEX,
            max_width_px: DEFAULT_MAX_WIDTH_PX,
        }
    }
}

impl GateConfig {
    /// Default config with a site-specific storage key.
    pub fn with_storage_key(key: impl Into<String>) -> Self {
        Self {
            storage_key: key.into(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConsentError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConsentError::InvalidConfig(
                "storageKey must not be empty".to_string(),
            ));
        }
        if self.granted_value.is_empty() {
            return Err(ConsentError::InvalidConfig(
                "grantedValue must not be empty".to_string(),
            ));
        }

        let ids = self.element_ids();
        for (i, id) in ids.iter().enumerate() {
            if id.trim().is_empty() {
                return Err(ConsentError::InvalidConfig(
                    "element ids must not be empty".to_string(),
                ));
            }
            // Ids double as CSS selectors in the injected style block.
            if !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConsentError::InvalidConfig(format!(
                    "element id '{}' must be alphanumeric, '-' or '_'",
                    id
                )));
            }
            if ids[..i].contains(id) {
                return Err(ConsentError::InvalidConfig(format!(
                    "duplicate element id '{}'",
                    id
                )));
            }
        }

        // Removing the overlay before the fade finishes makes it pop.
        if self.timing.removal_delay_ms < self.timing.fade_out_ms {
            return Err(ConsentError::InvalidConfig(format!(
                "removalDelayMs ({}) must be >= fadeOutMs ({})",
                self.timing.removal_delay_ms, self.timing.fade_out_ms
            )));
        }

        Ok(())
    }

    fn element_ids(&self) -> [&str; 5] {
        [
            self.overlay_id.as_str(),
            self.modal_id.as_str(),
            self.control_ids.settings.as_str(),
            self.control_ids.reject.as_str(),
            self.control_ids.accept.as_str(),
        ]
    }
}
