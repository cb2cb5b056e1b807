//! Delegate configuration.
//!
//! Configuration is plain data, loadable from TOML. Every field has a
//! default, so a partial (or empty) document is valid:
//!
//! ```ignore
//! let config = DelegateConfig::from_toml_str(r#"
//! content_capture_enabled = false
//! log_events = true
//! "#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SemanticsError, SemanticsResult};

/// Mask character used by password fields when nothing else is configured.
pub const DEFAULT_PASSWORD_MASK: char = '\u{2022}';

/// Behavior switches for a [`SemanticsDelegate`](crate::SemanticsDelegate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Send accessibility events to the sink. When off, passes still update
    /// snapshots but stay silent.
    pub accessibility_enabled: bool,
    /// Feed structural changes into the capture buffers.
    pub content_capture_enabled: bool,
    /// Character a password field renders in place of each hidden char.
    pub password_mask_char: char,
    /// Trace every emitted event.
    pub log_events: bool,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            accessibility_enabled: true,
            content_capture_enabled: true,
            password_mask_char: DEFAULT_PASSWORD_MASK,
            log_events: false,
        }
    }
}

impl DelegateConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> SemanticsResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SemanticsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SemanticsError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> SemanticsResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Whether any event or buffer output is produced at all.
    pub fn is_silent(&self) -> bool {
        !self.accessibility_enabled && !self.content_capture_enabled
    }
}
