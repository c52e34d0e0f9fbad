//! Per-parse configuration.

use serde::{Deserialize, Serialize};

/// Instrumentation switches for one parse. Both default to off; either, both
/// or neither may be enabled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Attach `bounds` (start and end positions) to every node.
    pub capture_all_bounds: bool,
    /// Attach `offset` (start position and length) to every node.
    pub capture_all_offsets: bool,
}

impl ParseOptions {
    pub fn with_bounds(mut self, enabled: bool) -> Self {
        self.capture_all_bounds = enabled;
        self
    }

    pub fn with_offsets(mut self, enabled: bool) -> Self {
        self.capture_all_offsets = enabled;
        self
    }

    /// Whether any instrumentation is requested.
    pub fn instruments(&self) -> bool {
        self.capture_all_bounds || self.capture_all_offsets
    }

    /// Reads options from a JSON object such as `{"captureAllBounds": true}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
