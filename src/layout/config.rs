//! Configuration for the layout engine

use serde::Deserialize;

use super::types::Insets;

/// Configuration options for a layout engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether inset region anchors exist on this platform
    pub inset_region_available: bool,

    /// Safe-area insets given to views that do not set their own
    pub default_safe_area: Insets,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inset_region_available: true,
            default_safe_area: Insets::zero(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether inset region anchors are available
    pub fn with_inset_region(mut self, available: bool) -> Self {
        self.inset_region_available = available;
        self
    }

    /// Set the default safe-area insets
    pub fn with_default_safe_area(mut self, insets: Insets) -> Self {
        self.default_safe_area = insets;
        self
    }
}
