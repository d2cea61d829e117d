/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Dictionary encode configuration.
//!
//! This module provides the options every encode entry point takes.

use ironrwf_core::Verbosity;
use serde::{Deserialize, Serialize};

/// Default bytes reserved per field row beyond its acronyms.
pub const DEFAULT_ENTRY_HEADROOM: usize = 14;

/// Options for dictionary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Detail level of the encoded payload.
    pub verbosity: Verbosity,
    /// Bytes a part must still have, beyond the row's acronyms, before a
    /// field row is attempted.
    pub entry_headroom: usize,
    /// Whether the first part carries the total entry count.
    pub total_count_hint: bool,
}

impl EncodeConfig {
    /// Creates a configuration with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            entry_headroom: DEFAULT_ENTRY_HEADROOM,
            total_count_hint: true,
        }
    }

    /// Sets the verbosity.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Sets the per-row headroom.
    #[must_use]
    pub const fn with_entry_headroom(mut self, bytes: usize) -> Self {
        self.entry_headroom = bytes;
        self
    }

    /// Sets whether the total count hint is written.
    #[must_use]
    pub const fn with_total_count_hint(mut self, enabled: bool) -> Self {
        self.total_count_hint = enabled;
        self
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for encode configuration.
#[derive(Debug, Default)]
pub struct EncodeConfigBuilder {
    verbosity: Option<Verbosity>,
    entry_headroom: Option<usize>,
    total_count_hint: Option<bool>,
}

impl EncodeConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the verbosity.
    #[must_use]
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    /// Sets the per-row headroom.
    #[must_use]
    pub fn entry_headroom(mut self, bytes: usize) -> Self {
        self.entry_headroom = Some(bytes);
        self
    }

    /// Sets whether the total count hint is written.
    #[must_use]
    pub fn total_count_hint(mut self, enabled: bool) -> Self {
        self.total_count_hint = Some(enabled);
        self
    }

    /// Builds the configuration, filling unset options with defaults.
    #[must_use]
    pub fn build(self) -> EncodeConfig {
        let defaults = EncodeConfig::new();
        EncodeConfig {
            verbosity: self.verbosity.unwrap_or(defaults.verbosity),
            entry_headroom: self.entry_headroom.unwrap_or(defaults.entry_headroom),
            total_count_hint: self.total_count_hint.unwrap_or(defaults.total_count_hint),
        }
    }
}
