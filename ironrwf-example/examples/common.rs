//! Common utilities shared across examples.

#![allow(dead_code)]

use std::env;

/// Default size of one encoded part.
pub const DEFAULT_PART_SIZE: usize = 512;

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Returns the part size from `RWF_PART_SIZE`, or the default.
#[must_use]
pub fn part_size() -> usize {
    env::var("RWF_PART_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PART_SIZE)
}

/// Renders bytes as space separated hex.
#[must_use]
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
