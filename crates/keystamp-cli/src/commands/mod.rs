//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod dump;
pub mod hex_utils;
pub mod hexdump;
pub mod info;
pub mod inspect;
pub mod keygen;
pub mod locate;
pub mod patch;

use anyhow::anyhow;

/// Attach a hint to scan failures caused by a key region that was already patched
pub fn scan_error(err: keystamp_core::Error) -> anyhow::Error {
    if err.is_layout_drift() {
        anyhow!(err).context(
            "Key fingerprints no longer line up; the executable looks already personalized. \
             Patch it with the offsets file saved before the first patch",
        )
    } else {
        anyhow!(err).context("Failed to scan executable")
    }
}
