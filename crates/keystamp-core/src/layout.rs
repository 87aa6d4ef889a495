//! Field layout constants for the personalized regions of an executable
//!
//! This module centralizes the sizes of every patchable region.
//! Constants are organized by field type.

/// Key region layout (64-bit fingerprint slots)
pub mod key {
    /// One 64-bit slot before any padding
    pub const BLOCK_BYTES: usize = 8;

    /// One 32-bit half of a slot
    pub const HALF_BYTES: usize = 4;

    /// Longest padding gap the bridge scan will cross
    pub const PADDING_WINDOW: usize = 32;

    /// Slot index of the reported key, in strides from the first fingerprint
    pub const KEY_SLOT: usize = 3;

    /// Bytes between two consecutive slots, padding included
    pub const fn packed_len(inter: usize, intra: usize) -> usize {
        BLOCK_BYTES + inter + intra
    }
}

/// Message field layout, in tokens (shared by title and caption)
pub mod message {
    /// Prefix fingerprint length
    pub const PREFIX_TOKENS: usize = 4;

    /// Tokens between the field offset and the length token
    pub const FRONT_PADDING_TOKENS: usize = PREFIX_TOKENS;

    pub const LENGTH_TOKENS: usize = 1;

    /// Maximum characters a message slot can hold
    pub const MAX_CHARS: usize = 64;

    /// Guard tokens after the character area
    pub const END_PADDING_TOKENS: usize = 4;

    /// Total reserved slot length
    pub const SLOT_TOKENS: usize =
        FRONT_PADDING_TOKENS + LENGTH_TOKENS + MAX_CHARS + END_PADDING_TOKENS;

    /// Multiplier applied to each stored character code
    pub const CHAR_FACTOR: u32 = 3;
}

/// Evaluation-expiration date layout, in tokens
pub mod date {
    pub const PREFIX_TOKENS: usize = super::message::PREFIX_TOKENS;

    /// Year offset, month, day
    pub const FIELD_TOKENS: usize = 3;

    /// Stored year is relative to this base
    pub const YEAR_BASE: i32 = 2010;
}

/// Embedded image block layout, in bytes
pub mod image {
    pub const START_MARKER_LEN: usize = 14;
    pub const END_MARKER_LEN: usize = 4;

    pub const WIDTH: u32 = 128;
    pub const HEIGHT: u32 = 128;

    /// Enabled flag (1) + width (4) + height (4) + format tag (4)
    pub const HEADER_BYTES: usize = 1 + 4 + 4 + 4;

    /// Raw RGB payload
    pub const PIXEL_BYTES: usize = (WIDTH * HEIGHT * 3) as usize;

    /// Format tag for raw RGB
    pub const FORMAT_RAW_RGB: u32 = 0;

    /// Whole block, markers included (49,183 bytes)
    pub const BLOCK_LEN: usize = START_MARKER_LEN + HEADER_BYTES + PIXEL_BYTES + END_MARKER_LEN;
}

/// Offset from a located 32-bit Mac slice result to where the 64-bit slice
/// search resumes
pub const PLATFORM_STACK_STEP: usize = 10;
