//! Fingerprints compiled into personalizable executables
//!
//! # Key region
//!
//! ```text
//!  stride = packed key length (8 + inter + intra)
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┐
//! │  KEY[0]  │  KEY[1]  │ (unread) │  KEY[2]  │  KEY[3]  │
//! └──────────┴──────────┴──────────┴──────────┴──────────┘
//!  0          1·stride   2·stride   3·stride   4·stride
//! ```
//!
//! The reported key offset is the `KEY[2]` slot. Once a key is written
//! there the region no longer matches, which is why offsets are persisted
//! in an info file before the first patch.
//!
//! # Message and date prefixes
//!
//! Four logical tokens immediately precede each message slot and the
//! expiration date fields.

/// Key region fingerprints
pub const KEY_FINGERPRINTS: [u64; 4] = [
    0x4B53_5449_A7C3_19E5,
    0x91D2_6E0F_38B4_C75A,
    0xC0DE_5EED_1357_9BDF,
    0x6A89_F1E2_D4B7_2C03,
];

/// Title message prefix
pub const TITLE_PREFIX: [u16; 4] = [0x5449, 0x544C, 0x9E3A, 0x71C5];

/// Secondary caption prefix
pub const CAPTION_PREFIX: [u16; 4] = [0x4341, 0x5054, 0x8B27, 0x64D9];

/// Evaluation-expiration date prefix
pub const EXPIRY_PREFIX: [u16; 4] = [0x4558, 0x5052, 0xA61F, 0x3CB8];

/// Embedded image start marker
pub const IMAGE_START: [u8; 14] = *b"<<SPLASH_IMG>>";

/// Embedded image end marker
pub const IMAGE_END: [u8; 4] = *b"/IMG";
