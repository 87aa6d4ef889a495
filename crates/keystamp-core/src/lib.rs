//! # keystamp-core
//!
//! Inspection and patching engine for personalizing compiled executables.
//!
//! This crate provides:
//! - Token serialization per target platform (width and byte order)
//! - Fingerprint scanning with wildcards and padding discovery
//! - Locators for the license key, message slots, expiry date and splash image
//! - In-place patch writers and read-back of patched fields
//! - License key derivation from seeds
//! - Persistence of discovered offsets

pub mod encoding;
pub mod error;
pub mod keygen;
pub mod layout;
pub mod locate;
pub mod offset;
pub mod patch;
pub mod scan;

#[cfg(test)]
mod testing;

pub use encoding::{ByteOrder, EncodingProfile, Platform, TokenWidth};
pub use error::{Error, Result};
pub use keygen::{SEED_COUNT, derive_key, derive_table};
pub use locate::{
    FieldKind, KeyOffset, PlatformBundle, locate_field, locate_image, locate_key,
    locate_key_with, locate_mac_field, locate_mac_keys,
};
pub use offset::{
    OffsetDump, OffsetInfo, format_offsets, generate_offsets, load_offsets, parse_offsets,
    save_offsets,
};
pub use patch::{
    ImageHeader, load_image, read_date, read_image, read_image_header, read_key, read_message,
    write_date, write_image, write_key, write_message,
};
pub use scan::{Block, BlockMatch, PaddingProfile, Scanner};
