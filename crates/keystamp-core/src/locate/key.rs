//! License key field discovery

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::PlatformBundle;
use super::constants::KEY_FINGERPRINTS;
use crate::encoding::{EncodingProfile, Platform};
use crate::error::{Error, Result};
use crate::layout::PLATFORM_STACK_STEP;
use crate::layout::key::{HALF_BYTES, KEY_SLOT};
use crate::scan::{Block, PaddingProfile, Scanner};

/// Chain matched against the binary; the third slot is stepped over
pub const KEY_CHAIN: [Block; 5] = [
    Block::Value(KEY_FINGERPRINTS[0]),
    Block::Value(KEY_FINGERPRINTS[1]),
    Block::Skip,
    Block::Value(KEY_FINGERPRINTS[2]),
    Block::Value(KEY_FINGERPRINTS[3]),
];

/// Location of the key field and the padding needed to write it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOffset {
    pub byte_offset: usize,
    pub padding: PaddingProfile,
}

impl KeyOffset {
    /// Where the second 32-bit half of the key goes.
    ///
    /// A record whose padding was never discovered cannot be written or read.
    pub fn second_half_offset(&self) -> Result<usize> {
        let (Some(_), Some(intra)) = (self.padding.inter, self.padding.intra) else {
            return Err(Error::Validation(format!(
                "Key offset {} has unknown padding",
                self
            )));
        };
        let delta = HALF_BYTES + intra;
        self.byte_offset
            .checked_add(delta)
            .ok_or(Error::OffsetOverflow {
                offset: self.byte_offset,
                delta,
            })
    }
}

/// `byteOffset,interPadding,intraPadding`, `-1` for unknown padding
impl fmt::Display for KeyOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = |value: Option<usize>| value.map_or_else(|| "-1".to_string(), |v| v.to_string());
        write!(
            f,
            "{},{},{}",
            self.byte_offset,
            pad(self.padding.inter),
            pad(self.padding.intra)
        )
    }
}

impl FromStr for KeyOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [offset, inter, intra] = parts.as_slice() else {
            return Err(Error::Validation(format!(
                "Key offset record '{}' must have 3 comma-separated fields",
                s
            )));
        };

        let byte_offset = offset
            .parse::<usize>()
            .map_err(|e| Error::Validation(format!("Invalid key offset '{}': {}", offset, e)))?;

        Ok(Self {
            byte_offset,
            padding: PaddingProfile {
                inter: parse_padding(inter)?,
                intra: parse_padding(intra)?,
            },
        })
    }
}

fn parse_padding(s: &str) -> Result<Option<usize>> {
    let value = s
        .parse::<i64>()
        .map_err(|e| Error::Validation(format!("Invalid padding '{}': {}", s, e)))?;
    match value {
        -1 => Ok(None),
        v if v >= 0 => Ok(Some(v as usize)),
        v => Err(Error::Validation(format!("Padding must be >= -1, got {}", v))),
    }
}

/// Locate the key field searching from `start`
pub fn locate_key(data: &[u8], start: usize, profile: EncodingProfile) -> Result<Option<KeyOffset>> {
    locate_key_with(data, start, profile, PaddingProfile::UNKNOWN)
}

/// Locate the key field, enforcing padding established by an earlier match
pub fn locate_key_with(
    data: &[u8],
    start: usize,
    profile: EncodingProfile,
    known: PaddingProfile,
) -> Result<Option<KeyOffset>> {
    let scanner = Scanner::new(data);
    let Some(found) = scanner.find_blocks(start, &KEY_CHAIN, profile.order, known)? else {
        debug!("Key fingerprints not found from 0x{:X} ({:?})", start, profile);
        return Ok(None);
    };

    let packed = found.padding.packed_len();
    let key = KeyOffset {
        byte_offset: found.start + KEY_SLOT * packed,
        padding: found.padding,
    };
    info!(
        "Key field at 0x{:X} (inter={:?}, intra={:?})",
        key.byte_offset, key.padding.inter, key.padding.intra
    );
    Ok(Some(key))
}

/// Locate the key in each slice of a Mac universal binary.
///
/// The x64 slice is searched just past the x86 result, so it is absent
/// whenever the x86 slice is.
pub fn locate_mac_keys(data: &[u8]) -> Result<PlatformBundle<KeyOffset>> {
    let ppc = locate_key(data, 0, Platform::MacPpc.profile())?;
    let x86 = locate_key(data, 0, Platform::MacX86.profile())?;
    let x64 = match x86 {
        Some(x86) => locate_key(
            data,
            x86.byte_offset + PLATFORM_STACK_STEP,
            Platform::MacX64.profile(),
        )?,
        None => None,
    };

    Ok(PlatformBundle { ppc, x86, x64 })
}
