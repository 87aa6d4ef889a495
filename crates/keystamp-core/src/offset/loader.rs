//! Text persistence of discovered offsets
//!
//! One `label:value` entry per line. Desktop and per-slice Mac keys are
//! `offset,inter,intra`; Mac message and date offsets are `ppc,x86,x64`.
//! Entries that were never discovered are left out.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::OffsetInfo;
use crate::error::{Error, Result};
use crate::locate::{KeyOffset, PlatformBundle};

pub mod label {
    pub const KEY: &str = "key";
    pub const TITLE: &str = "title";
    pub const CAPTION: &str = "caption";
    pub const EXPIRY: &str = "expiry";
    pub const IMAGE: &str = "image";
    pub const MAC_KEY_PPC: &str = "mac_key_ppc";
    pub const MAC_KEY_X86: &str = "mac_key_x86";
    pub const MAC_KEY_X64: &str = "mac_key_x64";
    pub const MAC_TITLE: &str = "mac_title";
    pub const MAC_CAPTION: &str = "mac_caption";
    pub const MAC_EXPIRY: &str = "mac_expiry";
}

/// Render `info` in the info-file format
pub fn format_offsets(info: &OffsetInfo) -> String {
    let mut out = String::new();
    let mut entry = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = writeln!(out, "{}:{}", name, value);
        }
    };

    entry(label::KEY, info.key.map(|k| k.to_string()));
    entry(label::TITLE, info.title.map(|v| v.to_string()));
    entry(label::CAPTION, info.caption.map(|v| v.to_string()));
    entry(label::EXPIRY, info.expiry.map(|v| v.to_string()));
    entry(label::IMAGE, info.image.map(|v| v.to_string()));
    entry(label::MAC_KEY_PPC, info.mac_key.ppc.map(|k| k.to_string()));
    entry(label::MAC_KEY_X86, info.mac_key.x86.map(|k| k.to_string()));
    entry(label::MAC_KEY_X64, info.mac_key.x64.map(|k| k.to_string()));
    entry(label::MAC_TITLE, bundle_text(&info.mac_title));
    entry(label::MAC_CAPTION, bundle_text(&info.mac_caption));
    entry(label::MAC_EXPIRY, bundle_text(&info.mac_expiry));

    out
}

fn bundle_text(bundle: &PlatformBundle<usize>) -> Option<String> {
    (!bundle.is_empty()).then(|| bundle.to_string())
}

/// Parse the info-file format
pub fn parse_offsets(content: &str) -> Result<OffsetInfo> {
    let mut info = OffsetInfo::default();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::Validation(format!(
                "Line {}: expected 'label:value', got '{}'",
                line_no + 1,
                line
            )));
        };
        let value = value.trim();

        match name.trim() {
            label::KEY => info.key = parse_key(value, line_no)?,
            label::TITLE => info.title = Some(parse_offset(value)?),
            label::CAPTION => info.caption = Some(parse_offset(value)?),
            label::EXPIRY => info.expiry = Some(parse_offset(value)?),
            label::IMAGE => info.image = Some(parse_offset(value)?),
            label::MAC_KEY_PPC => info.mac_key.ppc = parse_key(value, line_no)?,
            label::MAC_KEY_X86 => info.mac_key.x86 = parse_key(value, line_no)?,
            label::MAC_KEY_X64 => info.mac_key.x64 = parse_key(value, line_no)?,
            label::MAC_TITLE => info.mac_title = value.parse()?,
            label::MAC_CAPTION => info.mac_caption = value.parse()?,
            label::MAC_EXPIRY => info.mac_expiry = value.parse()?,
            other => warn!("Skipping unknown label '{}' on line {}", other, line_no + 1),
        }
    }

    debug!("Parsed {} offsets", info.found_count());
    Ok(info)
}

/// A key record without discovered padding (`0,-1,-1`) marks a key that was
/// not found and cannot be patched
fn parse_key(value: &str, line_no: usize) -> Result<Option<KeyOffset>> {
    let key = value.parse::<KeyOffset>()?;
    if !key.padding.is_known() {
        warn!("Line {}: key record '{}' has unknown padding, ignoring it", line_no + 1, value);
        return Ok(None);
    }
    Ok(Some(key))
}

fn parse_offset(value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|e| Error::Validation(format!("Invalid offset '{}': {}", value, e)))
}

pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetInfo> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let info = parse_offsets(&content)?;
    info!("Loaded {} offsets from {}", info.found_count(), path.display());
    Ok(info)
}

pub fn save_offsets<P: AsRef<Path>>(path: P, info: &OffsetInfo) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_offsets(info))?;
    info!("Saved {} offsets to {}", info.found_count(), path.display());
    Ok(())
}
