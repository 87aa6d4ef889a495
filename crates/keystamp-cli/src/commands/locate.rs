//! Locate command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use keystamp_core::{FieldKind, OffsetInfo, Platform};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

use super::scan_error;

/// Run the locate command
pub fn run(exe: &Path, platform: Platform, json: bool) -> Result<()> {
    let data = fs::read(exe).with_context(|| format!("Failed to read {}", exe.display()))?;

    let mut info = OffsetInfo::default();
    if platform.is_mac() {
        info.scan_mac(&data).map_err(scan_error)?;
    } else {
        info.scan_windows(&data).map_err(scan_error)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} ({}, {} bytes)", exe.display(), platform, data.len());
    println!();
    for (label, value) in report(&info, platform) {
        match value {
            Some(text) => println!("  {:<8} {}", label, text.green()),
            None => println!("  {:<8} {}", label, "not found".yellow()),
        }
    }

    Ok(())
}

fn report(info: &OffsetInfo, platform: Platform) -> Vec<(String, Option<String>)> {
    let mut rows = vec![(
        "key".to_string(),
        info.key_for(platform).map(|key| {
            format!(
                "0x{:X} (inter={}, intra={})",
                key.byte_offset,
                padding_text(key.padding.inter),
                padding_text(key.padding.intra)
            )
        }),
    )];

    for kind in FieldKind::iter() {
        rows.push((
            kind.to_string(),
            info.field_for(platform, kind).map(|v| format!("0x{:X}", v)),
        ));
    }

    if !platform.is_mac() {
        rows.push(("image".to_string(), info.image.map(|v| format!("0x{:X}", v))));
    }
    rows
}

fn padding_text(value: Option<usize>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystamp_core::{KeyOffset, PaddingProfile, PlatformBundle};

    #[test]
    fn test_report_desktop_rows() {
        let info = OffsetInfo {
            key: Some(KeyOffset {
                byte_offset: 0x40,
                padding: PaddingProfile {
                    inter: Some(4),
                    intra: None,
                },
            }),
            caption: Some(0x100),
            ..Default::default()
        };

        let rows = report(&info, Platform::Windows);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].1.as_deref(), Some("0x40 (inter=4, intra=?)"));
        assert_eq!(rows[1], ("title".to_string(), None));
        assert_eq!(rows[2].1.as_deref(), Some("0x100"));
        assert_eq!(rows[4].0, "image");
    }

    #[test]
    fn test_report_mac_rows() {
        let info = OffsetInfo {
            mac_expiry: PlatformBundle {
                ppc: Some(0x20),
                x86: None,
                x64: None,
            },
            ..Default::default()
        };

        let rows = report(&info, Platform::MacPpc);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], ("expiry".to_string(), Some("0x20".to_string())));
    }
}
