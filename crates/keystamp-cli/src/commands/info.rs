//! Info command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use keystamp_core::{generate_offsets, save_offsets};
use owo_colors::OwoColorize;
use tracing::warn;

use super::scan_error;

/// Run the info command
pub fn run(windows: Option<&Path>, mac: Option<&Path>, output: &Path) -> Result<()> {
    if windows.is_none() && mac.is_none() {
        bail!("Nothing to scan: pass --windows and/or --mac");
    }

    let info = generate_offsets(windows, mac).map_err(scan_error)?;
    if !info.is_valid() {
        bail!("No fields were found; {} not written", output.display());
    }

    save_offsets(output, &info)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if windows.is_some() {
        for label in info.missing() {
            warn!("Desktop {} field not found", label);
        }
    }
    if mac.is_some() && !info.mac_key.is_complete() {
        warn!("Mac key not found in every slice: {}", info.mac_key);
    }

    println!(
        "{} {} offsets to {}",
        "Saved".green(),
        info.found_count(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystamp_core::locate::KEY_CHAIN;
    use keystamp_core::scan::Block;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_requires_an_executable() {
        let out = NamedTempFile::new().unwrap();
        assert!(run(None, None, out.path()).is_err());
    }

    /// Key chain with 4-byte inter padding whose reported slot now holds a
    /// key starting with the first byte of KEY[2]
    fn personalized_binary() -> Vec<u8> {
        let mut data = vec![0u8; 1024];
        for (index, block) in KEY_CHAIN.iter().enumerate() {
            let value = match *block {
                Block::Value(value) => value,
                Block::Skip => 0x1111_1111_1111_1111,
            };
            let at = 100 + index * 12;
            data[at..at + 8].copy_from_slice(&value.to_le_bytes());
        }
        data[136..144].copy_from_slice(&0x00DF_0000_0000_0000u64.to_le_bytes());
        data
    }

    #[test]
    fn test_personalized_executable_explains_drift() {
        let exe = NamedTempFile::new().unwrap();
        fs::write(exe.path(), personalized_binary()).unwrap();
        let out = NamedTempFile::new().unwrap();

        let err = run(Some(exe.path()), None, out.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("already personalized"));
        assert!(
            err.downcast_ref::<keystamp_core::Error>()
                .is_some_and(|e| e.is_layout_drift())
        );
        assert_eq!(fs::read(out.path()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_nothing_found_leaves_output_alone() {
        let exe = NamedTempFile::new().unwrap();
        fs::write(exe.path(), vec![0u8; 4096]).unwrap();
        let out = NamedTempFile::new().unwrap();
        fs::write(out.path(), "title:1\n").unwrap();

        assert!(run(Some(exe.path()), None, out.path()).is_err());
        assert_eq!(fs::read_to_string(out.path()).unwrap(), "title:1\n");
    }
}
