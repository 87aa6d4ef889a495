//! Dump command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use keystamp_core::{OffsetDump, load_offsets};

/// Run the dump command
pub fn run(exe: &Path, offsets_file: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(exe).with_context(|| format!("Failed to read {}", exe.display()))?;
    let offsets = load_offsets(offsets_file)
        .with_context(|| format!("Failed to load offsets from {}", offsets_file.display()))?;

    let dump = OffsetDump::from_offsets(&offsets, &data);

    if let Some(output_path) = output {
        dump.save(output_path)?;
        println!("Dump saved to: {}", output_path.display());
    } else {
        println!("{}", dump.to_json()?);
    }

    Ok(())
}
