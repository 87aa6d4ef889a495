//! Hexdump command implementation.
//!
//! Displays raw file bytes in traditional hexdump format, useful for
//! checking a field before and after patching.
//!
//! # Output Format
//!
//! ```text
//! 0x00001F40: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::hex_utils::parse_offset;

const LINE_BYTES: usize = 16;

/// Run the hexdump command
pub fn run(exe: &Path, offset: &str, size: usize, ascii: bool) -> Result<()> {
    let offset = parse_offset(offset)?;

    let mut file =
        File::open(exe).with_context(|| format!("Failed to open {}", exe.display()))?;
    let file_len = file.metadata()?.len();
    if offset as u64 >= file_len {
        bail!("Offset 0x{:X} is past end of file ({} bytes)", offset, file_len);
    }

    file.seek(SeekFrom::Start(offset as u64))?;
    let mut bytes = Vec::with_capacity(size);
    file.take(size as u64).read_to_end(&mut bytes)?;

    println!("Hexdump at 0x{:X} ({} bytes):", offset, bytes.len());
    println!();
    for line in format_lines(offset, &bytes, ascii) {
        println!("{}", line);
    }

    Ok(())
}

fn format_lines(base: usize, bytes: &[u8], ascii: bool) -> Vec<String> {
    bytes
        .chunks(LINE_BYTES)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:08X}: ", base + i * LINE_BYTES);

            for j in 0..LINE_BYTES {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            if ascii {
                line.push_str(" |");
                for &byte in chunk {
                    line.push(if (0x20..0x7F).contains(&byte) {
                        byte as char
                    } else {
                        '.'
                    });
                }
                for _ in chunk.len()..LINE_BYTES {
                    line.push(' ');
                }
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}
