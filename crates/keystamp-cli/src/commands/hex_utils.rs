//! Hex value parsing and formatting utilities.

use anyhow::{Result, anyhow};

/// Parse a hex value (with or without 0x prefix).
pub fn parse_hex_u64(s: &str) -> Result<u64> {
    let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
    let digits = digits.replace('_', "");
    u64::from_str_radix(&digits, 16).map_err(|e| anyhow!("Invalid hex value '{}': {}", s, e))
}

/// Parse a file offset: 0x-prefixed hex, otherwise decimal like the info file.
pub fn parse_offset(s: &str) -> Result<usize> {
    let s = s.trim();
    let value = if s.starts_with("0x") || s.starts_with("0X") {
        parse_hex_u64(s)?
    } else {
        s.parse::<u64>()
            .map_err(|e| anyhow!("Invalid offset '{}': {}", s, e))?
    };
    usize::try_from(value).map_err(|_| anyhow!("Offset {} does not fit in memory", value))
}

/// Bytes as space-separated hex pairs
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
