use std::fs;
use std::path::Path;

use serde::Serialize;

use super::OffsetInfo;
use crate::error::Result;

const SAMPLE_BYTES: usize = 16;

/// Offset dump for diagnostic purposes
#[derive(Debug, Clone, Serialize)]
pub struct OffsetDump {
    pub file_len: usize,
    pub entries: Vec<DumpEntry>,
}

/// One discovered offset with the bytes found there
#[derive(Debug, Clone, Serialize)]
pub struct DumpEntry {
    pub label: String,
    pub offset: String,
    pub sample: String,
}

impl OffsetDump {
    /// Create a dump from offsets and the executable they were found in
    pub fn from_offsets(info: &OffsetInfo, data: &[u8]) -> Self {
        let mut entries = Vec::new();
        let mut push = |label: &str, offset: Option<usize>| {
            if let Some(offset) = offset {
                entries.push(DumpEntry {
                    label: label.to_string(),
                    offset: format!("0x{:X}", offset),
                    sample: Self::sample_hex(data, offset),
                });
            }
        };

        push("key", info.key.map(|k| k.byte_offset));
        push("title", info.title);
        push("caption", info.caption);
        push("expiry", info.expiry);
        push("image", info.image);
        push("mac_key_ppc", info.mac_key.ppc.map(|k| k.byte_offset));
        push("mac_key_x86", info.mac_key.x86.map(|k| k.byte_offset));
        push("mac_key_x64", info.mac_key.x64.map(|k| k.byte_offset));
        for (name, bundle) in [
            ("mac_title", &info.mac_title),
            ("mac_caption", &info.mac_caption),
            ("mac_expiry", &info.mac_expiry),
        ] {
            push(&format!("{}_ppc", name), bundle.ppc);
            push(&format!("{}_x86", name), bundle.x86);
            push(&format!("{}_x64", name), bundle.x64);
        }

        Self {
            file_len: data.len(),
            entries,
        }
    }

    fn sample_hex(data: &[u8], offset: usize) -> String {
        let Some(bytes) = data.get(offset..) else {
            return "(past end of file)".to_string();
        };

        bytes
            .iter()
            .take(SAMPLE_BYTES)
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save dump to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
