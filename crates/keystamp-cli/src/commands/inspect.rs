//! Inspect command implementation.

use std::fs;

use anyhow::{Context, Result};
use keystamp_core::{
    FieldKind, OffsetInfo, Platform, read_date, read_image_header, read_key, read_message,
};
use owo_colors::OwoColorize;

use super::patch::load_target;
use crate::cli::TargetArgs;
use crate::config::Config;

/// Run the inspect command
pub fn run(target: &TargetArgs, config: &Config) -> Result<()> {
    let data = fs::read(&target.exe)
        .with_context(|| format!("Failed to read {}", target.exe.display()))?;
    let (info, platform) = load_target(target, config)?;

    println!("{} ({})", target.exe.display(), platform);
    println!();
    for (label, value) in read_fields(&data, &info, platform) {
        match value {
            Some(Ok(text)) => println!("  {:<8} {}", label, text),
            Some(Err(e)) => println!("  {:<8} {}", label, e.to_string().red()),
            None => println!("  {:<8} {}", label, "no offset".yellow()),
        }
    }

    Ok(())
}

type FieldRow = (&'static str, Option<keystamp_core::Result<String>>);

fn read_fields(data: &[u8], info: &OffsetInfo, platform: Platform) -> Vec<FieldRow> {
    let profile = platform.profile();

    let key = info.key_for(platform).map(|offset| {
        read_key(data, &offset, profile).map(|key| format!("0x{:016X}", key))
    });
    let message = |kind: FieldKind| {
        info.field_for(platform, kind)
            .map(|offset| read_message(data, offset, profile).map(|text| format!("{:?}", text)))
    };
    let expiry = info
        .field_for(platform, FieldKind::Expiry)
        .map(|offset| read_date(data, offset, profile).map(|date| date.to_string()));
    let image = info.image.map(|offset| {
        read_image_header(data, offset, profile).map(|header| {
            format!(
                "{}x{} format={} {}",
                header.width,
                header.height,
                header.format,
                if header.enabled { "enabled" } else { "disabled" }
            )
        })
    });

    vec![
        ("key", key),
        ("title", message(FieldKind::Title)),
        ("caption", message(FieldKind::Caption)),
        ("expiry", expiry),
        ("image", image),
    ]
}
