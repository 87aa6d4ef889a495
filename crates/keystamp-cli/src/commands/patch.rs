//! Patch command implementation.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use keystamp_core::{
    FieldKind, OffsetInfo, Platform, SEED_COUNT, derive_key, load_image, load_offsets,
    write_date, write_image, write_key, write_message,
};
use owo_colors::OwoColorize;

use super::hex_utils::parse_hex_u64;
use crate::cli::{PatchTarget, TargetArgs};
use crate::config::Config;

/// Run the patch command
pub fn run(target: PatchTarget, config: &Config) -> Result<()> {
    match target {
        PatchTarget::Key { target, key, seeds } => {
            let key = resolve_key(key.as_deref(), seeds.as_deref())?;
            let (info, platform) = load_target(&target, config)?;
            let offset = info
                .key_for(platform)
                .ok_or_else(|| missing("key", platform))?;

            write_key(&target.exe, &offset, key, platform.profile())
                .with_context(|| format!("Failed to patch {}", target.exe.display()))?;
            report("key", &format!("0x{:016X}", key), &target.exe);
        }
        PatchTarget::Message {
            target,
            field,
            text,
        } => {
            let kind = FieldKind::from(field);
            let (info, platform) = load_target(&target, config)?;
            let offset = info
                .field_for(platform, kind)
                .ok_or_else(|| missing(&kind.to_string(), platform))?;

            write_message(&target.exe, offset, &text, platform.profile())
                .with_context(|| format!("Failed to patch {}", target.exe.display()))?;
            report(&kind.to_string(), &format!("{:?}", text), &target.exe);
        }
        PatchTarget::Date { target, date } => {
            let (info, platform) = load_target(&target, config)?;
            let offset = info
                .field_for(platform, FieldKind::Expiry)
                .ok_or_else(|| missing("expiry", platform))?;

            write_date(&target.exe, offset, date, platform.profile())
                .with_context(|| format!("Failed to patch {}", target.exe.display()))?;
            report("expiry", &date.to_string(), &target.exe);
        }
        PatchTarget::Image { target, image } => {
            let pixels = load_image(&image)
                .with_context(|| format!("Failed to load {}", image.display()))?;
            let (info, platform) = load_target(&target, config)?;
            let offset = info.image.ok_or_else(|| missing("image", platform))?;

            write_image(&target.exe, offset, &pixels, platform.profile())
                .with_context(|| format!("Failed to patch {}", target.exe.display()))?;
            report("image", &image.display().to_string(), &target.exe);
        }
    }
    Ok(())
}

pub(crate) fn load_target(target: &TargetArgs, config: &Config) -> Result<(OffsetInfo, Platform)> {
    let path = config.offsets_file(target.offsets.as_deref());
    let info = load_offsets(&path)
        .with_context(|| format!("Failed to load offsets from {}", path.display()))?;
    Ok((info, config.platform(target.platform)))
}

fn resolve_key(key: Option<&str>, seeds: Option<&[u32]>) -> Result<u64> {
    match (key, seeds) {
        (Some(key), None) => parse_hex_u64(key),
        (None, Some(seeds)) => {
            let seeds: [u32; SEED_COUNT] = seeds
                .try_into()
                .map_err(|_| anyhow!("Expected {} seeds, got {}", SEED_COUNT, seeds.len()))?;
            Ok(derive_key(seeds)?)
        }
        _ => bail!("Pass exactly one of --key or --seeds"),
    }
}

fn missing(label: &str, platform: Platform) -> anyhow::Error {
    anyhow!("No {} offset recorded for {}; run `keystamp info` first", label, platform)
}

fn report(label: &str, value: &str, exe: &Path) {
    println!(
        "{} {} {} in {}",
        "Patched".green(),
        label,
        value,
        exe.display()
    );
}
