use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encoding::Platform;
use crate::error::Result;
use crate::locate::{
    FieldKind, KeyOffset, PlatformBundle, locate_field, locate_image, locate_key,
    locate_mac_field, locate_mac_keys,
};

/// Every offset discovered in a desktop and/or Mac executable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetInfo {
    pub key: Option<KeyOffset>,
    pub title: Option<usize>,
    pub caption: Option<usize>,
    pub expiry: Option<usize>,
    pub image: Option<usize>,
    pub mac_key: PlatformBundle<KeyOffset>,
    pub mac_title: PlatformBundle<usize>,
    pub mac_caption: PlatformBundle<usize>,
    pub mac_expiry: PlatformBundle<usize>,
}

impl OffsetInfo {
    /// Run every desktop locator over `data`
    pub fn scan_windows(&mut self, data: &[u8]) -> Result<()> {
        let profile = Platform::Windows.profile();
        debug!("Scanning {} bytes as {}", data.len(), Platform::Windows);

        self.key = locate_key(data, 0, profile)?;
        self.title = locate_field(data, 0, FieldKind::Title, profile);
        self.caption = locate_field(data, 0, FieldKind::Caption, profile);
        self.expiry = locate_field(data, 0, FieldKind::Expiry, profile);
        self.image = locate_image(data, 0);
        Ok(())
    }

    /// Run every Mac locator over a universal binary
    pub fn scan_mac(&mut self, data: &[u8]) -> Result<()> {
        debug!("Scanning {} bytes as Mac universal binary", data.len());

        self.mac_key = locate_mac_keys(data)?;
        self.mac_title = locate_mac_field(data, FieldKind::Title);
        self.mac_caption = locate_mac_field(data, FieldKind::Caption);
        self.mac_expiry = locate_mac_field(data, FieldKind::Expiry);
        Ok(())
    }

    pub fn key_for(&self, platform: Platform) -> Option<KeyOffset> {
        match platform {
            Platform::Windows => self.key,
            _ => self.mac_key.get(platform),
        }
    }

    pub fn field_for(&self, platform: Platform, kind: FieldKind) -> Option<usize> {
        match platform {
            Platform::Windows => match kind {
                FieldKind::Title => self.title,
                FieldKind::Caption => self.caption,
                FieldKind::Expiry => self.expiry,
            },
            _ => self.mac_field(kind).get(platform),
        }
    }

    pub fn mac_field(&self, kind: FieldKind) -> &PlatformBundle<usize> {
        match kind {
            FieldKind::Title => &self.mac_title,
            FieldKind::Caption => &self.mac_caption,
            FieldKind::Expiry => &self.mac_expiry,
        }
    }

    /// At least one offset was discovered
    pub fn is_valid(&self) -> bool {
        self.found_count() > 0
    }

    pub fn found_count(&self) -> usize {
        let desktop = [self.title, self.caption, self.expiry, self.image]
            .iter()
            .filter(|v| v.is_some())
            .count()
            + usize::from(self.key.is_some());
        let mac = [self.mac_title, self.mac_caption, self.mac_expiry]
            .iter()
            .map(|bundle| count_bundle(bundle))
            .sum::<usize>()
            + count_bundle(&self.mac_key);
        desktop + mac
    }

    /// Labels of desktop entries that were not discovered
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key.is_none() {
            missing.push("key");
        }
        for (label, value) in [
            ("title", self.title),
            ("caption", self.caption),
            ("expiry", self.expiry),
            ("image", self.image),
        ] {
            if value.is_none() {
                missing.push(label);
            }
        }
        missing
    }
}

fn count_bundle<T: Copy>(bundle: &PlatformBundle<T>) -> usize {
    [bundle.ppc.is_some(), bundle.x86.is_some(), bundle.x64.is_some()]
        .iter()
        .filter(|found| **found)
        .count()
}

/// Run all locators once over the given executables.
///
/// Either path may be omitted; the corresponding entries stay empty.
pub fn generate_offsets(windows: Option<&Path>, mac: Option<&Path>) -> Result<OffsetInfo> {
    let mut info = OffsetInfo::default();

    if let Some(path) = windows {
        let data = fs::read(path)?;
        info.scan_windows(&data)?;
        info!("Scanned desktop executable {}", path.display());
    }

    if let Some(path) = mac {
        let data = fs::read(path)?;
        info.scan_mac(&data)?;
        info!("Scanned Mac executable {}", path.display());
    }

    Ok(info)
}
