//! Message and date field discovery

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info};

use super::PlatformBundle;
use super::constants::{CAPTION_PREFIX, EXPIRY_PREFIX, TITLE_PREFIX};
use crate::encoding::{EncodingProfile, Platform};
use crate::layout::{PLATFORM_STACK_STEP, date};
use crate::scan::Scanner;

/// Fields identified by a 4-token prefix
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Title,
    Caption,
    Expiry,
}

impl FieldKind {
    pub const fn prefix(self) -> &'static [u16; 4] {
        match self {
            FieldKind::Title => &TITLE_PREFIX,
            FieldKind::Caption => &CAPTION_PREFIX,
            FieldKind::Expiry => &EXPIRY_PREFIX,
        }
    }

    pub const fn is_message(self) -> bool {
        matches!(self, FieldKind::Title | FieldKind::Caption)
    }
}

/// Locate a field searching from `start`.
///
/// Message offsets point at the prefix itself (the writer skips the front
/// padding). Expiry offsets point past the prefix, at the date fields.
pub fn locate_field(
    data: &[u8],
    start: usize,
    kind: FieldKind,
    profile: EncodingProfile,
) -> Option<usize> {
    let prefix_at = Scanner::new(data).find_tokens(start, kind.prefix(), profile)?;

    let offset = match kind {
        FieldKind::Expiry => prefix_at + date::PREFIX_TOKENS * profile.token_bytes(),
        FieldKind::Title | FieldKind::Caption => prefix_at,
    };
    info!("{} field at 0x{:X} ({:?})", kind, offset, profile);
    Some(offset)
}

/// Locate a field in each slice of a Mac universal binary
pub fn locate_mac_field(data: &[u8], kind: FieldKind) -> PlatformBundle<usize> {
    let ppc = locate_field(data, 0, kind, Platform::MacPpc.profile());
    let x86 = locate_field(data, 0, kind, Platform::MacX86.profile());
    let x64 = x86.and_then(|x86| {
        locate_field(
            data,
            x86 + PLATFORM_STACK_STEP,
            kind,
            Platform::MacX64.profile(),
        )
    });

    if x64.is_none() {
        debug!("{} field: no x64 slice after x86 result {:?}", kind, x86);
    }

    PlatformBundle { ppc, x86, x64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SyntheticBinary, noise};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_locate_message_fields() {
        let profile = Platform::Windows.profile();
        let data = SyntheticBinary::new(4096)
            .tokens(300, &TITLE_PREFIX, profile)
            .tokens(1500, &CAPTION_PREFIX, profile)
            .build();

        assert_eq!(locate_field(&data, 0, FieldKind::Title, profile), Some(300));
        assert_eq!(locate_field(&data, 0, FieldKind::Caption, profile), Some(1500));
        assert_eq!(locate_field(&data, 0, FieldKind::Expiry, profile), None);
    }

    #[test]
    fn test_locate_expiry_skips_prefix() {
        for platform in Platform::iter() {
            let profile = platform.profile();
            let data = SyntheticBinary::new(2048)
                .tokens(640, &EXPIRY_PREFIX, profile)
                .build();
            assert_eq!(
                locate_field(&data, 0, FieldKind::Expiry, profile),
                Some(640 + 4 * profile.token_bytes())
            );
        }
    }

    #[test]
    fn test_locate_field_not_found() {
        let data = noise(4096, 11);
        for kind in FieldKind::iter() {
            assert_eq!(locate_field(&data, 0, kind, Platform::MacPpc.profile()), None);
        }
    }

    #[test]
    fn test_locate_mac_field_bundle() {
        let data = SyntheticBinary::new(8192)
            .tokens(200, &TITLE_PREFIX, Platform::MacPpc.profile())
            .tokens(3000, &TITLE_PREFIX, Platform::MacX86.profile())
            .tokens(6000, &TITLE_PREFIX, Platform::MacX64.profile())
            .build();

        let bundle = locate_mac_field(&data, FieldKind::Title);
        assert_eq!(bundle.ppc, Some(200));
        assert_eq!(bundle.x86, Some(3000));
        assert_eq!(bundle.x64, Some(6000));
    }

    #[test]
    fn test_field_kind_names() {
        assert_eq!(FieldKind::Caption.to_string(), "caption");
        assert_eq!(FieldKind::from_str("expiry").unwrap(), FieldKind::Expiry);
        assert!(FieldKind::Title.is_message());
        assert!(!FieldKind::Expiry.is_message());
    }
}
