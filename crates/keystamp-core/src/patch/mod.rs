//! In-place field writer
//!
//! Every write opens the target, checks that all bytes land inside the
//! existing file, seeks and writes, then closes. Values are validated and
//! encoded before the file is opened, so a rejected value never touches it.

mod inspect;

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use image::RgbImage;
use tracing::{debug, info};

use crate::encoding::EncodingProfile;
use crate::error::{Error, Result};
use crate::layout::{date, image as image_layout, message};
use crate::locate::KeyOffset;
use crate::scan::split_halves;

pub use inspect::*;

/// Split `key` into the two halves written around the intra-block padding
pub fn encode_key(key: u64, profile: EncodingProfile) -> ([u8; 4], [u8; 4]) {
    split_halves(key, profile.order)
}

/// Length token followed by one token per character, each stored as `code × 3`
pub fn encode_message(text: &str, profile: EncodingProfile) -> Result<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > message::MAX_CHARS {
        return Err(Error::Validation(format!(
            "Message is {} characters long, maximum is {}",
            chars.len(),
            message::MAX_CHARS
        )));
    }

    let mut tokens = Vec::with_capacity(chars.len() + message::LENGTH_TOKENS);
    tokens.push(chars.len() as u16);
    for c in chars {
        let code = u32::from(c) * message::CHAR_FACTOR;
        let token = u16::try_from(code).map_err(|_| {
            Error::Validation(format!("Character {:?} (U+{:04X}) cannot be stored", c, u32::from(c)))
        })?;
        tokens.push(token);
    }

    Ok(profile.encode_tokens(&tokens))
}

/// Year relative to 2010, month, day
pub fn encode_date(date: NaiveDate, profile: EncodingProfile) -> Result<Vec<u8>> {
    let year = u16::try_from(date.year() - date::YEAR_BASE).map_err(|_| {
        Error::Validation(format!(
            "Year {} is outside the storable range starting at {}",
            date.year(),
            date::YEAR_BASE
        ))
    })?;

    Ok(profile.encode_tokens(&[year, date.month() as u16, date.day() as u16]))
}

/// Enabled flag, width, height, format tag, then row-major RGB
pub fn encode_image(image: &RgbImage, profile: EncodingProfile) -> Result<Vec<u8>> {
    if image.width() != image_layout::WIDTH || image.height() != image_layout::HEIGHT {
        return Err(Error::Validation(format!(
            "Image must be {}x{}, got {}x{}",
            image_layout::WIDTH,
            image_layout::HEIGHT,
            image.width(),
            image.height()
        )));
    }

    let mut out = Vec::with_capacity(image_layout::HEADER_BYTES + image_layout::PIXEL_BYTES);
    out.push(1);
    out.extend_from_slice(&profile.encode_u32(image.width()));
    out.extend_from_slice(&profile.encode_u32(image.height()));
    out.extend_from_slice(&profile.encode_u32(image_layout::FORMAT_RAW_RGB));
    out.extend_from_slice(image.as_raw());
    Ok(out)
}

/// Load an image file and convert it to 8-bit RGB
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let image = image::open(path.as_ref())?;
    Ok(image.to_rgb8())
}

pub fn write_key<P: AsRef<Path>>(
    path: P,
    offset: &KeyOffset,
    key: u64,
    profile: EncodingProfile,
) -> Result<()> {
    let second_at = offset.second_half_offset()?;
    let (first, second) = encode_key(key, profile);
    write_segments(
        path.as_ref(),
        &[(offset.byte_offset, &first[..]), (second_at, &second[..])],
    )?;
    info!("Wrote key 0x{:016X} at 0x{:X}", key, offset.byte_offset);
    Ok(())
}

/// Write `text` into the message slot whose prefix starts at `field_offset`.
///
/// Character tokens past the new length keep their previous contents.
pub fn write_message<P: AsRef<Path>>(
    path: P,
    field_offset: usize,
    text: &str,
    profile: EncodingProfile,
) -> Result<()> {
    let encoded = encode_message(text, profile)?;
    let at = message_body_offset(field_offset, profile)?;
    write_segments(path.as_ref(), &[(at, &encoded[..])])?;
    info!(
        "Wrote {}-character message at 0x{:X}",
        text.chars().count(),
        at
    );
    Ok(())
}

pub fn write_date<P: AsRef<Path>>(
    path: P,
    date_offset: usize,
    date: NaiveDate,
    profile: EncodingProfile,
) -> Result<()> {
    let encoded = encode_date(date, profile)?;
    write_segments(path.as_ref(), &[(date_offset, &encoded[..])])?;
    info!("Wrote expiration date {} at 0x{:X}", date, date_offset);
    Ok(())
}

pub fn write_image<P: AsRef<Path>>(
    path: P,
    image_offset: usize,
    image: &RgbImage,
    profile: EncodingProfile,
) -> Result<()> {
    let encoded = encode_image(image, profile)?;
    write_segments(path.as_ref(), &[(image_offset, &encoded[..])])?;
    info!("Wrote {}-byte image block at 0x{:X}", encoded.len(), image_offset);
    Ok(())
}

/// Where the length token of a message slot lives
pub fn message_body_offset(field_offset: usize, profile: EncodingProfile) -> Result<usize> {
    advance(field_offset, message::FRONT_PADDING_TOKENS * profile.token_bytes())
}

pub(crate) fn advance(offset: usize, delta: usize) -> Result<usize> {
    offset
        .checked_add(delta)
        .ok_or(Error::OffsetOverflow { offset, delta })
}

fn write_segments(path: &Path, segments: &[(usize, &[u8])]) -> Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let file_len = file.metadata()?.len();

    for &(offset, bytes) in segments {
        let end = advance(offset, bytes.len())?;
        if end as u64 > file_len {
            return Err(Error::OutOfBounds {
                offset,
                len: bytes.len(),
                file_len,
            });
        }
    }

    for &(offset, bytes) in segments {
        file.seek(SeekFrom::Start(offset as u64))?;
        file.write_all(bytes)?;
        debug!("Wrote {} bytes at 0x{:X} in {}", bytes.len(), offset, path.display());
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{ByteOrder, Platform, TokenWidth};
    use crate::scan::PaddingProfile;
    use crate::testing::noise;
    use std::fs;
    use tempfile::NamedTempFile;

    fn temp_binary(len: usize) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), noise(len, 5)).unwrap();
        file
    }

    #[test]
    fn test_key_roundtrip_both_profiles() {
        let cases = [
            (
                EncodingProfile::new(TokenWidth::Two, ByteOrder::BigEndian),
                PaddingProfile::new(0, 0),
            ),
            (
                EncodingProfile::new(TokenWidth::Four, ByteOrder::LittleEndian),
                PaddingProfile::new(4, 4),
            ),
        ];

        for (profile, padding) in cases {
            let file = temp_binary(1024);
            let offset = KeyOffset {
                byte_offset: 300,
                padding,
            };
            let key = 0x113C_1792_5D6B_3444;
            write_key(file.path(), &offset, key, profile).unwrap();

            let data = fs::read(file.path()).unwrap();
            assert_eq!(data.len(), 1024);
            assert_eq!(read_key(&data, &offset, profile).unwrap(), key);
        }
    }

    #[test]
    fn test_key_write_leaves_intra_padding_untouched() {
        let file = temp_binary(256);
        let before = fs::read(file.path()).unwrap();
        let offset = KeyOffset {
            byte_offset: 16,
            padding: PaddingProfile::new(0, 4),
        };
        write_key(file.path(), &offset, u64::MAX, Platform::Windows.profile()).unwrap();

        let after = fs::read(file.path()).unwrap();
        assert_eq!(after[16..20], [0xFF; 4]);
        assert_eq!(after[20..24], before[20..24]);
        assert_eq!(after[24..28], [0xFF; 4]);
        assert_eq!(after[28..], before[28..]);
        assert_eq!(after[..16], before[..16]);
    }

    #[test]
    fn test_message_roundtrip() {
        for platform in [Platform::Windows, Platform::MacPpc, Platform::MacX64] {
            let profile = platform.profile();
            let file = temp_binary(2048);
            write_message(file.path(), 100, "ABC", profile).unwrap();

            let data = fs::read(file.path()).unwrap();
            assert_eq!(read_message(&data, 100, profile).unwrap(), "ABC");
        }
    }

    #[test]
    fn test_message_tokens_are_tripled() {
        let encoded = encode_message("AB", Platform::Windows.profile()).unwrap();
        assert_eq!(encoded, vec![2, 0, 0xC3, 0, 0xC6, 0]);

        let encoded = encode_message("A", Platform::MacPpc.profile()).unwrap();
        assert_eq!(encoded, vec![0, 0, 0, 1, 0, 0, 0, 0xC3]);
    }

    #[test]
    fn test_message_too_long_leaves_file_untouched() {
        let file = temp_binary(2048);
        let before = fs::read(file.path()).unwrap();
        let text = "x".repeat(65);

        let err = write_message(file.path(), 0, &text, Platform::Windows.profile()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(fs::read(file.path()).unwrap(), before);

        assert!(encode_message(&"x".repeat(64), Platform::Windows.profile()).is_ok());
    }

    #[test]
    fn test_message_rejects_unstorable_character() {
        let err = encode_message("日本", Platform::Windows.profile()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_date_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2027, 3, 31).unwrap();
        for platform in [Platform::Windows, Platform::MacPpc] {
            let profile = platform.profile();
            let file = temp_binary(512);
            write_date(file.path(), 64, date, profile).unwrap();
            let data = fs::read(file.path()).unwrap();
            assert_eq!(read_date(&data, 64, profile).unwrap(), date);
        }

        let encoded = encode_date(date, Platform::Windows.profile()).unwrap();
        assert_eq!(encoded, vec![17, 0, 3, 0, 31, 0]);
    }

    #[test]
    fn test_date_before_base_year_rejected() {
        let date = NaiveDate::from_ymd_opt(2009, 12, 31).unwrap();
        assert!(matches!(
            encode_date(date, Platform::Windows.profile()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_image_roundtrip() {
        let image = RgbImage::from_fn(128, 128, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let file = temp_binary(image_layout::BLOCK_LEN + 100);
        let profile = Platform::Windows.profile();
        write_image(file.path(), 14, &image, profile).unwrap();

        let data = fs::read(file.path()).unwrap();
        let header = read_image_header(&data, 14, profile).unwrap();
        assert!(header.enabled);
        assert_eq!((header.width, header.height, header.format), (128, 128, 0));
        assert_eq!(read_image(&data, 14, profile).unwrap(), image);
    }

    #[test]
    fn test_image_wrong_size_rejected() {
        let image = RgbImage::new(127, 128);
        let file = temp_binary(image_layout::BLOCK_LEN);
        let before = fs::read(file.path()).unwrap();
        let err = write_image(file.path(), 0, &image, Platform::Windows.profile()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(fs::read(file.path()).unwrap(), before);
    }

    #[test]
    fn test_write_past_end_rejected() {
        let file = temp_binary(64);
        let err = write_message(file.path(), 40, "hello world", Platform::Windows.profile()).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert_eq!(fs::metadata(file.path()).unwrap().len(), 64);
    }

    #[test]
    fn test_key_with_unknown_padding_rejected() {
        let file = temp_binary(64);
        let before = fs::read(file.path()).unwrap();
        let info = crate::offset::parse_offsets("key:0,-1,-1").unwrap();
        assert!(info.key.is_none());

        let offset: KeyOffset = "0,-1,-1".parse().unwrap();
        let err = write_key(
            file.path(),
            &offset,
            0x1122_3344_5566_7788,
            Platform::Windows.profile(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(fs::read(file.path()).unwrap(), before);
    }

    #[test]
    fn test_offsets_near_usize_max_rejected() {
        let file = temp_binary(64);
        let before = fs::read(file.path()).unwrap();
        let profile = Platform::Windows.profile();

        let err = write_message(file.path(), usize::MAX - 2, "A", profile).unwrap_err();
        assert!(matches!(err, Error::OffsetOverflow { .. }));

        let key = KeyOffset {
            byte_offset: usize::MAX - 2,
            padding: PaddingProfile::new(0, 0),
        };
        let err = write_key(file.path(), &key, 1, profile).unwrap_err();
        assert!(matches!(err, Error::OffsetOverflow { .. }));

        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let err = write_date(file.path(), usize::MAX - 2, date, profile).unwrap_err();
        assert!(matches!(err, Error::OffsetOverflow { .. }));
        assert!(err.is_rejected_input());

        assert_eq!(fs::read(file.path()).unwrap(), before);
    }

    #[test]
    fn test_write_missing_file() {
        let err = write_date(
            "/nonexistent/keystamp/target.exe",
            0,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            Platform::Windows.profile(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
