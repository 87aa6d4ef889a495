//! Read-back of patched fields from file bytes

use chrono::NaiveDate;
use image::RgbImage;
use serde::Serialize;

use super::{advance, message_body_offset};
use crate::encoding::EncodingProfile;
use crate::error::{Error, Result};
use crate::layout::key::HALF_BYTES;
use crate::layout::{date, image as image_layout, message};
use crate::locate::KeyOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageHeader {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub format: u32,
}

fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = advance(offset, len)?;
    data.get(offset..end).ok_or_else(|| Error::InvalidField {
        offset,
        message: format!("{} bytes requested past end of data ({})", len, data.len()),
    })
}

fn token_at(data: &[u8], offset: usize, profile: EncodingProfile) -> Result<u16> {
    let bytes = slice_at(data, offset, profile.token_bytes())?;
    profile.decode_token(bytes).ok_or_else(|| Error::InvalidField {
        offset,
        message: "Truncated token".to_string(),
    })
}

fn u32_at(data: &[u8], offset: usize, profile: EncodingProfile) -> Result<u32> {
    let bytes = slice_at(data, offset, 4)?;
    Ok(profile.decode_u32([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn read_key(data: &[u8], offset: &KeyOffset, profile: EncodingProfile) -> Result<u64> {
    let second_at = offset.second_half_offset()?;
    let first = slice_at(data, offset.byte_offset, HALF_BYTES)?;
    let second = slice_at(data, second_at, HALF_BYTES)?;

    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(first);
    bytes[4..].copy_from_slice(second);
    Ok(profile.decode_u64(bytes))
}

/// Decode the message in the slot whose prefix starts at `field_offset`
pub fn read_message(data: &[u8], field_offset: usize, profile: EncodingProfile) -> Result<String> {
    let width = profile.token_bytes();
    let at = message_body_offset(field_offset, profile)?;

    let len = usize::from(token_at(data, at, profile)?);
    if len > message::MAX_CHARS {
        return Err(Error::InvalidField {
            offset: at,
            message: format!("Message length {} exceeds {}", len, message::MAX_CHARS),
        });
    }

    (0..len)
        .map(|i| {
            let offset = at + (message::LENGTH_TOKENS + i) * width;
            let token = u32::from(token_at(data, offset, profile)?);
            if token % message::CHAR_FACTOR != 0 {
                return Err(Error::InvalidField {
                    offset,
                    message: format!("Token 0x{:04X} is not an encoded character", token),
                });
            }
            char::from_u32(token / message::CHAR_FACTOR).ok_or_else(|| Error::InvalidField {
                offset,
                message: format!("Token 0x{:04X} decodes to an invalid character", token),
            })
        })
        .collect()
}

pub fn read_date(data: &[u8], date_offset: usize, profile: EncodingProfile) -> Result<NaiveDate> {
    let width = profile.token_bytes();
    let mut fields = [0u16; date::FIELD_TOKENS];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = token_at(data, date_offset + i * width, profile)?;
    }

    let [year, month, day] = fields;
    NaiveDate::from_ymd_opt(
        date::YEAR_BASE + i32::from(year),
        u32::from(month),
        u32::from(day),
    )
    .ok_or_else(|| Error::InvalidField {
        offset: date_offset,
        message: format!("Invalid date fields {}/{}/{}", year, month, day),
    })
}

pub fn read_image_header(
    data: &[u8],
    image_offset: usize,
    profile: EncodingProfile,
) -> Result<ImageHeader> {
    let flag = slice_at(data, image_offset, 1)?[0];
    Ok(ImageHeader {
        enabled: flag != 0,
        width: u32_at(data, image_offset + 1, profile)?,
        height: u32_at(data, image_offset + 5, profile)?,
        format: u32_at(data, image_offset + 9, profile)?,
    })
}

/// Extract the embedded image as written by [`super::write_image`]
pub fn read_image(data: &[u8], image_offset: usize, profile: EncodingProfile) -> Result<RgbImage> {
    let header = read_image_header(data, image_offset, profile)?;
    if header.width != image_layout::WIDTH || header.height != image_layout::HEIGHT {
        return Err(Error::InvalidField {
            offset: image_offset,
            message: format!("Unexpected image size {}x{}", header.width, header.height),
        });
    }

    let pixels = slice_at(
        data,
        image_offset + image_layout::HEADER_BYTES,
        image_layout::PIXEL_BYTES,
    )?;
    RgbImage::from_raw(header.width, header.height, pixels.to_vec()).ok_or_else(|| {
        Error::InvalidField {
            offset: image_offset,
            message: "Pixel buffer size mismatch".to_string(),
        }
    })
}
