//! Token serialization per target platform
//!
//! A logical token (a key half-word, a message character, a date field) is a
//! 16-bit value. How it lands in the executable depends on two independent
//! axes: the token width (2 or 4 bytes) and the byte order. Every scan and
//! patch call receives its profile explicitly so a single session can flip
//! either axis between calls.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Serialized width of one logical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenWidth {
    /// 16-bit tokens (UTF-16 `wchar_t`)
    Two,
    /// 32-bit tokens carrying a 16-bit value (UTF-32 `wchar_t`)
    Four,
}

impl TokenWidth {
    pub const fn bytes(self) -> usize {
        match self {
            TokenWidth::Two => 2,
            TokenWidth::Four => 4,
        }
    }

    /// Zero bytes that accompany the two significant bytes of a token
    pub const fn pad_bytes(self) -> usize {
        self.bytes() - 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingProfile {
    pub width: TokenWidth,
    pub order: ByteOrder,
}

impl EncodingProfile {
    pub const fn new(width: TokenWidth, order: ByteOrder) -> Self {
        Self { width, order }
    }

    pub const fn with_order(self, order: ByteOrder) -> Self {
        Self { order, ..self }
    }

    pub const fn with_width(self, width: TokenWidth) -> Self {
        Self { width, ..self }
    }

    pub const fn token_bytes(self) -> usize {
        self.width.bytes()
    }

    /// Append the serialized form of `value` to `out`.
    ///
    /// Wide tokens are the 32-bit representation of the value: zero bytes
    /// precede it big-endian and follow it little-endian.
    pub fn push_token(self, value: u16, out: &mut Vec<u8>) {
        let pad = self.width.pad_bytes();
        match self.order {
            ByteOrder::BigEndian => {
                out.extend(std::iter::repeat_n(0u8, pad));
                out.extend_from_slice(&value.to_be_bytes());
            }
            ByteOrder::LittleEndian => {
                out.extend_from_slice(&value.to_le_bytes());
                out.extend(std::iter::repeat_n(0u8, pad));
            }
        }
    }

    pub fn encode_tokens(self, values: &[u16]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * self.token_bytes());
        for &value in values {
            self.push_token(value, &mut out);
        }
        out
    }

    /// Byte pattern for matching `values`: significant bytes are literal,
    /// width padding is a wildcard.
    pub fn token_pattern(self, values: &[u16]) -> Vec<Option<u8>> {
        let pad = self.width.pad_bytes();
        let mut pattern = Vec::with_capacity(values.len() * self.token_bytes());
        for &value in values {
            match self.order {
                ByteOrder::BigEndian => {
                    pattern.extend(std::iter::repeat_n(None, pad));
                    pattern.extend(value.to_be_bytes().map(Some));
                }
                ByteOrder::LittleEndian => {
                    pattern.extend(value.to_le_bytes().map(Some));
                    pattern.extend(std::iter::repeat_n(None, pad));
                }
            }
        }
        pattern
    }

    /// Decode the token at the start of `bytes`, ignoring width padding
    pub fn decode_token(self, bytes: &[u8]) -> Option<u16> {
        let token = bytes.get(..self.token_bytes())?;
        let value = match self.order {
            ByteOrder::BigEndian => {
                let pad = self.width.pad_bytes();
                u16::from_be_bytes([token[pad], token[pad + 1]])
            }
            ByteOrder::LittleEndian => u16::from_le_bytes([token[0], token[1]]),
        };
        Some(value)
    }

    pub fn encode_u32(self, value: u32) -> [u8; 4] {
        match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        }
    }

    pub fn decode_u32(self, bytes: [u8; 4]) -> u32 {
        match self.order {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        }
    }

    pub fn encode_u64(self, value: u64) -> [u8; 8] {
        match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        }
    }

    pub fn decode_u64(self, bytes: [u8; 8]) -> u64 {
        match self.order {
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
        }
    }
}

/// Target binary layouts the engine knows how to personalize
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Windows,
    MacPpc,
    MacX86,
    MacX64,
}

impl Platform {
    pub const fn profile(self) -> EncodingProfile {
        match self {
            Platform::Windows => EncodingProfile::new(TokenWidth::Two, ByteOrder::LittleEndian),
            Platform::MacPpc => EncodingProfile::new(TokenWidth::Four, ByteOrder::BigEndian),
            Platform::MacX86 | Platform::MacX64 => {
                EncodingProfile::new(TokenWidth::Four, ByteOrder::LittleEndian)
            }
        }
    }

    pub const fn is_mac(self) -> bool {
        !matches!(self, Platform::Windows)
    }
}
