//! Synthetic executable images for tests
//!
//! Builds a byte buffer filled with deterministic noise and lets tests drop
//! fingerprints, token runs and block chains at known offsets.

use crate::encoding::{ByteOrder, EncodingProfile};
use crate::layout::key::packed_len;
use crate::scan::{Block, split_halves};

/// Deterministic xorshift noise
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 32) as u8
        })
        .collect()
}

pub struct SyntheticBinary {
    data: Vec<u8>,
}

impl SyntheticBinary {
    pub fn new(len: usize) -> Self {
        Self {
            data: noise(len, len as u64),
        }
    }

    pub fn bytes(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn tokens(self, offset: usize, tokens: &[u16], profile: EncodingProfile) -> Self {
        let encoded = profile.encode_tokens(tokens);
        self.bytes(offset, &encoded)
    }

    /// Lay out a block chain with zero-filled padding. `Skip` slots keep
    /// whatever the buffer already holds.
    pub fn blocks(
        mut self,
        offset: usize,
        blocks: &[Block],
        order: ByteOrder,
        inter: usize,
        intra: usize,
    ) -> Self {
        let stride = packed_len(inter, intra);
        for (index, block) in blocks.iter().enumerate() {
            let slot = offset + index * stride;
            if let Block::Value(value) = *block {
                let (first, second) = split_halves(value, order);
                self.data[slot..slot + 4].copy_from_slice(&first);
                self.data[slot + 4..slot + 4 + intra].fill(0);
                self.data[slot + 4 + intra..slot + 8 + intra].copy_from_slice(&second);
            }
            if index + 1 < blocks.len() {
                self.data[slot + 8 + intra..slot + stride].fill(0);
            }
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        assert_eq!(noise(64, 3), noise(64, 3));
        assert_ne!(noise(64, 3), noise(64, 4));
    }
}
