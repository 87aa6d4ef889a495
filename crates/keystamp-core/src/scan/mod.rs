//! Byte pattern scanner over a fully loaded executable image
//!
//! Two kinds of search are supported:
//!
//! - contiguous token sequences (message and date prefixes), where width
//!   padding inside each token is skipped but tokens follow each other
//!   without gaps;
//! - chains of 64-bit blocks (key fingerprints), where the compiler may have
//!   inserted padding between the two 32-bit halves of a block (intra-block)
//!   and between consecutive blocks (inter-block). Both gaps are discovered
//!   from the first match and enforced afterwards.
//!
//! ```text
//!  block 0                    block 1
//! ┌──────┬───────┬──────┐    ┌──────┬───────┬──────┐
//! │ half │ intra │ half │inter│ half │ intra │ half │ ...
//! └──────┴───────┴──────┘    └──────┴───────┴──────┘
//!  ◄────────── packed key length ──────────►
//! ```

mod utils;

use memchr::memmem;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoding::{ByteOrder, EncodingProfile};
use crate::error::{Error, Result};
use crate::layout::key::{HALF_BYTES, PADDING_WINDOW, packed_len};

pub use utils::{matches_at, split_halves};

/// Padding observed between and within 64-bit blocks.
///
/// `None` means the gap has not been observed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingProfile {
    pub inter: Option<usize>,
    pub intra: Option<usize>,
}

impl PaddingProfile {
    pub const UNKNOWN: Self = Self {
        inter: None,
        intra: None,
    };

    pub const fn new(inter: usize, intra: usize) -> Self {
        Self {
            inter: Some(inter),
            intra: Some(intra),
        }
    }

    pub fn is_known(&self) -> bool {
        self.inter.is_some() && self.intra.is_some()
    }

    /// Stride between consecutive 64-bit slots, unknown gaps counted as zero
    pub fn packed_len(&self) -> usize {
        packed_len(self.inter.unwrap_or(0), self.intra.unwrap_or(0))
    }
}

/// One element of a block chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// A 64-bit value that must be present
    Value(u64),
    /// A whole slot that is stepped over without comparison
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMatch {
    /// Offset of the first byte of the first block
    pub start: usize,
    pub padding: PaddingProfile,
}

/// Outcome of matching a chain at one candidate position
enum Attempt {
    Matched,
    Restart,
}

pub struct Scanner<'a> {
    data: &'a [u8],
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Find the earliest offset >= `start` where `needle` occurs verbatim
    pub fn find_bytes(&self, start: usize, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let haystack = self.data.get(start..)?;
        memmem::find(haystack, needle).map(|pos| start + pos)
    }

    /// Find the earliest offset >= `start` matching `pattern` (`None` is a wildcard)
    pub fn find_pattern(&self, start: usize, pattern: &[Option<u8>]) -> Option<usize> {
        if pattern.is_empty() || self.data.len() < pattern.len() {
            return None;
        }

        let last = self.data.len() - pattern.len();
        (start..=last).find(|&pos| matches_at(self.data, pos, pattern))
    }

    /// Find a contiguous run of logical tokens serialized per `profile`
    pub fn find_tokens(
        &self,
        start: usize,
        tokens: &[u16],
        profile: EncodingProfile,
    ) -> Option<usize> {
        let pattern = profile.token_pattern(tokens);
        let found = self.find_pattern(start, &pattern);
        debug!(
            "Token scan from 0x{:X} ({:?}): {:?}",
            start,
            profile,
            found.map(|pos| format!("0x{:X}", pos))
        );
        found
    }

    /// Find a chain of 64-bit blocks, discovering padding as it goes.
    ///
    /// `known` carries padding established earlier; observed gaps must agree
    /// with it. Intra-block drift abandons the candidate and scanning resumes
    /// at the next byte. Inter-block drift on a chain whose first blocks have
    /// matched aborts the whole search with [`Error::InconsistentLayout`].
    pub fn find_blocks(
        &self,
        start: usize,
        blocks: &[Block],
        order: ByteOrder,
        known: PaddingProfile,
    ) -> Result<Option<BlockMatch>> {
        let Some(Block::Value(first)) = blocks.first() else {
            return Err(Error::Validation(
                "Block chain must start with a value block".to_string(),
            ));
        };
        let (first_half, _) = split_halves(*first, order);

        let mut pos = start;
        while let Some(candidate) = self.find_bytes(pos, &first_half) {
            let mut padding = known;
            match self.match_chain_at(candidate, blocks, order, &mut padding)? {
                Attempt::Matched => {
                    debug!(
                        "Block chain matched at 0x{:X} (inter={:?}, intra={:?})",
                        candidate, padding.inter, padding.intra
                    );
                    return Ok(Some(BlockMatch {
                        start: candidate,
                        padding,
                    }));
                }
                Attempt::Restart => pos = candidate + 1,
            }
        }

        Ok(None)
    }

    fn match_chain_at(
        &self,
        at: usize,
        blocks: &[Block],
        order: ByteOrder,
        padding: &mut PaddingProfile,
    ) -> Result<Attempt> {
        // `cursor` always points just past the previous block (before its inter padding)
        let mut cursor = at;

        for (index, block) in blocks.iter().enumerate() {
            match *block {
                Block::Skip => {
                    let (Some(inter), Some(intra)) = (padding.inter, padding.intra) else {
                        return Ok(Attempt::Restart);
                    };
                    cursor += packed_len(inter, intra);
                }
                Block::Value(value) => {
                    let (first_half, second_half) = split_halves(value, order);

                    let block_start = if index == 0 {
                        cursor
                    } else {
                        let Some(gap) = self.observe_gap(cursor, first_half[0]) else {
                            return Ok(Attempt::Restart);
                        };
                        match padding.inter {
                            Some(expected) if expected != gap => {
                                return Err(Error::InconsistentLayout {
                                    offset: cursor,
                                    expected,
                                    found: gap,
                                });
                            }
                            Some(_) => {}
                            None => {
                                debug!("Inter-block padding observed: {} bytes", gap);
                                padding.inter = Some(gap);
                            }
                        }
                        cursor + gap
                    };

                    if !self.slice_eq(block_start, &first_half) {
                        return Ok(Attempt::Restart);
                    }

                    let half_end = block_start + HALF_BYTES;
                    let Some(gap) = self.observe_gap(half_end, second_half[0]) else {
                        return Ok(Attempt::Restart);
                    };
                    match padding.intra {
                        Some(expected) if expected != gap => {
                            debug!(
                                "Intra-block padding drift at 0x{:X}: {} != {}, restarting",
                                half_end, gap, expected
                            );
                            return Ok(Attempt::Restart);
                        }
                        Some(_) => {}
                        None => padding.intra = Some(gap),
                    }

                    let second_start = half_end + gap;
                    if !self.slice_eq(second_start, &second_half) {
                        return Ok(Attempt::Restart);
                    }
                    cursor = second_start + HALF_BYTES;
                }
            }
        }

        Ok(Attempt::Matched)
    }

    /// Bytes skipped before the first occurrence of `byte` within the padding window
    fn observe_gap(&self, from: usize, byte: u8) -> Option<usize> {
        let end = (from + PADDING_WINDOW).min(self.data.len());
        let window = self.data.get(from..end)?;
        memchr::memchr(byte, window)
    }

    fn slice_eq(&self, at: usize, expected: &[u8]) -> bool {
        self.data.get(at..at + expected.len()) == Some(expected)
    }
}
