//! Embedded image block discovery

use tracing::{debug, info};

use super::constants::{IMAGE_END, IMAGE_START};
use crate::layout::image::{BLOCK_LEN, END_MARKER_LEN, START_MARKER_LEN};
use crate::scan::Scanner;

/// Locate the embedded image block searching from `start`.
///
/// Returns the offset right after the start marker, where the image header
/// begins. A start marker without the end marker at the expected distance is
/// treated as a coincidence and scanning continues.
pub fn locate_image(data: &[u8], start: usize) -> Option<usize> {
    let scanner = Scanner::new(data);
    let mut pos = start;

    while let Some(found) = scanner.find_bytes(pos, &IMAGE_START) {
        let end_at = found + BLOCK_LEN - END_MARKER_LEN;
        if data.get(end_at..end_at + END_MARKER_LEN) == Some(&IMAGE_END[..]) {
            let offset = found + START_MARKER_LEN;
            info!("Image block at 0x{:X}", offset);
            return Some(offset);
        }

        debug!("Image start marker at 0x{:X} has no end marker, skipping", found);
        pos = found + 1;
    }

    None
}
