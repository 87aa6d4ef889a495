//! Utility functions for byte scanning

use crate::encoding::ByteOrder;

/// Split a 64-bit value into the two 4-byte halves it occupies in memory
pub fn split_halves(value: u64, order: ByteOrder) -> ([u8; 4], [u8; 4]) {
    let bytes = match order {
        ByteOrder::BigEndian => value.to_be_bytes(),
        ByteOrder::LittleEndian => value.to_le_bytes(),
    };
    (
        [bytes[0], bytes[1], bytes[2], bytes[3]],
        [bytes[4], bytes[5], bytes[6], bytes[7]],
    )
}

/// Check `pattern` against `data` at `pos`; `None` entries match any byte
pub fn matches_at(data: &[u8], pos: usize, pattern: &[Option<u8>]) -> bool {
    let Some(window) = data.get(pos..pos + pattern.len()) else {
        return false;
    };
    window
        .iter()
        .zip(pattern)
        .all(|(byte, expected)| expected.is_none_or(|value| *byte == value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_halves() {
        let (hi, lo) = split_halves(0x0102_0304_0506_0708, ByteOrder::BigEndian);
        assert_eq!(hi, [1, 2, 3, 4]);
        assert_eq!(lo, [5, 6, 7, 8]);

        let (first, second) = split_halves(0x0102_0304_0506_0708, ByteOrder::LittleEndian);
        assert_eq!(first, [8, 7, 6, 5]);
        assert_eq!(second, [4, 3, 2, 1]);
    }

    #[test]
    fn test_matches_at_with_wildcards() {
        let data = [0x00, 0xC7, 0x05, 0xAA, 0xBB];
        assert!(matches_at(&data, 1, &[Some(0xC7), None, Some(0xAA)]));
        assert!(!matches_at(&data, 0, &[Some(0xC7)]));
        assert!(!matches_at(&data, 4, &[Some(0xBB), None]));
    }
}
