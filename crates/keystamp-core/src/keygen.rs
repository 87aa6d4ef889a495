//! License key derivation
//!
//! Seven seeds are spread over a 13-slot table, six slots are derived from
//! them, and every slot is packed 5 bits wide into a 64-bit key:
//!
//! ```text
//! bit  63..60  59..55  ...  9..5   4..0
//!      slot12  slot11  ...  slot1  slot0
//! ```

use crate::error::{Error, Result};

pub const SEED_COUNT: usize = 7;
pub const SLOT_COUNT: usize = 13;

/// Table slots that receive the seeds, in seed order
pub const SEED_SLOTS: [usize; SEED_COUNT] = [0, 2, 3, 7, 10, 11, 12];

/// Named table slots
pub mod slot {
    pub const SEED_A: usize = 0;
    pub const DOUBLED: usize = 1;
    pub const SEED_B: usize = 2;
    pub const SEED_C: usize = 3;
    pub const SUM: usize = 4;
    pub const SHIFTED: usize = 5;
    pub const INVERTED: usize = 6;
    pub const SEED_D: usize = 7;
    pub const SELECTED: usize = 8;
    pub const POWER: usize = 9;
    pub const SEED_E: usize = 10;
    pub const SEED_F: usize = 11;
    pub const TAIL: usize = 12;
}

const SLOT_BITS: u32 = 5;
const SLOT_MODULUS: u32 = 1 << SLOT_BITS;
const SEED_MAX: u32 = 31;
const TAIL_SEED_MAX: u32 = 15;
const TAIL_SHIFT: u32 = 60;

/// Derive the 64-bit license key from seven seeds.
///
/// The first six seeds must be at most 31, the last at most 15.
pub fn derive_key(seeds: [u32; SEED_COUNT]) -> Result<u64> {
    let table = derive_table(seeds)?;
    Ok(pack_table(&table))
}

/// Fill and reduce the slot table
pub fn derive_table(seeds: [u32; SEED_COUNT]) -> Result<[u32; SLOT_COUNT]> {
    for (index, &value) in seeds.iter().enumerate() {
        let max = if index == SEED_COUNT - 1 {
            TAIL_SEED_MAX
        } else {
            SEED_MAX
        };
        if value > max {
            return Err(Error::SeedOutOfRange { index, value, max });
        }
    }

    let mut s = [0u32; SLOT_COUNT];
    for (&target, &value) in SEED_SLOTS.iter().zip(seeds.iter()) {
        s[target] = value;
    }

    // Derived slots read the unreduced seeds
    s[slot::DOUBLED] = if s[slot::SEED_F] > 15 {
        s[slot::SEED_D] * 2
    } else {
        s[slot::TAIL] * 2
    };
    s[slot::SUM] = s[slot::SEED_A] + s[slot::SEED_D];
    s[slot::SHIFTED] = (s[slot::TAIL] % 8) + s[slot::SEED_B];
    s[slot::INVERTED] = !s[slot::SEED_C];
    s[slot::SELECTED] = if s[slot::SEED_F] % 4 == 0 {
        s[slot::SEED_C] + s[slot::TAIL]
    } else if s[slot::SEED_F] % 3 == 0 {
        s[slot::SEED_B] + s[slot::SEED_A]
    } else {
        s[slot::SEED_D] | 0x15
    };
    s[slot::POWER] = (s[slot::SEED_A] % 5).pow((s[slot::SEED_B] + s[slot::SEED_C]) % 8);

    for value in s.iter_mut() {
        *value %= SLOT_MODULUS;
    }

    Ok(s)
}

fn pack_table(table: &[u32; SLOT_COUNT]) -> u64 {
    let mut key = table[..slot::TAIL]
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &value)| {
            acc | (u64::from(value) << (SLOT_BITS as usize * i))
        });
    key |= u64::from(table[slot::TAIL] % 16) << TAIL_SHIFT;
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_golden_sample() {
        let seeds = [4, 13, 22, 18, 15, 2, 1];
        assert_eq!(derive_key(seeds).unwrap(), 0x113C_1792_5D6B_3444);
        assert_eq!(derive_key(seeds).unwrap(), derive_key(seeds).unwrap());
    }

    #[test]
    fn test_derive_table_golden_sample() {
        let table = derive_table([4, 13, 22, 18, 15, 2, 1]).unwrap();
        assert_eq!(table, [4, 2, 13, 22, 22, 14, 9, 18, 23, 0, 15, 2, 1]);
    }

    #[test]
    fn test_derive_key_high_seed_f_branches() {
        // SEED_F > 15 and divisible by 4
        assert_eq!(
            derive_key([7, 3, 0, 5, 1, 16, 15]).unwrap(),
            0xF805_0F2F_D4C0_0D47
        );
        // SEED_F divisible by 3 only
        assert_eq!(
            derive_key([31, 30, 29, 28, 27, 9, 14]).unwrap(),
            0xE4EC_3DE0_89BE_FB9F
        );
    }

    #[test]
    fn test_derive_key_bounds() {
        assert_eq!(derive_key([0; 7]).unwrap(), 0x2007_C000_0000);
        assert_eq!(
            derive_key([31, 31, 31, 31, 31, 31, 15]).unwrap(),
            0xFFFC_3FF8_0DEF_FFDF
        );
    }

    #[test]
    fn test_derive_key_rejects_out_of_range() {
        let err = derive_key([32, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::SeedOutOfRange {
                index: 0,
                value: 32,
                max: 31
            }
        ));

        let err = derive_key([0, 0, 0, 0, 0, 0, 16]).unwrap_err();
        assert!(matches!(
            err,
            Error::SeedOutOfRange {
                index: 6,
                max: 15,
                ..
            }
        ));
    }
}
