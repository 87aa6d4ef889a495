//! Keygen command implementation.

use anyhow::{Result, anyhow};
use keystamp_core::{SEED_COUNT, derive_key, derive_table};

/// Run the keygen command
pub fn run(seeds: &[u32], table: bool) -> Result<()> {
    let seeds: [u32; SEED_COUNT] = seeds
        .try_into()
        .map_err(|_| anyhow!("Expected {} seeds, got {}", SEED_COUNT, seeds.len()))?;

    let key = derive_key(seeds)?;
    println!("0x{:016X}", key);

    if table {
        let slots = derive_table(seeds)?;
        println!();
        for (index, value) in slots.iter().enumerate() {
            println!("  slot {:>2}: {:>2}", index, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_accepts_seven_seeds() {
        assert!(run(&[4, 13, 22, 18, 15, 2, 1], true).is_ok());
    }

    #[test]
    fn test_run_rejects_bad_input() {
        assert!(run(&[1, 2, 3], false).is_err());
        assert!(run(&[0, 0, 0, 0, 0, 0, 16], false).is_err());
    }
}
