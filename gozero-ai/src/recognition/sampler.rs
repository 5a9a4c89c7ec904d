//! Deterministic fallback selection
//!
//! Maps image bytes to a catalog entry with a polynomial rolling hash so that
//! retries of the same image converge on the same answer.

use std::sync::Arc;

use super::catalog::SampleCatalog;
use super::types::RecognitionResult;

/// Polynomial rolling hash: `h = h * 31 + b (mod 2^32)`, sign-folded
///
/// The accumulator wraps as a 32-bit signed integer and the final value is
/// its absolute value, so the result is always non-negative.
pub fn rolling_hash(bytes: &[u8]) -> u32 {
    let h = bytes.iter().fold(0i32, |h, &b| {
        h.wrapping_mul(31).wrapping_add(i32::from(b))
    });
    h.unsigned_abs()
}

/// Selects catalog entries by image hash
#[derive(Debug, Clone)]
pub struct DeterministicSampler {
    catalog: Arc<SampleCatalog>,
}

impl DeterministicSampler {
    pub fn new(catalog: Arc<SampleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SampleCatalog {
        &self.catalog
    }

    /// Catalog index for a byte sequence
    pub fn index_for(&self, bytes: &[u8]) -> usize {
        rolling_hash(bytes) as usize % self.catalog.len()
    }

    /// Select the catalog entry for `bytes`, unmodified
    pub fn select(&self, bytes: &[u8]) -> RecognitionResult {
        let index = self.index_for(bytes);
        // Catalog validation guarantees len() >= 1, so index is in range
        self.catalog.entries()[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> DeterministicSampler {
        DeterministicSampler::new(Arc::new(SampleCatalog::builtin().unwrap()))
    }

    /// Reference computation in 64-bit arithmetic
    fn reference_hash(bytes: &[u8]) -> u32 {
        let mut h: u64 = 0;
        for &b in bytes {
            h = (h * 31 + u64::from(b)) % (1u64 << 32);
        }
        (h as u32 as i32).unsigned_abs()
    }

    #[test]
    fn test_empty_bytes_hash_to_zero() {
        assert_eq!(rolling_hash(&[]), 0);
        let sampler = sampler();
        assert_eq!(sampler.index_for(&[]), 0);
        assert_eq!(&sampler.select(&[]), sampler.catalog().get(0).unwrap());
    }

    #[test]
    fn test_zero_bytes_hash_to_zero() {
        assert_eq!(rolling_hash(&[0u8; 10]), 0);
        let sampler = sampler();
        assert_eq!(sampler.select(&[0u8; 10]).item_name, "Plastic Water Bottle");
    }

    #[test]
    fn test_small_input_hash() {
        // ((97 * 31) + 98) * 31 + 99
        assert_eq!(rolling_hash(b"abc"), 96354);
        assert_eq!(rolling_hash(&[1]), 1);
        assert_eq!(rolling_hash(&[1, 0]), 31);
    }

    #[test]
    fn test_hash_wraps_and_folds_sign() {
        let inputs: [&[u8]; 4] = [
            &[0xFF; 64],
            b"a longer payload that certainly overflows thirty-two bits",
            &[0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01],
            &[7, 200, 13, 255, 0, 42, 99, 180, 3, 77, 250],
        ];
        for input in inputs {
            assert_eq!(rolling_hash(input), reference_hash(input));
        }
    }

    #[test]
    fn test_select_is_deterministic() {
        let sampler = sampler();
        let payloads: Vec<Vec<u8>> = (0u8..50)
            .map(|seed| (0..(seed as usize * 7 + 3)).map(|i| (i as u8).wrapping_mul(seed)).collect())
            .collect();

        for bytes in &payloads {
            let first = sampler.select(bytes);
            let second = sampler.select(bytes);
            assert_eq!(first, second);
            assert!(sampler.catalog().contains(&first));
        }
    }

    #[test]
    fn test_index_follows_hash_modulo_catalog_size() {
        let sampler = sampler();
        let len = sampler.catalog().len();
        let bytes = b"abc";
        assert_eq!(sampler.index_for(bytes), 96354 % len);
        assert_eq!(
            &sampler.select(bytes),
            sampler.catalog().get(96354 % len).unwrap()
        );
    }
}
