//! CRC32 checksum over a whole result file
//!
//! The checksum covers every byte before the trailing checksum field. Any
//! mismatch is corruption.

use crc32fast::Hasher;

/// Computes a CRC32 (IEEE) checksum over `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Returns true if `data` hashes to `expected`.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"forced by constraint";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_known_value() {
        // standard CRC-32 check value
        assert_eq!(compute_checksum(b"123456789"), 0xcbf4_3926);
    }

    #[test]
    fn test_detects_single_bit_flip() {
        let mut data = vec![0x00, 0x01, 0x02, 0x03, 0x04];
        let original = compute_checksum(&data);
        data[2] ^= 0x01;
        assert!(!verify_checksum(&data, original));
    }
}
