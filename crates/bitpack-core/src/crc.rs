//! Checksums used to detect corruption in small mesh frames.
//!
//! `Crc8` guards every packet trailer (CCITT polynomial, no reflection — a
//! single byte is enough to catch the bit flips a BLE link actually
//! produces). `Crc32` is the IEEE variant, kept for callers that need a
//! stronger check over larger buffers (e.g. the transport layer checking a
//! reassembled message); it is not part of the packet wire format itself.

use std::sync::OnceLock;

/// CCITT CRC-8: polynomial `0x07`, initial value `0x00`, no input/output
/// reflection.
pub struct Crc8;

impl Crc8 {
    const POLY: u8 = 0x07;

    /// Compute the CRC-8 of `data`.
    #[must_use]
    pub fn compute(data: &[u8]) -> u8 {
        let mut crc: u8 = 0x00;
        for &byte in data {
            crc ^= byte;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 { (crc << 1) ^ Self::POLY } else { crc << 1 };
            }
        }
        crc
    }
}

/// IEEE CRC-32: polynomial `0xEDB88320` (reflected form), initial value
/// `0xFFFFFFFF`, output XORed with `0xFFFFFFFF`.
pub struct Crc32;

static TABLE: OnceLock<[u32; 256]> = OnceLock::new();

fn table() -> &'static [u32; 256] {
    TABLE.get_or_init(|| {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    })
}

impl Crc32 {
    /// Compute the IEEE CRC-32 of `data`.
    #[must_use]
    pub fn compute(data: &[u8]) -> u32 {
        let table = table();
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in data {
            let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
            crc = (crc >> 8) ^ table[index];
        }
        crc ^ 0xFFFF_FFFF
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn crc32_check_vector() {
        assert_eq!(Crc32::compute(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn crc32_check_vector_hex_snapshot() {
        let hex_digest = hex::encode(Crc32::compute(b"123456789").to_be_bytes());
        insta::assert_snapshot!(hex_digest, @"cbf43926");
    }

    #[test]
    fn crc8_is_deterministic() {
        assert_eq!(Crc8::compute(b"hello"), Crc8::compute(b"hello"));
    }

    #[test]
    fn crc8_detects_single_byte_flip() {
        let original = b"bitpack-packet".to_vec();
        let original_crc = Crc8::compute(&original);

        for index in 0..original.len() {
            let mut tampered = original.clone();
            tampered[index] ^= 0x01;
            assert_ne!(
                Crc8::compute(&tampered),
                original_crc,
                "single bit flip at byte {index} should change the CRC"
            );
        }
    }

    #[test]
    fn crc8_empty_input() {
        assert_eq!(Crc8::compute(&[]), 0x00);
    }

    #[test]
    fn crc32_empty_input() {
        assert_eq!(Crc32::compute(&[]), 0x0000_0000);
    }

    proptest! {
        #[test]
        fn crc8_is_a_pure_function(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(Crc8::compute(&data), Crc8::compute(&data));
        }

        #[test]
        fn crc32_is_a_pure_function(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(Crc32::compute(&data), Crc32::compute(&data));
        }
    }
}
