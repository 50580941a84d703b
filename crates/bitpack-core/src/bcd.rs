//! Binary-coded decimal packing (two decimal digits per byte).
//!
//! The high nibble of each byte holds the earlier digit. An odd-length digit
//! string pads the final low nibble with the `0xF` sentinel, which also
//! serves as the decode-time end marker. Nibbles `0xA..=0xE` never occur in
//! valid BCD and are rejected as corruption.

use crate::error::CodecError;

/// Nibble value used to pad an odd-length digit string and to mark decode
/// end-of-digits.
pub const PAD_NIBBLE: u8 = 0xF;

/// Pack a string of decimal digit characters into BCD bytes.
///
/// # Errors
///
/// Returns [`CodecError::ArgumentOutOfRange`] if `digits` contains a
/// non-ASCII-digit character.
pub fn encode(digits: &str) -> Result<Vec<u8>, CodecError> {
    let nibbles: Vec<u8> = digits
        .chars()
        .map(|c| {
            c.to_digit(10).map(|d| d as u8).ok_or(CodecError::ArgumentOutOfRange {
                field: "digits",
                value: i64::from(c as u32),
                expected: "ASCII decimal digit",
            })
        })
        .collect::<Result<_, _>>()?;

    let mut out = Vec::with_capacity(nibbles.len().div_ceil(2));
    let mut iter = nibbles.chunks(2);
    for pair in &mut iter {
        let high = pair[0];
        let low = pair.get(1).copied().unwrap_or(PAD_NIBBLE);
        out.push((high << 4) | low);
    }
    Ok(out)
}

/// Unpack BCD bytes into a decimal digit string.
///
/// Decoding stops at the first `0xF` nibble (the pad sentinel), which need
/// not be the very last nibble examined if the caller passed a larger
/// buffer than the digit string requires.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBcdNibble`] if a nibble in `0xA..=0xE` is
/// encountered before the terminator.
pub fn decode(bytes: &[u8]) -> Result<String, CodecError> {
    let mut digits = String::with_capacity(bytes.len() * 2);
    'outer: for &byte in bytes {
        for nibble in [byte >> 4, byte & 0x0F] {
            match nibble {
                0x0..=0x9 => digits.push(char::from(b'0' + nibble)),
                PAD_NIBBLE => break 'outer,
                other => return Err(CodecError::InvalidBcdNibble(other)),
            }
        }
    }
    Ok(digits)
}

/// Prepend a country-code prefix to a decoded digit string.
///
/// This is purely textual composition (e.g. `format("5551234567", "+90")`
/// returns `"+905551234567"`); it performs no validation of either part.
#[must_use]
pub fn format(digits: &str, country_code: &str) -> String {
    format!("{country_code}{digits}")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn even_length_roundtrip() {
        let encoded = encode("1234").unwrap();
        assert_eq!(encoded, vec![0x12, 0x34]);
        assert_eq!(decode(&encoded).unwrap(), "1234");
    }

    #[test]
    fn odd_length_pads_with_f() {
        let encoded = encode("123").unwrap();
        assert_eq!(encoded, vec![0x12, 0x3F]);
        assert_eq!(decode(&encoded).unwrap(), "123");
    }

    #[test]
    fn decode_stops_at_first_pad_nibble() {
        // Second byte's pad nibble should end decoding even with trailing bytes.
        let bytes = [0x12, 0x3F, 0x99];
        assert_eq!(decode(&bytes).unwrap(), "123");
    }

    #[test]
    fn invalid_nibble_is_rejected() {
        for bad in [0xA, 0xB, 0xC, 0xD, 0xE] {
            let bytes = [bad << 4];
            assert_eq!(decode(&bytes), Err(CodecError::InvalidBcdNibble(bad)));
        }
    }

    #[test]
    fn format_prepends_country_code() {
        assert_eq!(format("5551234567", "+90"), "+905551234567");
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_digit_strings(
            digits in proptest::collection::vec(0u8..=9, 0..20)
        ) {
            let s: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            let encoded = encode(&s).unwrap();
            prop_assert_eq!(decode(&encoded).unwrap(), s);
        }
    }
}
