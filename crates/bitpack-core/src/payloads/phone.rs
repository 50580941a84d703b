//! International BCD-packed phone number payload.
//!
//! ```text
//! byte0: [INT(1)|LENGTH(4)|COUNTRY(3)]
//! [COUNTRY == Custom: 2 BCD bytes, numeric country code]
//! LENGTH BCD bytes: subscriber digits
//! ```
//!
//! Domestic numbers (`INT=0`) carry only the last 10 local digits and an
//! implicit Turkey country. International numbers (`INT=1`) select a
//! 3-bit shortcut country, or `Custom` followed by an explicit numeric
//! country code.

use crate::bcd;
use crate::enums::CountryCode;
use crate::error::CodecError;

const MAX_DIGITS: usize = 30;
const DOMESTIC_DIGITS: usize = 10;

/// A phone number packed as BCD digits with a shortcut or explicit
/// country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternationalBcd {
    international: bool,
    country: CountryCode,
    custom_country_code: Option<String>,
    digits: String,
}

impl InternationalBcd {
    /// Build a domestic number from its local digits. Only the last 10
    /// digits are retained; country is implicitly [`CountryCode::Turkey`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `local_digits` is
    /// empty or contains a non-ASCII-digit character.
    pub fn domestic(local_digits: &str) -> Result<Self, CodecError> {
        validate_digits(local_digits)?;
        let digits = last_digits(local_digits, DOMESTIC_DIGITS);
        Ok(Self { international: false, country: CountryCode::Turkey, custom_country_code: None, digits })
    }

    /// Build an international number using one of the shortcut country
    /// codes (anything but [`CountryCode::Custom`]).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `country` is
    /// [`CountryCode::Custom`], if `subscriber_digits` is empty, exceeds
    /// [`MAX_DIGITS`], or contains a non-ASCII-digit character.
    pub fn shortcut(country: CountryCode, subscriber_digits: &str) -> Result<Self, CodecError> {
        if country == CountryCode::Custom {
            return Err(CodecError::ArgumentOutOfRange {
                field: "country",
                value: i64::from(country.to_code()),
                expected: "a shortcut country, use InternationalBcd::custom for Custom",
            });
        }
        validate_digits(subscriber_digits)?;
        if subscriber_digits.len() > MAX_DIGITS {
            return Err(CodecError::ArgumentOutOfRange {
                field: "subscriber_digits",
                value: subscriber_digits.len() as i64,
                expected: "at most 30 digits",
            });
        }
        Ok(Self {
            international: true,
            country,
            custom_country_code: None,
            digits: subscriber_digits.to_string(),
        })
    }

    /// Build an international number with an explicit numeric country
    /// code (1 to 4 digits), for codes with no shortcut.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `country_code` is
    /// empty, exceeds 4 digits, or either digit string contains a
    /// non-ASCII-digit character.
    pub fn custom(country_code: &str, subscriber_digits: &str) -> Result<Self, CodecError> {
        validate_digits(country_code)?;
        if country_code.is_empty() || country_code.len() > 4 {
            return Err(CodecError::ArgumentOutOfRange {
                field: "country_code",
                value: country_code.len() as i64,
                expected: "1..=4 digits",
            });
        }
        validate_digits(subscriber_digits)?;
        if subscriber_digits.len() > MAX_DIGITS {
            return Err(CodecError::ArgumentOutOfRange {
                field: "subscriber_digits",
                value: subscriber_digits.len() as i64,
                expected: "at most 30 digits",
            });
        }
        Ok(Self {
            international: true,
            country: CountryCode::Custom,
            custom_country_code: Some(country_code.to_string()),
            digits: subscriber_digits.to_string(),
        })
    }

    /// Parse an E.164-style string (`"+<country><digits>"`). Only the
    /// four shortcut country codes are recognized; numbers under
    /// [`CountryCode::Custom`] codes must be built with
    /// [`InternationalBcd::custom`] instead. A string with no leading
    /// `+` is treated as domestic.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if the string starts
    /// with `+` but matches no known dial prefix, or if the digits are
    /// otherwise invalid per [`InternationalBcd::domestic`] or
    /// [`InternationalBcd::shortcut`].
    pub fn from_e164(phone: &str) -> Result<Self, CodecError> {
        let Some(rest) = phone.strip_prefix('+') else {
            return Self::domestic(phone);
        };
        for country in [CountryCode::UsaCanada, CountryCode::Uk, CountryCode::Germany, CountryCode::Turkey] {
            let prefix = country.dial_prefix().unwrap_or_default().trim_start_matches('+');
            if let Some(subscriber) = rest.strip_prefix(prefix) {
                return Self::shortcut(country, subscriber);
            }
        }
        Err(CodecError::ArgumentOutOfRange {
            field: "phone",
            value: 0,
            expected: "a recognized dial prefix (+1, +44, +49, +90) or InternationalBcd::custom",
        })
    }

    /// Whether this number carries an international country code.
    #[must_use]
    pub fn is_international(&self) -> bool {
        self.international
    }

    /// The country, or `None` when it is [`CountryCode::Custom`] (use
    /// [`InternationalBcd::custom_country_code`] instead).
    #[must_use]
    pub fn get_country_code(&self) -> Option<CountryCode> {
        if self.country == CountryCode::Custom { None } else { Some(self.country) }
    }

    /// The explicit numeric country code, present only for
    /// [`CountryCode::Custom`].
    #[must_use]
    pub fn custom_country_code(&self) -> Option<&str> {
        self.custom_country_code.as_deref()
    }

    /// The subscriber (domestic) digits, excluding any country code.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Reconstruct a dialable string: a dial-prefix shortcut, the
    /// explicit custom country code, or (for domestic numbers) the
    /// implicit `+90` Turkey prefix, followed by the subscriber digits.
    #[must_use]
    pub fn full_number(&self) -> String {
        match (self.international, self.country, &self.custom_country_code) {
            (true, CountryCode::Custom, Some(code)) => bcd::format(&self.digits, &format!("+{code}")),
            (true, country, _) => bcd::format(&self.digits, country.dial_prefix().unwrap_or_default()),
            (false, ..) => bcd::format(&self.digits, "+90"),
        }
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        1 + usize::from(self.country == CountryCode::Custom) * 2 + self.digits.len().div_ceil(2)
    }

    /// Encode to the wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        let length_nibble = (self.digits.len().div_ceil(2)) as u8;
        let country_bits = if self.international { self.country.to_code() } else { 0 };
        let byte0 = (u8::from(self.international) << 7) | (length_nibble << 3) | country_bits;
        out.push(byte0);
        if let Some(code) = &self.custom_country_code {
            out.extend_from_slice(&encode_custom_country(code));
        }
        out.extend(bcd::encode(&self.digits).unwrap_or_default());
        out
    }

    /// Decode an international BCD phone payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// the declared field widths, or [`CodecError::UnknownType`] or
    /// [`CodecError::InvalidBcdNibble`] for an unrecognized country code
    /// or corrupt BCD nibble.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let byte0 = *buf.first().ok_or(CodecError::InsufficientData { needed: 1, available: 0 })?;
        let international = byte0 & 0x80 != 0;
        let length = usize::from((byte0 >> 3) & 0x0F);
        let country_bits = byte0 & 0x07;

        let mut offset = 1;
        if international {
            let country = CountryCode::from_code(country_bits)?;
            let custom_country_code = if country == CountryCode::Custom {
                let bytes = buf.get(offset..offset + 2).ok_or(CodecError::InsufficientData {
                    needed: offset + 2,
                    available: buf.len(),
                })?;
                offset += 2;
                Some(bcd::decode(bytes)?)
            } else {
                None
            };
            let digit_bytes = buf
                .get(offset..offset + length)
                .ok_or(CodecError::InsufficientData { needed: offset + length, available: buf.len() })?;
            let digits = bcd::decode(digit_bytes)?;
            Ok(Self { international, country, custom_country_code, digits })
        } else {
            let digit_bytes = buf
                .get(offset..offset + length)
                .ok_or(CodecError::InsufficientData { needed: offset + length, available: buf.len() })?;
            let digits = bcd::decode(digit_bytes)?;
            Ok(Self { international: false, country: CountryCode::Turkey, custom_country_code: None, digits })
        }
    }
}

fn validate_digits(s: &str) -> Result<(), CodecError> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(CodecError::ArgumentOutOfRange { field: "digits", value: s.len() as i64, expected: "non-empty ASCII decimal digits" });
    }
    Ok(())
}

fn last_digits(digits: &str, max: usize) -> String {
    let len = digits.chars().count();
    if len <= max {
        digits.to_string()
    } else {
        digits.chars().skip(len - max).collect()
    }
}

fn encode_custom_country(code: &str) -> [u8; 2] {
    let mut nibbles = [bcd::PAD_NIBBLE; 4];
    for (slot, c) in nibbles.iter_mut().zip(code.chars()) {
        *slot = c.to_digit(10).unwrap_or(0) as u8;
    }
    [(nibbles[0] << 4) | nibbles[1], (nibbles[2] << 4) | nibbles[3]]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn scenario_g_usa_shortcut_roundtrip() {
        // Scenario G: InternationalBcd.encode("+15551234567").
        let phone = InternationalBcd::from_e164("+15551234567").unwrap();
        let bytes = phone.encode();
        assert_eq!(bytes[0] & 0x80, 0x80);
        assert_eq!(bytes[0] & 0x07, 0x1);

        let decoded = InternationalBcd::decode(&bytes).unwrap();
        assert_eq!(decoded, phone);
        assert!(decoded.full_number().starts_with("+1"));
    }

    #[test]
    fn domestic_keeps_only_last_ten_digits() {
        let phone = InternationalBcd::domestic("0090555123456789").unwrap();
        assert_eq!(phone.digits(), "5123456789");
        assert_eq!(phone.digits().len(), DOMESTIC_DIGITS);
        assert_eq!(phone.get_country_code(), Some(CountryCode::Turkey));
        let bytes = phone.encode();
        assert_eq!(InternationalBcd::decode(&bytes).unwrap(), phone);
    }

    #[test]
    fn custom_country_roundtrip() {
        let phone = InternationalBcd::custom("994", "551234567").unwrap();
        assert_eq!(phone.get_country_code(), None);
        assert_eq!(phone.custom_country_code(), Some("994"));
        let bytes = phone.encode();
        assert_eq!(bytes.len(), phone.size_in_bytes());
        assert_eq!(InternationalBcd::decode(&bytes).unwrap(), phone);
        assert_eq!(InternationalBcd::decode(&bytes).unwrap().full_number(), "+994551234567");
    }

    #[test]
    fn unrecognized_plus_prefix_is_rejected() {
        assert!(InternationalBcd::from_e164("+99255512345").is_err());
    }

    #[test]
    fn empty_digits_are_rejected() {
        assert!(InternationalBcd::domestic("").is_err());
        assert!(InternationalBcd::shortcut(CountryCode::Uk, "").is_err());
    }

    #[test]
    fn custom_country_code_must_fit_four_digits() {
        assert!(InternationalBcd::custom("99999", "5551234").is_err());
    }

    proptest! {
        #[test]
        fn shortcut_roundtrip_arbitrary(digits in "[0-9]{1,30}") {
            let phone = InternationalBcd::shortcut(CountryCode::Germany, &digits).unwrap();
            let bytes = phone.encode();
            prop_assert_eq!(bytes.len(), phone.size_in_bytes());
            prop_assert_eq!(InternationalBcd::decode(&bytes).unwrap(), phone);
        }

        #[test]
        fn domestic_roundtrip_arbitrary(digits in "[0-9]{1,10}") {
            let phone = InternationalBcd::domestic(&digits).unwrap();
            let bytes = phone.encode();
            prop_assert_eq!(InternationalBcd::decode(&bytes).unwrap(), phone);
        }
    }
}
