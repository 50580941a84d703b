//! Emergency SOS beacon payload.
//!
//! Fixed at 15 bytes so a beacon always fits a Compact packet (4-byte
//! header + 15-byte payload + 1-byte CRC = 20 bytes, the BLE 4.2 link
//! MTU).
//!
//! ```text
//! byte0:    [sosType(3)|peopleCount(3)|hasInjured(1)|isTrapped(1)]
//! bytes1-8: GPS fix (8 bytes)
//! bytes9-13: last 8 digits of a phone number, BCD-packed (5 bytes)
//! byte14:   [altitudeStep(4)|batteryLevel(4)]
//! ```
//!
//! `byte14` is the one field where the original spec's prose ("12-bit
//! signed altitude, 7-bit battery") doesn't fit the single byte the fixed
//! 15-byte layout actually budgets for it. This implementation resolves
//! that the way `DESIGN.md` records: altitude is quantized to the nearest
//! 256 m step (a signed 4-bit nibble, `-2048..=1792` m) and battery to one
//! of 16 evenly spaced levels. Both quantizations happen once, at
//! construction, so `decode(encode(x)) == x` holds for the already-
//! quantized value `x` carries.

use crate::bcd;
use crate::error::CodecError;
use crate::gps::Gps;
use crate::enums::SosType;

/// Meters per altitude step (one nibble increment).
pub const ALTITUDE_STEP_M: i32 = 256;
/// Number of discrete battery levels a 4-bit field can carry.
pub const BATTERY_LEVELS: u8 = 15;
/// Number of trailing phone digits retained on the wire.
pub const PHONE_DIGITS: usize = 8;

/// A 15-byte emergency beacon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosPayload {
    sos_type: SosType,
    people_count: u8,
    has_injured: bool,
    is_trapped: bool,
    location: Gps,
    phone_last_digits: String,
    altitude_m: i16,
    battery_percent: u8,
}

impl SosPayload {
    /// Serialized size in bytes.
    pub const SIZE: usize = 15;

    /// Build a new SOS payload.
    ///
    /// `altitude_m` and `battery_percent` are quantized to the nearest
    /// representable step, so the values read back via
    /// [`SosPayload::altitude_m`]/[`SosPayload::battery_percent`] may
    /// differ slightly from what was passed in; [`SosPayload::encode`]
    /// always reproduces exactly the quantized value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `people_count` is not
    /// in `1..=7`, if `battery_percent` exceeds 100, or if `altitude_m`'s
    /// magnitude exceeds 4095 (the invariant from the protocol
    /// specification; the representable quantized range is narrower, see
    /// the module docs).
    pub fn new(
        sos_type: SosType,
        people_count: u8,
        has_injured: bool,
        is_trapped: bool,
        location: Gps,
        phone: &str,
        altitude_m: i16,
        battery_percent: u8,
    ) -> Result<Self, CodecError> {
        if !(1..=7).contains(&people_count) {
            return Err(CodecError::ArgumentOutOfRange {
                field: "people_count",
                value: i64::from(people_count),
                expected: "1..=7",
            });
        }
        if battery_percent > 100 {
            return Err(CodecError::ArgumentOutOfRange {
                field: "battery_percent",
                value: i64::from(battery_percent),
                expected: "0..=100",
            });
        }
        if i32::from(altitude_m).unsigned_abs() > 4095 {
            return Err(CodecError::ArgumentOutOfRange {
                field: "altitude_m",
                value: i64::from(altitude_m),
                expected: "-4095..=4095",
            });
        }

        let phone_last_digits = last_digits(phone, PHONE_DIGITS);
        let altitude_m = decode_altitude_nibble(encode_altitude_nibble(altitude_m));
        let battery_percent = decode_battery_nibble(encode_battery_nibble(battery_percent));

        Ok(Self {
            sos_type,
            people_count,
            has_injured,
            is_trapped,
            location,
            phone_last_digits,
            altitude_m,
            battery_percent,
        })
    }

    /// SOS subtype.
    #[must_use]
    pub fn sos_type(&self) -> SosType {
        self.sos_type
    }

    /// Number of people at the reported location (1..=7).
    #[must_use]
    pub fn people_count(&self) -> u8 {
        self.people_count
    }

    /// Whether anyone in the group is injured.
    #[must_use]
    pub fn has_injured(&self) -> bool {
        self.has_injured
    }

    /// Whether the group is physically trapped.
    #[must_use]
    pub fn is_trapped(&self) -> bool {
        self.is_trapped
    }

    /// Reported GPS fix.
    #[must_use]
    pub fn location(&self) -> Gps {
        self.location
    }

    /// Trailing phone digits retained on the wire, zero-left-padded to
    /// [`PHONE_DIGITS`].
    #[must_use]
    pub fn phone_last_digits(&self) -> &str {
        &self.phone_last_digits
    }

    /// Quantized altitude in meters.
    #[must_use]
    pub fn altitude_m(&self) -> i16 {
        self.altitude_m
    }

    /// Quantized battery percentage.
    #[must_use]
    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    /// Encode to the fixed 15-byte wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);

        let byte0 = (self.sos_type.to_code() << 5)
            | (self.people_count << 2)
            | (u8::from(self.has_injured) << 1)
            | u8::from(self.is_trapped);
        out.push(byte0);

        out.extend_from_slice(&self.location.to_be_bytes());

        let phone_bcd = bcd::encode(&self.phone_last_digits).unwrap_or_default();
        out.extend_from_slice(&phone_bcd);
        out.resize(1 + 8 + 5, bcd::PAD_NIBBLE << 4 | bcd::PAD_NIBBLE);

        let altitude_nibble = encode_altitude_nibble(self.altitude_m);
        let battery_nibble = encode_battery_nibble(self.battery_percent);
        out.push((altitude_nibble << 4) | battery_nibble);

        debug_assert_eq!(out.len(), Self::SIZE);
        out
    }

    /// Decode from the fixed 15-byte wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// [`SosPayload::SIZE`], or [`CodecError::UnknownType`]/
    /// [`CodecError::InvalidBcdNibble`]/[`CodecError::InvalidCoordinate`]
    /// propagated from the sub-field decoders.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::InsufficientData { needed: Self::SIZE, available: buf.len() });
        }
        let byte0 = buf[0];
        let sos_type = SosType::from_code((byte0 >> 5) & 0x07)?;
        let people_count = (byte0 >> 2) & 0x07;
        let has_injured = byte0 & 0b10 != 0;
        let is_trapped = byte0 & 0b01 != 0;

        let location = Gps::from_be_bytes(&buf[1..9])?;
        let phone_last_digits = bcd::decode(&buf[9..14])?;

        let byte14 = buf[14];
        let altitude_m = decode_altitude_nibble(byte14 >> 4);
        let battery_percent = decode_battery_nibble(byte14 & 0x0F);

        Ok(Self {
            sos_type,
            people_count,
            has_injured,
            is_trapped,
            location,
            phone_last_digits,
            altitude_m,
            battery_percent,
        })
    }
}

/// Last `count` decimal-digit characters of `phone`, left-padded with `0`
/// if it has fewer.
fn last_digits(phone: &str, count: usize) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= count {
        digits[digits.len() - count..].to_string()
    } else {
        format!("{:0>width$}", digits, width = count)
    }
}

/// Signed 4-bit two's-complement nibble: `-8..=7`, each unit worth
/// [`ALTITUDE_STEP_M`].
fn encode_altitude_nibble(altitude_m: i16) -> u8 {
    let steps = (i32::from(altitude_m) as f64 / f64::from(ALTITUDE_STEP_M)).round() as i32;
    let clamped = steps.clamp(-8, 7);
    (clamped & 0x0F) as u8
}

fn decode_altitude_nibble(nibble: u8) -> i16 {
    let raw = i32::from(nibble & 0x0F);
    let steps = if nibble & 0x08 != 0 { raw - 16 } else { raw };
    (steps * ALTITUDE_STEP_M) as i16
}

/// `0..=100` collapsed to one of [`BATTERY_LEVELS`] + 1 evenly spaced
/// levels, stored in 4 bits.
fn encode_battery_nibble(battery_percent: u8) -> u8 {
    let level = (f64::from(battery_percent) * f64::from(BATTERY_LEVELS) / 100.0).round() as u8;
    level.min(BATTERY_LEVELS)
}

fn decode_battery_nibble(nibble: u8) -> u8 {
    let level = nibble.min(BATTERY_LEVELS);
    (f64::from(level) * 100.0 / f64::from(BATTERY_LEVELS)).round() as u8
}
