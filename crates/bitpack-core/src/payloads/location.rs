//! GPS location report payload.
//!
//! Two wire sizes: 8 bytes (just the fix) or 12 bytes extended with a
//! signed altitude and an accuracy radius. Compact mode never has a
//! payload-length field, so which layout a received buffer uses has to be
//! supplied by the caller as a hint (typically derived from the packet's
//! declared payload length).

use crate::bitwise;
use crate::error::CodecError;
use crate::gps::Gps;

/// An 8- or 12-byte location report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationPayload {
    location: Gps,
    altitude_m: Option<i16>,
    accuracy_m: Option<u16>,
}

impl LocationPayload {
    /// Wire size of the compact (fix-only) layout.
    pub const COMPACT_SIZE: usize = 8;
    /// Wire size of the extended (fix + altitude + accuracy) layout.
    pub const EXTENDED_SIZE: usize = 12;

    /// Build a compact location report carrying only a GPS fix.
    #[must_use]
    pub fn compact(location: Gps) -> Self {
        Self { location, altitude_m: None, accuracy_m: None }
    }

    /// Build an extended location report additionally carrying an
    /// altitude and an accuracy radius.
    #[must_use]
    pub fn extended(location: Gps, altitude_m: i16, accuracy_m: u16) -> Self {
        Self { location, altitude_m: Some(altitude_m), accuracy_m: Some(accuracy_m) }
    }

    /// GPS fix.
    #[must_use]
    pub fn location(&self) -> Gps {
        self.location
    }

    /// Altitude in meters, if this is an extended report.
    #[must_use]
    pub fn altitude_m(&self) -> Option<i16> {
        self.altitude_m
    }

    /// Accuracy radius in meters, if this is an extended report.
    #[must_use]
    pub fn accuracy_m(&self) -> Option<u16> {
        self.accuracy_m
    }

    /// Whether this report carries the extended fields.
    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.altitude_m.is_some()
    }

    /// Serialized size in bytes: [`LocationPayload::EXTENDED_SIZE`] if
    /// extended, else [`LocationPayload::COMPACT_SIZE`].
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        if self.is_extended() { Self::EXTENDED_SIZE } else { Self::COMPACT_SIZE }
    }

    /// Encode to 8 or 12 bytes depending on [`LocationPayload::is_extended`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        out.extend_from_slice(&self.location.to_be_bytes());
        if let (Some(altitude_m), Some(accuracy_m)) = (self.altitude_m, self.accuracy_m) {
            out.extend_from_slice(&altitude_m.to_be_bytes());
            out.extend_from_slice(&accuracy_m.to_be_bytes());
        }
        out
    }

    /// Decode a location payload. `extended` selects which layout `buf`
    /// is read as.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// the selected layout's size, or [`CodecError::InvalidCoordinate`]
    /// if the decoded fix is out of range.
    pub fn decode(buf: &[u8], extended: bool) -> Result<Self, CodecError> {
        let size = if extended { Self::EXTENDED_SIZE } else { Self::COMPACT_SIZE };
        if buf.len() < size {
            return Err(CodecError::InsufficientData { needed: size, available: buf.len() });
        }
        let location = Gps::from_be_bytes(&buf[0..8])?;
        if extended {
            let altitude_m = i16::from_be_bytes([buf[8], buf[9]]);
            let accuracy_m = bitwise::read16_be(buf, 10)?;
            Ok(Self::extended(location, altitude_m, accuracy_m))
        } else {
            Ok(Self::compact(location))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn compact_roundtrip() {
        let payload = LocationPayload::compact(Gps::new(41.0082, 28.9784).unwrap());
        let bytes = payload.encode();
        assert_eq!(bytes.len(), LocationPayload::COMPACT_SIZE);
        assert_eq!(LocationPayload::decode(&bytes, false).unwrap(), payload);
    }

    #[test]
    fn extended_roundtrip() {
        let payload = LocationPayload::extended(Gps::new(37.7749, -122.4194).unwrap(), -10, 25);
        let bytes = payload.encode();
        assert_eq!(bytes.len(), LocationPayload::EXTENDED_SIZE);
        assert_eq!(LocationPayload::decode(&bytes, true).unwrap(), payload);
    }

    #[test]
    fn wrong_layout_hint_is_rejected_as_insufficient_data() {
        let payload = LocationPayload::compact(Gps::new(0.0, 0.0).unwrap());
        let bytes = payload.encode();
        assert!(matches!(
            LocationPayload::decode(&bytes, true),
            Err(CodecError::InsufficientData { .. })
        ));
    }

    proptest! {
        #[test]
        fn compact_roundtrip_arbitrary(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let payload = LocationPayload::compact(Gps::new(lat, lon).unwrap());
            let bytes = payload.encode();
            prop_assert_eq!(LocationPayload::decode(&bytes, false).unwrap(), payload);
        }

        #[test]
        fn extended_roundtrip_arbitrary(
            lat in -90.0f64..=90.0, lon in -180.0f64..=180.0,
            altitude_m in any::<i16>(), accuracy_m in any::<u16>(),
        ) {
            let payload = LocationPayload::extended(Gps::new(lat, lon).unwrap(), altitude_m, accuracy_m);
            let bytes = payload.encode();
            prop_assert_eq!(LocationPayload::decode(&bytes, true).unwrap(), payload);
        }
    }
}
