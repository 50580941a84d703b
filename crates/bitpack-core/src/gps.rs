//! Fixed-point GPS coordinates and great-circle distance.
//!
//! Latitude and longitude are carried on the wire as signed, fixed-point
//! integers scaled by 1e7 (matching the precision of a `f64` degree value to
//! about 1.1 cm at the equator) so no float ever touches the bit-packed
//! encoding itself.

use crate::error::CodecError;

/// Coordinates are scaled by this factor when converting to/from the wire's
/// fixed-point representation.
pub const SCALE: f64 = 1e7;

/// Mean Earth radius in meters, used for haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A decoded GPS fix, stored as fixed-point microdegrees on the wire and
/// exposed as decimal degrees to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gps {
    lat_fixed: i32,
    lon_fixed: i32,
}

impl Gps {
    /// Build a [`Gps`] from decimal-degree latitude/longitude.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCoordinate`] if `lat` is outside
    /// `-90.0..=90.0` or `lon` is outside `-180.0..=180.0`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CodecError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CodecError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat_fixed: (lat * SCALE).round() as i32, lon_fixed: (lon * SCALE).round() as i32 })
    }

    /// Build a [`Gps`] directly from already-scaled fixed-point values, as
    /// read off the wire.
    #[must_use]
    pub fn from_fixed(lat_fixed: i32, lon_fixed: i32) -> Self {
        Self { lat_fixed, lon_fixed }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        f64::from(self.lat_fixed) / SCALE
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        f64::from(self.lon_fixed) / SCALE
    }

    /// Latitude as the raw fixed-point wire value.
    #[must_use]
    pub fn lat_fixed(&self) -> i32 {
        self.lat_fixed
    }

    /// Longitude as the raw fixed-point wire value.
    #[must_use]
    pub fn lon_fixed(&self) -> i32 {
        self.lon_fixed
    }

    /// Encode as 8 big-endian bytes: latitude then longitude.
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&self.lat_fixed.to_be_bytes());
        out[4..8].copy_from_slice(&self.lon_fixed.to_be_bytes());
        out
    }

    /// Decode from 8 big-endian bytes: latitude then longitude.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than 8
    /// bytes.
    pub fn from_be_bytes(buf: &[u8]) -> Result<Self, CodecError> {
        let bytes: [u8; 8] = buf
            .get(0..8)
            .ok_or(CodecError::InsufficientData { needed: 8, available: buf.len() })?
            .try_into()
            .expect("slice of length 8 converts infallibly");
        let lat_fixed = i32::from_be_bytes(bytes[0..4].try_into().expect("4-byte slice"));
        let lon_fixed = i32::from_be_bytes(bytes[4..8].try_into().expect("4-byte slice"));
        Ok(Self { lat_fixed, lon_fixed })
    }

    /// Great-circle distance to `other`, in meters, via the haversine
    /// formula.
    #[must_use]
    pub fn distance(&self, other: &Gps) -> f64 {
        let lat1 = self.latitude().to_radians();
        let lat2 = other.latitude().to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude() - self.longitude()).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_M * c
    }
}
