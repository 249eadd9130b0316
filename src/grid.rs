//! Geohash grid primitives behind a pluggable codec trait.
//!
//! The covering engine only talks to the grid through [`GridCodec`], so the
//! production geohash codec can be swapped for a synthetic grid in tests.

use crate::error::{GeocoverError, Result};
use geo::{Point, Rect};
use std::ops::RangeInclusive;

/// Smallest geohash length supported by the production codec.
pub const MIN_PRECISION: usize = 1;

/// Largest geohash length supported by the production codec.
pub const MAX_PRECISION: usize = 12;

/// A decoded cell: center point plus symmetric half-cell errors.
///
/// `lat_err`/`lon_err` are half the cell height/width, so the cell spans
/// `lat ± lat_err` by `lon ± lon_err`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCenter {
    pub lat: f64,
    pub lon: f64,
    pub lat_err: f64,
    pub lon_err: f64,
}

impl CellCenter {
    /// Full cell height in degrees of latitude.
    pub fn cell_height(&self) -> f64 {
        self.lat_err * 2.0
    }

    /// Full cell width in degrees of longitude.
    pub fn cell_width(&self) -> f64 {
        self.lon_err * 2.0
    }
}

/// Encode/decode interface between the covering engine and a cell grid.
///
/// Implementations must be deterministic: encoding a decoded center at the
/// same precision yields the same code, which is what makes the engine's
/// grid-index arithmetic exact.
pub trait GridCodec {
    /// Encode a coordinate pair to the code of its containing cell.
    fn encode(&self, lat: f64, lon: f64, precision: usize) -> Result<String>;

    /// Decode a code to its exact center and half-cell errors.
    fn decode_exactly(&self, code: &str) -> Result<CellCenter>;

    /// Decode a code to its center point.
    ///
    /// The default implementation returns the exact center; codecs may
    /// round to a decimal precision matching the cell size.
    fn decode(&self, code: &str) -> Result<Point<f64>> {
        let cell = self.decode_exactly(code)?;
        Ok(Point::new(cell.lon, cell.lat))
    }

    /// Bounding box of the cell a code denotes.
    fn bounding_box(&self, code: &str) -> Result<Rect<f64>>;

    /// Precision of an existing code. Defaults to its length.
    fn precision_of(&self, code: &str) -> usize {
        code.len()
    }

    /// Inclusive range of precisions this codec supports.
    fn precision_range(&self) -> RangeInclusive<usize>;
}

/// Production codec backed by the `geohash` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeohashCodec;

impl GridCodec for GeohashCodec {
    fn encode(&self, lat: f64, lon: f64, precision: usize) -> Result<String> {
        if !self.precision_range().contains(&precision) {
            return Err(GeocoverError::InvalidInput(format!(
                "precision {} outside supported range {}..={}",
                precision, MIN_PRECISION, MAX_PRECISION
            )));
        }
        Ok(geohash::encode(geohash::Coord { x: lon, y: lat }, precision)?)
    }

    fn decode_exactly(&self, code: &str) -> Result<CellCenter> {
        let (center, lon_err, lat_err) = geohash::decode(code)?;
        Ok(CellCenter {
            lat: center.y,
            lon: center.x,
            lat_err,
            lon_err,
        })
    }

    fn decode(&self, code: &str) -> Result<Point<f64>> {
        let cell = self.decode_exactly(code)?;
        Ok(Point::new(
            round_to_cell(cell.lon, cell.lon_err),
            round_to_cell(cell.lat, cell.lat_err),
        ))
    }

    fn bounding_box(&self, code: &str) -> Result<Rect<f64>> {
        Ok(geohash::decode_bbox(code)?)
    }

    fn precision_range(&self) -> RangeInclusive<usize> {
        MIN_PRECISION..=MAX_PRECISION
    }
}

/// Round a coordinate to one decimal digit finer than the cell span.
///
/// Keeps the rounded value inside the cell while trimming digits that
/// carry no information at the code's precision.
fn round_to_cell(value: f64, half_err: f64) -> f64 {
    let span = half_err * 2.0;
    if !(span > 0.0 && span.is_finite()) {
        return value;
    }
    let digits = ((-span.log10()).ceil() + 1.0).max(1.0) as i32;
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Code of the cell offset from `code` by whole cell heights/widths.
///
/// Offsets are measured in units of the input cell's own dimensions and may
/// be negative, zero, or span multiple cells. The result is re-encoded at
/// the input code's precision.
///
/// # Examples
///
/// ```rust
/// use geocover::grid::{neighbor_cell, GeohashCodec};
///
/// // One cell north of a central-London cell.
/// let north = neighbor_cell(&GeohashCodec, "gcpvj0", 1, 0).unwrap();
/// assert_eq!(north.len(), 6);
/// assert_ne!(north, "gcpvj0");
/// ```
pub fn neighbor_cell<C: GridCodec>(
    codec: &C,
    code: &str,
    lat_offset: i64,
    lon_offset: i64,
) -> Result<String> {
    let cell = codec.decode_exactly(code)?;
    let lat = cell.lat + lat_offset as f64 * cell.cell_height();
    let lon = cell.lon + lon_offset as f64 * cell.cell_width();
    codec.encode(lat, lon, codec.precision_of(code))
}

/// [`neighbor_cell`] on the production geohash codec.
pub fn neighbor(code: &str, lat_offset: i64, lon_offset: i64) -> Result<String> {
    neighbor_cell(&GeohashCodec, code, lat_offset, lon_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = GeohashCodec;
        let code = codec.encode(40.7128, -74.0060, 8).unwrap();
        assert_eq!(code.len(), 8);

        let cell = codec.decode_exactly(&code).unwrap();
        assert!((cell.lat - 40.7128).abs() <= cell.lat_err);
        assert!((cell.lon + 74.0060).abs() <= cell.lon_err);

        // Re-encoding the decoded center recovers the same code.
        let again = codec.encode(cell.lat, cell.lon, 8).unwrap();
        assert_eq!(again, code);
    }

    #[test]
    fn test_encode_rejects_bad_precision() {
        let codec = GeohashCodec;
        assert!(codec.encode(40.0, -74.0, 0).is_err());
        assert!(codec.encode(40.0, -74.0, 13).is_err());
    }

    #[test]
    fn test_decode_rejects_invalid_code() {
        let codec = GeohashCodec;
        let err = codec.decode_exactly("not a geohash!").unwrap_err();
        assert!(matches!(err, GeocoverError::InvalidGeohash(_)));
    }

    #[test]
    fn test_bounding_box_matches_decode() {
        let codec = GeohashCodec;
        let cell = codec.decode_exactly("gcpvj0").unwrap();
        let bbox = codec.bounding_box("gcpvj0").unwrap();

        assert!((bbox.min().y - (cell.lat - cell.lat_err)).abs() < 1e-9);
        assert!((bbox.max().y - (cell.lat + cell.lat_err)).abs() < 1e-9);
        assert!((bbox.min().x - (cell.lon - cell.lon_err)).abs() < 1e-9);
        assert!((bbox.max().x - (cell.lon + cell.lon_err)).abs() < 1e-9);
    }

    #[test]
    fn test_decode_rounded_stays_in_cell() {
        let codec = GeohashCodec;
        for code in ["u", "u0", "u09", "u09tvw", "u09tvw1z"] {
            let cell = codec.decode_exactly(code).unwrap();
            let point = codec.decode(code).unwrap();
            assert!(
                (point.y() - cell.lat).abs() <= cell.lat_err,
                "rounded lat left cell {}",
                code
            );
            assert!(
                (point.x() - cell.lon).abs() <= cell.lon_err,
                "rounded lon left cell {}",
                code
            );
        }
    }

    #[test]
    fn test_neighbor_matches_geohash_crate() {
        let nb = geohash::neighbors("gcpvj0").unwrap();

        assert_eq!(neighbor("gcpvj0", 1, 0).unwrap(), nb.n);
        assert_eq!(neighbor("gcpvj0", 1, 1).unwrap(), nb.ne);
        assert_eq!(neighbor("gcpvj0", 0, 1).unwrap(), nb.e);
        assert_eq!(neighbor("gcpvj0", -1, 1).unwrap(), nb.se);
        assert_eq!(neighbor("gcpvj0", -1, 0).unwrap(), nb.s);
        assert_eq!(neighbor("gcpvj0", -1, -1).unwrap(), nb.sw);
        assert_eq!(neighbor("gcpvj0", 0, -1).unwrap(), nb.w);
        assert_eq!(neighbor("gcpvj0", 1, -1).unwrap(), nb.nw);
    }

    #[test]
    fn test_neighbor_zero_offset_is_identity() {
        assert_eq!(neighbor("gcpvj0", 0, 0).unwrap(), "gcpvj0");
    }

    #[test]
    fn test_neighbor_multi_cell_offset() {
        // Two steps east equals east-of-east.
        let east = neighbor("gcpvj0", 0, 1).unwrap();
        let east2 = neighbor(&east, 0, 1).unwrap();
        assert_eq!(neighbor("gcpvj0", 0, 2).unwrap(), east2);
    }
}
