//! Geohash covering for 2D shapes with GeoJSON round trips.
//!
//! ```rust
//! use geocover::{CoverageMode, cover_shape};
//! use geo::{Geometry, polygon};
//!
//! let shape = Geometry::Polygon(polygon![
//!     (x: -0.20, y: 51.49),
//!     (x: -0.10, y: 51.49),
//!     (x: -0.10, y: 51.52),
//!     (x: -0.20, y: 51.52),
//!     (x: -0.20, y: 51.49),
//! ]);
//!
//! let codes = cover_shape(&shape, 6, CoverageMode::Intersect, None)?;
//! assert!(codes.iter().all(|code| code.len() == 6));
//! # Ok::<(), geocover::GeocoverError>(())
//! ```

pub mod convert;
pub mod cover;
pub mod error;
pub mod grid;
pub mod hasher;
pub mod types;

pub use error::{GeocoverError, Result};

pub use cover::{CoverageMode, DEFAULT_MAX_WINDOW_CELLS, cover_shape, cover_shape_with};

pub use grid::{
    CellCenter, GeohashCodec, GridCodec, MAX_PRECISION, MIN_PRECISION, neighbor, neighbor_cell,
};

pub use convert::{
    attach_codes, codes_to_feature_collection, codes_to_multi_polygon, feature_collection_to_codes,
    geometry_to_codes,
};

pub use hasher::GeoJsonHasher;

pub use types::{Config, DEFAULT_GEOHASH_PRECISION, DecodeOptions, EncodeOptions};

pub use geo::{Geometry, MultiPolygon, Point, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeocoverError, GeoJsonHasher, Result};

    pub use crate::{CoverageMode, cover_shape};

    pub use crate::{Config, DecodeOptions, EncodeOptions};

    pub use crate::grid::{GeohashCodec, GridCodec, neighbor};

    pub use geo::{Geometry, MultiPolygon, Point, Polygon, Rect};
}
