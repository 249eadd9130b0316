//! Shape-to-grid covering engine.
//!
//! Walks the smallest closed grid window containing a shape's bounding box
//! and classifies every cell against the shape under the selected
//! [`CoverageMode`].

use crate::error::{GeocoverError, Result};
use crate::grid::{GeohashCodec, GridCodec, neighbor_cell};
use geo::{Area, BooleanOps, BoundingRect, Contains, Geometry, Intersects, Polygon};
use rustc_hash::FxHashSet;

/// Cell budget for a single covering traversal when no config is supplied.
pub const DEFAULT_MAX_WINDOW_CELLS: usize = 1 << 20;

/// Policy selecting which cells count as part of a shape's covering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageMode {
    /// Every cell whose rectangle intersects the shape. An optional
    /// threshold additionally requires a minimum fractional overlap.
    #[default]
    Intersect,
    /// Only cells whose rectangle lies fully inside the shape.
    Inside,
    /// Only cells whose center point lies inside the shape.
    Center,
}

/// Compute the set of geohash codes covering `shape` at `precision`.
///
/// Uses the production geohash codec and the default cell budget. See
/// [`cover_shape_with`] for the traversal contract.
///
/// # Examples
///
/// ```rust
/// use geocover::{CoverageMode, cover_shape};
/// use geo::{Geometry, polygon};
///
/// let shape = Geometry::Polygon(polygon![
///     (x: -0.20, y: 51.49),
///     (x: -0.10, y: 51.49),
///     (x: -0.10, y: 51.52),
///     (x: -0.20, y: 51.52),
///     (x: -0.20, y: 51.49),
/// ]);
///
/// let codes = cover_shape(&shape, 6, CoverageMode::Intersect, None)?;
/// assert!(!codes.is_empty());
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
pub fn cover_shape(
    shape: &Geometry<f64>,
    precision: usize,
    mode: CoverageMode,
    threshold: Option<f64>,
) -> Result<FxHashSet<String>> {
    cover_shape_with(
        &GeohashCodec,
        shape,
        precision,
        mode,
        threshold,
        DEFAULT_MAX_WINDOW_CELLS,
    )
}

/// Covering traversal over an arbitrary [`GridCodec`].
///
/// The window is anchored on the codes of the bounding box's southwest and
/// northeast corners; step counts are derived once from the southwest
/// anchor's cell size. Cell dimensions are not perfectly uniform across the
/// full latitude range, so shapes with very large latitude spans may gain
/// or lose a boundary row; the anchor-based policy is kept as the exact
/// grid-index arithmetic for typical extents.
///
/// `threshold` applies to [`CoverageMode::Intersect`] only and is the
/// minimum fraction of a cell's area the intersection must reach
/// (inclusive). The ratio is a plain planar area division with no epsilon,
/// so extremely thin slivers are subject to floating-point cancellation.
///
/// Fails with [`GeocoverError::ResourceLimitExceeded`] when the closed
/// window holds more than `max_cells` candidates.
pub fn cover_shape_with<C: GridCodec>(
    codec: &C,
    shape: &Geometry<f64>,
    precision: usize,
    mode: CoverageMode,
    threshold: Option<f64>,
    max_cells: usize,
) -> Result<FxHashSet<String>> {
    if !codec.precision_range().contains(&precision) {
        return Err(GeocoverError::InvalidInput(format!(
            "precision {} outside supported range {:?}",
            precision,
            codec.precision_range()
        )));
    }
    if let Some(t) = threshold {
        if mode != CoverageMode::Intersect {
            return Err(GeocoverError::InvalidInput(
                "threshold only applies to intersect mode".to_string(),
            ));
        }
        if !(t > 0.0 && t <= 1.0) {
            return Err(GeocoverError::InvalidInput(format!(
                "threshold {} outside (0, 1]",
                t
            )));
        }
    }

    let bounds = shape
        .bounding_rect()
        .ok_or_else(|| GeocoverError::InvalidInput("shape has no bounding box".to_string()))?;
    if ![bounds.min().x, bounds.min().y, bounds.max().x, bounds.max().y]
        .iter()
        .all(|v| v.is_finite())
    {
        log::warn!("rejecting shape with non-finite bounding box");
        return Err(GeocoverError::InvalidInput(
            "shape bounding box has non-finite coordinates".to_string(),
        ));
    }

    let sw_hash = codec.encode(bounds.min().y, bounds.min().x, precision)?;
    let ne_hash = codec.encode(bounds.max().y, bounds.max().x, precision)?;
    let sw = codec.decode_exactly(&sw_hash)?;
    let ne = codec.decode_exactly(&ne_hash)?;

    let lat_steps = ((ne.lat - sw.lat) / sw.cell_height()).round() as i64;
    let lon_steps = ((ne.lon - sw.lon) / sw.cell_width()).round() as i64;

    let window = (lat_steps as i128 + 1) * (lon_steps as i128 + 1);
    if window > max_cells as i128 {
        return Err(GeocoverError::ResourceLimitExceeded {
            cells: window.min(usize::MAX as i128) as usize,
            limit: max_cells,
        });
    }

    let mut codes = FxHashSet::default();
    for i in 0..=lat_steps {
        for j in 0..=lon_steps {
            let code = neighbor_cell(codec, &sw_hash, i, j)?;
            if classify(codec, shape, &code, mode, threshold)? {
                codes.insert(code);
            }
        }
    }

    Ok(codes)
}

fn classify<C: GridCodec>(
    codec: &C,
    shape: &Geometry<f64>,
    code: &str,
    mode: CoverageMode,
    threshold: Option<f64>,
) -> Result<bool> {
    match mode {
        CoverageMode::Center => {
            let center = codec.decode(code)?;
            Ok(shape.contains(&center))
        }
        CoverageMode::Inside => {
            let cell = codec.bounding_box(code)?.to_polygon();
            Ok(shape.contains(&cell))
        }
        CoverageMode::Intersect => {
            let cell = codec.bounding_box(code)?.to_polygon();
            if !shape.intersects(&cell) {
                return Ok(false);
            }
            match threshold {
                None => Ok(true),
                Some(t) => Ok(coverage_ratio(shape, &cell)? >= t),
            }
        }
    }
}

/// Fraction of the cell's area covered by the shape.
fn coverage_ratio(shape: &Geometry<f64>, cell: &Polygon<f64>) -> Result<f64> {
    let cell_area = cell.unsigned_area();
    if cell_area == 0.0 {
        return Ok(0.0);
    }

    let overlap = match shape {
        Geometry::Polygon(poly) => poly.intersection(cell).unsigned_area(),
        Geometry::MultiPolygon(multi) => multi.intersection(cell).unsigned_area(),
        Geometry::Rect(rect) => rect.to_polygon().intersection(cell).unsigned_area(),
        Geometry::Triangle(tri) => tri.to_polygon().intersection(cell).unsigned_area(),
        _ => {
            return Err(GeocoverError::InvalidInput(
                "threshold filtering requires an areal shape".to_string(),
            ));
        }
    };

    Ok(overlap / cell_area)
}
