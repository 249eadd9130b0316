//! Conversions between geohash code lists and GeoJSON features/geometries.

use crate::cover::{CoverageMode, cover_shape};
use crate::error::{GeocoverError, Result};
use crate::grid::{GeohashCodec, GridCodec};
use geo::{MultiPolygon, unary_union};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use rustc_hash::FxHashSet;
use serde_json::Map;

/// Build a FeatureCollection with one rectangular feature per code.
///
/// Each feature carries the cell's bounding box as a closed 5-point ring
/// and a `geohash` property holding the code.
///
/// # Examples
///
/// ```rust
/// use geocover::convert::codes_to_feature_collection;
///
/// let fc = codes_to_feature_collection(&["gcpvj0".to_string()]).unwrap();
/// assert_eq!(fc.features.len(), 1);
/// ```
pub fn codes_to_feature_collection(codes: &[String]) -> Result<FeatureCollection> {
    let codec = GeohashCodec;
    let mut features = Vec::with_capacity(codes.len());

    for code in codes {
        let ring = cell_ring(&codec, code)?;
        let mut properties = Map::new();
        properties.insert(
            "geohash".to_string(),
            serde_json::Value::String(code.clone()),
        );

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Build a MultiPolygon whose parts are the per-code cell rectangles.
///
/// Parts follow the input order and duplicates are kept. With `union` the
/// rectangles are merged into a single boundary; adjacent cells coalesce
/// and enclosed gaps become holes.
pub fn codes_to_multi_polygon(codes: &[String], union: bool) -> Result<MultiPolygon<f64>> {
    let codec = GeohashCodec;
    let mut parts = Vec::with_capacity(codes.len());
    for code in codes {
        parts.push(codec.bounding_box(code)?.to_polygon());
    }

    let multi = MultiPolygon::new(parts);
    if union {
        Ok(unary_union(multi.0.iter()))
    } else {
        Ok(multi)
    }
}

/// Cover every feature's geometry (intersect mode) and union the results.
pub fn feature_collection_to_codes(
    collection: &FeatureCollection,
    precision: usize,
) -> Result<FxHashSet<String>> {
    let mut codes = FxHashSet::default();
    for feature in &collection.features {
        codes.extend(feature_to_codes(feature, precision)?);
    }
    Ok(codes)
}

/// Cover a single GeoJSON geometry with intersect-mode cells.
pub fn geometry_to_codes(geometry: &Geometry, precision: usize) -> Result<FxHashSet<String>> {
    let shape = geo::Geometry::<f64>::try_from(geometry).map_err(|e| {
        GeocoverError::InvalidInput(format!("failed to convert GeoJSON geometry: {}", e))
    })?;
    cover_shape(&shape, precision, CoverageMode::Intersect, None)
}

/// Overwrite every feature's `geohash` property with its own covering.
///
/// The attached value is the feature's sorted code list. Repeated calls
/// replace the previous list; last write wins.
pub fn attach_codes(collection: &mut FeatureCollection, precision: usize) -> Result<()> {
    for feature in collection.features.iter_mut() {
        let codes = feature_to_codes(feature, precision)?;
        feature.set_property("geohash", sorted_codes(&codes));
    }
    Ok(())
}

fn feature_to_codes(feature: &Feature, precision: usize) -> Result<FxHashSet<String>> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| GeocoverError::InvalidInput("feature has no geometry".to_string()))?;
    geometry_to_codes(geometry, precision)
}

/// Closed ring of a cell's bounding box, west/south corner first.
pub(crate) fn cell_ring<C: GridCodec>(codec: &C, code: &str) -> Result<Vec<Vec<f64>>> {
    let rect = codec.bounding_box(code)?;
    let (west, south) = (rect.min().x, rect.min().y);
    let (east, north) = (rect.max().x, rect.max().y);

    Ok(vec![
        vec![west, south],
        vec![east, south],
        vec![east, north],
        vec![west, north],
        vec![west, south],
    ])
}

pub(crate) fn sorted_codes(codes: &FxHashSet<String>) -> Vec<String> {
    let mut sorted: Vec<String> = codes.iter().cloned().collect();
    sorted.sort();
    sorted
}
