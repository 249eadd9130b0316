//! Stateful region ↔ geohash-codes session.
//!
//! A [`GeoJsonHasher`] wraps one GeoJSON FeatureCollection and the geohash
//! codes derived from it (or vice versa). Both slots start unset; the
//! derived operations refuse to overwrite computed state unless asked to.

use crate::convert;
use crate::cover::cover_shape_with;
use crate::error::{GeocoverError, Result};
use crate::grid::{GeohashCodec, GridCodec};
use crate::types::{Config, DecodeOptions, EncodeOptions};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use rustc_hash::FxHashSet;
use serde_json::Map;

/// Session holding a region and/or the geohash codes covering it.
///
/// The two slots are independent: setting one never invalidates the other.
/// [`encode`](Self::encode) derives codes from the region;
/// [`decode`](Self::decode) derives a region from the codes. Each derived
/// operation rejects overwriting its target slot unless the options carry
/// `overwrite`.
///
/// A hasher is single-owner state; wrap it in external synchronization if
/// it must be shared across threads.
///
/// # Examples
///
/// ```rust
/// use geocover::{EncodeOptions, GeoJsonHasher};
/// use geojson::GeoJson;
///
/// let geojson: GeoJson = r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "properties": {},
///         "geometry": {
///             "type": "Polygon",
///             "coordinates": [[
///                 [-0.20, 51.49], [-0.10, 51.49], [-0.10, 51.52],
///                 [-0.20, 51.52], [-0.20, 51.49]
///             ]]
///         }
///     }]
/// }"#.parse().unwrap();
///
/// let mut hasher = GeoJsonHasher::new();
/// hasher.set_region(geojson)?;
/// let codes = hasher.encode(&EncodeOptions::with_precision(5))?;
/// assert!(!codes.is_empty());
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
#[derive(Debug, Default)]
pub struct GeoJsonHasher {
    region: Option<FeatureCollection>,
    codes: Option<FxHashSet<String>>,
    config: Config,
}

impl GeoJsonHasher {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(GeocoverError::InvalidInput)?;
        Ok(Self {
            region: None,
            codes: None,
            config,
        })
    }

    /// The region slot, if set.
    pub fn region(&self) -> Option<&FeatureCollection> {
        self.region.as_ref()
    }

    /// The codes slot, if set.
    pub fn codes(&self) -> Option<&FxHashSet<String>> {
        self.codes.as_ref()
    }

    /// The session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Unset both slots.
    pub fn clear(&mut self) {
        self.region = None;
        self.codes = None;
    }

    /// Set the region slot from a parsed GeoJSON document.
    ///
    /// Only `FeatureCollection` documents are accepted. Replaces any
    /// previous region unconditionally.
    pub fn set_region(&mut self, document: GeoJson) -> Result<()> {
        match document {
            GeoJson::FeatureCollection(collection) => {
                self.region = Some(collection);
                Ok(())
            }
            other => Err(GeocoverError::InvalidInput(format!(
                "expected a FeatureCollection document, got {}",
                geojson_kind(&other)
            ))),
        }
    }

    /// Set the codes slot from an ordered sequence of geohash codes.
    ///
    /// Every code must be decodable. Replaces any previous codes
    /// unconditionally; duplicates collapse.
    pub fn set_codes(&mut self, codes: Vec<String>) -> Result<()> {
        let codec = GeohashCodec;
        for code in &codes {
            codec.decode_exactly(code)?;
        }
        self.codes = Some(codes.into_iter().collect());
        Ok(())
    }

    /// Cover every feature of the region and store the union of codes.
    ///
    /// Fails with `MissingInput` when no region is set and with
    /// `AlreadyComputed` when codes exist and `overwrite` is not set.
    /// With `keep_structure` each feature additionally gets its own sorted
    /// code list written to its `geohash` property; the mutated region
    /// stays reachable through [`region`](Self::region).
    ///
    /// Returns the stored union.
    pub fn encode(&mut self, options: &EncodeOptions) -> Result<&FxHashSet<String>> {
        if self.codes.is_some() && !options.overwrite {
            return Err(GeocoverError::AlreadyComputed("geohash codes"));
        }
        let region = self
            .region
            .as_mut()
            .ok_or(GeocoverError::MissingInput("region"))?;

        let codec = GeohashCodec;
        let mut union = FxHashSet::default();

        for feature in region.features.iter_mut() {
            let geometry = feature
                .geometry
                .as_ref()
                .ok_or_else(|| GeocoverError::InvalidInput("feature has no geometry".to_string()))?;
            let shape = geo::Geometry::<f64>::try_from(geometry).map_err(|e| {
                GeocoverError::InvalidInput(format!("failed to convert GeoJSON geometry: {}", e))
            })?;

            let codes = cover_shape_with(
                &codec,
                &shape,
                options.precision,
                options.mode,
                options.threshold,
                self.config.max_window_cells,
            )?;

            if options.keep_structure {
                feature.set_property("geohash", convert::sorted_codes(&codes));
            }
            union.extend(codes);
        }

        Ok(self.codes.insert(union))
    }

    /// Rebuild a region from the stored codes.
    ///
    /// Fails with `MissingInput` when no codes are set and with
    /// `AlreadyComputed` when a region exists and `overwrite` is not set.
    /// Codes are emitted in lexicographic order so the output is
    /// deterministic.
    ///
    /// Returns the stored region.
    pub fn decode(&mut self, options: &DecodeOptions) -> Result<&FeatureCollection> {
        let codes = self
            .codes
            .as_ref()
            .ok_or(GeocoverError::MissingInput("geohash codes"))?;
        if self.region.is_some() && !options.overwrite {
            return Err(GeocoverError::AlreadyComputed("region"));
        }

        let mut sorted: Vec<String> = codes.iter().cloned().collect();
        sorted.sort();

        let collection = if options.multipolygon {
            let multi = convert::codes_to_multi_polygon(&sorted, options.union)?;

            let mut properties = Map::new();
            properties.insert("geohash".to_string(), serde_json::Value::from(sorted));

            FeatureCollection {
                bbox: None,
                features: vec![Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&multi))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }],
                foreign_members: None,
            }
        } else {
            let mut collection = convert::codes_to_feature_collection(&sorted)?;
            for (feature, code) in collection.features.iter_mut().zip(&sorted) {
                feature.set_property("geohash", vec![code.clone()]);
            }
            collection
        };

        Ok(self.region.insert(collection))
    }
}

fn geojson_kind(document: &GeoJson) -> &'static str {
    match document {
        GeoJson::Geometry(_) => "a Geometry",
        GeoJson::Feature(_) => "a Feature",
        GeoJson::FeatureCollection(_) => "a FeatureCollection",
    }
}
