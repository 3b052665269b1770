//! Proximity query builder
//!
//! Builds a geospatial `$near` query from an origin point plus a radius in
//! kilometers. The radius is converted to meters for `$maxDistance` (the
//! unit the 2dsphere index expects) and validated up front so an
//! out-of-range value is rejected before any storage call.

use bson::{doc, Document};

use crate::db::schemas::GeoPoint;
use crate::types::{Result, SignpostError};

pub const MIN_RADIUS_KM: f64 = 0.0;
pub const MAX_RADIUS_KM: f64 = 100_000.0;

/// Default search radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// A validated nearby-search request
#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery {
    radius_km: f64,
    include_closed: bool,
}

impl NearbyQuery {
    /// Validate the radius and build the query
    ///
    /// Values outside [0, 100000] km (or non-finite values) fail with
    /// [`SignpostError::InvalidArgument`]; they are never silently clamped.
    pub fn new(radius_km: f64, include_closed: bool) -> Result<Self> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(SignpostError::InvalidArgument(format!(
                "radius must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM} km, got {radius_km}"
            )));
        }

        Ok(Self {
            radius_km,
            include_closed,
        })
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Build the query document for records within the radius of `origin`
    ///
    /// `None` origin yields `None`: a caller with no coordinates cannot
    /// compute "nearby", and the result is an empty set rather than an
    /// error.
    pub fn build(&self, origin: Option<&GeoPoint>) -> Option<Document> {
        let origin = origin?;

        let mut query = doc! {
            "location": {
                "$near": {
                    "$geometry": {
                        "type": "Point",
                        "coordinates": [origin.longitude(), origin.latitude()],
                    },
                    "$maxDistance": self.radius_km * 1000.0,
                }
            }
        };

        if !self.include_closed {
            query.insert("closed", doc! { "$ne": true });
        }

        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_out_of_range_is_rejected() {
        assert!(matches!(
            NearbyQuery::new(100_001.0, false),
            Err(SignpostError::InvalidArgument(_))
        ));
        assert!(NearbyQuery::new(-1.0, false).is_err());
        assert!(NearbyQuery::new(f64::NAN, false).is_err());
    }

    #[test]
    fn test_zero_radius_matches_coincident_points_only() {
        let query = NearbyQuery::new(0.0, false).unwrap();
        let origin = GeoPoint::new(-71.06, 42.36);
        let doc = query.build(Some(&origin)).unwrap();

        let near = doc
            .get_document("location")
            .unwrap()
            .get_document("$near")
            .unwrap();
        assert_eq!(near.get_f64("$maxDistance").unwrap(), 0.0);
    }

    #[test]
    fn test_radius_converts_to_meters() {
        let query = NearbyQuery::new(5.0, false).unwrap();
        let origin = GeoPoint::new(2.35, 48.85);
        let doc = query.build(Some(&origin)).unwrap();

        let near = doc
            .get_document("location")
            .unwrap()
            .get_document("$near")
            .unwrap();
        assert_eq!(near.get_f64("$maxDistance").unwrap(), 5000.0);

        let coordinates = near.get_document("$geometry").unwrap().get_array("coordinates").unwrap();
        assert_eq!(coordinates[0].as_f64().unwrap(), 2.35);
        assert_eq!(coordinates[1].as_f64().unwrap(), 48.85);
    }

    #[test]
    fn test_missing_origin_yields_no_query() {
        let query = NearbyQuery::new(5.0, false).unwrap();
        assert!(query.build(None).is_none());
    }

    #[test]
    fn test_closed_visibility_toggle() {
        let origin = GeoPoint::new(0.0, 0.0);

        let default = NearbyQuery::new(1.0, false).unwrap().build(Some(&origin)).unwrap();
        assert_eq!(
            default.get_document("closed").unwrap(),
            &doc! { "$ne": true }
        );

        let inclusive = NearbyQuery::new(1.0, true).unwrap().build(Some(&origin)).unwrap();
        assert!(inclusive.get("closed").is_none());
    }
}
