use serde::{Deserialize, Serialize};

/// A geographic coordinate pair in signed decimal degrees.
///
/// Extracted locations are `Option<GeoPoint>`: either both coordinates are
/// present or the location is absent as a whole, never one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting values outside the WGS84 coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        if latitude.is_nan() || longitude.is_nan() {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let point = GeoPoint::new(-1.2921, 36.8219).unwrap();
        assert_eq!(point.latitude, -1.2921);
        assert_eq!(point.longitude, 36.8219);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoPoint::new(91.0, 0.0).is_none());
        assert!(GeoPoint::new(-91.0, 0.0).is_none());
        assert!(GeoPoint::new(0.0, 180.5).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_some());
        assert!(GeoPoint::new(-90.0, -180.0).is_some());
    }
}
