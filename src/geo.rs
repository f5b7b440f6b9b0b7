//! Great-circle helpers for radius searches over stored coordinates.

/// Earth radius used by MongoDB's `2dsphere` index (WGS84 equatorial).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A `[longitude, latitude]` pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Distance between two points in metres
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Axis-aligned box guaranteed to contain every point within `radius_m` of `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn around(center: GeoPoint, radius_m: f64) -> Self {
        let dlat = (radius_m / EARTH_RADIUS_M).to_degrees();
        let min_lat = (center.lat - dlat).max(-90.0);
        let max_lat = (center.lat + dlat).min(90.0);

        // Near the poles (or for huge radii) every longitude qualifies
        let cos_lat = center.lat.to_radians().cos();
        let (min_lon, max_lon) = if max_lat >= 90.0 || min_lat <= -90.0 || cos_lat < 1e-9 {
            (-180.0, 180.0)
        } else {
            let dlon = (radius_m / (EARTH_RADIUS_M * cos_lat)).to_degrees();
            if dlon >= 180.0 {
                (-180.0, 180.0)
            } else {
                (center.lon - dlon, center.lon + dlon)
            }
        };

        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Whether the box wraps across the antimeridian
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon < -180.0 || self.max_lon > 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(80.3719, 22.6);
        assert!(haversine_m(p, p).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = haversine_m(a, b);
        // 2 * pi * R / 360
        assert!((d - 111_319.49).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let center = GeoPoint::new(86.1678, 22.2666);
        let bbox = BoundingBox::around(center, 10_000.0);
        assert!(bbox.min_lat < center.lat && bbox.max_lat > center.lat);
        assert!(bbox.min_lon < center.lon && bbox.max_lon > center.lon);

        let edge = GeoPoint::new(center.lon, bbox.max_lat);
        assert!((haversine_m(center, edge) - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn test_bounding_box_near_pole() {
        let bbox = BoundingBox::around(GeoPoint::new(0.0, 89.99), 50_000.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
    }
}
