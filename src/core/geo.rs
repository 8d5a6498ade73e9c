//! Great-circle geodesy for geofence checks.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position, optionally carrying the fix accuracy in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy: None,
        }
    }

    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy = Some(accuracy_m);
        self
    }

    /// Haversine distance to `other`, in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_m(self, other)
    }

    /// True when `other` lies within `radius_m` of this point (inclusive).
    pub fn within(&self, other: &GeoPoint, radius_m: f64) -> bool {
        self.distance_to(other) <= radius_m
    }
}

/// Haversine great-circle distance between two points, in meters.
///
/// Accuracy is ignored; only latitude and longitude take part.
pub fn haversine_m(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(-23.3601, 119.7310);
        assert_eq!(haversine_m(&p, &p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = haversine_m(&a, &b);
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn accuracy_does_not_affect_distance() {
        let a = GeoPoint::new(-23.36, 119.73);
        let b = GeoPoint::new(-23.3603, 119.73).with_accuracy(80.0);
        assert_eq!(a.distance_to(&b), a.distance_to(&GeoPoint::new(-23.3603, 119.73)));
    }

    #[test]
    fn within_is_inclusive() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.0001);
        let d = a.distance_to(&b);
        assert!(a.within(&b, d));
        assert!(!a.within(&b, d - 0.01));
    }

    #[test]
    fn accuracy_is_optional_on_the_wire() {
        let p: GeoPoint = serde_json::from_str(r#"{"lat":1.5,"lng":2.5}"#).unwrap();
        assert_eq!(p.accuracy, None);
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("accuracy"));
    }
}
