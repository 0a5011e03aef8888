// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure distance/speed math shared by trip validation.

use geo::{Distance, Haversine, Point};

/// A latitude/longitude pair in degrees.
///
/// Callers are expected to validate ranges ([-90, 90] / [-180, 180])
/// before doing math on the coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Great-circle (haversine) distance between two points, in meters.
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    Haversine.distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat))
}

/// Average speed in km/h over a distance in meters and a duration in seconds.
///
/// Returns `None` when `duration_s` is zero; callers must guard.
pub fn average_speed_kmh(distance_m: f64, duration_s: u32) -> Option<f64> {
    if duration_s == 0 {
        return None;
    }
    Some((distance_m / 1000.0) / (f64::from(duration_s) / 3600.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Paris -> London, roughly 344 km
        let paris = LatLng {
            lat: 48.8566,
            lng: 2.3522,
        };
        let london = LatLng {
            lat: 51.5074,
            lng: -0.1278,
        };
        let d = haversine_m(paris, london);
        assert!((d - 343_500.0).abs() < 2_000.0, "got {}", d);
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = LatLng {
            lat: 37.4,
            lng: -122.1,
        };
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn test_average_speed() {
        // 5 km in one hour
        assert_eq!(average_speed_kmh(5000.0, 3600), Some(5.0));
        // 7.5 km in half an hour = 15 km/h
        assert_eq!(average_speed_kmh(7500.0, 1800), Some(15.0));
    }

    #[test]
    fn test_average_speed_zero_duration() {
        assert_eq!(average_speed_kmh(1000.0, 0), None);
    }
}
