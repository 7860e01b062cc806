// Dead reckoning - heading and displacement estimation from successive fixes
//
// Latitude/longitude deltas are converted to approximate metres with fixed
// scale factors valid near the feed's mid-latitude band; no geodesic
// correction is applied. Deltas are taken previous-minus-current and the
// atan2 bearing is rotated by +180 degrees to yield a compass-style heading.

use crate::constants::{
    LAT_SCALE_M_PER_DEG, LON_SCALE_M_PER_DEG, MIN_TRUSTED_DISPLACEMENT_M, MIN_TRUSTED_SPEED, RTOD,
};
use crate::tracker::VehicleFix;

/// Estimated motion between the previous and current fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Displacement since the previous fix, in metres
    pub distance_m: f64,
    /// Heading to report, in degrees clockwise from north
    pub heading: f64,
}

/// Estimate displacement and heading for a new fix.
///
/// The first fix for a vehicle always yields zero distance and zero heading.
/// Afterwards the heading is recomputed only when both the reported speed and
/// the displacement clear their noise thresholds; sub-threshold movement
/// carries the previous heading forward unchanged rather than being treated
/// as a stop-and-reverse.
pub fn estimate(previous: Option<VehicleFix>, latitude: f64, longitude: f64, speed: f64) -> Motion {
    let Some(prev) = previous else {
        return Motion {
            distance_m: 0.0,
            heading: 0.0,
        };
    };

    let dlat_m = (prev.latitude - latitude) * LAT_SCALE_M_PER_DEG;
    let dlon_m = (prev.longitude - longitude) * LON_SCALE_M_PER_DEG;
    let distance_m = (dlat_m * dlat_m + dlon_m * dlon_m).sqrt();

    let heading = if speed > MIN_TRUSTED_SPEED && distance_m > MIN_TRUSTED_DISPLACEMENT_M {
        dlon_m.atan2(dlat_m) * RTOD + 180.0
    } else {
        prev.heading
    };

    Motion {
        distance_m,
        heading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(latitude: f64, longitude: f64, heading: f64) -> VehicleFix {
        VehicleFix {
            latitude,
            longitude,
            heading,
        }
    }

    #[test]
    fn test_first_fix_zeroed() {
        let motion = estimate(None, 35.5, 135.5, 5.0);
        assert_eq!(motion.distance_m, 0.0);
        assert_eq!(motion.heading, 0.0);

        // Regardless of input speed
        let motion = estimate(None, 35.5, 135.5, 120.0);
        assert_eq!(motion.distance_m, 0.0);
        assert_eq!(motion.heading, 0.0);
    }

    #[test]
    fn test_northbound_heading_matches_formula() {
        let prev = fix(35.00, 135.00, 0.0);
        let motion = estimate(Some(prev), 35.01, 135.00, 5.0);

        // 0.01 degrees of latitude is well past the displacement gate
        let expected_dist = 0.01 * LAT_SCALE_M_PER_DEG;
        assert!((motion.distance_m - expected_dist).abs() < 1e-6);
        assert!(motion.distance_m > MIN_TRUSTED_DISPLACEMENT_M);

        // Same arithmetic as the estimator, bit for bit
        let dlat_m = (35.00f64 - 35.01) * LAT_SCALE_M_PER_DEG;
        let expected = 0.0f64.atan2(dlat_m) * RTOD + 180.0;
        assert_eq!(motion.heading, expected);
        assert!((motion.heading - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_southbound_heading() {
        let prev = fix(35.01, 135.00, 0.0);
        let motion = estimate(Some(prev), 35.00, 135.00, 5.0);

        // atan2(0, +dlat) = 0, rotated to 180
        assert!((motion.heading - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_displacement_carries_heading() {
        let prev = fix(35.000000, 135.000000, 47.25);
        // ~1.1 m north, below the 2 m gate
        let motion = estimate(Some(prev), 35.00001, 135.00000, 5.0);

        assert!(motion.distance_m <= MIN_TRUSTED_DISPLACEMENT_M);
        assert_eq!(motion.heading, 47.25);
    }

    #[test]
    fn test_low_speed_carries_heading() {
        let prev = fix(35.00, 135.00, 291.5);
        // Large displacement but the reported speed says standstill
        let motion = estimate(Some(prev), 35.01, 135.00, 0.05);

        assert!(motion.distance_m > MIN_TRUSTED_DISPLACEMENT_M);
        assert_eq!(motion.heading, 291.5);
    }

    #[test]
    fn test_gate_boundaries_are_exclusive() {
        let prev = fix(35.00, 135.00, 12.0);

        // Speed exactly at the threshold does not fire the gate
        let motion = estimate(Some(prev), 35.01, 135.00, MIN_TRUSTED_SPEED);
        assert_eq!(motion.heading, 12.0);
    }

    #[test]
    fn test_eastbound_heading() {
        let prev = fix(35.00, 135.00, 0.0);
        let motion = estimate(Some(prev), 35.00, 135.01, 5.0);

        // dlon_m negative, dlat_m zero: atan2(-x, 0) = -90, rotated to 90
        assert!((motion.heading - 90.0).abs() < 1e-9);
    }
}
