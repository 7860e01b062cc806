// Shared constants for the normalization pipeline

use std::f64::consts::PI;

/// Radians to degrees conversion factor
pub const RTOD: f64 = 180.0 / PI;

/// Metres per degree of latitude near the feed's expected latitude band
/// (flat-earth approximation, not geodesically exact)
pub const LAT_SCALE_M_PER_DEG: f64 = 110940.5844;

/// Metres per degree of longitude near the feed's expected latitude band
pub const LON_SCALE_M_PER_DEG: f64 = 91287.7885;

/// Reported speeds at or below this are treated as standstill noise
pub const MIN_TRUSTED_SPEED: f64 = 0.1;

/// Displacements at or below this many metres are treated as GPS jitter
pub const MIN_TRUSTED_DISPLACEMENT_M: f64 = 2.0;

/// Offset added to on-board device numbers so they never collide with
/// stationary sensor identities
pub const OBD_ID_OFFSET: i32 = 10000;

/// Field-level sanity window: minimum plausible latitude (degrees)
pub const FIELD_LAT_MIN: f64 = 20.0;

/// Field-level sanity window: maximum plausible latitude (degrees)
pub const FIELD_LAT_MAX: f64 = 46.0;

/// Field-level sanity window: minimum plausible longitude (degrees)
pub const FIELD_LON_MIN: f64 = 122.0;

/// Field-level sanity window: maximum plausible longitude (degrees)
pub const FIELD_LON_MAX: f64 = 154.0;

/// Result-level sanity window: minimum latitude (degrees)
pub const RESULT_LAT_MIN: f64 = 30.0;

/// Result-level sanity window: maximum latitude (degrees)
pub const RESULT_LAT_MAX: f64 = 40.0;

/// Result-level sanity window: minimum longitude (degrees)
pub const RESULT_LON_MIN: f64 = 120.0;

/// Result-level sanity window: maximum longitude (degrees)
pub const RESULT_LON_MAX: f64 = 150.0;

/// Delay between sink reconnect attempts (s)
pub const RECONNECT_BACKOFF_SECS: u64 = 5;
