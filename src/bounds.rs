// Geographic bounds validation
// Two nested sanity windows; both are hard rejections

use crate::constants::{
    FIELD_LAT_MAX, FIELD_LAT_MIN, FIELD_LON_MAX, FIELD_LON_MIN, RESULT_LAT_MAX, RESULT_LAT_MIN,
    RESULT_LON_MAX, RESULT_LON_MIN,
};

/// Which coordinate failed a bounds check, and the offending value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsViolation {
    pub field: &'static str,
    pub value: f64,
}

/// Field-level sanity window, applied to the parsed coordinates before any
/// state is touched.
///
/// Non-finite values (NaN, infinities) never lie inside the window and are
/// rejected here, so they can't reach the store or the publisher.
pub fn check_field_window(latitude: f64, longitude: f64) -> Result<(), BoundsViolation> {
    if !(latitude >= FIELD_LAT_MIN && latitude <= FIELD_LAT_MAX) {
        return Err(BoundsViolation {
            field: "latitude",
            value: latitude,
        });
    }
    if !(longitude >= FIELD_LON_MIN && longitude <= FIELD_LON_MAX) {
        return Err(BoundsViolation {
            field: "longitude",
            value: longitude,
        });
    }
    Ok(())
}

/// Result-level sanity window, a tighter guard against accepted-but-implausible
/// fixes reaching the publisher.
pub fn check_result_window(latitude: f64, longitude: f64) -> Result<(), BoundsViolation> {
    if latitude < RESULT_LAT_MIN || latitude > RESULT_LAT_MAX {
        return Err(BoundsViolation {
            field: "latitude",
            value: latitude,
        });
    }
    if longitude < RESULT_LON_MIN || longitude > RESULT_LON_MAX {
        return Err(BoundsViolation {
            field: "longitude",
            value: longitude,
        });
    }
    Ok(())
}
