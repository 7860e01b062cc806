// Vehicle identity resolution
// Maps raw source-name tokens onto canonical integer vehicle identities

use crate::constants::OBD_ID_OFFSET;

/// Resolves source-name tokens against the configured identifier tables.
///
/// Two naming schemes are supported, checked in priority order:
/// on-board devices carry a fixed textual prefix followed by a device
/// number (offset into a disjoint namespace), while stationary sensors
/// are identified by their numeric name verbatim. The prefix table must
/// be non-overlapping; the first matching prefix wins.
pub struct IdentityResolver {
    obd_prefixes: Vec<String>,
    sensor_ids: Vec<String>,
}

impl IdentityResolver {
    pub fn new(obd_prefixes: Vec<String>, sensor_ids: Vec<String>) -> Self {
        IdentityResolver {
            obd_prefixes,
            sensor_ids,
        }
    }

    /// Resolve a source-name token to a vehicle identity.
    ///
    /// Returns `None` for unknown tokens, device suffixes that are
    /// non-numeric or too large to offset, and anything that would produce
    /// a non-positive identity. A token that
    /// matches an on-board prefix never falls through to the sensor table.
    pub fn resolve(&self, token: &str) -> Option<i32> {
        for prefix in &self.obd_prefixes {
            if let Some(suffix) = token.strip_prefix(prefix.as_str()) {
                return suffix
                    .parse::<i32>()
                    .ok()
                    .and_then(|n| n.checked_add(OBD_ID_OFFSET))
                    .filter(|&id| id > 0);
            }
        }

        for sensor in &self.sensor_ids {
            if token == sensor {
                return token.parse::<i32>().ok().filter(|&id| id > 0);
            }
        }

        None
    }
}
