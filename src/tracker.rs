// Vehicle position tracking
// Keeps the last accepted fix per vehicle identity for dead reckoning

use std::collections::HashMap;

/// The last accepted fix for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Heading in degrees, clockwise from north
    pub heading: f64,
}

#[derive(Debug)]
struct Entry {
    fix: VehicleFix,
    /// Monotonic sequence number of the last update, used for eviction order
    last_seen: u64,
}

/// Position history store - maps vehicle identity to its last known fix.
///
/// Single-writer by design: the one ingestion worker owns it and threads it
/// through the pipeline explicitly, so no locking is needed. Each accepted
/// record overwrites the vehicle's entry as a whole; there is never a
/// partially updated fix.
///
/// The store is bounded: once `capacity` vehicles are present, recording a
/// fix for a new identity evicts the least-recently-seen entry.
pub struct PositionStore {
    fixes: HashMap<i32, Entry>,
    capacity: usize,
    seq: u64,
}

impl PositionStore {
    /// Create a store holding at most `capacity` vehicles.
    pub fn new(capacity: usize) -> Self {
        PositionStore {
            fixes: HashMap::new(),
            capacity: capacity.max(1),
            seq: 0,
        }
    }

    /// Last accepted fix for a vehicle, if one has been seen.
    pub fn last_fix(&self, vehicle_id: i32) -> Option<VehicleFix> {
        self.fixes.get(&vehicle_id).map(|entry| entry.fix)
    }

    /// Record the accepted fix for a vehicle, overwriting any previous one.
    pub fn record(&mut self, vehicle_id: i32, fix: VehicleFix) {
        self.seq += 1;
        let seq = self.seq;

        if !self.fixes.contains_key(&vehicle_id) && self.fixes.len() >= self.capacity {
            self.evict_least_recently_seen();
        }

        self.fixes.insert(vehicle_id, Entry { fix, last_seen: seq });
    }

    /// Number of vehicles currently tracked.
    pub fn vehicle_count(&self) -> usize {
        self.fixes.len()
    }

    /// Is this vehicle currently tracked?
    pub fn contains(&self, vehicle_id: i32) -> bool {
        self.fixes.contains_key(&vehicle_id)
    }

    fn evict_least_recently_seen(&mut self) {
        let stalest = self
            .fixes
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(&id, _)| id);

        if let Some(id) = stalest {
            self.fixes.remove(&id);
        }
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
    fn test_record_and_lookup() {
        let mut store = PositionStore::new(16);
        assert_eq!(store.vehicle_count(), 0);
        assert!(store.last_fix(10012).is_none());

        store.record(10012, fix(35.5, 135.5, 0.0));
        assert_eq!(store.vehicle_count(), 1);
        assert_eq!(store.last_fix(10012), Some(fix(35.5, 135.5, 0.0)));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut store = PositionStore::new(16);
        store.record(10012, fix(35.5, 135.5, 0.0));
        store.record(10012, fix(35.6, 135.6, 90.0));

        assert_eq!(store.vehicle_count(), 1);
        assert_eq!(store.last_fix(10012), Some(fix(35.6, 135.6, 90.0)));
    }

    #[test]
    fn test_eviction_of_least_recently_seen() {
        let mut store = PositionStore::new(2);
        store.record(1, fix(35.0, 135.0, 0.0));
        store.record(2, fix(35.1, 135.1, 0.0));

        // Touch vehicle 1 so vehicle 2 becomes the stalest
        store.record(1, fix(35.2, 135.2, 0.0));

        store.record(3, fix(35.3, 135.3, 0.0));
        assert_eq!(store.vehicle_count(), 2);
        assert!(store.contains(1));
        assert!(!store.contains(2));
        assert!(store.contains(3));
    }

    #[test]
    fn test_overwrite_never_evicts() {
        let mut store = PositionStore::new(2);
        store.record(1, fix(35.0, 135.0, 0.0));
        store.record(2, fix(35.1, 135.1, 0.0));
        store.record(2, fix(35.2, 135.2, 45.0));

        assert_eq!(store.vehicle_count(), 2);
        assert!(store.contains(1));
        assert_eq!(store.last_fix(2), Some(fix(35.2, 135.2, 45.0)));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut store = PositionStore::new(0);
        store.record(1, fix(35.0, 135.0, 0.0));
        assert_eq!(store.vehicle_count(), 1);

        store.record(2, fix(35.1, 135.1, 0.0));
        assert_eq!(store.vehicle_count(), 1);
        assert!(store.contains(2));
    }
}
