// Wire message type definitions
// Inbound JSON envelopes and the outbound fixed binary fleet schema

use serde::{Deserialize, Serialize};

/// Subscription request sent once after connecting to the feed.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub channel: u32,
}

/// One supply envelope from the feed subscription.
///
/// `name` is the supply label; only envelopes carrying the configured
/// sentinel label are processed. `data` is the raw comma-separated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEnvelope {
    pub name: String,
    pub data: String,
}

/// Encoded size of a [`FleetMessage`] in bytes.
pub const FLEET_MESSAGE_LEN: usize = 24;

/// Normalized fleet position message.
///
/// Produced once per accepted record and serialized immediately; never
/// retained. `status` is always 0 in this pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetMessage {
    pub vehicle_id: i32,
    pub latitude: f32,
    pub longitude: f32,
    pub heading: f32,
    pub speed: i32,
    pub status: i32,
}

impl FleetMessage {
    /// Encode into the fixed little-endian layout.
    ///
    /// Layout (24 bytes): vehicle id (i32), heading (f32), speed (i32),
    /// status (i32), latitude (f32), longitude (f32). This layout is part
    /// of the downstream contract and must remain stable.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FLEET_MESSAGE_LEN);
        buf.extend_from_slice(&self.vehicle_id.to_le_bytes());
        buf.extend_from_slice(&self.heading.to_le_bytes());
        buf.extend_from_slice(&self.speed.to_le_bytes());
        buf.extend_from_slice(&self.status.to_le_bytes());
        buf.extend_from_slice(&self.latitude.to_le_bytes());
        buf.extend_from_slice(&self.longitude.to_le_bytes());
        buf
    }

    /// Decode a payload produced by [`encode`](Self::encode).
    ///
    /// Returns `None` unless the payload is exactly [`FLEET_MESSAGE_LEN`]
    /// bytes.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() != FLEET_MESSAGE_LEN {
            return None;
        }

        Some(FleetMessage {
            vehicle_id: i32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            heading: f32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            speed: i32::from_le_bytes([data[8], data[9], data[10], data[11]]),
            status: i32::from_le_bytes([data[12], data[13], data[14], data[15]]),
            latitude: f32::from_le_bytes([data[16], data[17], data[18], data[19]]),
            longitude: f32::from_le_bytes([data[20], data[21], data[22], data[23]]),
        })
    }
}
