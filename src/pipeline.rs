// Record normalization pipeline
// Resolves identity, validates bounds, dead-reckons heading, and republishes
// each accepted record as a compact binary fleet message.

use std::io;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::bounds;
use crate::net::feed::FeedClient;
use crate::net::messages::FleetMessage;
use crate::net::publisher::Publisher;
use crate::reckoning;
use crate::resolver::IdentityResolver;
use crate::tracker::{PositionStore, VehicleFix};

/// Everything that can go wrong while processing one record.
///
/// Every variant is locally recovered: the record is dropped, the event is
/// logged, and the worker moves on to the next record.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("unresolved identity: {0:?}")]
    UnresolvedIdentity(String),

    #[error("malformed {field} field: {value:?}")]
    MalformedField {
        field: &'static str,
        value: String,
    },

    #[error("{window} bounds: {field} {value} out of range")]
    OutOfBounds {
        window: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Field indices fixed by the feed's schema.
const FIELD_SOURCE: usize = 0;
const FIELD_LATITUDE: usize = 3;
const FIELD_LONGITUDE: usize = 4;
const FIELD_ALTITUDE: usize = 5;
const FIELD_SPEED: usize = 6;

/// One inbound record, comma-split. Borrowed from the envelope payload and
/// discarded after processing.
#[derive(Debug)]
pub struct RawRecord<'a> {
    pub source: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub altitude: &'a str,
    pub speed: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Split a payload into its fixed fields. Only "enough fields present"
    /// is checked; indices are never renumbered.
    pub fn parse(payload: &'a str) -> Result<Self, ProcessError> {
        let fields: Vec<&str> = payload.split(',').collect();
        if fields.len() <= FIELD_SPEED {
            return Err(ProcessError::MalformedField {
                field: "record",
                value: payload.to_string(),
            });
        }

        Ok(RawRecord {
            source: fields[FIELD_SOURCE],
            latitude: fields[FIELD_LATITUDE],
            longitude: fields[FIELD_LONGITUDE],
            altitude: fields[FIELD_ALTITUDE],
            speed: fields[FIELD_SPEED],
        })
    }
}

/// The stateful normalization pipeline.
///
/// Owns the position store explicitly; a single worker drives it, so no
/// locking is involved. Control flow per record: resolve identity, parse
/// fields, field-level bounds, result-level bounds, heading estimation,
/// store write, encode, publish. All validation happens before the store is
/// mutated, so a rejected record never leaves state behind.
pub struct Pipeline {
    resolver: IdentityResolver,
    store: PositionStore,
    publisher: Publisher,
    publish_name: String,
}

impl Pipeline {
    pub fn new(
        resolver: IdentityResolver,
        store: PositionStore,
        publisher: Publisher,
        publish_name: String,
    ) -> Self {
        Pipeline {
            resolver,
            store,
            publisher,
            publish_name,
        }
    }

    /// Position store accessor (read-only).
    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    /// Process one raw record payload end to end.
    pub async fn process_record(&mut self, payload: &str) -> Result<(), ProcessError> {
        let record = RawRecord::parse(payload)?;

        let vehicle_id = self
            .resolver
            .resolve(record.source)
            .ok_or_else(|| ProcessError::UnresolvedIdentity(record.source.to_string()))?;

        let latitude: f64 =
            record
                .latitude
                .parse()
                .map_err(|_| ProcessError::MalformedField {
                    field: "latitude",
                    value: record.latitude.to_string(),
                })?;
        let longitude: f64 =
            record
                .longitude
                .parse()
                .map_err(|_| ProcessError::MalformedField {
                    field: "longitude",
                    value: record.longitude.to_string(),
                })?;
        // Altitude and speed are carried through unvalidated; an unparsable
        // value reads as zero, matching the upstream feed's behaviour
        let altitude: f64 = record.altitude.parse().unwrap_or(0.0);
        let speed: f64 = record.speed.parse().unwrap_or(0.0);

        bounds::check_field_window(latitude, longitude).map_err(|v| ProcessError::OutOfBounds {
            window: "field",
            field: v.field,
            value: v.value,
        })?;
        bounds::check_result_window(latitude, longitude).map_err(|v| {
            ProcessError::OutOfBounds {
                window: "result",
                field: v.field,
                value: v.value,
            }
        })?;

        let previous = self.store.last_fix(vehicle_id);
        let motion = reckoning::estimate(previous, latitude, longitude, speed);

        // Always write the new fix, even when the motion gate carried the
        // heading forward
        self.store.record(
            vehicle_id,
            VehicleFix {
                latitude,
                longitude,
                heading: motion.heading,
            },
        );

        info!(
            "Vehicle {:6}: {:.6}, {:.6} alt:{:.1} spd:{:.1} dst:{:.1} hdg:{:.1}",
            vehicle_id, latitude, longitude, altitude, speed, motion.distance_m, motion.heading
        );

        let message = FleetMessage {
            vehicle_id,
            latitude: latitude as f32,
            longitude: longitude as f32,
            heading: motion.heading as f32,
            speed: speed as i32,
            status: 0,
        };

        self.publisher
            .publish(&self.publish_name, &message.encode())
            .await
    }
}

/// Consume feed envelopes one at a time until the feed closes.
///
/// Records whose supply label differs from `supply_name` are ignored
/// entirely. Every processing error is logged and recovery is local; only
/// feed closure ends the loop.
pub async fn run_worker(
    mut feed: FeedClient,
    mut pipeline: Pipeline,
    supply_name: &str,
) -> io::Result<()> {
    while let Some(envelope) = feed.next_envelope().await? {
        if envelope.name != supply_name {
            debug!("Ignoring supply {:?}", envelope.name);
            continue;
        }

        if let Err(e) = pipeline.process_record(&envelope.data).await {
            match e {
                ProcessError::UnresolvedIdentity(_)
                | ProcessError::MalformedField { .. }
                | ProcessError::OutOfBounds { .. } => warn!("Dropped record: {}", e),
                ProcessError::Encoding(_) | ProcessError::Delivery(_) => {
                    error!("Dropped message: {}", e);
                }
            }
        }
    }

    info!("Feed closed, worker stopping");
    Ok(())
}
