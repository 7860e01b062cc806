use clap::Parser;

/// Fleet Packer Configuration
///
/// All of this is static startup configuration; nothing here is mutated at
/// runtime.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Connect to host:port for the inbound telemetry feed.
    #[arg(long, value_name = "HOST:PORT", default_value = "127.0.0.1:8710")]
    pub feed_connect: String,

    /// Connect to host:port for the downstream publish sink.
    #[arg(long, value_name = "HOST:PORT", default_value = "127.0.0.1:8711")]
    pub sink_connect: String,

    /// Channel to subscribe on for input records.
    #[arg(long, value_name = "N", default_value_t = 15)]
    pub channel: u32,

    /// Supply label of records this pipeline processes; anything else is ignored.
    #[arg(long, value_name = "NAME", default_value = "stdin")]
    pub supply_name: String,

    /// Supply label attached to published fleet messages.
    #[arg(long, value_name = "NAME", default_value = "Map Supply")]
    pub publish_name: String,

    /// Textual prefix denoting an on-board device; may be given multiple times.
    /// Prefixes must not overlap: the first match wins.
    #[arg(
        long = "obd-prefix",
        value_name = "PREFIX",
        default_values_t = [
            "NisshinEisei-OBD-".to_string(),
            "HinodeEisei-OBD-".to_string(),
            "Nikkan-OBD-".to_string(),
            "ToyotaEisei-OBD-".to_string(),
        ]
    )]
    pub obd_prefix: Vec<String>,

    /// Identifier of a stationary sensor; may be given multiple times.
    #[arg(
        long = "sensor-id",
        value_name = "ID",
        default_values_t = [
            "600002".to_string(),
            "600004".to_string(),
            "600006".to_string(),
        ]
    )]
    pub sensor_id: Vec<String>,

    /// Maximum number of vehicles kept in the position store before the
    /// least-recently-seen entry is evicted.
    #[arg(long, value_name = "N", default_value_t = 4096)]
    pub max_vehicles: usize,

    /// Timeout for each sink reconnect attempt, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub sink_timeout: u64,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}
