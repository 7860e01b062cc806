// Fleet Packer - Main Entry Point
// Copyright (C) 2026
// Licensed under AGPL v3
//
// Normalizes raw vehicle/sensor telemetry into compact fleet messages

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fleet_packer::config::Config;
use fleet_packer::net::feed::FeedClient;
use fleet_packer::net::publisher::{Publisher, TcpConnector};
use fleet_packer::pipeline::{run_worker, Pipeline};
use fleet_packer::resolver::IdentityResolver;
use fleet_packer::tracker::PositionStore;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    info!("Starting fleet-packer");
    info!(
        "Channel {} (supply {:?}), publishing as {:?}",
        config.channel, config.supply_name, config.publish_name
    );

    let resolver = IdentityResolver::new(config.obd_prefix.clone(), config.sensor_id.clone());
    let store = PositionStore::new(config.max_vehicles);

    // Inability to reach either collaborator at startup is fatal; everything
    // after this point recovers locally.
    let connector = Arc::new(TcpConnector::new(config.sink_connect.clone()));
    let dial_timeout = Duration::from_secs(config.sink_timeout);
    let publisher = Publisher::connect(connector, dial_timeout).await?;
    info!("Connected to sink at {}", config.sink_connect);

    let feed = FeedClient::connect(&config.feed_connect, config.channel).await?;
    info!(
        "Subscribed to channel {} at {}",
        config.channel,
        feed.peer_addr()
    );

    let pipeline = Pipeline::new(resolver, store, publisher, config.publish_name.clone());

    let supply_name = config.supply_name.clone();
    let worker = tokio::spawn(async move { run_worker(feed, pipeline, &supply_name).await });

    tokio::select! {
        result = worker => {
            match result {
                Ok(Ok(())) => info!("Feed subscription closed"),
                Ok(Err(e)) => error!("Worker failed: {}", e),
                Err(e) => error!("Worker panicked: {}", e),
            }
        }
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal (Ctrl+C)");
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    if verbose {
        subscriber.with_max_level(tracing::Level::DEBUG).init();
        info!("Verbose logging enabled (DEBUG level)");
    } else {
        subscriber.with_max_level(tracing::Level::INFO).init();
    }
}
