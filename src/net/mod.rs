// Network layer module
// Feed subscription, publish sink, and wire message formats

pub mod feed;
pub mod messages;
pub mod publisher;

pub use feed::FeedClient;
pub use messages::{FeedEnvelope, FleetMessage};
pub use publisher::{Publisher, TcpConnector};
