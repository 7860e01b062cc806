// Feed subscription client
// Inbound collaborator: line-delimited JSON envelopes over TCP

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tracing::warn;

use super::messages::{FeedEnvelope, SubscribeRequest};

/// A subscription to the telemetry feed.
///
/// Connects, sends a one-line JSON subscribe request for the configured
/// channel, then yields envelopes until the feed closes the connection.
pub struct FeedClient {
    reader: BufReader<tokio::io::ReadHalf<TcpStream>>,
    writer: BufWriter<tokio::io::WriteHalf<TcpStream>>,
    peer_addr: SocketAddr,
}

impl FeedClient {
    /// Connect to the feed and subscribe to `channel`.
    pub async fn connect(addr: &str, channel: u32) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let peer_addr = stream.peer_addr()?;
        let (read_half, write_half) = tokio::io::split(stream);

        let mut client = FeedClient {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            peer_addr,
        };
        client.subscribe(channel).await?;
        Ok(client)
    }

    /// Get the feed's address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    async fn subscribe(&mut self, channel: u32) -> io::Result<()> {
        let request = serde_json::to_string(&SubscribeRequest { channel })?;
        self.writer.write_all(request.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read the next envelope from the feed.
    ///
    /// Returns `Ok(None)` once the feed closes the connection. Blank lines
    /// (heartbeats) and malformed envelope lines are skipped; the latter are
    /// logged.
    pub async fn next_envelope(&mut self) -> io::Result<Option<FeedEnvelope>> {
        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).await?;
            if n == 0 {
                return Ok(None);
            }

            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<FeedEnvelope>(line) {
                Ok(envelope) => return Ok(Some(envelope)),
                Err(e) => {
                    warn!("Malformed feed envelope: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_subscribe_then_read_envelopes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Read the subscribe request line
            let mut buf = vec![0u8; 256];
            let n = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            stream
                .write_all(b"{\"name\":\"stdin\",\"data\":\"a,b,c,35.5,135.5,10.0,5.0\"}\n")
                .await
                .unwrap();
            // Heartbeat and a malformed line, both skipped
            stream.write_all(b"\n").await.unwrap();
            stream.write_all(b"not json\n").await.unwrap();
            stream
                .write_all(b"{\"name\":\"other\",\"data\":\"x\"}\n")
                .await
                .unwrap();
            stream.flush().await.unwrap();
            drop(stream);

            request
        });

        let mut client = FeedClient::connect(&addr.to_string(), 15).await.unwrap();

        let envelope = client.next_envelope().await.unwrap().unwrap();
        assert_eq!(envelope.name, "stdin");
        assert_eq!(envelope.data, "a,b,c,35.5,135.5,10.0,5.0");

        let envelope = client.next_envelope().await.unwrap().unwrap();
        assert_eq!(envelope.name, "other");

        // Feed closed
        assert!(client.next_envelope().await.unwrap().is_none());

        let request = server.await.unwrap();
        let parsed: SubscribeRequest = serde_json::from_str(request.trim()).unwrap();
        assert_eq!(parsed.channel, 15);
    }
}
