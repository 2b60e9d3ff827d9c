
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use log::trace;
use tokio::net::{ToSocketAddrs, UdpSocket};
use util::Marshal;

use crate::error::Result;
use crate::track::track_local::TrackLocalWriter;

/// UdpTrackWriter sends every RTP packet as one datagram to a connected peer,
/// e.g. a media server or `ffplay` listening on a local port
#[derive(Debug, Clone)]
pub struct UdpTrackWriter {
    conn: Arc<UdpSocket>,
}

impl UdpTrackWriter {
    /// new wraps an already connected socket
    pub fn new(conn: Arc<UdpSocket>) -> Self {
        UdpTrackWriter { conn }
    }

    /// connect binds `local` and connects it to `remote`
    pub async fn connect<A: ToSocketAddrs, B: ToSocketAddrs>(local: A, remote: B) -> Result<Self> {
        let conn = UdpSocket::bind(local).await?;
        conn.connect(remote).await?;
        Ok(UdpTrackWriter::new(Arc::new(conn)))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.conn.local_addr()?)
    }
}

#[async_trait]
impl TrackLocalWriter for UdpTrackWriter {
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize> {
        let raw = pkt.marshal()?;
        let n = self.conn.send(&raw).await?;
        trace!(
            "sent rtp packet seq={} ts={} ({n} bytes)",
            pkt.header.sequence_number,
            pkt.header.timestamp
        );
        Ok(n)
    }
}
