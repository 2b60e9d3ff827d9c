//! Outbound packet sinks for bound tracks.

pub mod udp;

pub use udp::UdpTrackWriter;
