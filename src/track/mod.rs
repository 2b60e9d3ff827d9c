pub mod track_local;

/// RTP_OUTBOUND_MTU is the largest RTP packet, header included, a track emits
pub const RTP_OUTBOUND_MTU: usize = 1200;
