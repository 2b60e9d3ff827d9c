pub mod local_sample_track;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use util::Unmarshal;

use crate::error::Result;
use crate::rtp_transceiver::rtp_codec::*;
use crate::rtp_transceiver::*;

/// TrackLocalWriter is the Writer for outbound RTP Packets
#[async_trait]
pub trait TrackLocalWriter: fmt::Debug {
    /// write_rtp writes a RTP packet to the transport
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize>;

    /// write parses and writes a full marshaled RTP packet
    async fn write(&self, mut b: &[u8]) -> Result<usize> {
        let pkt = rtp::packet::Packet::unmarshal(&mut b)?;
        self.write_rtp(&pkt).await
    }
}

/// TrackLocalContext is the Context passed when a TrackLocal has been bound to or unbound
/// from a session. It carries what the session negotiated for this track.
#[derive(Default, Debug, Clone)]
pub struct TrackLocalContext {
    pub(crate) id: String,
    pub(crate) params: RTCRtpParameters,
    pub(crate) ssrc: SSRC,
    pub(crate) write_stream: Option<Arc<dyn TrackLocalWriter + Send + Sync>>,
}

impl TrackLocalContext {
    pub fn new(
        id: String,
        params: RTCRtpParameters,
        ssrc: SSRC,
        write_stream: Option<Arc<dyn TrackLocalWriter + Send + Sync>>,
    ) -> Self {
        TrackLocalContext {
            id,
            params,
            ssrc,
            write_stream,
        }
    }

    /// codec_parameters returns the negotiated RTPCodecParameters. These are the codecs supported by both
    /// sides and the PayloadTypes
    pub fn codec_parameters(&self) -> &[RTCRtpCodecParameters] {
        &self.params.codecs
    }

    /// header_extensions returns the negotiated RTPHeaderExtensionParameters
    pub fn header_extensions(&self) -> &[RTCRtpHeaderExtensionParameters] {
        &self.params.header_extensions
    }

    /// ssrc returns the negotiated SSRC of this track
    pub fn ssrc(&self) -> SSRC {
        self.ssrc
    }

    /// write_stream returns the write_stream for this TrackLocal. The implementer writes the outbound
    /// media packets to it
    pub fn write_stream(&self) -> Option<Arc<dyn TrackLocalWriter + Send + Sync>> {
        self.write_stream.clone()
    }

    /// id is a unique identifier that is used for both bind/unbind
    pub fn id(&self) -> String {
        self.id.clone()
    }
}

/// TrackLocal is an interface that controls how the user can send media
#[async_trait]
pub trait TrackLocal {
    /// bind is called by the session layer once negotiation has settled the list of
    /// available codecs. It returns the codec the track will send with.
    async fn bind(&self, t: &TrackLocalContext) -> Result<RTCRtpCodecParameters>;

    /// unbind tears down what bind set up, the track is no longer sent.
    async fn unbind(&self, t: &TrackLocalContext) -> Result<()>;

    /// id is the unique identifier for this Track. This should be unique for the
    /// stream, but doesn't have to globally unique. A common example would be 'audio' or 'video'
    /// and stream_id would be 'desktop' or 'webcam'
    fn id(&self) -> &str;

    /// stream_id is the group this track belongs too. This must be unique
    fn stream_id(&self) -> &str;

    /// kind controls if this TrackLocal is audio or video
    fn kind(&self) -> RTPCodecType;

    fn as_any(&self) -> &dyn Any;
}
