use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::warn;
use media::Sample;
use rtp::extension::audio_level_extension::AudioLevelExtension;
use rtp::packetizer::{Packetizer, Payloader};
use rtp::sequence::Sequencer;
use util::Marshal;

use super::SampleWriteOptions;
use crate::error::{flatten_errs, Result};
use crate::rtp_transceiver::rtp_codec::RTCRtpCodecParameters;
use crate::rtp_transceiver::SSRC;
use crate::track::track_local::TrackLocalWriter;
use crate::track::RTP_OUTBOUND_MTU;

/// SampleBinding is the packetization state of one bind: it turns samples into
/// sequenced, timestamped RTP packets and hands them to the negotiated write stream.
pub(crate) struct SampleBinding {
    packetizer: Box<dyn Packetizer + Send + Sync>,
    sequencer: Box<dyn Sequencer + Send + Sync>,
    clock_rate: u32,
    audio_level_id: Option<u8>,
    write_stream: Arc<dyn TrackLocalWriter + Send + Sync>,
}

impl fmt::Debug for SampleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleBinding")
            .field("packetizer", &self.packetizer)
            .field("clock_rate", &self.clock_rate)
            .field("audio_level_id", &self.audio_level_id)
            .finish()
    }
}

impl SampleBinding {
    pub(crate) fn new(
        codec: &RTCRtpCodecParameters,
        ssrc: SSRC,
        payloader: Box<dyn Payloader + Send + Sync>,
        audio_level_id: Option<u8>,
        write_stream: Arc<dyn TrackLocalWriter + Send + Sync>,
    ) -> Self {
        let sequencer: Box<dyn Sequencer + Send + Sync> =
            Box::new(rtp::sequence::new_random_sequencer());
        let packetizer: Box<dyn Packetizer + Send + Sync> = Box::new(rtp::packetizer::new_packetizer(
            RTP_OUTBOUND_MTU,
            codec.payload_type,
            ssrc,
            payloader,
            sequencer.clone(),
            codec.capability.clock_rate,
        ));

        SampleBinding {
            packetizer,
            sequencer,
            clock_rate: codec.capability.clock_rate,
            audio_level_id,
            write_stream,
        }
    }

    /// samples converts a playout duration into RTP clock ticks
    pub(crate) fn samples(&self, duration: Duration) -> u32 {
        (duration.as_secs_f64() * self.clock_rate as f64).round() as u32
    }

    /// write_sample packetizes one sample and writes every resulting packet. Samples
    /// dropped right before this one are accounted for first, as if they had been sent.
    ///
    /// A packet whose audio level extension cannot be set is still written, without
    /// the extension; the failure shows up in the returned `SampleWriteErrors`.
    pub(crate) async fn write_sample(
        &mut self,
        sample: &Sample,
        opts: Option<&SampleWriteOptions>,
    ) -> Result<()> {
        let samples = self.samples(sample.duration);

        if sample.prev_dropped_packets > 0 {
            for _ in 0..sample.prev_dropped_packets {
                self.sequencer.next_sequence_number();
            }
            self.packetizer
                .skip_samples(samples.wrapping_mul(sample.prev_dropped_packets as u32));
        }

        let mut packets = self.packetizer.packetize(&sample.data, samples)?;

        let audio_level = match (self.audio_level_id, opts.and_then(|o| o.audio_level)) {
            (Some(id), Some(level)) => Some((id, level)),
            _ => None,
        };

        let mut write_errs = vec![];
        for p in &mut packets {
            if let Some((id, level)) = audio_level {
                if let Err(err) = set_audio_level(&mut p.header, id, level) {
                    warn!("setting audio level {level} failed: {err}");
                    write_errs.push(err);
                }
            }
            if let Err(err) = self.write_stream.write_rtp(p).await {
                write_errs.push(err);
            }
        }

        flatten_errs(packets.len(), write_errs)
    }
}

fn set_audio_level(header: &mut rtp::header::Header, id: u8, level: u8) -> Result<()> {
    let payload: Bytes = AudioLevelExtension {
        level,
        voice: false,
    }
    .marshal()?;
    header.set_extension(id, payload)?;
    Ok(())
}
