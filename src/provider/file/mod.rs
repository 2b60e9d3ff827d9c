
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use media::io::h264_reader::H264Reader;
use media::io::ivf_reader::IVFReader;
use media::Sample;
use tokio::sync::Mutex;

use super::null::SAMPLES_PER_SECOND;
use super::*;
use crate::error::Error;
use crate::rtp_transceiver::rtp_codec::*;
use crate::rtp_transceiver::*;

const H264_READER_CAPACITY: usize = 1_048_576;
const VIDEO_CLOCK_RATE: u32 = 90000;

const H264_FMTP_LINES: [&str; 6] = [
    "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42001f",
    "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
    "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42e01f",
    "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
    "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=640032",
    "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=640032",
];

/// H264ProfileRotation hands out the H.264 fmtp lines round-robin, so
/// successive file tracks exercise every profile / packetization-mode pair
#[derive(Default, Debug, Clone)]
pub struct H264ProfileRotation {
    next: usize,
}

impl H264ProfileRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_fmtp_line(&mut self) -> &'static str {
        let line = H264_FMTP_LINES[self.next % H264_FMTP_LINES.len()];
        self.next = self.next.wrapping_add(1);
        line
    }
}

/// new_file_sample_provider reads `reader` as a container of `mime_type` media and
/// returns a provider for its samples together with the codec to create the track with.
/// H.264 is read as an Annex-B byte stream, VP8 as IVF.
pub fn new_file_sample_provider<R>(
    reader: R,
    mime_type: &str,
    rotation: &mut H264ProfileRotation,
) -> Result<(Arc<dyn SampleProvider>, RTCRtpCodecCapability)>
where
    R: Read + Send + 'static,
{
    if mime_type.eq_ignore_ascii_case(MIME_TYPE_H264) {
        let provider: Arc<dyn SampleProvider> = Arc::new(H264VideoProvider {
            reader: Mutex::new(H264Reader::new(reader, H264_READER_CAPACITY)),
        });
        let codec = RTCRtpCodecCapability {
            mime_type: MIME_TYPE_H264.to_owned(),
            clock_rate: VIDEO_CLOCK_RATE,
            channels: 0,
            sdp_fmtp_line: rotation.next_fmtp_line().to_owned(),
            rtcp_feedback: vec![
                RTCPFeedback::new(TYPE_RTCP_FB_GOOG_REMB, ""),
                RTCPFeedback::new(TYPE_RTCP_FB_CCM, "fir"),
                RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
                RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
            ],
        };
        debug!("h264 file provider with fmtp {}", codec.sdp_fmtp_line);

        Ok((provider, codec))
    } else if mime_type.eq_ignore_ascii_case(MIME_TYPE_VP8) {
        let (reader, header) = IVFReader::new(reader)?;
        let sample_duration = header.frame_duration().ok_or(Error::ErrInvalidTimebase)?;
        debug!(
            "ivf file provider {}x{}, {} frames of {:?}",
            header.width, header.height, header.num_frames, sample_duration
        );

        let provider: Arc<dyn SampleProvider> = Arc::new(Vp8VideoProvider {
            reader: Mutex::new(reader),
            sample_duration,
        });
        let codec = RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            clock_rate: VIDEO_CLOCK_RATE,
            ..Default::default()
        };

        Ok((provider, codec))
    } else {
        Err(Error::ErrUnsupportedFileFormat(mime_type.to_owned()))
    }
}

/// H264VideoProvider sends one NAL unit per sample at 30 samples per second
struct H264VideoProvider<R: Read> {
    reader: Mutex<H264Reader<R>>,
}

impl<R: Read> fmt::Debug for H264VideoProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("H264VideoProvider").finish()
    }
}

#[async_trait]
impl<R: Read + Send> SampleProvider for H264VideoProvider<R> {
    async fn next_sample(&self) -> Result<Option<Sample>> {
        let mut reader = self.reader.lock().await;
        match reader.next_nal() {
            Ok(nal) => Ok(Some(Sample {
                data: nal.data,
                duration: Duration::from_secs(1) / SAMPLES_PER_SECOND,
                ..Default::default()
            })),
            Err(media::Error::ErrIoEOF) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Vp8VideoProvider sends one IVF frame per sample, paced by the file timebase
struct Vp8VideoProvider<R: Read> {
    reader: Mutex<IVFReader<R>>,
    sample_duration: Duration,
}

impl<R: Read> fmt::Debug for Vp8VideoProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vp8VideoProvider")
            .field("sample_duration", &self.sample_duration)
            .finish()
    }
}

#[async_trait]
impl<R: Read + Send> SampleProvider for Vp8VideoProvider<R> {
    async fn next_sample(&self) -> Result<Option<Sample>> {
        let mut reader = self.reader.lock().await;
        match reader.parse_next_frame() {
            Ok((frame, _)) => Ok(Some(Sample {
                data: frame,
                duration: self.sample_duration,
                ..Default::default()
            })),
            Err(media::Error::ErrIoEOF) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
