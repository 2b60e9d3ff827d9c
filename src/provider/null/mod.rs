
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use media::Sample;

use super::*;

pub(crate) const SAMPLES_PER_SECOND: u32 = 30;

/// NullSampleProvider provides zero filled samples at 30 samples per second,
/// sized to meet a given bitrate
#[derive(Debug, Clone)]
pub struct NullSampleProvider {
    pub bytes_per_sample: u32,
    pub sample_duration: Duration,
    pub audio_level: Option<u8>,
}

impl NullSampleProvider {
    pub fn new(bitrate: u32) -> Self {
        NullSampleProvider {
            bytes_per_sample: bitrate / 8 / SAMPLES_PER_SECOND,
            sample_duration: Duration::from_secs(1) / SAMPLES_PER_SECOND,
            audio_level: None,
        }
    }

    /// with_audio_level reports a fixed audio level for every sample
    pub fn with_audio_level(mut self, level: u8) -> Self {
        self.audio_level = Some(level);
        self
    }
}

#[async_trait]
impl SampleProvider for NullSampleProvider {
    async fn next_sample(&self) -> Result<Option<Sample>> {
        Ok(Some(Sample {
            data: Bytes::from(vec![0u8; self.bytes_per_sample as usize]),
            duration: self.sample_duration,
            ..Default::default()
        }))
    }

    fn audio_level_provider(&self) -> Option<&dyn AudioLevelProvider> {
        self.audio_level.map(|_| self as &dyn AudioLevelProvider)
    }
}

impl AudioLevelProvider for NullSampleProvider {
    fn current_audio_level(&self) -> u8 {
        self.audio_level.unwrap_or(127)
    }
}
