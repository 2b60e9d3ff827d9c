
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use media::Sample;

use super::null::SAMPLES_PER_SECOND;
use super::*;
use crate::error::Error;

const TIMESTAMP_SIZE: u32 = 8;

/// LoadTestProvider provides samples sized to meet a given bitrate, each one
/// ending with its creation time as little-endian nanoseconds since the unix
/// epoch, so a receiver can measure latency
#[derive(Debug, Clone)]
pub struct LoadTestProvider {
    pub bytes_per_sample: u32,
    pub sample_duration: Duration,
}

impl LoadTestProvider {
    pub fn new(bitrate: u32) -> Result<Self> {
        let bytes_per_sample = bitrate / 8 / SAMPLES_PER_SECOND;
        if bytes_per_sample < TIMESTAMP_SIZE {
            return Err(Error::ErrBitrateTooLow(bitrate));
        }

        Ok(LoadTestProvider {
            bytes_per_sample,
            sample_duration: Duration::from_secs(1) / SAMPLES_PER_SECOND,
        })
    }
}

#[async_trait]
impl SampleProvider for LoadTestProvider {
    async fn next_sample(&self) -> Result<Option<Sample>> {
        let now = SystemTime::now();
        let nanos = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();

        let mut data = BytesMut::with_capacity(self.bytes_per_sample as usize);
        data.put_bytes(0, (self.bytes_per_sample - TIMESTAMP_SIZE) as usize);
        data.put_u64_le(nanos);

        Ok(Some(Sample {
            data: data.freeze(),
            timestamp: now,
            duration: self.sample_duration,
            ..Default::default()
        }))
    }
}
