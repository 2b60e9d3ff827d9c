//! Pull based sources of timed media samples.

pub mod file;
pub mod load_test;
pub mod null;

use std::fmt;

use async_trait::async_trait;
use media::Sample;

use crate::error::Result;

pub use file::{new_file_sample_provider, H264ProfileRotation};
pub use load_test::LoadTestProvider;
pub use null::NullSampleProvider;

/// SampleProvider feeds a track with samples. The track paces the pulls by
/// the duration of the returned samples.
#[async_trait]
pub trait SampleProvider: fmt::Debug + Send + Sync {
    /// next_sample returns the next sample to send, `None` once the stream has
    /// ended. Any error stops the track from pulling.
    async fn next_sample(&self) -> Result<Option<Sample>>;

    /// audio_level_provider exposes the audio level of the samples, when known
    fn audio_level_provider(&self) -> Option<&dyn AudioLevelProvider> {
        None
    }

    /// hooks exposes resource hooks run when the provider becomes active or
    /// inactive on a bound track
    fn hooks(&self) -> Option<&dyn ProviderHooks> {
        None
    }
}

/// AudioLevelProvider reports the level attached to outgoing audio packets
pub trait AudioLevelProvider: Send + Sync {
    /// current_audio_level returns the level in -dBov, 0 (loudest) to 127 (silence)
    fn current_audio_level(&self) -> u8;
}

#[async_trait]
pub trait ProviderHooks: Send + Sync {
    async fn on_bind(&self) -> Result<()>;
    async fn on_unbind(&self) -> Result<()>;
}
