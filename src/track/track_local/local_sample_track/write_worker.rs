use std::sync::Arc;

use log::{error, info, trace};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::sample_binding::SampleBinding;
use super::{OnWriteCompleteHdlrFn, SampleWriteOptions};
use crate::provider::SampleProvider;

/// WriteWorker pulls samples from a provider and writes them through a binding,
/// paced by the sample durations. One runs per active provider on a bound track.
pub(crate) struct WriteWorker {
    pub(crate) binding: Arc<Mutex<SampleBinding>>,
    pub(crate) provider: Arc<dyn SampleProvider>,
    pub(crate) on_complete: Option<Arc<Mutex<OnWriteCompleteHdlrFn>>>,
    pub(crate) cancel: CancellationToken,
}

impl WriteWorker {
    pub(crate) fn spawn(self) {
        tokio::spawn(async move {
            self.run().await;
        });
    }

    async fn run(self) {
        let audio_level_provider = self.provider.audio_level_provider();

        let mut next_sample_time = Instant::now();
        loop {
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("sample provider context canceled");
                    return;
                }
                result = self.provider.next_sample() => result,
            };

            let sample = match result {
                Ok(Some(sample)) => sample,
                Ok(None) => {
                    info!("sample provider EOF");
                    if let Some(handler) = &self.on_complete {
                        let mut f = handler.lock().await;
                        f().await;
                    }
                    return;
                }
                Err(err) => {
                    error!("could not get sample from provider: {err}");
                    return;
                }
            };

            let opts = audio_level_provider.map(|p| SampleWriteOptions {
                audio_level: Some(p.current_audio_level()),
            });

            {
                let mut binding = self.binding.lock().await;
                // a superseding worker may already own the binding
                if self.cancel.is_cancelled() {
                    info!("sample provider context canceled");
                    return;
                }
                if let Err(err) = binding.write_sample(&sample, opts.as_ref()).await {
                    error!("could not write sample: {err}");
                    return;
                }
            }

            next_sample_time += sample.duration;
            if next_sample_time <= Instant::now() {
                trace!("write worker behind schedule, not waiting");
                continue;
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("sample provider context canceled");
                    return;
                }
                _ = tokio::time::sleep_until(next_sample_time) => {}
            }
        }
    }
}
