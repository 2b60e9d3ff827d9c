
mod sample_binding;
mod write_worker;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use log::{debug, trace, warn};
use media::Sample;
use portable_atomic::AtomicBool;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::error::Error;
use crate::provider::SampleProvider;
use crate::utilities::new_guid;
use sample_binding::SampleBinding;
use write_worker::WriteWorker;

pub type OnBindHdlrFn =
    Box<dyn (FnMut() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

pub type OnUnbindHdlrFn =
    Box<dyn (FnMut() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

/// OnWriteCompleteHdlrFn is called once the provider reports the end of its stream
pub type OnWriteCompleteHdlrFn =
    Box<dyn (FnMut() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

/// SampleWriteOptions carries per-sample metadata attached to every packet of the sample
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SampleWriteOptions {
    /// audio level in -dBov (0..=127), sent when the audio level extension was negotiated
    pub audio_level: Option<u8>,
}

#[derive(Default)]
struct LocalSampleTrackInternal {
    binding: Option<Arc<Mutex<SampleBinding>>>,
    provider: Option<Arc<dyn SampleProvider>>,
    on_write_complete: Option<Arc<Mutex<OnWriteCompleteHdlrFn>>>,
    cancel_write: Option<CancellationToken>,
}

/// LocalSampleTrack is a TrackLocal that publishes samples pulled from a
/// SampleProvider. It takes care of pacing the samples by their duration,
/// sequencing and timestamping the packets, and attaching the audio level
/// extension when it was negotiated.
pub struct LocalSampleTrack {
    id: String,
    stream_id: String,
    codec: RTCRtpCodecCapability,

    bound: AtomicBool,
    internal: RwLock<LocalSampleTrackInternal>,

    on_bind_handler: ArcSwapOption<Mutex<OnBindHdlrFn>>,
    on_unbind_handler: ArcSwapOption<Mutex<OnUnbindHdlrFn>>,
}

impl fmt::Debug for LocalSampleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSampleTrack")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .field("codec", &self.codec)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl LocalSampleTrack {
    /// new returns a LocalSampleTrack with generated track and stream ids
    pub fn new(codec: RTCRtpCodecCapability) -> Self {
        Self::new_with_ids(codec, new_guid("TR_"), new_guid("ST_"))
    }

    pub fn new_with_ids(codec: RTCRtpCodecCapability, id: String, stream_id: String) -> Self {
        LocalSampleTrack {
            id,
            stream_id,
            codec,
            bound: AtomicBool::new(false),
            internal: RwLock::new(LocalSampleTrackInternal::default()),
            on_bind_handler: ArcSwapOption::empty(),
            on_unbind_handler: ArcSwapOption::empty(),
        }
    }

    /// codec gets the Codec of the track
    pub fn codec(&self) -> RTCRtpCodecCapability {
        self.codec.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// on_bind sets a handler called once the track has been negotiated and bound
    pub fn on_bind(&self, f: OnBindHdlrFn) {
        self.on_bind_handler.store(Some(Arc::new(Mutex::new(f))));
    }

    /// on_unbind sets a handler called after the track has been unbound
    pub fn on_unbind(&self, f: OnUnbindHdlrFn) {
        self.on_unbind_handler.store(Some(Arc::new(Mutex::new(f))));
    }

    /// start_write makes `provider` the source of this track. On a bound track the
    /// previous provider stops and the new one starts right away, otherwise it starts
    /// with the next bind. `on_complete` is called when the provider runs out of samples.
    pub async fn start_write(
        &self,
        provider: Arc<dyn SampleProvider>,
        on_complete: Option<OnWriteCompleteHdlrFn>,
    ) -> Result<()> {
        let mut internal = self.internal.write().await;
        if let Some(current) = &internal.provider {
            if same_provider(current, &provider) {
                return Ok(());
            }
        }

        let on_complete = on_complete.map(|f| Arc::new(Mutex::new(f)));

        if self.is_bound() {
            if let Some(hooks) = internal.provider.as_deref().and_then(|p| p.hooks()) {
                hooks.on_unbind().await?;
            }
            if let Some(hooks) = provider.hooks() {
                hooks.on_bind().await?;
            }
            if let Some(binding) = internal.binding.clone() {
                Self::start_worker(
                    &mut internal,
                    binding,
                    Arc::clone(&provider),
                    on_complete.clone(),
                )
                .await;
            }
        }

        internal.provider = Some(provider);
        internal.on_write_complete = on_complete;

        Ok(())
    }

    /// write_sample writes a sample directly, next to whatever the provider writes.
    /// Nothing is sent while the track is not bound.
    ///
    /// Every packet of the sample is attempted. Packets whose audio level extension
    /// could not be set go out without it, and all failures are returned together
    /// as `Error::ErrSampleWrite`.
    pub async fn write_sample(
        &self,
        sample: &Sample,
        opts: Option<&SampleWriteOptions>,
    ) -> Result<()> {
        let binding = {
            let internal = self.internal.read().await;
            internal.binding.clone()
        };

        match binding {
            Some(binding) => {
                let mut binding = binding.lock().await;
                binding.write_sample(sample, opts).await
            }
            None => {
                trace!("track {} is not bound, dropping sample", self.id);
                Ok(())
            }
        }
    }

    /// start_worker replaces the running write worker, if any, with one for `provider`
    async fn start_worker(
        internal: &mut LocalSampleTrackInternal,
        binding: Arc<Mutex<SampleBinding>>,
        provider: Arc<dyn SampleProvider>,
        on_complete: Option<Arc<Mutex<OnWriteCompleteHdlrFn>>>,
    ) {
        Self::stop_worker(internal, Some(&binding)).await;

        let cancel = CancellationToken::new();
        internal.cancel_write = Some(cancel.clone());

        WriteWorker {
            binding,
            provider,
            on_complete,
            cancel,
        }
        .spawn();
    }

    /// stop_worker cancels the running write worker. Once the binding lock has been
    /// taken no packet of that worker can be written anymore.
    async fn stop_worker(
        internal: &mut LocalSampleTrackInternal,
        binding: Option<&Arc<Mutex<SampleBinding>>>,
    ) {
        if let Some(cancel) = internal.cancel_write.take() {
            cancel.cancel();
            if let Some(binding) = binding {
                drop(binding.lock().await);
            }
        }
    }

    /// teardown runs the provider's unbind hook and drops the current binding
    async fn teardown(&self, internal: &mut LocalSampleTrackInternal) -> Result<()> {
        let provider = internal.provider.clone();
        let result = match provider.as_deref().and_then(|p| p.hooks()) {
            Some(hooks) => hooks.on_unbind().await,
            None => Ok(()),
        };

        let binding = internal.binding.take();
        Self::stop_worker(internal, binding.as_ref()).await;
        self.bound.store(false, Ordering::SeqCst);

        result
    }

    fn dispatch(handler: &ArcSwapOption<Mutex<OnBindHdlrFn>>) {
        if let Some(handler) = handler.load_full() {
            tokio::spawn(async move {
                let mut f = handler.lock().await;
                f().await;
            });
        }
    }
}

/// same_provider compares the provider instances, ignoring vtables
fn same_provider(a: &Arc<dyn SampleProvider>, b: &Arc<dyn SampleProvider>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const u8,
        Arc::as_ptr(b) as *const u8,
    )
}

#[async_trait]
impl TrackLocal for LocalSampleTrack {
    /// bind is called by the session layer after negotiation is complete. It asserts
    /// that the codec of the track is supported by the remote and sets up the
    /// packetization state, then starts writing if a provider is set.
    async fn bind(&self, t: &TrackLocalContext) -> Result<RTCRtpCodecParameters> {
        let needle = RTCRtpCodecParameters {
            capability: self.codec.clone(),
            ..Default::default()
        };
        let (codec, match_type) = codec_parameters_fuzzy_search(&needle, t.codec_parameters());
        if match_type == CodecMatch::None {
            return Err(Error::ErrUnsupportedCodec);
        }

        let payloader = codec.capability.payloader_for_codec()?;
        let write_stream = t.write_stream().ok_or(Error::ErrNoWriteStream)?;

        let audio_level_id = t
            .header_extensions()
            .iter()
            .find(|ext| ext.uri == AUDIO_LEVEL_URI)
            .and_then(|ext| u8::try_from(ext.id).ok())
            .filter(|id| *id != 0);

        let binding = Arc::new(Mutex::new(SampleBinding::new(
            &codec,
            t.ssrc(),
            payloader,
            audio_level_id,
            write_stream,
        )));

        let mut internal = self.internal.write().await;
        if self.is_bound() {
            debug!("track {} bound again, replacing previous binding", self.id);
            if let Err(err) = self.teardown(&mut internal).await {
                warn!("unbind hook of track {} failed: {err}", self.id);
            }
        }

        internal.binding = Some(Arc::clone(&binding));
        self.bound.store(true, Ordering::SeqCst);

        let mut result = Ok(codec);
        if let Some(provider) = internal.provider.clone() {
            let hooked = match provider.hooks() {
                Some(hooks) => hooks.on_bind().await,
                None => Ok(()),
            };
            match hooked {
                Ok(()) => {
                    let on_complete = internal.on_write_complete.clone();
                    Self::start_worker(&mut internal, binding, provider, on_complete).await;
                }
                Err(err) => {
                    warn!("bind hook of track {} failed: {err}", self.id);
                    result = Err(err);
                }
            }
        }
        drop(internal);

        Self::dispatch(&self.on_bind_handler);

        result
    }

    /// unbind stops writing and drops the packetization state of the binding
    async fn unbind(&self, _t: &TrackLocalContext) -> Result<()> {
        let mut internal = self.internal.write().await;
        if !self.is_bound() {
            return Ok(());
        }

        let result = self.teardown(&mut internal).await;
        drop(internal);

        Self::dispatch(&self.on_unbind_handler);

        result
    }

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn stream_id(&self) -> &str {
        self.stream_id.as_str()
    }

    /// kind is derived from the mime type of the codec
    fn kind(&self) -> RTPCodecType {
        RTPCodecType::from_mime_type(&self.codec.mime_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
