//! Decoder lifecycle controller.
//!
//! [`AvModule`] owns the decoder registry together with the platform
//! collaborators and drives every decoder through
//!
//! ```text
//! Closed --first bind--> Stopped --start--> Running --stop--> Stopped
//!                          any --terminate--> Invalid
//! ```
//!
//! Every operation that takes a [`DecoderId`] resolves it as a video decoder
//! first and as an audio decoder second; an identifier matching neither is
//! [`AvError::UnknownDecoder`] and touches no hardware.
//!
//! All methods take `&mut self`, so callers are serialised by construction.
//! Use [`crate::shared::SharedAvModule`] to share one module between tasks.

use platform::{DecoderHardware, StreamRef, StreamSource, StreamSourceProvider};

use crate::codec::{self, StreamType};
use crate::config::AvConfig;
use crate::decoder_id::DecoderId;
use crate::error::AvError;
use crate::log;
use crate::registry::{AudioDecoderRecord, DecoderRegistry, DecoderStatus, VideoDecoderRecord};
use crate::stc;

/// The decoder-management module.
///
/// `H` is the decoder platform, `S` the demultiplexer that owns stream routing.
pub struct AvModule<H, S> {
    hw: H,
    demux: S,
    config: AvConfig,
    registry: DecoderRegistry,
    initialized: bool,
}

impl<H: DecoderHardware, S: StreamSourceProvider> AvModule<H, S> {
    /// Create an initialized module: every decoder Closed, codec Unknown.
    pub fn new(hw: H, demux: S, config: AvConfig) -> Self {
        log::info!(
            "AV init: {} video, {} audio decoder(s), demux {}",
            crate::config::VIDEO_DECODER_COUNT,
            crate::config::AUDIO_DECODER_COUNT,
            config.demux_index
        );
        Self {
            hw,
            demux,
            config,
            registry: DecoderRegistry::new(),
            initialized: true,
        }
    }

    /// Re-initialize after [`AvModule::terminate`].
    ///
    /// Records are recreated Closed with codec Unknown and no stream source.
    /// On an already initialized module this is a no-op, so running decoders
    /// are never silently forgotten.
    pub fn initialize(&mut self) {
        if self.initialized {
            log::debug!("AV init: already initialized");
            return;
        }
        log::info!("AV init: recreating decoder records");
        self.registry = DecoderRegistry::new();
        self.initialized = true;
    }

    /// Stop every decoder and invalidate all records.
    ///
    /// Every bound decoder is flushed and stopped even if an earlier one
    /// fails; the first failure is returned. Records end up Invalid
    /// regardless.
    ///
    /// # Errors
    ///
    /// [`AvError::NotInitialized`] if the module is not initialized, or the
    /// first driver failure while stopping.
    pub fn terminate(&mut self) -> Result<(), AvError> {
        self.ensure_initialized()?;
        log::info!("AV terminate");

        let mut first_error = None;
        let ids: heapless::Vec<DecoderId, 16> = self.registry.ids().collect();
        for id in ids {
            let result = match self.stop_decoder(id) {
                // Never bound: nothing was started on it.
                Err(AvError::NoDecoderHandle { .. }) => Ok(()),
                other => other,
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        self.registry.invalidate_all();
        self.initialized = false;
        first_error.map_or(Ok(()), Err)
    }

    /// Whether the module is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Start decoding on `id` with the codec from `stream_type`.
    ///
    /// The STC channel is bound first; if binding fails the start is aborted,
    /// the error returned and the decoder keeps its status. A decoder that is
    /// already running is then flushed and stopped, and restarted.
    ///
    /// # Errors
    ///
    /// - [`AvError::NotInitialized`] before init or after terminate
    /// - [`AvError::UnknownDecoder`] if `id` matches no decoder
    /// - [`AvError::NoDecoderHandle`] if the platform has not allocated the decoder
    /// - [`AvError::StreamUnavailable`] if the demux cannot route the stream source
    /// - [`AvError::NoClockChannel`] / [`AvError::ClockBindFailed`] from STC binding
    /// - [`AvError::Driver`] if the hardware start fails
    pub fn start(&mut self, id: DecoderId, stream_type: StreamType) -> Result<(), AvError> {
        self.ensure_initialized()?;

        if let Some(record) = self.registry.bind_video(id, &self.hw)? {
            log::info!("{}: starting video decoder", id.name());
            return start_video(&mut self.hw, &self.demux, &self.config, record, stream_type);
        }

        if let Some(record) = self.registry.bind_audio(id, &self.hw)? {
            log::info!("{}: starting audio decoder", id.name());
            return start_audio(&mut self.hw, &self.demux, &self.config, record, stream_type);
        }

        log::warning!("start: no decoder matches {}", id.name());
        Err(AvError::UnknownDecoder)
    }

    /// Flush and stop decoding on `id`.
    ///
    /// Flush and stop are issued whatever the current status; the record ends
    /// up Stopped even if a driver call fails.
    ///
    /// # Errors
    ///
    /// - [`AvError::NotInitialized`] before init or after terminate
    /// - [`AvError::UnknownDecoder`] if `id` matches no decoder
    /// - [`AvError::NoDecoderHandle`] if the platform has not allocated the decoder
    /// - [`AvError::Driver`] for the first failing flush or stop
    pub fn stop(&mut self, id: DecoderId) -> Result<(), AvError> {
        self.ensure_initialized()?;
        self.stop_decoder(id)
    }

    /// Set the stream source `id` decodes from on its next start.
    ///
    /// Does not touch the hardware and does not bind the decoder.
    ///
    /// # Errors
    ///
    /// - [`AvError::NotInitialized`] before init or after terminate
    /// - [`AvError::UnknownDecoder`] if `id` matches no decoder
    pub fn set_input_stream(
        &mut self,
        id: DecoderId,
        source: StreamSource,
    ) -> Result<(), AvError> {
        self.ensure_initialized()?;

        if let Some(record) = self.registry.video_mut(id) {
            record.set_stream_source(source);
        } else if let Some(record) = self.registry.audio_mut(id) {
            record.set_stream_source(source);
        } else {
            log::warning!("set_input_stream: no decoder matches {}", id.name());
            return Err(AvError::UnknownDecoder);
        }
        log::debug!("{}: input stream {}", id.name(), source.0);
        Ok(())
    }

    /// Lifecycle state of `id`, `None` if it matches no decoder.
    pub fn status(&self, id: DecoderId) -> Option<DecoderStatus> {
        self.registry
            .video(id)
            .map(VideoDecoderRecord::status)
            .or_else(|| self.registry.audio(id).map(AudioDecoderRecord::status))
    }

    /// Decoder records.
    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Active configuration.
    pub fn config(&self) -> &AvConfig {
        &self.config
    }

    /// Decoder platform.
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Decoder platform, mutably (e.g. to let it finish allocation).
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Demultiplexer.
    pub fn demux(&self) -> &S {
        &self.demux
    }

    fn ensure_initialized(&self) -> Result<(), AvError> {
        if self.initialized {
            Ok(())
        } else {
            Err(AvError::NotInitialized)
        }
    }

    fn stop_decoder(&mut self, id: DecoderId) -> Result<(), AvError> {
        if let Some(record) = self.registry.bind_video(id, &self.hw)? {
            log::info!("{}: stopping video decoder", id.name());
            return stop_video(&mut self.hw, record);
        }

        if let Some(record) = self.registry.bind_audio(id, &self.hw)? {
            log::info!("{}: stopping audio decoder", id.name());
            return stop_audio(&mut self.hw, record);
        }

        log::warning!("stop: no decoder matches {}", id.name());
        Err(AvError::UnknownDecoder)
    }
}

fn resolve_stream<S: StreamSourceProvider>(
    demux: &S,
    config: &AvConfig,
    id: DecoderId,
    source: StreamSource,
) -> Result<StreamRef, AvError> {
    demux
        .resolve_stream(source, config.demux_index)
        .ok_or_else(|| {
            log::warning!(
                "{}: demux {} has no route for stream {}",
                id.name(),
                config.demux_index,
                source.0
            );
            AvError::StreamUnavailable
        })
}

fn start_video<H: DecoderHardware, S: StreamSourceProvider>(
    hw: &mut H,
    demux: &S,
    config: &AvConfig,
    record: &mut VideoDecoderRecord,
    stream_type: StreamType,
) -> Result<(), AvError> {
    let id = record.id();
    let handle = record
        .hardware()
        .ok_or(AvError::NoDecoderHandle { index: id.index() })?;

    let mut settings = hw.default_video_settings();
    settings.stream = Some(resolve_stream(demux, config, id, record.stream_source())?);
    settings.codec = codec::video_to_hardware(stream_type.video);
    settings.max_width = config.max_width;
    settings.max_height = config.max_height;
    settings.smooth_resolution_change = config.smooth_resolution_change;

    // Bind first: a clock failure must leave a running decoder running.
    settings.stc_channel = Some(stc::bind_video_stc(hw, record)?);

    if record.status() == DecoderStatus::Running {
        log::debug!("{}: restarting running decoder", id.name());
        stop_video(hw, record)?;
    }

    hw.start_video(handle, &settings).map_err(|e| {
        log::error!("{}: video start failed, rc = {}", id.name(), e.code);
        AvError::driver("start", e)
    })?;
    record.mark_running(stream_type.video, settings);
    Ok(())
}

fn start_audio<H: DecoderHardware, S: StreamSourceProvider>(
    hw: &mut H,
    demux: &S,
    config: &AvConfig,
    record: &mut AudioDecoderRecord,
    stream_type: StreamType,
) -> Result<(), AvError> {
    let id = record.id();
    let handle = record
        .hardware()
        .ok_or(AvError::NoDecoderHandle { index: id.index() })?;

    let mut settings = hw.default_audio_settings();
    settings.stream = Some(resolve_stream(demux, config, id, record.stream_source())?);
    settings.codec = codec::audio_to_hardware(stream_type.audio);

    // Bind first: a clock failure must leave a running decoder running.
    settings.stc_channel = Some(stc::bind_audio_stc(hw, record)?);

    if record.status() == DecoderStatus::Running {
        log::debug!("{}: restarting running decoder", id.name());
        stop_audio(hw, record)?;
    }

    hw.start_audio(handle, &settings).map_err(|e| {
        log::error!("{}: audio start failed, rc = {}", id.name(), e.code);
        AvError::driver("start", e)
    })?;
    record.mark_running(stream_type.audio, settings);
    Ok(())
}

fn stop_video<H: DecoderHardware>(
    hw: &mut H,
    record: &mut VideoDecoderRecord,
) -> Result<(), AvError> {
    let index = record.id().index();
    let handle = record.hardware().ok_or(AvError::NoDecoderHandle { index })?;
    let flushed = hw.flush_video(handle).map_err(|e| AvError::driver("flush", e));
    let stopped = hw.stop_video(handle).map_err(|e| AvError::driver("stop", e));
    record.mark_stopped();
    report_stop(record.id(), flushed.and(stopped))
}

fn stop_audio<H: DecoderHardware>(
    hw: &mut H,
    record: &mut AudioDecoderRecord,
) -> Result<(), AvError> {
    let index = record.id().index();
    let handle = record.hardware().ok_or(AvError::NoDecoderHandle { index })?;
    let flushed = hw.flush_audio(handle).map_err(|e| AvError::driver("flush", e));
    let stopped = hw.stop_audio(handle).map_err(|e| AvError::driver("stop", e));
    record.mark_stopped();
    report_stop(record.id(), flushed.and(stopped))
}

fn report_stop(id: DecoderId, result: Result<(), AvError>) -> Result<(), AvError> {
    if let Err(AvError::Driver { op, code }) = result {
        log::error!("{}: {} failed while stopping, rc = {}", id.name(), op, code);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::{AudioCodec, VideoCodec};
    use platform::mocks::{HwCall, MockDemux, MockHardware};
    use platform::HwVideoCodec;

    fn module() -> AvModule<MockHardware, MockDemux> {
        let demux = MockDemux::new()
            .route(StreamSource(42), 0, StreamRef(0x100))
            .unwrap()
            .route(StreamSource(43), 0, StreamRef(0x101))
            .unwrap();
        AvModule::new(MockHardware::new(), demux, AvConfig::default())
    }

    #[test]
    fn test_new_module_records_closed() {
        let av = module();
        assert!(av.is_initialized());
        assert_eq!(av.status(DecoderId::VIDEO_1), Some(DecoderStatus::Closed));
        assert_eq!(av.status(DecoderId::AUDIO_1), Some(DecoderStatus::Closed));
    }

    #[test]
    fn test_start_video_fills_settings() {
        let mut av = module();
        av.set_input_stream(DecoderId::VIDEO_1, StreamSource(42)).unwrap();
        av.start(DecoderId::VIDEO_1, StreamType::video(VideoCodec::Mpeg2))
            .unwrap();

        let record = av.registry().video(DecoderId::VIDEO_1).unwrap();
        assert_eq!(record.status(), DecoderStatus::Running);
        assert_eq!(record.codec(), VideoCodec::Mpeg2);
        let settings = record.start_settings().unwrap();
        assert_eq!(settings.stream, Some(StreamRef(0x100)));
        assert_eq!(settings.codec, HwVideoCodec::Mpeg2);
        assert_eq!((settings.max_width, settings.max_height), (1920, 1080));
        assert!(settings.smooth_resolution_change);
        assert_eq!(settings.stc_channel, Some(MockHardware::STC_0));
    }

    #[test]
    fn test_stop_before_start_binds_and_stops() {
        let mut av = module();
        av.stop(DecoderId::AUDIO_1).unwrap();
        assert_eq!(av.status(DecoderId::AUDIO_1), Some(DecoderStatus::Stopped));
        assert_eq!(
            av.hardware().calls(),
            &[
                HwCall::FlushAudio(MockHardware::AUDIO_0),
                HwCall::StopAudio(MockHardware::AUDIO_0),
            ]
        );
    }

    #[test]
    fn test_restart_running_decoder_stops_first() {
        let mut av = module();
        av.set_input_stream(DecoderId::AUDIO_1, StreamSource(43)).unwrap();
        av.start(DecoderId::AUDIO_1, StreamType::audio(AudioCodec::Mpeg))
            .unwrap();
        av.hardware_mut().clear_calls();

        av.start(DecoderId::AUDIO_1, StreamType::audio(AudioCodec::MpegAac))
            .unwrap();
        let calls = av.hardware().calls();
        assert!(matches!(calls.first(), Some(HwCall::SetStcSettings(..))));
        assert_eq!(
            calls.get(1),
            Some(&HwCall::SetAudioStc(MockHardware::AUDIO_0, MockHardware::STC_0))
        );
        assert_eq!(calls.get(2), Some(&HwCall::FlushAudio(MockHardware::AUDIO_0)));
        assert_eq!(calls.get(3), Some(&HwCall::StopAudio(MockHardware::AUDIO_0)));
        assert!(matches!(calls.get(4), Some(HwCall::StartAudio(..))));
        assert_eq!(calls.len(), 5);
        assert_eq!(
            av.registry().audio(DecoderId::AUDIO_1).unwrap().codec(),
            AudioCodec::MpegAac
        );
    }

    #[test]
    fn test_unrouted_stream_aborts_start() {
        let mut av = module();
        assert_eq!(
            av.start(DecoderId::VIDEO_1, StreamType::video(VideoCodec::H264)),
            Err(AvError::StreamUnavailable)
        );
        assert!(av.hardware().calls().is_empty());
        assert_eq!(av.status(DecoderId::VIDEO_1), Some(DecoderStatus::Stopped));
    }

    #[test]
    fn test_set_input_stream_does_not_bind() {
        let mut av = module();
        av.set_input_stream(DecoderId::VIDEO_1, StreamSource(42)).unwrap();
        let record = av.registry().video(DecoderId::VIDEO_1).unwrap();
        assert_eq!(record.status(), DecoderStatus::Closed);
        assert_eq!(record.stream_source(), StreamSource(42));
    }

    #[test]
    fn test_initialize_is_noop_when_initialized() {
        let mut av = module();
        av.set_input_stream(DecoderId::VIDEO_1, StreamSource(42)).unwrap();
        av.initialize();
        assert_eq!(
            av.registry().video(DecoderId::VIDEO_1).unwrap().stream_source(),
            StreamSource(42)
        );
    }
}
