//! Mock implementations for testing
//!
//! [`MockHardware`] implements every decoder-side platform trait and records
//! each call in order, so tests can assert on the exact driver sequence.
//! [`MockDemux`] maps stream sources to stream references from a table.

#![cfg(any(test, feature = "mock"))]

use crate::decoder::{
    AudioDecoderDriver, AudioDecoderHandle, AudioStartSettings, DecoderProvider, DriverError,
    StreamRef, VideoDecoderDriver, VideoDecoderHandle, VideoStartSettings,
};
use crate::demux::{StreamSource, StreamSourceProvider};
use crate::stc::{StcChannelDriver, StcChannelHandle, StcSettings};

/// Maximum number of calls a mock records before dropping new ones.
pub const CALL_LOG_CAPACITY: usize = 64;

/// One recorded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    /// [`VideoDecoderDriver::start_video`]
    StartVideo(VideoDecoderHandle, VideoStartSettings),
    /// [`VideoDecoderDriver::stop_video`]
    StopVideo(VideoDecoderHandle),
    /// [`VideoDecoderDriver::flush_video`]
    FlushVideo(VideoDecoderHandle),
    /// [`VideoDecoderDriver::set_video_stc_channel`]
    SetVideoStc(VideoDecoderHandle, StcChannelHandle),
    /// [`AudioDecoderDriver::start_audio`]
    StartAudio(AudioDecoderHandle, AudioStartSettings),
    /// [`AudioDecoderDriver::stop_audio`]
    StopAudio(AudioDecoderHandle),
    /// [`AudioDecoderDriver::flush_audio`]
    FlushAudio(AudioDecoderHandle),
    /// [`AudioDecoderDriver::set_audio_stc_channel`]
    SetAudioStc(AudioDecoderHandle, StcChannelHandle),
    /// [`StcChannelDriver::set_stc_settings`]
    SetStcSettings(StcChannelHandle, StcSettings),
}

/// Return codes injected into the next matching mock calls.
///
/// `None` means the call succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePlan {
    /// Code returned by `start_video` / `start_audio`
    pub start: Option<i32>,
    /// Code returned by `stop_video` / `stop_audio`
    pub stop: Option<i32>,
    /// Code returned by `flush_video` / `flush_audio`
    pub flush: Option<i32>,
    /// Code returned by `set_*_stc_channel`
    pub stc_attach: Option<i32>,
    /// Code returned by `set_stc_settings`
    pub stc_settings: Option<i32>,
}

/// Mock decoder platform: one video decoder, one audio decoder and one STC
/// channel at index 0 by default.
pub struct MockHardware {
    video: heapless::Vec<VideoDecoderHandle, 8>,
    audio: heapless::Vec<AudioDecoderHandle, 8>,
    stc: heapless::Vec<StcChannelHandle, 8>,
    stc_settings: StcSettings,
    calls: heapless::Vec<HwCall, CALL_LOG_CAPACITY>,
    /// Injected failures
    pub failures: FailurePlan,
}

impl MockHardware {
    /// Handle returned for video decoder index 0.
    pub const VIDEO_0: VideoDecoderHandle = VideoDecoderHandle(0x10);
    /// Handle returned for audio decoder index 0.
    pub const AUDIO_0: AudioDecoderHandle = AudioDecoderHandle(0x20);
    /// Handle returned for STC channel index 0.
    pub const STC_0: StcChannelHandle = StcChannelHandle(0x30);

    /// Create a mock with the reference configuration.
    pub fn new() -> Self {
        let mut hw = Self::empty();
        let _ = hw.video.push(Self::VIDEO_0);
        let _ = hw.audio.push(Self::AUDIO_0);
        let _ = hw.stc.push(Self::STC_0);
        hw
    }

    /// Create a mock that has allocated nothing yet.
    pub fn empty() -> Self {
        Self {
            video: heapless::Vec::new(),
            audio: heapless::Vec::new(),
            stc: heapless::Vec::new(),
            stc_settings: StcSettings::default(),
            calls: heapless::Vec::new(),
            failures: FailurePlan::default(),
        }
    }

    /// Make the platform report no STC channels.
    pub fn without_stc_channels(mut self) -> Self {
        self.stc.clear();
        self
    }

    /// Allocate the reference decoders after construction.
    pub fn allocate(&mut self) {
        *self = Self {
            calls: core::mem::take(&mut self.calls),
            failures: self.failures,
            ..Self::new()
        };
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> &[HwCall] {
        &self.calls
    }

    /// Forget every recorded call.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Settings last written to any STC channel.
    pub fn last_stc_settings(&self) -> StcSettings {
        self.stc_settings
    }

    fn record(&mut self, call: HwCall) {
        // Log is bounded; tests never come close to the limit.
        let _ = self.calls.push(call);
    }

    fn result(code: Option<i32>) -> Result<(), DriverError> {
        match code {
            Some(code) => Err(DriverError::new(code)),
            None => Ok(()),
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderProvider for MockHardware {
    fn video_decoder(&self, index: u8) -> Option<VideoDecoderHandle> {
        self.video.get(usize::from(index)).copied()
    }

    fn audio_decoder(&self, index: u8) -> Option<AudioDecoderHandle> {
        self.audio.get(usize::from(index)).copied()
    }

    fn stc_channel(&self, index: u8) -> Option<StcChannelHandle> {
        self.stc.get(usize::from(index)).copied()
    }
}

impl VideoDecoderDriver for MockHardware {
    fn default_video_settings(&self) -> VideoStartSettings {
        VideoStartSettings {
            max_width: 720,
            max_height: 576,
            ..VideoStartSettings::default()
        }
    }

    fn start_video(
        &mut self,
        handle: VideoDecoderHandle,
        settings: &VideoStartSettings,
    ) -> Result<(), DriverError> {
        self.record(HwCall::StartVideo(handle, *settings));
        Self::result(self.failures.start)
    }

    fn stop_video(&mut self, handle: VideoDecoderHandle) -> Result<(), DriverError> {
        self.record(HwCall::StopVideo(handle));
        Self::result(self.failures.stop)
    }

    fn flush_video(&mut self, handle: VideoDecoderHandle) -> Result<(), DriverError> {
        self.record(HwCall::FlushVideo(handle));
        Self::result(self.failures.flush)
    }

    fn set_video_stc_channel(
        &mut self,
        handle: VideoDecoderHandle,
        stc: StcChannelHandle,
    ) -> Result<(), DriverError> {
        self.record(HwCall::SetVideoStc(handle, stc));
        Self::result(self.failures.stc_attach)
    }
}

impl AudioDecoderDriver for MockHardware {
    fn default_audio_settings(&self) -> AudioStartSettings {
        AudioStartSettings::default()
    }

    fn start_audio(
        &mut self,
        handle: AudioDecoderHandle,
        settings: &AudioStartSettings,
    ) -> Result<(), DriverError> {
        self.record(HwCall::StartAudio(handle, *settings));
        Self::result(self.failures.start)
    }

    fn stop_audio(&mut self, handle: AudioDecoderHandle) -> Result<(), DriverError> {
        self.record(HwCall::StopAudio(handle));
        Self::result(self.failures.stop)
    }

    fn flush_audio(&mut self, handle: AudioDecoderHandle) -> Result<(), DriverError> {
        self.record(HwCall::FlushAudio(handle));
        Self::result(self.failures.flush)
    }

    fn set_audio_stc_channel(
        &mut self,
        handle: AudioDecoderHandle,
        stc: StcChannelHandle,
    ) -> Result<(), DriverError> {
        self.record(HwCall::SetAudioStc(handle, stc));
        Self::result(self.failures.stc_attach)
    }
}

impl StcChannelDriver for MockHardware {
    fn stc_settings(&self, _stc: StcChannelHandle) -> StcSettings {
        self.stc_settings
    }

    fn set_stc_settings(
        &mut self,
        stc: StcChannelHandle,
        settings: &StcSettings,
    ) -> Result<(), DriverError> {
        self.record(HwCall::SetStcSettings(stc, *settings));
        Self::result(self.failures.stc_settings)?;
        self.stc_settings = *settings;
        Ok(())
    }
}

/// Mock demultiplexer that resolves sources through a small route table.
pub struct MockDemux {
    routes: heapless::Vec<(StreamSource, u32, StreamRef), 16>,
}

impl MockDemux {
    /// Create a demux with no routes.
    pub fn new() -> Self {
        Self {
            routes: heapless::Vec::new(),
        }
    }

    /// Route `source` on `demux_index` to `stream`.
    pub fn route(
        mut self,
        source: StreamSource,
        demux_index: u32,
        stream: StreamRef,
    ) -> Result<Self, (StreamSource, u32, StreamRef)> {
        self.routes.push((source, demux_index, stream))?;
        Ok(self)
    }
}

impl Default for MockDemux {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSourceProvider for MockDemux {
    fn resolve_stream(&self, source: StreamSource, demux_index: u32) -> Option<StreamRef> {
        self.routes
            .iter()
            .find(|(s, d, _)| *s == source && *d == demux_index)
            .map(|(_, _, stream)| *stream)
    }
}
