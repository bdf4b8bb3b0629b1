//! Decoder handle registry.
//!
//! `DecoderRegistry` owns exactly one record per populated decoder slot and
//! is the single source of truth for decoder state.
//!
//! Lookups ([`DecoderRegistry::video`], [`DecoderRegistry::audio`]) are
//! side-effect free and double as a kind discriminator: `None` means the
//! identifier does not address a populated slot of that kind.
//!
//! Binding ([`DecoderRegistry::bind_video`], [`DecoderRegistry::bind_audio`])
//! is the separate step that asks the platform for the hardware decoder and
//! caches the handle. Hardware objects are allocated by another subsystem
//! that may come up after this one, so binding happens lazily on every
//! operation that touches the hardware. Re-binding is idempotent.

use platform::{
    AudioDecoderHandle, AudioStartSettings, DecoderProvider, StreamSource, VideoDecoderHandle,
    VideoStartSettings,
};

use crate::codec::{AudioCodec, VideoCodec};
use crate::config::{AUDIO_DECODER_COUNT, VIDEO_DECODER_COUNT};
use crate::decoder_id::{DecoderId, Slot};
use crate::error::AvError;
use crate::log;

/// Decoder lifecycle state.
///
/// ```text
/// Closed --bind--> Stopped --start--> Running --stop--> Stopped
///    any --terminate--> Invalid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderStatus {
    /// Created, hardware not bound yet
    Closed,
    /// Bound to hardware, not decoding
    Stopped,
    /// Decoding
    Running,
    /// Module terminated; no further operations are valid
    Invalid,
}

/// Per-slot state shared by video and audio records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderRecord<C, H, S> {
    id: DecoderId,
    codec: C,
    status: DecoderStatus,
    stream_source: StreamSource,
    hardware: Option<H>,
    start_settings: Option<S>,
}

/// Record of a video decoder slot.
pub type VideoDecoderRecord = DecoderRecord<VideoCodec, VideoDecoderHandle, VideoStartSettings>;

/// Record of an audio decoder slot.
pub type AudioDecoderRecord = DecoderRecord<AudioCodec, AudioDecoderHandle, AudioStartSettings>;

impl<C: Copy + Default, H: Copy, S: Copy> DecoderRecord<C, H, S> {
    fn new(id: DecoderId) -> Self {
        Self {
            id,
            codec: C::default(),
            status: DecoderStatus::Closed,
            stream_source: StreamSource::NONE,
            hardware: None,
            start_settings: None,
        }
    }

    /// Identifier this record was created for.
    pub fn id(&self) -> DecoderId {
        self.id
    }

    /// Codec of the last successful start, `Unknown` before that.
    pub fn codec(&self) -> C {
        self.codec
    }

    /// Current lifecycle state.
    pub fn status(&self) -> DecoderStatus {
        self.status
    }

    /// Stream source set by `set_input_stream`.
    pub fn stream_source(&self) -> StreamSource {
        self.stream_source
    }

    /// Cached hardware handle, once bound.
    pub fn hardware(&self) -> Option<H> {
        self.hardware
    }

    /// Settings passed to the last successful hardware start.
    pub fn start_settings(&self) -> Option<S> {
        self.start_settings
    }

    pub(crate) fn set_stream_source(&mut self, source: StreamSource) {
        self.stream_source = source;
    }

    pub(crate) fn mark_running(&mut self, codec: C, settings: S) {
        self.codec = codec;
        self.start_settings = Some(settings);
        self.status = DecoderStatus::Running;
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.status = DecoderStatus::Stopped;
    }

    fn attach(&mut self, handle: H) {
        self.hardware = Some(handle);
        if self.status == DecoderStatus::Closed {
            self.status = DecoderStatus::Stopped;
        }
    }

    fn invalidate(&mut self) {
        self.status = DecoderStatus::Invalid;
    }
}

/// Owner of every decoder record.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    video: [VideoDecoderRecord; VIDEO_DECODER_COUNT],
    audio: [AudioDecoderRecord; AUDIO_DECODER_COUNT],
}

impl DecoderRegistry {
    /// Fresh registry: every record Closed, codec Unknown, no stream.
    pub fn new() -> Self {
        Self {
            video: core::array::from_fn(|i| VideoDecoderRecord::new(DecoderId::Video(slot(i)))),
            audio: core::array::from_fn(|i| AudioDecoderRecord::new(DecoderId::Audio(slot(i)))),
        }
    }

    /// Video record for `id`, or `None` if `id` is not a populated video slot.
    pub fn video(&self, id: DecoderId) -> Option<&VideoDecoderRecord> {
        match id {
            DecoderId::Video(slot) => self.video.get(usize::from(slot.get())),
            DecoderId::Audio(_) => None,
        }
    }

    /// Audio record for `id`, or `None` if `id` is not a populated audio slot.
    pub fn audio(&self, id: DecoderId) -> Option<&AudioDecoderRecord> {
        match id {
            DecoderId::Audio(slot) => self.audio.get(usize::from(slot.get())),
            DecoderId::Video(_) => None,
        }
    }

    pub(crate) fn video_mut(&mut self, id: DecoderId) -> Option<&mut VideoDecoderRecord> {
        match id {
            DecoderId::Video(slot) => self.video.get_mut(usize::from(slot.get())),
            DecoderId::Audio(_) => None,
        }
    }

    pub(crate) fn audio_mut(&mut self, id: DecoderId) -> Option<&mut AudioDecoderRecord> {
        match id {
            DecoderId::Audio(slot) => self.audio.get_mut(usize::from(slot.get())),
            DecoderId::Video(_) => None,
        }
    }

    /// Look up the video record for `id` and (re)bind its hardware decoder.
    ///
    /// Returns `Ok(None)` when `id` is not a populated video slot. The first
    /// successful bind moves the record from Closed to Stopped.
    ///
    /// # Errors
    ///
    /// [`AvError::NoDecoderHandle`] when the platform has no decoder for the slot.
    pub fn bind_video<P: DecoderProvider + ?Sized>(
        &mut self,
        id: DecoderId,
        provider: &P,
    ) -> Result<Option<&mut VideoDecoderRecord>, AvError> {
        let Some(record) = self.video_mut(id) else {
            return Ok(None);
        };
        let index = record.id.index();
        let handle = provider.video_decoder(index).ok_or_else(|| {
            log::warning!("{}: platform has no video decoder {}", id.name(), index);
            AvError::NoDecoderHandle { index }
        })?;
        if record.hardware != Some(handle) {
            log::debug!("{}: bound hardware video decoder {}", id.name(), handle.0);
        }
        record.attach(handle);
        Ok(Some(record))
    }

    /// Look up the audio record for `id` and (re)bind its hardware decoder.
    ///
    /// Same contract as [`DecoderRegistry::bind_video`].
    ///
    /// # Errors
    ///
    /// [`AvError::NoDecoderHandle`] when the platform has no decoder for the slot.
    pub fn bind_audio<P: DecoderProvider + ?Sized>(
        &mut self,
        id: DecoderId,
        provider: &P,
    ) -> Result<Option<&mut AudioDecoderRecord>, AvError> {
        let Some(record) = self.audio_mut(id) else {
            return Ok(None);
        };
        let index = record.id.index();
        let handle = provider.audio_decoder(index).ok_or_else(|| {
            log::warning!("{}: platform has no audio decoder {}", id.name(), index);
            AvError::NoDecoderHandle { index }
        })?;
        if record.hardware != Some(handle) {
            log::debug!("{}: bound hardware audio decoder {}", id.name(), handle.0);
        }
        record.attach(handle);
        Ok(Some(record))
    }

    /// Every video record, slot order.
    pub fn video_records(&self) -> &[VideoDecoderRecord] {
        &self.video
    }

    /// Every audio record, slot order.
    pub fn audio_records(&self) -> &[AudioDecoderRecord] {
        &self.audio
    }

    /// Identifiers of every populated slot, video first.
    pub fn ids(&self) -> impl Iterator<Item = DecoderId> + '_ {
        self.video
            .iter()
            .map(|r| r.id)
            .chain(self.audio.iter().map(|r| r.id))
    }

    pub(crate) fn invalidate_all(&mut self) {
        self.video.iter_mut().for_each(DecoderRecord::invalidate);
        self.audio.iter_mut().for_each(DecoderRecord::invalidate);
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot for array position `i`; the arrays never exceed eight entries.
fn slot(i: usize) -> Slot {
    u8::try_from(i)
        .ok()
        .and_then(Slot::new)
        .unwrap_or(Slot::FIRST)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::MockHardware;

    #[test]
    fn test_new_registry_is_closed_and_unknown() {
        let registry = DecoderRegistry::new();
        let video = registry.video(DecoderId::VIDEO_1).unwrap();
        assert_eq!(video.status(), DecoderStatus::Closed);
        assert_eq!(video.codec(), VideoCodec::Unknown);
        assert_eq!(video.stream_source(), StreamSource::NONE);
        assert_eq!(video.hardware(), None);

        let audio = registry.audio(DecoderId::AUDIO_1).unwrap();
        assert_eq!(audio.status(), DecoderStatus::Closed);
        assert_eq!(audio.codec(), AudioCodec::Unknown);
    }

    #[test]
    fn test_lookup_discriminates_kind() {
        let registry = DecoderRegistry::new();
        assert!(registry.video(DecoderId::AUDIO_1).is_none());
        assert!(registry.audio(DecoderId::VIDEO_1).is_none());
    }

    #[test]
    fn test_unpopulated_slots_return_none() {
        let registry = DecoderRegistry::new();
        for slot in Slot::all().skip(VIDEO_DECODER_COUNT) {
            assert!(registry.video(DecoderId::Video(slot)).is_none());
        }
        for slot in Slot::all().skip(AUDIO_DECODER_COUNT) {
            assert!(registry.audio(DecoderId::Audio(slot)).is_none());
        }
    }

    #[test]
    fn test_lookup_does_not_bind() {
        let registry = DecoderRegistry::new();
        let _ = registry.video(DecoderId::VIDEO_1);
        assert_eq!(
            registry.video(DecoderId::VIDEO_1).unwrap().status(),
            DecoderStatus::Closed
        );
    }

    #[test]
    fn test_bind_moves_closed_to_stopped_and_is_idempotent() {
        let hw = MockHardware::new();
        let mut registry = DecoderRegistry::new();

        let record = registry.bind_video(DecoderId::VIDEO_1, &hw).unwrap().unwrap();
        assert_eq!(record.status(), DecoderStatus::Stopped);
        assert_eq!(record.hardware(), Some(MockHardware::VIDEO_0));

        let record = registry.bind_video(DecoderId::VIDEO_1, &hw).unwrap().unwrap();
        assert_eq!(record.status(), DecoderStatus::Stopped);
        assert_eq!(record.hardware(), Some(MockHardware::VIDEO_0));
    }

    #[test]
    fn test_bind_keeps_running_status() {
        let hw = MockHardware::new();
        let mut registry = DecoderRegistry::new();
        let record = registry.bind_audio(DecoderId::AUDIO_1, &hw).unwrap().unwrap();
        record.mark_running(AudioCodec::Mpeg, AudioStartSettings::default());

        let record = registry.bind_audio(DecoderId::AUDIO_1, &hw).unwrap().unwrap();
        assert_eq!(record.status(), DecoderStatus::Running);
    }

    #[test]
    fn test_bind_wrong_kind_is_none() {
        let hw = MockHardware::new();
        let mut registry = DecoderRegistry::new();
        assert!(registry.bind_video(DecoderId::AUDIO_1, &hw).unwrap().is_none());
        assert!(registry.bind_audio(DecoderId::VIDEO_1, &hw).unwrap().is_none());
    }

    #[test]
    fn test_bind_without_platform_decoder_fails() {
        let hw = MockHardware::empty();
        let mut registry = DecoderRegistry::new();
        assert_eq!(
            registry.bind_video(DecoderId::VIDEO_1, &hw).unwrap_err(),
            AvError::NoDecoderHandle { index: 0 }
        );
        assert_eq!(
            registry.video(DecoderId::VIDEO_1).unwrap().status(),
            DecoderStatus::Closed
        );
    }

    #[test]
    fn test_invalidate_all() {
        let mut registry = DecoderRegistry::new();
        registry.invalidate_all();
        assert!(registry
            .video_records()
            .iter()
            .all(|r| r.status() == DecoderStatus::Invalid));
        assert!(registry
            .audio_records()
            .iter()
            .all(|r| r.status() == DecoderStatus::Invalid));
    }

    #[test]
    fn test_ids_video_first() {
        let registry = DecoderRegistry::new();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec![DecoderId::VIDEO_1, DecoderId::AUDIO_1]);
    }
}
