//! Hardware decoder abstraction
//!
//! The decoder objects themselves are allocated by a separate platform
//! subsystem. This module only describes how to reach them
//! ([`DecoderProvider`]) and how to drive them ([`VideoDecoderDriver`],
//! [`AudioDecoderDriver`]).
//!
//! Handles are opaque copies: holding one does not own the hardware object,
//! and resolving the same index twice yields the same handle.

use crate::stc::{StcChannelDriver, StcChannelHandle};

/// Opaque reference to a hardware video decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoDecoderHandle(pub u32);

/// Opaque reference to a hardware audio decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioDecoderHandle(pub u32);

/// Demux-side reference to an elementary stream (a PID channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamRef(pub u32);

/// Non-zero result code reported by a driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverError {
    /// Raw driver return code (never zero).
    pub code: i32,
}

impl DriverError {
    /// Wrap a raw return code.
    pub const fn new(code: i32) -> Self {
        Self { code }
    }
}

impl core::error::Error for DriverError {}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Decoder driver error (rc = {})", self.code)
    }
}

/// Video codecs understood by the hardware decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwVideoCodec {
    /// Codec not set or not supported
    #[default]
    Unknown,
    /// MPEG-1 video
    Mpeg1,
    /// MPEG-2 video
    Mpeg2,
    /// MPEG-4 part 2
    Mpeg4Part2,
    /// H.264 / AVC
    H264,
    /// H.265 / HEVC
    H265,
    /// SMPTE VC-1
    Vc1,
    /// Google VP9
    Vp9,
}

/// Audio codecs understood by the hardware decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwAudioCodec {
    /// Codec not set or not supported
    #[default]
    Unknown,
    /// MPEG-1 layer 1/2
    Mpeg,
    /// MPEG-1 layer 3
    Mp3,
    /// AAC in ADTS
    Aac,
    /// HE-AAC in LOAS
    AacPlusLoas,
    /// HE-AAC in ADTS
    AacPlusAdts,
    /// Dolby Digital
    Ac3,
    /// Dolby Digital Plus
    Ac3Plus,
    /// DTS
    Dts,
    /// Linear PCM
    Pcm,
}

/// Video decoder start configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoStartSettings {
    /// Elementary stream to decode
    pub stream: Option<StreamRef>,
    /// Codec of that stream
    pub codec: HwVideoCodec,
    /// Largest picture width the decoder must be able to handle
    pub max_width: u16,
    /// Largest picture height the decoder must be able to handle
    pub max_height: u16,
    /// Allow resolution changes without a decoder restart
    pub smooth_resolution_change: bool,
    /// STC channel the decoder is paced by
    pub stc_channel: Option<StcChannelHandle>,
}

/// Audio decoder start configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioStartSettings {
    /// Primary elementary stream to decode
    pub stream: Option<StreamRef>,
    /// Codec of that stream
    pub codec: HwAudioCodec,
    /// STC channel the decoder is paced by
    pub stc_channel: Option<StcChannelHandle>,
}

/// Resolves decoder slot indices to the hardware objects behind them.
pub trait DecoderProvider {
    /// Hardware video decoder for `index`, if the platform allocated one.
    fn video_decoder(&self, index: u8) -> Option<VideoDecoderHandle>;

    /// Hardware audio decoder for `index`, if the platform allocated one.
    fn audio_decoder(&self, index: u8) -> Option<AudioDecoderHandle>;

    /// STC channel for `index`, if the platform allocated one.
    fn stc_channel(&self, index: u8) -> Option<StcChannelHandle>;
}

/// Video decoder driver.
pub trait VideoDecoderDriver {
    /// Start settings with the driver's defaults filled in
    fn default_video_settings(&self) -> VideoStartSettings;

    /// Start decoding
    fn start_video(
        &mut self,
        handle: VideoDecoderHandle,
        settings: &VideoStartSettings,
    ) -> Result<(), DriverError>;

    /// Stop decoding
    fn stop_video(&mut self, handle: VideoDecoderHandle) -> Result<(), DriverError>;

    /// Discard queued pictures and compressed data
    fn flush_video(&mut self, handle: VideoDecoderHandle) -> Result<(), DriverError>;

    /// Pace the decoder by `stc`
    fn set_video_stc_channel(
        &mut self,
        handle: VideoDecoderHandle,
        stc: StcChannelHandle,
    ) -> Result<(), DriverError>;
}

/// Audio decoder driver.
pub trait AudioDecoderDriver {
    /// Start settings with the driver's defaults filled in
    fn default_audio_settings(&self) -> AudioStartSettings;

    /// Start decoding
    fn start_audio(
        &mut self,
        handle: AudioDecoderHandle,
        settings: &AudioStartSettings,
    ) -> Result<(), DriverError>;

    /// Stop decoding
    fn stop_audio(&mut self, handle: AudioDecoderHandle) -> Result<(), DriverError>;

    /// Discard queued samples and compressed data
    fn flush_audio(&mut self, handle: AudioDecoderHandle) -> Result<(), DriverError>;

    /// Pace the decoder by `stc`
    fn set_audio_stc_channel(
        &mut self,
        handle: AudioDecoderHandle,
        stc: StcChannelHandle,
    ) -> Result<(), DriverError>;
}

/// Everything the decoder-management layer needs from the platform.
///
/// Blanket-implemented for any type providing all four capabilities.
pub trait DecoderHardware:
    DecoderProvider + VideoDecoderDriver + AudioDecoderDriver + StcChannelDriver
{
}

impl<T> DecoderHardware for T where
    T: DecoderProvider + VideoDecoderDriver + AudioDecoderDriver + StcChannelDriver
{
}
