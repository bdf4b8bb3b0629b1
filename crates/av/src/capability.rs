//! Static capability descriptors.
//!
//! These queries do not need an initialized module: they only describe what
//! the platform can do.

use crate::codec::{AudioCodec, VideoCodec};
use crate::config::{AUDIO_DECODER_COUNT, VIDEO_DECODER_COUNT};
use crate::decoder_id::{DecoderId, DecoderSet, Slot};
use crate::error::AvError;

/// Picture formats a video decoder can take for still pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PictureTypes(u32);

impl PictureTypes {
    /// MPEG I-frame
    pub const MPEG: Self = Self(0x01);
    /// Raw YUV 4:2:0
    pub const YUV_420: Self = Self(0x02);
    /// Raw RGB
    pub const RGB: Self = Self(0x04);

    /// Whether every type in `other` is in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl core::ops::BitOr for PictureTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Set of video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoCodecSet(u32);

impl VideoCodecSet {
    /// Set of the given codecs.
    pub fn of(codecs: &[VideoCodec]) -> Self {
        Self(codecs.iter().fold(0, |bits, c| bits | c.bit()))
    }

    /// Whether `codec` is in the set; `Unknown` never is.
    pub const fn contains(self, codec: VideoCodec) -> bool {
        codec.bit() != 0 && self.0 & codec.bit() != 0
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Set of audio codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioCodecSet(u32);

impl AudioCodecSet {
    /// Set of the given codecs.
    pub fn of(codecs: &[AudioCodec]) -> Self {
        Self(codecs.iter().fold(0, |bits, c| bits | c.bit()))
    }

    /// Whether `codec` is in the set; `Unknown` never is.
    pub const fn contains(self, codec: AudioCodec) -> bool {
        codec.bit() != 0 && self.0 & codec.bit() != 0
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Decoders present on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capability {
    /// Every populated video and audio slot
    pub decoders: DecoderSet,
}

/// What a video decoder supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoCapability {
    /// Codecs the decoder can start with
    pub codecs: VideoCodecSet,
    /// Still-picture input formats
    pub picture_types: PictureTypes,
    /// Freeze supported
    pub freeze: bool,
    /// Picture capture supported
    pub picture_capture: bool,
    /// Trick-play speed control supported
    pub speed: bool,
    /// Fastest forward speed, as a multiple of normal
    pub speed_forward_max: u32,
    /// Fastest backward speed, as a multiple of normal
    pub speed_backward_max: u32,
}

/// What an audio decoder supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioCapability {
    /// Codecs the decoder can start with
    pub codecs: AudioCodecSet,
    /// Raw sample formats for sample playback (none supported)
    pub sample_types: u32,
    /// Beep generation supported
    pub beep: bool,
    /// Trick-play speed control supported
    pub speed: bool,
    /// Fastest forward speed, as a multiple of normal
    pub speed_forward_max: u32,
    /// Fastest backward speed, as a multiple of normal
    pub speed_backward_max: u32,
}

/// Video codecs the platform decoder can start with.
pub fn supported_video_codecs() -> VideoCodecSet {
    VideoCodecSet::of(&[
        VideoCodec::Mpeg1,
        VideoCodec::Mpeg2,
        VideoCodec::H264,
        #[cfg(feature = "hevc")]
        VideoCodec::Hevc,
    ])
}

/// Audio codecs the platform decoder can start with.
pub fn supported_audio_codecs() -> AudioCodecSet {
    AudioCodecSet::of(&[
        AudioCodec::Mpeg,
        AudioCodec::MpegAac,
        AudioCodec::HeAac,
        #[cfg(feature = "ac3")]
        AudioCodec::Ac3,
        #[cfg(feature = "ac3")]
        AudioCodec::Eac3,
    ])
}

/// Every populated decoder slot.
pub fn capability() -> Capability {
    let video = Slot::all().take(VIDEO_DECODER_COUNT).map(DecoderId::Video);
    let audio = Slot::all().take(AUDIO_DECODER_COUNT).map(DecoderId::Audio);
    Capability {
        decoders: video.chain(audio).fold(DecoderSet::EMPTY, DecoderSet::with),
    }
}

/// Capabilities of video decoder `id`.
///
/// # Errors
///
/// [`AvError::BadParameter`] if `id` is not a populated video slot.
pub fn video_capability(id: DecoderId) -> Result<VideoCapability, AvError> {
    match id {
        DecoderId::Video(slot) if usize::from(slot.get()) < VIDEO_DECODER_COUNT => {
            Ok(VideoCapability {
                codecs: supported_video_codecs(),
                picture_types: PictureTypes::MPEG | PictureTypes::YUV_420 | PictureTypes::RGB,
                freeze: false,
                picture_capture: false,
                speed: false,
                speed_forward_max: 1,
                speed_backward_max: 1,
            })
        }
        _ => Err(AvError::BadParameter),
    }
}

/// Capabilities of audio decoder `id`.
///
/// # Errors
///
/// [`AvError::BadParameter`] if `id` is not a populated audio slot.
pub fn audio_capability(id: DecoderId) -> Result<AudioCapability, AvError> {
    match id {
        DecoderId::Audio(slot) if usize::from(slot.get()) < AUDIO_DECODER_COUNT => {
            Ok(AudioCapability {
                codecs: supported_audio_codecs(),
                sample_types: 0,
                beep: false,
                speed: false,
                speed_forward_max: 1,
                speed_backward_max: 1,
            })
        }
        _ => Err(AvError::BadParameter),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::{audio_to_hardware, video_to_hardware};
    use platform::{HwAudioCodec, HwVideoCodec};

    #[test]
    fn test_capability_reports_reference_decoders() {
        let cap = capability();
        assert_eq!(cap.decoders, DecoderId::VIDEO_1 | DecoderId::AUDIO_1);
        assert_eq!(cap.decoders.bits(), 0x0101);
    }

    #[test]
    fn test_video_capability() {
        let cap = video_capability(DecoderId::VIDEO_1).unwrap();
        assert!(cap.codecs.contains(VideoCodec::H264));
        assert!(cap.codecs.contains(VideoCodec::Mpeg1));
        assert!(!cap.codecs.contains(VideoCodec::Avs));
        assert!(cap.picture_types.contains(PictureTypes::YUV_420 | PictureTypes::RGB));
        assert!(!cap.freeze && !cap.picture_capture && !cap.speed);
        assert_eq!((cap.speed_forward_max, cap.speed_backward_max), (1, 1));
    }

    #[test]
    fn test_audio_capability() {
        let cap = audio_capability(DecoderId::AUDIO_1).unwrap();
        assert!(cap.codecs.contains(AudioCodec::HeAac));
        assert!(!cap.codecs.contains(AudioCodec::Dts));
        assert!(!cap.codecs.contains(AudioCodec::Unknown));
        assert_eq!(cap.sample_types, 0);
        assert!(!cap.beep);
    }

    #[test]
    fn test_wrong_kind_is_bad_parameter() {
        assert_eq!(video_capability(DecoderId::AUDIO_1), Err(AvError::BadParameter));
        assert_eq!(audio_capability(DecoderId::VIDEO_1), Err(AvError::BadParameter));
        let video2 = DecoderId::Video(Slot::new(1).unwrap());
        assert_eq!(video_capability(video2), Err(AvError::BadParameter));
    }

    #[test]
    fn test_advertised_codecs_all_reach_hardware() {
        let video = [
            VideoCodec::Mpeg1,
            VideoCodec::Mpeg2,
            VideoCodec::H264,
            VideoCodec::Hevc,
            VideoCodec::Avs,
        ];
        for codec in video {
            if supported_video_codecs().contains(codec) {
                assert_ne!(video_to_hardware(codec), HwVideoCodec::Unknown);
            }
        }
        let audio = [
            AudioCodec::Mpeg,
            AudioCodec::MpegAac,
            AudioCodec::HeAac,
            AudioCodec::Ac3,
            AudioCodec::Eac3,
            AudioCodec::Dts,
        ];
        for codec in audio {
            if supported_audio_codecs().contains(codec) {
                assert_ne!(audio_to_hardware(codec), HwAudioCodec::Unknown);
            }
        }
    }
}
