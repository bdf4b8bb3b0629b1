//! Codec translation between the platform-neutral enumerations and the
//! hardware decoder's enumerations.
//!
//! All four functions are pure and total. Platform codecs the hardware cannot
//! decode become `Unknown`; hardware codecs with no platform counterpart fall
//! back to [`VideoCodec::Mpeg2`] / [`AudioCodec::Mpeg`], which says nothing
//! about the real stream format.
//!
//! HEVC (`hevc` feature) and AC-3 / E-AC-3 (`ac3` feature) are mapped only
//! when the target decoder supports them.

use platform::{HwAudioCodec, HwVideoCodec};

/// Platform-neutral video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoCodec {
    /// Not known yet
    #[default]
    Unknown,
    /// MPEG-1 video
    Mpeg1,
    /// MPEG-2 video
    Mpeg2,
    /// H.264 / AVC
    H264,
    /// H.265 / HEVC
    Hevc,
    /// AVS (no hardware support on this platform)
    Avs,
}

/// Platform-neutral audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioCodec {
    /// Not known yet
    #[default]
    Unknown,
    /// MPEG-1 layer 1/2
    Mpeg,
    /// MPEG-2/4 AAC
    MpegAac,
    /// HE-AAC
    HeAac,
    /// Dolby Digital
    Ac3,
    /// Dolby Digital Plus
    Eac3,
    /// DTS (no hardware support on this platform)
    Dts,
}

impl VideoCodec {
    /// Bit used for this codec in capability masks (`Unknown` has none).
    pub const fn bit(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Mpeg1 => 0x01,
            Self::Mpeg2 => 0x02,
            Self::H264 => 0x04,
            Self::Hevc => 0x08,
            Self::Avs => 0x10,
        }
    }
}

impl AudioCodec {
    /// Bit used for this codec in capability masks (`Unknown` has none).
    pub const fn bit(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Mpeg => 0x01,
            Self::MpegAac => 0x02,
            Self::HeAac => 0x04,
            Self::Ac3 => 0x08,
            Self::Eac3 => 0x10,
            Self::Dts => 0x20,
        }
    }
}

/// Codecs of the elementary streams handed to `start`.
///
/// Video decoders read `video`, audio decoders read `audio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamType {
    /// Codec for a video decoder
    pub video: VideoCodec,
    /// Codec for an audio decoder
    pub audio: AudioCodec,
}

impl StreamType {
    /// Stream type for a video start.
    pub const fn video(codec: VideoCodec) -> Self {
        Self {
            video: codec,
            audio: AudioCodec::Unknown,
        }
    }

    /// Stream type for an audio start.
    pub const fn audio(codec: AudioCodec) -> Self {
        Self {
            video: VideoCodec::Unknown,
            audio: codec,
        }
    }
}

/// Platform video codec → hardware video codec.
pub const fn video_to_hardware(codec: VideoCodec) -> HwVideoCodec {
    match codec {
        VideoCodec::H264 => HwVideoCodec::H264,
        VideoCodec::Mpeg1 => HwVideoCodec::Mpeg1,
        VideoCodec::Mpeg2 => HwVideoCodec::Mpeg2,
        #[cfg(feature = "hevc")]
        VideoCodec::Hevc => HwVideoCodec::H265,
        _ => HwVideoCodec::Unknown,
    }
}

/// Hardware video codec → platform video codec.
pub const fn video_from_hardware(codec: HwVideoCodec) -> VideoCodec {
    match codec {
        HwVideoCodec::H264 => VideoCodec::H264,
        HwVideoCodec::Mpeg1 => VideoCodec::Mpeg1,
        HwVideoCodec::Mpeg2 => VideoCodec::Mpeg2,
        #[cfg(feature = "hevc")]
        HwVideoCodec::H265 => VideoCodec::Hevc,
        _ => VideoCodec::Mpeg2,
    }
}

/// Platform audio codec → hardware audio codec.
pub const fn audio_to_hardware(codec: AudioCodec) -> HwAudioCodec {
    match codec {
        AudioCodec::Mpeg => HwAudioCodec::Mpeg,
        AudioCodec::HeAac => HwAudioCodec::AacPlusLoas,
        AudioCodec::MpegAac => HwAudioCodec::Aac,
        #[cfg(feature = "ac3")]
        AudioCodec::Ac3 => HwAudioCodec::Ac3,
        #[cfg(feature = "ac3")]
        AudioCodec::Eac3 => HwAudioCodec::Ac3Plus,
        _ => HwAudioCodec::Unknown,
    }
}

/// Hardware audio codec → platform audio codec.
pub const fn audio_from_hardware(codec: HwAudioCodec) -> AudioCodec {
    match codec {
        HwAudioCodec::Mpeg => AudioCodec::Mpeg,
        HwAudioCodec::AacPlusLoas => AudioCodec::HeAac,
        HwAudioCodec::Aac => AudioCodec::MpegAac,
        #[cfg(feature = "ac3")]
        HwAudioCodec::Ac3 => AudioCodec::Ac3,
        #[cfg(feature = "ac3")]
        HwAudioCodec::Ac3Plus => AudioCodec::Eac3,
        _ => AudioCodec::Mpeg,
    }
}
