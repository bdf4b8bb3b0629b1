//! Property-based tests for decoder identifiers and codec translation.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

#![allow(clippy::unwrap_used)]

use av::codec::{audio_from_hardware, audio_to_hardware, video_from_hardware, video_to_hardware};
use av::{
    resolve_index, resolve_index_bits, AudioCodec, AvError, DecoderId, DecoderKind, Slot, VideoCodec,
};
use platform::{HwAudioCodec, HwVideoCodec};
use proptest::prelude::*;

fn any_video_codec() -> impl Strategy<Value = VideoCodec> {
    prop_oneof![
        Just(VideoCodec::Unknown),
        Just(VideoCodec::Mpeg1),
        Just(VideoCodec::Mpeg2),
        Just(VideoCodec::H264),
        Just(VideoCodec::Hevc),
        Just(VideoCodec::Avs),
    ]
}

fn any_audio_codec() -> impl Strategy<Value = AudioCodec> {
    prop_oneof![
        Just(AudioCodec::Unknown),
        Just(AudioCodec::Mpeg),
        Just(AudioCodec::MpegAac),
        Just(AudioCodec::HeAac),
        Just(AudioCodec::Ac3),
        Just(AudioCodec::Eac3),
        Just(AudioCodec::Dts),
    ]
}

fn any_hw_video_codec() -> impl Strategy<Value = HwVideoCodec> {
    prop_oneof![
        Just(HwVideoCodec::Unknown),
        Just(HwVideoCodec::Mpeg1),
        Just(HwVideoCodec::Mpeg2),
        Just(HwVideoCodec::Mpeg4Part2),
        Just(HwVideoCodec::H264),
        Just(HwVideoCodec::H265),
        Just(HwVideoCodec::Vc1),
        Just(HwVideoCodec::Vp9),
    ]
}

fn any_hw_audio_codec() -> impl Strategy<Value = HwAudioCodec> {
    prop_oneof![
        Just(HwAudioCodec::Unknown),
        Just(HwAudioCodec::Mpeg),
        Just(HwAudioCodec::Mp3),
        Just(HwAudioCodec::Aac),
        Just(HwAudioCodec::AacPlusLoas),
        Just(HwAudioCodec::AacPlusAdts),
        Just(HwAudioCodec::Ac3),
        Just(HwAudioCodec::Ac3Plus),
        Just(HwAudioCodec::Dts),
        Just(HwAudioCodec::Pcm),
    ]
}

proptest! {
    /// Every single bit in 0..16 decodes, and decodes back to the same bit.
    #[test]
    fn single_bit_round_trips(bit in 0u32..16) {
        let bits = 1u32 << bit;
        let id = DecoderId::from_bits(bits).unwrap();
        prop_assert_eq!(id.bits(), bits);
        prop_assert_eq!(resolve_index_bits(bits).unwrap(), resolve_index(id));
        let expected_kind = if bit < 8 { DecoderKind::Video } else { DecoderKind::Audio };
        prop_assert_eq!(id.kind(), expected_kind);
        prop_assert_eq!(u32::from(id.index()), bit % 8);
    }

    /// Anything that is not exactly one bit inside the low 16 is rejected.
    #[test]
    fn non_single_bit_rejected(bits in any::<u32>()) {
        let valid = bits.count_ones() == 1 && bits.trailing_zeros() < 16;
        prop_assert_eq!(DecoderId::from_bits(bits).is_ok(), valid);
        if !valid {
            prop_assert_eq!(resolve_index_bits(bits), Err(AvError::InvalidDecoder));
        }
    }

    /// Index is a bijection within each kind.
    #[test]
    fn index_bijective_per_kind(a in 0u8..8, b in 0u8..8) {
        let (sa, sb) = (Slot::new(a).unwrap(), Slot::new(b).unwrap());
        prop_assert_eq!(
            resolve_index(DecoderId::Video(sa)) == resolve_index(DecoderId::Video(sb)),
            a == b
        );
        prop_assert_eq!(
            resolve_index(DecoderId::Audio(sa)) == resolve_index(DecoderId::Audio(sb)),
            a == b
        );
        prop_assert_ne!(DecoderId::Video(sa).bits(), DecoderId::Audio(sb).bits());
    }

    /// to_hardware then from_hardware returns the codec whenever it was mapped.
    #[test]
    fn video_codec_round_trip(codec in any_video_codec()) {
        let hw = video_to_hardware(codec);
        if hw != HwVideoCodec::Unknown {
            prop_assert_eq!(video_from_hardware(hw), codec);
        }
    }

    #[test]
    fn audio_codec_round_trip(codec in any_audio_codec()) {
        let hw = audio_to_hardware(codec);
        if hw != HwAudioCodec::Unknown {
            prop_assert_eq!(audio_from_hardware(hw), codec);
        }
    }

    /// from_hardware never yields Unknown and is stable under a second pass.
    #[test]
    fn video_from_hardware_idempotent(hw in any_hw_video_codec()) {
        let codec = video_from_hardware(hw);
        prop_assert_ne!(codec, VideoCodec::Unknown);
        prop_assert_eq!(video_from_hardware(video_to_hardware(codec)), codec);
    }

    #[test]
    fn audio_from_hardware_idempotent(hw in any_hw_audio_codec()) {
        let codec = audio_from_hardware(hw);
        prop_assert_ne!(codec, AudioCodec::Unknown);
        prop_assert_eq!(audio_from_hardware(audio_to_hardware(codec)), codec);
    }
}
