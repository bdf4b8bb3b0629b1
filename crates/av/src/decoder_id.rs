//! Decoder identifiers.
//!
//! Decoders are addressed by a typed [`DecoderId`]: a kind (video or audio)
//! plus a [`Slot`] in `0..=7`. Video and audio slots are independent
//! zero-based index spaces.
//!
//! Outside this crate decoders are also named by a one-hot `u32` mask: video
//! slot N is bit N, audio slot N is bit 8 + N. Masks can be OR-combined into
//! a [`DecoderSet`] (capability results), but a single operation always takes
//! exactly one decoder. Translation between the two goes through the bit
//! tables below, never through shift arithmetic.
//!
//! ```text
//! bit   15 ........ 8   7 ......... 0
//!       AUDIO_8..AUDIO_1 VIDEO_8..VIDEO_1
//! ```

use crate::config::SLOT_COUNT;
use crate::error::AvError;

/// One-hot mask of video slots 0..=7.
const VIDEO_BITS: [u32; SLOT_COUNT as usize] = [
    0x0000_0001,
    0x0000_0002,
    0x0000_0004,
    0x0000_0008,
    0x0000_0010,
    0x0000_0020,
    0x0000_0040,
    0x0000_0080,
];

/// One-hot mask of audio slots 0..=7.
const AUDIO_BITS: [u32; SLOT_COUNT as usize] = [
    0x0000_0100,
    0x0000_0200,
    0x0000_0400,
    0x0000_0800,
    0x0000_1000,
    0x0000_2000,
    0x0000_4000,
    0x0000_8000,
];

const VIDEO_NAMES: [&str; SLOT_COUNT as usize] = [
    "video1", "video2", "video3", "video4", "video5", "video6", "video7", "video8",
];

const AUDIO_NAMES: [&str; SLOT_COUNT as usize] = [
    "audio1", "audio2", "audio3", "audio4", "audio5", "audio6", "audio7", "audio8",
];

/// Decoder slot within one kind, `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// Slot 0, the only slot populated in the reference configuration.
    pub const FIRST: Self = Self(0);

    /// Create a slot, returning `None` above 7.
    pub const fn new(index: u8) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Dense zero-based index of this slot.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All eight slots in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT).map(Self)
    }
}

/// Decoder kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderKind {
    /// Video decoder
    Video,
    /// Audio decoder
    Audio,
}

/// Typed decoder identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderId {
    /// Video decoder in the given slot
    Video(Slot),
    /// Audio decoder in the given slot
    Audio(Slot),
}

impl DecoderId {
    /// First video decoder.
    pub const VIDEO_1: Self = Self::Video(Slot::FIRST);
    /// First audio decoder.
    pub const AUDIO_1: Self = Self::Audio(Slot::FIRST);

    /// Decode a one-hot external identifier.
    ///
    /// # Errors
    ///
    /// [`AvError::InvalidDecoder`] unless exactly one bit inside the video or
    /// audio range is set.
    pub fn from_bits(bits: u32) -> Result<Self, AvError> {
        let lookup = |table: &[u32]| table.iter().position(|&bit| bit == bits);
        if let Some(index) = lookup(&VIDEO_BITS) {
            return Ok(Self::Video(Slot::from_position(index)));
        }
        if let Some(index) = lookup(&AUDIO_BITS) {
            return Ok(Self::Audio(Slot::from_position(index)));
        }
        Err(AvError::InvalidDecoder)
    }

    /// One-hot external identifier of this decoder.
    pub fn bits(self) -> u32 {
        let (table, slot) = match self {
            Self::Video(slot) => (&VIDEO_BITS, slot),
            Self::Audio(slot) => (&AUDIO_BITS, slot),
        };
        table.get(usize::from(slot.get())).copied().unwrap_or(0)
    }

    /// Video or audio.
    pub const fn kind(self) -> DecoderKind {
        match self {
            Self::Video(_) => DecoderKind::Video,
            Self::Audio(_) => DecoderKind::Audio,
        }
    }

    /// Slot within the decoder's kind.
    pub const fn slot(self) -> Slot {
        match self {
            Self::Video(slot) | Self::Audio(slot) => slot,
        }
    }

    /// Dense index addressing the matching hardware decoder and STC channel.
    pub const fn index(self) -> u8 {
        self.slot().get()
    }

    /// Short human-readable name, e.g. `"video1"`.
    pub fn name(self) -> &'static str {
        let (table, slot) = match self {
            Self::Video(slot) => (&VIDEO_NAMES, slot),
            Self::Audio(slot) => (&AUDIO_NAMES, slot),
        };
        table.get(usize::from(slot.get())).copied().unwrap_or("?")
    }
}

impl core::fmt::Display for DecoderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl Slot {
    /// Position in one of the bit tables, which hold exactly [`SLOT_COUNT`] entries.
    fn from_position(position: usize) -> Self {
        Self(u8::try_from(position).unwrap_or(0).min(SLOT_COUNT.saturating_sub(1)))
    }
}

/// Dense index of `id`.
pub const fn resolve_index(id: DecoderId) -> u8 {
    id.index()
}

/// Dense index of a one-hot external identifier.
///
/// # Errors
///
/// [`AvError::InvalidDecoder`] when `bits` is not a single video or audio bit.
pub fn resolve_index_bits(bits: u32) -> Result<u8, AvError> {
    DecoderId::from_bits(bits).map(DecoderId::index)
}

/// OR-combinable set of decoders, as reported by capability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderSet(u32);

impl DecoderSet {
    /// No decoders.
    pub const EMPTY: Self = Self(0);

    /// Set containing only `id`.
    pub fn of(id: DecoderId) -> Self {
        Self(id.bits())
    }

    /// This set plus `id`.
    #[must_use]
    pub fn with(self, id: DecoderId) -> Self {
        Self(self.0 | id.bits())
    }

    /// Whether `id` is in the set.
    pub fn contains(self, id: DecoderId) -> bool {
        self.0 & id.bits() != 0
    }

    /// External bitmask representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Decoders in the set, video first, each kind in slot order.
    pub fn iter(self) -> impl Iterator<Item = DecoderId> {
        Slot::all()
            .map(DecoderId::Video)
            .chain(Slot::all().map(DecoderId::Audio))
            .filter(move |id| self.contains(*id))
    }
}

impl core::ops::BitOr<DecoderId> for DecoderSet {
    type Output = Self;

    fn bitor(self, rhs: DecoderId) -> Self {
        self.with(rhs)
    }
}

impl core::ops::BitOr for DecoderId {
    type Output = DecoderSet;

    fn bitor(self, rhs: Self) -> DecoderSet {
        DecoderSet::of(self).with(rhs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_slots_map_to_low_bits() {
        assert_eq!(DecoderId::VIDEO_1.bits(), 0x0001);
        assert_eq!(DecoderId::AUDIO_1.bits(), 0x0100);
    }

    #[test]
    fn test_from_bits_eighth_slot() {
        let video8 = DecoderId::from_bits(0x0080).unwrap();
        assert_eq!(video8, DecoderId::Video(Slot::new(7).unwrap()));
        assert_eq!(video8.index(), 7);

        let audio8 = DecoderId::from_bits(0x8000).unwrap();
        assert_eq!(audio8.kind(), DecoderKind::Audio);
        assert_eq!(audio8.index(), 7);
    }

    #[test]
    fn test_from_bits_rejects_zero_masks_and_out_of_range() {
        assert_eq!(DecoderId::from_bits(0), Err(AvError::InvalidDecoder));
        assert_eq!(DecoderId::from_bits(0x0101), Err(AvError::InvalidDecoder));
        assert_eq!(DecoderId::from_bits(0x0001_0000), Err(AvError::InvalidDecoder));
        assert_eq!(resolve_index_bits(0x0003), Err(AvError::InvalidDecoder));
    }

    #[test]
    fn test_slot_new_bounds() {
        assert!(Slot::new(7).is_some());
        assert!(Slot::new(8).is_none());
        assert_eq!(Slot::all().count(), 8);
    }

    #[test]
    fn test_names() {
        assert_eq!(DecoderId::VIDEO_1.name(), "video1");
        assert_eq!(DecoderId::Audio(Slot::new(2).unwrap()).to_string(), "audio3");
    }

    #[test]
    fn test_decoder_set_combines_bits() {
        let set = DecoderId::VIDEO_1 | DecoderId::AUDIO_1;
        assert_eq!(set.bits(), 0x0101);
        assert!(set.contains(DecoderId::VIDEO_1));
        assert!(!set.contains(DecoderId::Video(Slot::new(1).unwrap())));
        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec![DecoderId::VIDEO_1, DecoderId::AUDIO_1]);
    }
}
