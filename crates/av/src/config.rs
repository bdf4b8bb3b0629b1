//! Decoder-management configuration and constants
//!
//! Slot counts are compile-time: they size the registry arrays. Everything
//! the lifecycle controller writes into hardware start settings lives in
//! [`AvConfig`].

/// Number of identifier bits per decoder kind (video slots 0..=7, audio slots 0..=7).
pub const SLOT_COUNT: u8 = 8;

/// Video decoder instances present on the platform.
pub const VIDEO_DECODER_COUNT: usize = 1;

/// Audio decoder instances present on the platform.
pub const AUDIO_DECODER_COUNT: usize = 1;

/// Demultiplexer the decoders are fed from.
pub const DEFAULT_DEMUX_INDEX: u32 = 0;

/// Largest picture width the video decoder is started for.
pub const DEFAULT_MAX_WIDTH: u16 = 1920;

/// Largest picture height the video decoder is started for.
pub const DEFAULT_MAX_HEIGHT: u16 = 1080;

// Compile-time guards: the registry cannot hold more slots than the
// identifier space addresses.
const _: () = assert!(VIDEO_DECODER_COUNT >= 1 && VIDEO_DECODER_COUNT <= SLOT_COUNT as usize);
const _: () = assert!(AUDIO_DECODER_COUNT >= 1 && AUDIO_DECODER_COUNT <= SLOT_COUNT as usize);

/// Runtime configuration of the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AvConfig {
    /// Demux index passed to the stream-source provider
    pub demux_index: u32,
    /// Maximum video width written into start settings
    pub max_width: u16,
    /// Maximum video height written into start settings
    pub max_height: u16,
    /// Let the video decoder follow resolution changes without a restart
    pub smooth_resolution_change: bool,
}

impl AvConfig {
    /// Reference configuration: demux 0, 1920×1080, smooth resolution change on.
    pub const fn reference() -> Self {
        Self {
            demux_index: DEFAULT_DEMUX_INDEX,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            smooth_resolution_change: true,
        }
    }
}

impl Default for AvConfig {
    fn default() -> Self {
        Self::reference()
    }
}
