//! System time clock (STC) channel abstraction
//!
//! An STC channel is the timing reference a decoder paces presentation
//! against. In [`StcMode::Auto`] the channel locks onto clock references
//! found in the incoming transport stream instead of free-running.

use crate::decoder::DriverError;

/// Opaque reference to a hardware STC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StcChannelHandle(pub u32);

/// STC channel operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StcMode {
    /// Clock derived from stream timestamps (PCR / PTS)
    Auto,
    /// Clock driven by PCR from a dedicated PID
    Pcr,
    /// Free-running host clock
    #[default]
    Host,
}

/// Timebase source selection in [`StcMode::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StcAutoBehavior {
    /// Whichever decoder reports a timestamp first seeds the clock
    #[default]
    FirstAvailable,
    /// Video timestamps are the master
    VideoMaster,
    /// Audio timestamps are the master
    AudioMaster,
}

/// Container format of the stream feeding the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportType {
    /// MPEG-2 transport stream
    #[default]
    Ts,
    /// Raw elementary stream
    Es,
    /// MPEG-2 packetized elementary stream
    Mpeg2Pes,
}

/// STC channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StcSettings {
    /// Operating mode
    pub mode: StcMode,
    /// Source selection, used in [`StcMode::Auto`]
    pub behavior: StcAutoBehavior,
    /// Input container, used in [`StcMode::Auto`]
    pub transport: TransportType,
}

impl StcSettings {
    /// Auto mode, first-available source, transport stream input.
    pub const fn transport_stream_auto() -> Self {
        Self {
            mode: StcMode::Auto,
            behavior: StcAutoBehavior::FirstAvailable,
            transport: TransportType::Ts,
        }
    }
}

/// STC channel driver.
pub trait StcChannelDriver {
    /// Current channel configuration
    fn stc_settings(&self, stc: StcChannelHandle) -> StcSettings;

    /// Apply a new channel configuration
    fn set_stc_settings(
        &mut self,
        stc: StcChannelHandle,
        settings: &StcSettings,
    ) -> Result<(), DriverError>;
}
