//! STC channel binding.
//!
//! Before every start the decoder's STC channel is put into auto mode
//! (first-available timebase, transport-stream input) and attached to the
//! hardware decoder, so presentation follows the stream's clock references
//! rather than a free-running clock. The binding is redone on every start;
//! nothing assumes it survives a stop.

use platform::{DecoderHardware, StcAutoBehavior, StcChannelHandle, StcMode, TransportType};

use crate::error::AvError;
use crate::log;
use crate::registry::{AudioDecoderRecord, VideoDecoderRecord};

/// Configure and attach the STC channel of a video decoder.
///
/// # Errors
///
/// - [`AvError::NoDecoderHandle`] if the record has not been bound to hardware
/// - [`AvError::NoClockChannel`] if the platform has no channel for the index
/// - [`AvError::ClockBindFailed`] if configuring or attaching the channel fails
pub fn bind_video_stc<H: DecoderHardware + ?Sized>(
    hw: &mut H,
    record: &VideoDecoderRecord,
) -> Result<StcChannelHandle, AvError> {
    let index = record.id().index();
    let decoder = record
        .hardware()
        .ok_or(AvError::NoDecoderHandle { index })?;
    let stc = configure_channel(hw, index)?;
    hw.set_video_stc_channel(decoder, stc).map_err(|e| {
        log::error!(
            "{}: error setting STC channel on video decoder, rc = {}",
            record.id().name(),
            e.code
        );
        AvError::ClockBindFailed { code: e.code }
    })?;
    log::debug!("{}: STC channel {} attached", record.id().name(), stc.0);
    Ok(stc)
}

/// Configure and attach the STC channel of an audio decoder.
///
/// # Errors
///
/// Same as [`bind_video_stc`].
pub fn bind_audio_stc<H: DecoderHardware + ?Sized>(
    hw: &mut H,
    record: &AudioDecoderRecord,
) -> Result<StcChannelHandle, AvError> {
    let index = record.id().index();
    let decoder = record
        .hardware()
        .ok_or(AvError::NoDecoderHandle { index })?;
    let stc = configure_channel(hw, index)?;
    hw.set_audio_stc_channel(decoder, stc).map_err(|e| {
        log::error!(
            "{}: error setting STC channel on audio decoder, rc = {}",
            record.id().name(),
            e.code
        );
        AvError::ClockBindFailed { code: e.code }
    })?;
    log::debug!("{}: STC channel {} attached", record.id().name(), stc.0);
    Ok(stc)
}

/// Fetch the channel for `index` and switch it to transport-stream auto mode.
fn configure_channel<H: DecoderHardware + ?Sized>(
    hw: &mut H,
    index: u8,
) -> Result<StcChannelHandle, AvError> {
    let stc = hw.stc_channel(index).ok_or_else(|| {
        log::warning!("no STC channel for decoder index {}", index);
        AvError::NoClockChannel { index }
    })?;
    let mut settings = hw.stc_settings(stc);
    settings.mode = StcMode::Auto;
    settings.behavior = StcAutoBehavior::FirstAvailable;
    settings.transport = TransportType::Ts;
    hw.set_stc_settings(stc, &settings).map_err(|e| {
        log::error!("STC channel {} rejected auto mode, rc = {}", stc.0, e.code);
        AvError::ClockBindFailed { code: e.code }
    })?;
    Ok(stc)
}
