//! Error type for the decoder-management layer.

use platform::DriverError;
use thiserror_no_std::Error;

/// Errors returned by decoder-management operations.
///
/// Every error is returned to the immediate caller. Nothing is retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvError {
    /// Identifier is not a single video or audio decoder bit.
    #[error("decoder identifier is outside the video and audio ranges")]
    InvalidDecoder,
    /// Identifier matched neither a supported video nor audio decoder.
    #[error("no supported decoder matches the identifier")]
    UnknownDecoder,
    /// The platform has no STC channel for the decoder index.
    #[error("no STC channel for decoder index {index}")]
    NoClockChannel {
        /// Decoder index the channel was requested for
        index: u8,
    },
    /// Configuring or attaching the STC channel failed.
    #[error("attaching STC channel failed (rc = {code})")]
    ClockBindFailed {
        /// Driver return code
        code: i32,
    },
    /// Query argument does not address a decoder of the queried kind.
    #[error("bad parameter")]
    BadParameter,
    /// The platform has not allocated the hardware decoder yet.
    #[error("no hardware decoder for index {index}")]
    NoDecoderHandle {
        /// Decoder index the handle was requested for
        index: u8,
    },
    /// The demux could not route the decoder's stream source.
    #[error("stream source could not be resolved by the demux")]
    StreamUnavailable,
    /// Module is not initialized (never initialized, or terminated).
    #[error("AV module is not initialized")]
    NotInitialized,
    /// Shared module accessed re-entrantly.
    #[error("AV module is busy")]
    Busy,
    /// A decoder driver call failed.
    #[error("decoder {op} failed (rc = {code})")]
    Driver {
        /// Driver operation that failed
        op: &'static str,
        /// Driver return code
        code: i32,
    },
}

impl AvError {
    /// Wrap a failed driver call.
    pub(crate) fn driver(op: &'static str, err: DriverError) -> Self {
        Self::Driver { op, code: err.code }
    }
}
