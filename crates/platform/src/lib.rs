//! Hardware Abstraction Layer (HAL) for the AV decoder stack
//!
//! This crate provides trait-based abstractions for the hardware the decoder
//! management layer drives, enabling development and testing without the
//! vendor decoder driver.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (channel zapping, playback control)
//!         ↓
//! Decoder management (av crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Vendor decoder driver + demultiplexer
//! ```
//!
//! # Abstractions
//!
//! - [`DecoderProvider`] - slot index → hardware decoder / STC channel
//! - [`VideoDecoderDriver`] / [`AudioDecoderDriver`] - start, stop, flush, STC attach
//! - [`StcChannelDriver`] - system time clock channel configuration
//! - [`StreamSourceProvider`] - demux stream source → elementary stream reference
//!
//! # Features
//!
//! - `mock`: Call-recording mock implementations (for tests in other crates)
//! - `defmt`: Enable defmt logging
//!
//! # Example
//!
//! ```no_run
//! use platform::{DecoderHardware, StcSettings};
//!
//! fn lock_to_stream<H: DecoderHardware>(hw: &mut H) {
//!     if let Some(stc) = hw.stc_channel(0) {
//!         let _ = hw.set_stc_settings(stc, &StcSettings::transport_stream_auto());
//!     }
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod decoder;
pub mod demux;
pub mod mocks;
pub mod stc;

// Re-export main high-level traits
pub use decoder::{
    AudioDecoderDriver, DecoderHardware, DecoderProvider, DriverError, VideoDecoderDriver,
};
pub use demux::{StreamSource, StreamSourceProvider};
pub use stc::StcChannelDriver;

// Re-export handle and settings types
pub use decoder::{
    AudioDecoderHandle, AudioStartSettings, HwAudioCodec, HwVideoCodec, StreamRef,
    VideoDecoderHandle, VideoStartSettings,
};
pub use stc::{StcAutoBehavior, StcChannelHandle, StcMode, StcSettings, TransportType};
