//! Decoder management for the AV playback stack
//!
//! Sits between channel/playback control and the platform decoder HAL:
//!
//! ```text
//! Playback control (zapping, PVR)
//!         ↓
//! AvModule (this crate) ── SharedAvModule for multi-task access
//!    │  decoder_id: DecoderId ⇄ one-hot mask ⇄ slot index
//!    │  registry:   per-slot record, lazy hardware binding
//!    │  stc:        STC channel auto mode + attach, before each start
//!    │  codec:      VideoCodec / AudioCodec ⇄ hardware codecs
//!         ↓
//! platform HAL (DecoderHardware + StreamSourceProvider)
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! Closed --first bind--> Stopped --start--> Running --stop--> Stopped
//!                          any --terminate--> Invalid
//! ```
//!
//! # Features
//!
//! - `std` (default): host builds; without it the crate is `no_std`
//! - `hevc` (default): map H.265 to the hardware decoder
//! - `ac3` (default): map AC-3 / E-AC-3 to the hardware decoder
//! - `defmt`: defmt logging and `defmt::Format` derives
//! - `tracing`: tracing logging
//!
//! # Example
//!
//! ```no_run
//! use av::{AvConfig, AvModule, DecoderId, StreamType, VideoCodec};
//! use platform::{DecoderHardware, StreamSource, StreamSourceProvider};
//!
//! fn zap<H: DecoderHardware, S: StreamSourceProvider>(hw: H, demux: S) -> Result<(), av::AvError> {
//!     let mut av = AvModule::new(hw, demux, AvConfig::default());
//!     av.set_input_stream(DecoderId::VIDEO_1, StreamSource(42))?;
//!     av.start(DecoderId::VIDEO_1, StreamType::video(VideoCodec::H264))?;
//!     av.stop(DecoderId::VIDEO_1)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod log;

pub mod capability;
pub mod codec;
pub mod config;
pub mod decoder_id;
pub mod error;
pub mod module;
pub mod registry;
pub mod shared;
pub mod stc;

pub use capability::{
    audio_capability, capability, video_capability, AudioCapability, Capability, VideoCapability,
};
pub use codec::{AudioCodec, StreamType, VideoCodec};
pub use config::AvConfig;
pub use decoder_id::{resolve_index, resolve_index_bits, DecoderId, DecoderKind, DecoderSet, Slot};
pub use error::AvError;
pub use module::AvModule;
pub use registry::{DecoderRegistry, DecoderStatus};
pub use shared::SharedAvModule;
