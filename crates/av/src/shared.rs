//! Shared access to one [`AvModule`] from several tasks.
//!
//! The module lives inside an `embassy_sync` blocking mutex, so every
//! operation on it runs under the lock and start/stop sequences never
//! interleave. Pick the raw mutex for the target: `CriticalSectionRawMutex`
//! when interrupts share the module, `ThreadModeRawMutex` for thread-mode
//! tasks only, `NoopRawMutex` for single-context use and tests.
//!
//! Re-entering the module from inside [`SharedAvModule::with`] is reported as
//! [`AvError::Busy`] instead of deadlocking.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::{DecoderHardware, StreamSource, StreamSourceProvider};

use crate::codec::StreamType;
use crate::decoder_id::DecoderId;
use crate::error::AvError;
use crate::module::AvModule;
use crate::registry::DecoderStatus;

/// Mutex-guarded [`AvModule`].
pub struct SharedAvModule<M: RawMutex, H, S> {
    inner: Mutex<M, RefCell<AvModule<H, S>>>,
}

impl<M, H, S> SharedAvModule<M, H, S>
where
    M: RawMutex,
    H: DecoderHardware,
    S: StreamSourceProvider,
{
    /// Wrap a module.
    pub const fn new(module: AvModule<H, S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(module)),
        }
    }

    /// Run `f` with exclusive access to the module.
    ///
    /// # Errors
    ///
    /// [`AvError::Busy`] if called from inside another `with` on the same module.
    pub fn with<R>(&self, f: impl FnOnce(&mut AvModule<H, S>) -> R) -> Result<R, AvError> {
        self.inner.lock(|cell| {
            let mut module = cell.try_borrow_mut().map_err(|_| AvError::Busy)?;
            Ok(f(&mut module))
        })
    }

    /// See [`AvModule::start`].
    ///
    /// # Errors
    ///
    /// As [`AvModule::start`], plus [`AvError::Busy`].
    pub fn start(&self, id: DecoderId, stream_type: StreamType) -> Result<(), AvError> {
        self.with(|av| av.start(id, stream_type))?
    }

    /// See [`AvModule::stop`].
    ///
    /// # Errors
    ///
    /// As [`AvModule::stop`], plus [`AvError::Busy`].
    pub fn stop(&self, id: DecoderId) -> Result<(), AvError> {
        self.with(|av| av.stop(id))?
    }

    /// See [`AvModule::set_input_stream`].
    ///
    /// # Errors
    ///
    /// As [`AvModule::set_input_stream`], plus [`AvError::Busy`].
    pub fn set_input_stream(&self, id: DecoderId, source: StreamSource) -> Result<(), AvError> {
        self.with(|av| av.set_input_stream(id, source))?
    }

    /// See [`AvModule::status`].
    ///
    /// # Errors
    ///
    /// [`AvError::Busy`] on re-entry.
    pub fn status(&self, id: DecoderId) -> Result<Option<DecoderStatus>, AvError> {
        self.with(|av| av.status(id))
    }

    /// See [`AvModule::terminate`].
    ///
    /// # Errors
    ///
    /// As [`AvModule::terminate`], plus [`AvError::Busy`].
    pub fn terminate(&self) -> Result<(), AvError> {
        self.with(AvModule::terminate)?
    }

    /// Unwrap the module.
    pub fn into_inner(self) -> AvModule<H, S> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::VideoCodec;
    use crate::config::AvConfig;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use platform::mocks::{MockDemux, MockHardware};
    use platform::StreamRef;

    type Shared = SharedAvModule<NoopRawMutex, MockHardware, MockDemux>;

    fn shared() -> Shared {
        let demux = MockDemux::new()
            .route(StreamSource(42), 0, StreamRef(0x100))
            .unwrap();
        SharedAvModule::new(AvModule::new(MockHardware::new(), demux, AvConfig::default()))
    }

    #[test]
    fn test_delegates_to_module() {
        let av = shared();
        av.set_input_stream(DecoderId::VIDEO_1, StreamSource(42)).unwrap();
        av.start(DecoderId::VIDEO_1, StreamType::video(VideoCodec::H264))
            .unwrap();
        assert_eq!(
            av.status(DecoderId::VIDEO_1).unwrap(),
            Some(DecoderStatus::Running)
        );
        av.stop(DecoderId::VIDEO_1).unwrap();
        assert_eq!(
            av.status(DecoderId::VIDEO_1).unwrap(),
            Some(DecoderStatus::Stopped)
        );
    }

    #[test]
    fn test_reentry_is_busy() {
        let av = shared();
        let inner = av.with(|_| av.stop(DecoderId::AUDIO_1)).unwrap();
        assert_eq!(inner, Err(AvError::Busy));
    }

    #[test]
    fn test_terminate_then_into_inner() {
        let av = shared();
        av.terminate().unwrap();
        let module = av.into_inner();
        assert!(!module.is_initialized());
    }
}
