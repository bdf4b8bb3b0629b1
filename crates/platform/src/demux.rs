//! Demultiplexer stream-source abstraction
//!
//! The demux owns stream routing. Callers hand the decoder layer an opaque
//! [`StreamSource`]; only the demux knows how to turn it into the
//! [`StreamRef`] a decoder consumes.

use crate::decoder::StreamRef;

/// Opaque stream handle issued by the demultiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamSource(pub u32);

impl StreamSource {
    /// No stream attached.
    pub const NONE: Self = Self(0);

    /// Returns `true` for [`StreamSource::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for StreamSource {
    fn default() -> Self {
        Self::NONE
    }
}

/// Stream routing provided by the demultiplexer.
pub trait StreamSourceProvider {
    /// Elementary stream reference for `source` on demux `demux_index`.
    ///
    /// Returns `None` when the demux has no route for `source`.
    fn resolve_stream(&self, source: StreamSource, demux_index: u32) -> Option<StreamRef>;
}
