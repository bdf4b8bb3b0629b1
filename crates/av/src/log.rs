//! Logging shims.
//!
//! Forward to `defmt` on target builds and `tracing` on host builds. With
//! neither feature enabled the arguments are evaluated and discarded.
//!
//! The warning level is `warning!` because a `warn` macro collides with the
//! built-in `#[warn]` attribute when re-exported by path.

macro_rules! av_log {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($fmt $(, $arg)*);
        #[cfg(feature = "tracing")]
        tracing::$level!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ($(&$arg),*);
    }};
}

macro_rules! debug {
    ($($t:tt)*) => { $crate::log::av_log!(debug, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { $crate::log::av_log!(info, $($t)*) };
}

macro_rules! warning {
    ($($t:tt)*) => { $crate::log::av_log!(warn, $($t)*) };
}

macro_rules! error {
    ($($t:tt)*) => { $crate::log::av_log!(error, $($t)*) };
}

pub(crate) use {av_log, debug, error, info, warning};
