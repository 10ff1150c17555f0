//! Conditional logging macros (zero-cost when feature disabled).
//!
//! With the `tracing` feature enabled these forward to `tracing` spans and
//! events. Without it they compile to nothing, so no search or click path can
//! depend on a log call succeeding.

/// Create an info-level span around a top-level operation.
///
/// When the `tracing` feature is disabled this returns a [`NoopSpan`] so that
/// `let _guard = trace_span!(...).entered();` works without `cfg` at call
/// sites.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an event at the given level with debug-formatted fields.
///
/// `trace_event!(WARN, "image not found", template = tpl, levels = n)`
///
/// When the `tracing` feature is disabled the field expressions are still
/// evaluated (by reference) and discarded, which keeps locals used only for
/// logging free of unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($level:ident, $msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::event!(tracing::Level::$level, $($key = ?$value,)* $msg)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident, $msg:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = &$value;)*
    }};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// A no-op span guard used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
