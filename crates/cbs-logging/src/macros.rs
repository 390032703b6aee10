//! ---
//! cbs_section: "03-logging"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Stage-tagged structured logging for breaker calculations."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Logging macros that attach the [`LogContext`](crate::LogContext) fields to every event.

/// Shared expansion behind the level-specific macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __cbs_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        // Format outside `event!` so caller arguments resolve in the caller's scope.
        let message = ::std::format!($($arg)+);
        $crate::tracing::event!(
            $level,
            calculation = ctx.calculation.unwrap_or(""),
            stage = ctx.stage.unwrap_or(""),
            standard = ctx.standard.unwrap_or(""),
            message = %message
        );
    }};
}

/// Emit an informational log enriched with calculation context.
#[macro_export]
macro_rules! cbs_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with calculation context.
#[macro_export]
macro_rules! cbs_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with calculation context.
#[macro_export]
macro_rules! cbs_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with calculation context.
#[macro_export]
macro_rules! cbs_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__cbs_event!($crate::tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
