//! Logging macros
//!
//! Context values accept anything implementing `Display`:
//!
//! ```ignore
//! log_error!(codes::syntax::SYNTAX_ERROR, "Parse failed", "line" => 3, "column" => 7);
//! log_debug!(code = codes::tokenization::TRANSPARENT_NODE, "No rule", "kind" => kind);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            $crate::__log_context!($($key => $value),*),
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            $crate::__log_context!($($key => $value),*),
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::emit_with_context(
            $crate::logging::LogEvent::success($code, $message),
            $crate::__log_context!($($key => $value),*),
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::emit_with_context(
            $crate::logging::LogEvent::info($message),
            $crate::__log_context!($($key => $value),*),
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::emit_with_context(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            $crate::__log_context!($($key => $value),*),
        )
    };

    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::emit_with_context(
            $crate::logging::LogEvent::warning($message),
            $crate::__log_context!($($key => $value),*),
        )
    };
}

/// Skips building the event entirely unless debug output is enabled
#[macro_export]
macro_rules! log_debug {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::emit_with_context(
                $crate::logging::LogEvent::debug_with_code($code, $message),
                $crate::__log_context!($($key => $value),*),
            )
        }
    };

    ($message:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::emit_with_context(
                $crate::logging::LogEvent::debug($message),
                $crate::__log_context!($($key => $value),*),
            )
        }
    };
}
