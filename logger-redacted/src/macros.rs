// Logging macros

/// Log at warn level after passing the formatted message through the redactor
#[macro_export]
macro_rules! redacted_warn {
    ($redactor:expr, $($arg:tt)*) => {
        tracing::warn!("{}", $redactor.redact(&format!($($arg)*)))
    };
}
