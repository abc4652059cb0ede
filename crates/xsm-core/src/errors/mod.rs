use std::error::Error;

/// Base trait for all xsession-manager errors
pub trait XsmError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type XsmResult<T> = Result<T, Box<dyn XsmError>>;

/// Log an error at the level its kind deserves.
///
/// User errors (bad session name, missing session file) are warnings;
/// everything else is an error.
pub fn log_error<E: XsmError + ?Sized>(error: &E) {
    if error.is_user_error() {
        tracing::warn!(
            event = "core.app.user_error",
            error_code = error.error_code(),
            error = %error
        );
    } else {
        tracing::error!(
            event = "core.app.error",
            error_code = error.error_code(),
            error = %error
        );
    }
}
