use std::fmt;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// The input roster could not be opened or parsed.
    InputError(String),
    /// The enriched table or run report could not be written.
    OutputError(String),
    /// Error interacting with the geocoding provider outside the retry loop.
    ExternalApiError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputError(msg) => write!(f, "Input error: {}", msg),
            AppError::OutputError(msg) => write!(f, "Output error: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<csv::Error> for AppError {
    /// Read-side conversion. The table writer maps its own CSV errors to `OutputError`.
    fn from(err: csv::Error) -> Self {
        AppError::InputError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::OutputError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::OutputError(format!("Failed to serialize run report: {}", err))
    }
}

/// Failure reported by a geocoding collaborator for a single lookup.
///
/// The resolver treats both variants as transient and retries them; neither
/// ever escapes the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// The provider did not answer within the per-call timeout.
    TimedOut,
    /// The provider answered with an error or could not be reached.
    ServiceError(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::TimedOut => write!(f, "geocoding request timed out"),
            GeocodeError::ServiceError(msg) => write!(f, "geocoding service error: {}", msg),
        }
    }
}

impl std::error::Error for GeocodeError {}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::TimedOut
        } else {
            GeocodeError::ServiceError(err.to_string())
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: f(),
        })
    }
}
