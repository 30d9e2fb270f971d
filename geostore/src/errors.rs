use backtrace::Backtrace;
use geostore_spatial::SpatialError;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for GeoStore operations
///
/// Each error kind describes a specific category of failure, enabling precise
/// error handling by callers.
///
/// # Examples
///
/// ```rust,ignore
/// use geostore::errors::{GeoStoreError, ErrorKind, GeoStoreResult};
///
/// fn example() -> GeoStoreResult<()> {
///     Err(GeoStoreError::new("Collection countries not found", ErrorKind::CollectionNotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The requested resource was not found
    NotFound,
    /// Collection does not exist in the store index
    CollectionNotFound,
    /// The file was not found
    FileNotFound,

    /// A document failed its structural validation
    ValidationError,
    /// Invalid field name or path
    InvalidFieldName,

    /// Generic IO error
    IOError,
    /// Permission denied for file operation
    PermissionDenied,
    /// Error encoding or decoding data
    EncodingError,

    /// Error during filter evaluation or construction
    FilterError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl ErrorKind {
    /// True for every kind that means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::CollectionNotFound | ErrorKind::FileNotFound
        )
    }

    /// True for every kind raised by the underlying storage.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ErrorKind::IOError | ErrorKind::PermissionDenied | ErrorKind::FileNotFound
        )
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom GeoStore error type.
///
/// `GeoStoreError` encapsulates error information including the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use geostore::errors::{GeoStoreError, ErrorKind};
///
/// // Create a simple error
/// let err = GeoStoreError::new("Record not found", ErrorKind::NotFound);
///
/// // Create an error with a cause
/// let cause = GeoStoreError::new("disk full", ErrorKind::IOError);
/// let err = GeoStoreError::new_with_cause("Failed to persist index", ErrorKind::IOError, cause);
/// ```
#[derive(Clone)]
pub struct GeoStoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<GeoStoreError>>,
    backtrace: Arc<Backtrace>,
}

impl GeoStoreError {
    /// Creates a new `GeoStoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        GeoStoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `GeoStoreError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: GeoStoreError) -> Self {
        GeoStoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&GeoStoreError> {
        self.cause.as_deref()
    }
}

impl Display for GeoStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for GeoStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for GeoStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for GeoStore operations.
pub type GeoStoreResult<T> = Result<T, GeoStoreError>;

// From trait implementations for automatic error conversion
impl From<std::io::Error> for GeoStoreError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        GeoStoreError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<tempfile::PersistError> for GeoStoreError {
    fn from(err: tempfile::PersistError) -> Self {
        GeoStoreError::from(err.error)
    }
}

impl From<serde_json::Error> for GeoStoreError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Io => GeoStoreError::new(&format!("IO error: {}", err), ErrorKind::IOError),
            Category::Data => GeoStoreError::new(
                &format!("Document validation failed: {}", err),
                ErrorKind::ValidationError,
            ),
            Category::Syntax | Category::Eof => GeoStoreError::new(
                &format!("Malformed document: {}", err),
                ErrorKind::EncodingError,
            ),
        }
    }
}

impl From<SpatialError> for GeoStoreError {
    fn from(err: SpatialError) -> Self {
        match err {
            SpatialError::Serialization(msg) => GeoStoreError::new(&msg, ErrorKind::EncodingError),
            other => GeoStoreError::new(&other.to_string(), ErrorKind::ValidationError),
        }
    }
}

impl From<String> for GeoStoreError {
    fn from(msg: String) -> Self {
        GeoStoreError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for GeoStoreError {
    fn from(msg: &str) -> Self {
        GeoStoreError::new(msg, ErrorKind::InternalError)
    }
}
