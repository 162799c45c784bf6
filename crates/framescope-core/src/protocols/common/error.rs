use thiserror::Error;

/// Reasons a header value cannot be rendered.
///
/// The message is what a renderer shows in place of the value, so it reads as
/// an explanation rather than as a diagnostic.
///
/// # Examples
/// ```
/// use framescope_core::protocols::FieldError;
///
/// let err = FieldError::Absent { field: "Pointer" };
/// assert_eq!(err.to_string(), "Pointer not present");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{reason}")]
    Unsupported { field: &'static str, reason: String },
    #[error("{field} not present")]
    Absent { field: &'static str },
}
