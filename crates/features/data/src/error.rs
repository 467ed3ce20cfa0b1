use std::borrow::Cow;

/// Errors reported by the data registry.
///
/// Malformed records surface as [`DataError::InvalidData`] from builders; every other
/// variant points at a programming mistake on the caller's side.
#[sponge_derive::sponge_error]
pub enum DataError {
    /// The call itself is meaningless (same-version or backwards update request).
    #[error("Invalid usage{}: {message}", format_context(.context))]
    InvalidUsage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A write-once slot was already taken.
    #[error("Duplicate registration{}: {message}", format_context(.context))]
    DuplicateRegistration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A builder or translator was requested with a different output type than it produces.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The record cannot be turned into the requested value.
    #[error("Invalid data{}: {message}", format_context(.context))]
    InvalidData { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A step of an update chain rejected the record.
    #[error("Content update failed{}: {message}", format_context(.context))]
    UpdateFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal data error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DataError {
    /// Shorthand used by builders for malformed input.
    pub fn invalid_data(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidData { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData { .. })
    }
}
