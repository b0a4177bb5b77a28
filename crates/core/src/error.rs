// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fotoexpres_domain::DomainError;

/// Errors that can occur while assembling an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A photo specification references a file that was never uploaded.
    MissingUpload {
        /// The declared file name.
        file_name: String,
    },
    /// The archive library reported an error.
    Archive(String),
    /// Reading a staged upload or writing archive output failed.
    Io {
        /// What was being done when the error occurred.
        context: String,
        /// The underlying error message.
        message: String,
    },
}

impl CoreError {
    /// Returns whether the error was caused by the caller's input.
    ///
    /// Client errors are rejections; everything else is a storage failure
    /// that may succeed when retried.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::DomainViolation(_) | Self::MissingUpload { .. })
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::MissingUpload { file_name } => {
                write!(f, "Photo '{file_name}' was not uploaded")
            }
            Self::Archive(message) => write!(f, "Archive error: {message}"),
            Self::Io { context, message } => write!(f, "I/O error while {context}: {message}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<zip::result::ZipError> for CoreError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}
