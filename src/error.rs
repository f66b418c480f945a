//! Error types.
//!
//! Two layers, matching how errors actually travel:
//!
//! - [`CoreError`]: typed, recoverable failures from the loaders and the
//!   synthesis engine. Per-line parse failures never reach this level; they
//!   are collected as warnings next to the valid subset.
//! - [`AppError`]: the binary boundary. Carries a process exit code and a
//!   human-readable message; everything in `app`/`cli`/`tui` converges here.

use thiserror::Error;

/// Recoverable errors from the core (ingestion + synthesis).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The catalog text had content but not a single line parsed.
    ///
    /// Individual bad lines inside an otherwise-usable catalog are reported
    /// as warnings instead, so this names the first offender.
    #[error("malformed catalog at line {line}, field {field}: {message}")]
    MalformedCatalog {
        line: usize,
        field: &'static str,
        message: String,
    },

    /// No valid (frequency, intensity) sample survived spectrum parsing.
    #[error("malformed spectrum: {message}")]
    MalformedSpectrum { message: String },

    /// A fit parameter is outside its valid range. Rejects the single
    /// synthesis call it was passed to; other molecules are unaffected.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },
}

/// Application-level error with a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        // Exit codes: 2 = bad invocation/parameters, 3 = bad input data.
        let exit_code = match err {
            CoreError::MalformedCatalog { .. } | CoreError::MalformedSpectrum { .. } => 3,
            CoreError::InvalidParameter { .. } => 2,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_maps_to_exit_codes() {
        let app: AppError = CoreError::InvalidParameter {
            name: "linewidth",
            message: "must be > 0".to_string(),
        }
        .into();
        assert_eq!(app.exit_code(), 2);

        let app: AppError = CoreError::MalformedSpectrum {
            message: "no valid samples".to_string(),
        }
        .into();
        assert_eq!(app.exit_code(), 3);
    }
}
