//! Application-level error with a process exit code.
//!
//! Library code returns typed errors (`ParseError`, `CurveError`); they are
//! converted here at the binary boundary.

use crate::clients::SnapshotError;
use crate::curve::CurveError;

/// Input files missing, unreadable, or structurally invalid (bad JSON, bad args).
pub const EXIT_INPUT: u8 = 2;
/// An MRC line failed to parse.
pub const EXIT_PARSE: u8 = 3;
/// A ratio could not be computed (degenerate sample).
pub const EXIT_NUMERIC: u8 = 4;

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

    /// Prefix the message with where the failure happened (usually a path).
    pub fn context(self, what: impl std::fmt::Display) -> Self {
        Self {
            exit_code: self.exit_code,
            message: format!("{what}: {}", self.message),
        }
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(curve_exit_code(&err), err.to_string())
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::new(curve_exit_code(&err.source), err.to_string())
    }
}

fn curve_exit_code(err: &CurveError) -> u8 {
    match err {
        CurveError::Parse { .. } => EXIT_PARSE,
        CurveError::DegenerateSample { .. } => EXIT_NUMERIC,
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
