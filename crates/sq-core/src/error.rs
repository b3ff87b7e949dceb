use crate::family::Family;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    SyntaxError,
    FamilyMismatch,
    UnsupportedOptionCombination,
    InternalCompactorFailure,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("family mismatch in fragment `{name}`: expected {expected}, got {found}")]
    FamilyMismatch {
        name: String,
        expected: Family,
        found: Family,
    },
    #[error("unsupported option combination: {0}")]
    UnsupportedOptions(String),
    #[error("compactor failure: {0}")]
    Compactor(String),
}

impl PipelineError {
    /// Build a syntax error from a byte offset into the offending text.
    pub fn syntax_at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(text, offset);
        PipelineError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Syntax { .. } => FailureKind::SyntaxError,
            PipelineError::FamilyMismatch { .. } => FailureKind::FamilyMismatch,
            PipelineError::UnsupportedOptions(_) => FailureKind::UnsupportedOptionCombination,
            PipelineError::Compactor(_) => FailureKind::InternalCompactorFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// 1-based line/column of a byte offset. Offsets past the end land on the
/// position just after the last character.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(text.len());
    let mut line = 1;
    let mut col = 1;
    for (i, c) in text.char_indices() {
        if i >= clamped {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
