use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("{which} sequence is empty")]
    EmptySequence { which: &'static str },

    #[error("invalid scoring parameters: {msg}")]
    InvalidScoring { msg: String },

    #[error("similarity matrix format error at line {line}: {msg}")]
    MatrixFormat { msg: String, line: usize },

    #[error("dynamic programming matrix of {rows} x {cols} cells exceeds addressable memory")]
    MatrixTooLarge { rows: usize, cols: usize },

    #[error("score bound {bound} for sequences of length {len} exceeds the safe range")]
    ScoreOverflowRisk { bound: i64, len: usize },

    /// A traceback cell held a source code the fill sweep never writes.
    #[error("traceback found invalid source code {code:#04x} at cell ({row}, {col})")]
    TracebackBadSource { code: u8, row: usize, col: usize },
}

impl BioError {
    /// True for engine invariant violations, as opposed to rejected input.
    pub fn is_internal(&self) -> bool {
        matches!(self, BioError::TracebackBadSource { .. })
    }
}

pub type BioResult<T> = Result<T, BioError>;
