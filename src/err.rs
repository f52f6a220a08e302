use crate::mems::MapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevmemError {
    #[error("Usage requested")]
    Usage,

    #[error("argument count exceeded: {count} arguments (max {max})")]
    TooManyArguments { count: usize, max: usize },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Map(#[from] MapError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("General error: {0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Malformed numeric literal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("negative values are not allowed")]
    Negative,

    #[error("not a valid number")]
    Malformed,
}

/// Errors detected before any register is touched.
///
/// Positions are 1-based indices into the argument list as typed on the
/// command line (the program name is position 0).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("argument# {position} -> {token}: command must be a single character")]
    BadOpcode { position: usize, token: String },

    #[error("argument# {position} -> {token}: unknown command")]
    UnknownOpcode { position: usize, token: String },

    #[error("argument# {position} -> {opcode}: incomplete command")]
    IncompleteCommand { position: usize, opcode: char },

    #[error("argument# {argument_index} -> {token}: {source}")]
    InvalidOperand {
        argument_index: usize,
        token: String,
        source: ParseError,
    },
}

impl ValidationError {
    pub fn invalid_operand(
        argument_index: usize,
        token: impl Into<String>,
        source: ParseError,
    ) -> Self {
        Self::InvalidOperand {
            argument_index,
            token: token.into(),
            source,
        }
    }

    /// Position of the offending argument.
    pub fn position(&self) -> usize {
        match self {
            Self::BadOpcode { position, .. }
            | Self::UnknownOpcode { position, .. }
            | Self::IncompleteCommand { position, .. } => *position,
            Self::InvalidOperand { argument_index, .. } => *argument_index,
        }
    }
}
