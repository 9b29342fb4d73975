use std::io;

use thiserror::Error;

/// Failure raised while guessing or constructing table specs.
#[derive(Error, Debug)]
pub enum GuessError {
    /// A configuration or contract violation, detected eagerly.
    #[error("{0}")]
    IllegalArgument(String),

    /// Failure of the underlying row source, passed through unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Execution canceled")]
    Canceled,
}

impl GuessError {
    pub(crate) fn illegal_argument(message: impl Into<String>) -> Self {
        GuessError::IllegalArgument(message.into())
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, GuessError::Canceled)
    }
}

pub type GuessResult<T> = Result<T, GuessError>;

/// Returns early with [`GuessError::IllegalArgument`] unless `cond` holds.
macro_rules! ensure_arg {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::GuessError::IllegalArgument(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_arg;
