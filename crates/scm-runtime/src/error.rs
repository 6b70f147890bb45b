//! Definitions of errors that can occur inside the runtime.

use std::io;

use thiserror::Error;

/// Which of the two guard pages could not be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Leading,
    Trailing,
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Guard::Leading => write!(f, "leading"),
            Guard::Trailing => write!(f, "trailing"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StackError {
    #[error("stack size must be a positive number of bytes that fits in the address space, got {0}")]
    InvalidSize(usize),

    #[error("cannot reserve {size} bytes for the stack: {source}")]
    Allocation { size: usize, source: io::Error },

    #[error("cannot install the {guard} guard page: {source}")]
    Protection { guard: Guard, source: io::Error },

    #[error("cannot release the {size} byte stack reservation: {source}")]
    Release { size: usize, source: io::Error },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("word {0:#x} does not carry a known tag")]
    UnknownTag(u64),

    #[error("character code {0:#x} is not a unicode scalar value")]
    InvalidChar(u64),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{0} does not fit in a fixnum")]
    FixnumOutOfRange(i64),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cannot write the rendered value: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("code image is empty")]
    Empty,

    #[error("cannot read code image: {0}")]
    Io(#[from] io::Error),

    #[error("cannot map {size} bytes for the code image: {source}")]
    Map { size: usize, source: io::Error },

    #[error("cannot make the code image executable: {0}")]
    Protect(io::Error),
}

pub type Result<T, E = StackError> = std::result::Result<T, E>;
