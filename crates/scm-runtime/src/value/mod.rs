//! This module describes the values that compiled code hands back to the runtime. [Value]
//! is the raw machine word; [Value::classify] turns it into an [Immediate] the rust side
//! can inspect and print. The bit layout lives in [crate::tag].

use std::io::Write;

use crate::error::{DecodeError, RenderError};
use crate::tag::*;

pub use self::immediate::*;
pub use self::tagged::Tagged;

pub mod display;
pub mod immediate;
pub mod tagged;

/// An encoded word exactly as compiled code produces it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Value(pub u64);

impl Value {
    #[inline]
    pub fn new(word: u64) -> Self {
        Self(word)
    }

    #[inline]
    pub fn word(self) -> u64 {
        self.0
    }

    /// Decodes the word, first match wins. The fixnum check only looks at two bits so it
    /// goes first; the sentinels are compared whole before the char mask is tried.
    pub fn classify(self) -> Result<Immediate, DecodeError> {
        let word = self.0;

        if word & FXMASK == FXTAG {
            return Fixnum::untag(self).map(Immediate::Fixnum);
        }

        match word {
            BOOL_F => Ok(Immediate::Bool(Bool::False)),
            BOOL_T => Ok(Immediate::Bool(Bool::True)),
            NULL => Ok(Immediate::Nil),
            _ if word & CHARMASK == CHARTAG => Char::untag(self).map(Immediate::Char),
            _ => Err(DecodeError::UnknownTag(word)),
        }
    }
}

impl From<u64> for Value {
    fn from(word: u64) -> Self {
        Value(word)
    }
}

impl TryFrom<Value> for Immediate {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.classify()
    }
}

/// Renders the external representation of `word`, without a trailing newline.
pub fn decode_and_render(word: u64) -> Result<String, DecodeError> {
    Value(word).classify().map(|immediate| immediate.to_string())
}

/// Writes the external representation of `word` followed by a single newline. A word that
/// does not decode writes nothing.
pub fn print_value<W: Write>(out: &mut W, word: u64) -> Result<(), RenderError> {
    let rendered = decode_and_render(word)?;
    writeln!(out, "{rendered}")?;
    out.flush()?;
    Ok(())
}
