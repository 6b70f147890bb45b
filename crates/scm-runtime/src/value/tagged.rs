use crate::error::DecodeError;
use crate::tag::*;

use super::*;

/// Moves a rust-side immediate in and out of its encoded word. `untag` assumes the caller
/// already checked [Tagged::is]; [Value::classify] is the checked entry point.
pub trait Tagged
where
    Self: Sized + Copy,
{
    const TAG: u64;
    const MASK: u64;

    fn tag(self) -> Value;

    fn untag(value: Value) -> Result<Self, DecodeError>;

    fn is(value: Value) -> bool {
        value.0 & Self::MASK == Self::TAG
    }
}

impl Tagged for Fixnum {
    const TAG: u64 = FXTAG;
    const MASK: u64 = FXMASK;

    fn tag(self) -> Value {
        Value(((self.0 << FXSHIFT) as u64) | Self::TAG)
    }

    fn untag(value: Value) -> Result<Self, DecodeError> {
        Ok(Fixnum((value.0 as i64) >> FXSHIFT))
    }
}

impl Tagged for Char {
    const TAG: u64 = CHARTAG;
    const MASK: u64 = CHARMASK;

    fn tag(self) -> Value {
        Value(((self.0 as u64) << CHARSHIFT) | Self::TAG)
    }

    fn untag(value: Value) -> Result<Self, DecodeError> {
        let code = value.0 >> CHARSHIFT;
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .map(Char)
            .ok_or(DecodeError::InvalidChar(code))
    }
}

impl Tagged for Bool {
    const TAG: u64 = BOOL_F;
    const MASK: u64 = BOOL_MASK;

    fn tag(self) -> Value {
        match self {
            Bool::False => Value(BOOL_F),
            Bool::True => Value(BOOL_T),
        }
    }

    fn untag(value: Value) -> Result<Self, DecodeError> {
        match value.0 {
            BOOL_F => Ok(Bool::False),
            BOOL_T => Ok(Bool::True),
            word => Err(DecodeError::UnknownTag(word)),
        }
    }

    /// The mask alone also accepts words such as `0x12F`, so booleans are compared whole.
    fn is(value: Value) -> bool {
        value.0 == BOOL_F || value.0 == BOOL_T
    }
}

impl Tagged for Nil {
    const TAG: u64 = NULL;
    const MASK: u64 = u64::MAX;

    fn tag(self) -> Value {
        Value(NULL)
    }

    fn untag(value: Value) -> Result<Self, DecodeError> {
        match value.0 {
            NULL => Ok(Nil),
            word => Err(DecodeError::UnknownTag(word)),
        }
    }
}

impl<T: Tagged> From<T> for Value {
    fn from(value: T) -> Self {
        value.tag()
    }
}

impl From<Immediate> for Value {
    fn from(value: Immediate) -> Self {
        match value {
            Immediate::Fixnum(fixnum) => fixnum.tag(),
            Immediate::Bool(bool) => bool.tag(),
            Immediate::Nil => Nil.tag(),
            Immediate::Char(char) => char.tag(),
        }
    }
}
