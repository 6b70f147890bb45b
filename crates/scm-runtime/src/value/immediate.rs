use crate::error::EncodeError;
use crate::tag::{FXLOWER, FXUPPER, NAMED_CHARS};

/// The 62 bit signed integer that compiled code uses for arithmetic.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub struct Fixnum(pub(crate) i64);

/// A character, stored as its unicode scalar value.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub struct Char(pub(crate) char);

/// A simple boolean.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub enum Bool {
    False,
    True,
}

/// The empty list.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub struct Nil;

/// A decoded word, easier to work with on the rust side than the raw bits.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub enum Immediate {
    Fixnum(Fixnum),
    Bool(Bool),
    Nil,
    Char(Char),
}

impl Fixnum {
    pub fn new(num: i64) -> Result<Self, EncodeError> {
        if (FXLOWER..=FXUPPER).contains(&num) {
            Ok(Self(num))
        } else {
            Err(EncodeError::FixnumOutOfRange(num))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Char {
    pub fn new(char: char) -> Char {
        Char(char)
    }

    pub fn get(self) -> char {
        self.0
    }

    /// The name this character prints with, if it has one (`tab`, `newline`, ...).
    pub fn name(self) -> Option<&'static str> {
        let code = self.0 as u32;
        NAMED_CHARS
            .iter()
            .find(|(named, _)| *named == code)
            .map(|(_, name)| *name)
    }
}

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        if value {
            Bool::True
        } else {
            Bool::False
        }
    }
}

impl From<Bool> for bool {
    fn from(value: Bool) -> Self {
        value == Bool::True
    }
}

impl From<char> for Char {
    fn from(value: char) -> Self {
        Char(value)
    }
}
