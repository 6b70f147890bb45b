use std::fmt::{Debug, Display};

use super::*;

impl Display for Fixnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Char {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "#\\{name}"),
            None => write!(f, "#\\{}", self.0),
        }
    }
}

impl Display for Bool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bool::True => write!(f, "#t"),
            Bool::False => write!(f, "#f"),
        }
    }
}

impl Display for Nil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "()")
    }
}

impl Display for Immediate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Immediate::Fixnum(fixnum) => write!(f, "{fixnum}"),
            Immediate::Bool(bool) => write!(f, "{bool}"),
            Immediate::Nil => write!(f, "{}", Nil),
            Immediate::Char(char) => write!(f, "{char}"),
        }
    }
}

/// Shows the raw word next to what it decodes to, the way a debugger would print it.
impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.classify() {
            Ok(immediate) => write!(f, "Value({:#x} = {immediate})", self.0),
            Err(_) => write!(f, "Value({:#x})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_shows_word_and_rendering() {
        assert_eq!(format!("{:?}", Value::from(Bool::True)), "Value(0x6f = #t)");
        assert_eq!(format!("{:?}", Value::new(0x07)), "Value(0x7)");
    }

    #[test]
    fn test_nil_display() {
        assert_eq!(Nil.to_string(), "()");
        assert_eq!(Immediate::Nil.to_string(), "()");
    }
}
