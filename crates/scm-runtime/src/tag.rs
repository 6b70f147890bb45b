//! Bit patterns shared between the code generator and the runtime. Every immediate that
//! compiled code hands back is a single machine word laid out like this:
//!
//! ```text
//!            Masks        Tags
//! fixnum:  | 00000011 |  00000000
//! char:    | 00111111 |  00001111
//! bool:    | 10111111 |  00101111
//!
//! #f       | 00101111 |
//! #t       | 01101111 |
//! ()       | 00111111 |
//! ```
//!
//! Nothing else in the crate spells these numbers out.

/// Size of an encoded word, in bytes.
pub const WORDSIZE: usize = 8;

pub const FXSHIFT: u32 = 2;
pub const FXMASK: u64 = 0x03;
pub const FXTAG: u64 = 0x00;

/// Bits left for a fixnum payload once the tag is in place.
pub const FIXNUM_BITS: u32 = (WORDSIZE as u32) * 8 - FXSHIFT;
pub const FXLOWER: i64 = -(1 << (FIXNUM_BITS - 1));
pub const FXUPPER: i64 = (1 << (FIXNUM_BITS - 1)) - 1;

pub const CHARSHIFT: u32 = 8;
pub const CHARMASK: u64 = 0x3F;
pub const CHARTAG: u64 = 0x0F;

pub const BOOL_F: u64 = 0x2F;
pub const BOOL_T: u64 = 0x6F;
pub const BOOL_BIT: u32 = 6;
/// `BOOL_MASK & x == BOOL_F` for both booleans and for nothing else among the sentinels.
pub const BOOL_MASK: u64 = 0xBF;

pub const NULL: u64 = 0x3F;

/// Character codes that print with a name instead of the glyph itself.
pub const CHAR_TAB: u32 = 9;
pub const CHAR_NEWLINE: u32 = 10;
pub const CHAR_VT: u32 = 11;
pub const CHAR_FF: u32 = 12;
pub const CHAR_RETURN: u32 = 13;
pub const CHAR_SPACE: u32 = 32;

pub const NAMED_CHARS: [(u32, &str); 6] = [
    (CHAR_TAB, "tab"),
    (CHAR_NEWLINE, "newline"),
    (CHAR_VT, "vt"),
    (CHAR_FF, "ff"),
    (CHAR_RETURN, "return"),
    (CHAR_SPACE, "space"),
];
