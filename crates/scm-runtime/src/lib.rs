//! Native runtime support for compiled scheme code: the tagged word format shared with the
//! code generator, and the guarded stack the generated code runs on.

pub mod allocator;
pub mod entry;
pub mod error;
pub mod image;
pub mod tag;
#[cfg(test)]
mod testing;
pub mod value;

pub use allocator::{GuardedStack, DEFAULT_STACK_SIZE};
pub use entry::{EntryFn, EntryPoint, NativeEntry};
pub use error::{DecodeError, EncodeError, Guard, ImageError, RenderError, StackError};
pub use image::CodeImage;
pub use value::{decode_and_render, print_value, Immediate, Value};

