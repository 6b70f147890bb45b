//! Glue between the pieces: acquire a stack, enter the compiled code, print what it
//! returned, release the stack.

use std::io::{self, Write};

use log::{debug, warn};
use scm_runtime::entry::enter;
use scm_runtime::{
    print_value, CodeImage, DecodeError, EntryPoint, GuardedStack, ImageError, RenderError,
    StackError,
};

use crate::cli::Command;

#[derive(thiserror::Error, miette::Diagnostic, Debug)]
pub enum DriverError {
    #[error("cannot load the code image")]
    #[diagnostic(code(scm::image))]
    Image(#[source] ImageError),

    #[error("cannot reserve the stack")]
    #[diagnostic(code(scm::stack::reserve), help("try a smaller --stack-size"))]
    Reserve(#[source] StackError),

    #[error("cannot install the stack guard pages")]
    #[diagnostic(code(scm::stack::guard))]
    Protect(#[source] StackError),

    #[error("cannot release the stack")]
    #[diagnostic(code(scm::stack::release))]
    Release(#[source] StackError),

    #[error("the returned value cannot be decoded")]
    #[diagnostic(code(scm::decode))]
    Decode(#[source] DecodeError),

    #[error("cannot write the result")]
    #[diagnostic(code(scm::io))]
    Output(#[source] io::Error),
}

impl DriverError {
    /// Process exit status for this failure; each stack step has its own. `2` is left to
    /// clap for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Image(_) | DriverError::Output(_) => 1,
            DriverError::Reserve(_) => 3,
            DriverError::Protect(_) => 4,
            DriverError::Release(_) => 5,
            DriverError::Decode(_) => 6,
        }
    }
}

impl From<StackError> for DriverError {
    fn from(err: StackError) -> Self {
        match err {
            StackError::InvalidSize(_) | StackError::Allocation { .. } => DriverError::Reserve(err),
            StackError::Protection { .. } => DriverError::Protect(err),
            StackError::Release { .. } => DriverError::Release(err),
        }
    }
}

impl From<RenderError> for DriverError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Decode(err) => DriverError::Decode(err),
            RenderError::Io(err) => DriverError::Output(err),
        }
    }
}

/// Runs `entry` on a fresh guarded stack of `stack_size` bytes and prints the value it
/// returns to `out`. Nothing is entered if the stack cannot be set up, and the stack is
/// released whether or not the value decodes.
pub fn run<E, W>(entry: &E, stack_size: usize, out: &mut W) -> Result<(), DriverError>
where
    E: EntryPoint + ?Sized,
    W: Write,
{
    let mut stack = GuardedStack::acquire(stack_size)?;
    debug!("entering compiled code with stack base {:p}", stack.base());

    let value = unsafe { enter(entry, &mut stack) };
    debug!("compiled code returned {value:?}");

    let printed = print_value(out, value.word());
    let released = stack.release();

    if let (Err(_), Err(err)) = (&printed, &released) {
        warn!("{err}");
    }

    printed?;
    released?;
    Ok(())
}

/// Executes one command line invocation, writing the result line to `out`.
pub fn execute<W: Write>(command: Command, out: &mut W) -> Result<(), DriverError> {
    match command {
        Command::Run { image, stack_size } => {
            let image = CodeImage::open(&image).map_err(DriverError::Image)?;
            run(&image, stack_size, out)
        }
        Command::Decode { word } => Ok(print_value(out, word)?),
    }
}
