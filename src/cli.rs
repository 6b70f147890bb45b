use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scm_runtime::DEFAULT_STACK_SIZE;

/// Runs machine code produced by the scheme compiler and prints the value it returns.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs a flat machine code image on a guarded stack and prints its result.
    ///
    /// The compiler's calls and jumps are all PC-relative, so the text section of its object
    /// output is a valid image once `scheme_entry` comes first in it:
    /// `objcopy -O binary -j .text program.o program.bin`.
    Run {
        /// File holding the code; its first byte is the entry point.
        image: PathBuf,

        /// Usable stack size in bytes, rounded up to whole pages.
        #[arg(short, long, default_value_t = DEFAULT_STACK_SIZE, value_parser = parse_size)]
        stack_size: usize,
    },

    /// Decodes one encoded word, written in decimal or 0x-prefixed hex.
    Decode {
        #[arg(value_parser = parse_word)]
        word: u64,
    },
}

fn parse_number(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };

    parsed.map_err(|err| format!("'{text}' is not a number: {err}"))
}

fn parse_word(text: &str) -> Result<u64, String> {
    parse_number(text)
}

fn parse_size(text: &str) -> Result<usize, String> {
    let size = parse_number(text)?;
    match usize::try_from(size) {
        Ok(0) => Err("stack size must be positive".to_string()),
        Ok(size) => Ok(size),
        Err(_) => Err(format!("stack size {size} does not fit in the address space")),
    }
}
