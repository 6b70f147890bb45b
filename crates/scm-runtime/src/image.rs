//! Flat machine code images. The compiler can emit a raw blob of position independent code
//! whose first byte is the entry point; [CodeImage] maps it executable and calls into it.

use std::io;
use std::path::Path;
use std::ptr::{self, NonNull};

use log::{debug, warn};

use crate::allocator::page_size;
use crate::entry::{EntryFn, EntryPoint};
use crate::error::ImageError;
use crate::value::Value;

pub struct CodeImage {
    code: NonNull<u8>,
    mapped: usize,
    size: usize,
}

#[allow(clippy::len_without_is_empty)]
impl CodeImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!("read {} byte code image from {}", bytes.len(), path.as_ref().display());
        Self::load(&bytes)
    }

    /// Copies `bytes` into a fresh mapping and makes it read+execute. The mapping is never
    /// writable and executable at the same time.
    pub fn load(bytes: &[u8]) -> Result<Self, ImageError> {
        Self::load_with(bytes, make_executable)
    }

    fn load_with<P>(bytes: &[u8], make_executable: P) -> Result<Self, ImageError>
    where
        P: Fn(*mut libc::c_void, usize) -> io::Result<()>,
    {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let mapped = bytes.len().next_multiple_of(page_size());

        let code = unsafe {
            libc::mmap(
                ptr::null_mut(),
                mapped,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if code == libc::MAP_FAILED {
            return Err(ImageError::Map {
                size: mapped,
                source: io::Error::last_os_error(),
            });
        }

        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), code as *mut u8, bytes.len()) };

        if let Err(err) = make_executable(code, mapped) {
            if unsafe { libc::munmap(code, mapped) } != 0 {
                warn!(
                    "leaking {mapped} byte code image mapping after a failed protect: {}",
                    io::Error::last_os_error()
                );
            }
            return Err(ImageError::Protect(err));
        }

        debug!("mapped {} byte code image at {code:p}", bytes.len());

        Ok(Self {
            code: unsafe { NonNull::new_unchecked(code as *mut u8) },
            mapped,
            size: bytes.len(),
        })
    }

    /// Size of the image itself, without the page padding.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn entry(&self) -> EntryFn {
        unsafe { std::mem::transmute::<*mut u8, EntryFn>(self.code.as_ptr()) }
    }
}

fn make_executable(code: *mut libc::c_void, len: usize) -> io::Result<()> {
    if unsafe { libc::mprotect(code, len, libc::PROT_READ | libc::PROT_EXEC) } != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

impl EntryPoint for CodeImage {
    unsafe fn invoke(&self, stack_base: *mut u8) -> Value {
        Value((self.entry())(stack_base))
    }
}

impl Drop for CodeImage {
    fn drop(&mut self) {
        let code = self.code.as_ptr() as *mut libc::c_void;
        if unsafe { libc::munmap(code, self.mapped) } != 0 {
            warn!(
                "cannot unmap code image at {code:p}: {}",
                io::Error::last_os_error()
            );
        }
    }
}
