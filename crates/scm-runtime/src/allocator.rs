// This module hands out the stack that compiled code runs on. Each stack is a single anonymous
// mapping: one inaccessible guard page, the usable region rounded up to whole pages, and
// another inaccessible guard page. Running off either end of the usable region faults in
// hardware, and that fault is left to the operating system.
//
//   reservation                top                 top + aligned
//   |  guard (PROT_NONE)  |  usable (READ|WRITE)  |  guard (PROT_NONE)  |
//
// Only this module knows where the reservation starts.

use std::io;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};

use log::{debug, warn};

use crate::error::{Guard, Result, StackError};

/// Stack size used when the caller does not ask for one.
pub const DEFAULT_STACK_SIZE: usize = 1024 * 1024;

/// The platform page size, queried on every call.
pub fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

/// Sizes derived from a requested stack size and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub page: usize,
    pub aligned: usize,
}

impl Extent {
    pub fn new(requested: usize, page: usize) -> Result<Self> {
        if requested == 0 {
            return Err(StackError::InvalidSize(requested));
        }

        let aligned = requested
            .checked_next_multiple_of(page)
            .ok_or(StackError::InvalidSize(requested))?;

        let extent = Extent { page, aligned };
        extent.checked_total().ok_or(StackError::InvalidSize(requested))?;
        Ok(extent)
    }

    fn checked_total(&self) -> Option<usize> {
        self.aligned.checked_add(self.page.checked_mul(2)?)
    }

    /// Guard pages included.
    pub fn total(&self) -> usize {
        self.aligned + 2 * self.page
    }
}

fn protect(addr: *mut u8, len: usize, guard: Guard) -> Result<()> {
    if unsafe { libc::mprotect(addr as *mut libc::c_void, len, libc::PROT_NONE) } != 0 {
        return Err(StackError::Protection {
            guard,
            source: io::Error::last_os_error(),
        });
    }

    Ok(())
}

/// Reserves a guarded region with at least `requested` usable bytes and returns the lowest
/// usable address. Pair it with exactly one [release_raw] using the same `requested`.
pub fn acquire_raw(requested: usize) -> Result<NonNull<u8>> {
    acquire_with(requested, protect)
}

fn acquire_with<P>(requested: usize, protect: P) -> Result<NonNull<u8>>
where
    P: Fn(*mut u8, usize, Guard) -> Result<()>,
{
    let extent = Extent::new(requested, page_size())?;
    let total = extent.total();

    let reservation = unsafe {
        libc::mmap(
            ptr::null_mut(),
            total,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };

    if reservation == libc::MAP_FAILED {
        return Err(StackError::Allocation {
            size: total,
            source: io::Error::last_os_error(),
        });
    }

    let reservation = reservation as *mut u8;
    let trailing = unsafe { reservation.add(extent.page + extent.aligned) };

    let guarded = protect(reservation, extent.page, Guard::Leading)
        .and_then(|()| protect(trailing, extent.page, Guard::Trailing));

    if let Err(err) = guarded {
        if unsafe { libc::munmap(reservation as *mut libc::c_void, total) } != 0 {
            warn!(
                "leaking {total} byte stack reservation after a failed guard install: {}",
                io::Error::last_os_error()
            );
        }
        return Err(err);
    }

    debug!(
        "reserved {total} bytes at {reservation:p} for a {requested} byte stack ({} usable)",
        extent.aligned
    );

    Ok(unsafe { NonNull::new_unchecked(reservation.add(extent.page)) })
}

/// Unmaps the whole reservation behind `usable`, guard pages included.
///
/// # Safety
///
/// `usable` must come from [acquire_raw] and `requested` must be the size passed to it. A
/// different size unmaps the wrong extent: part of the reservation stays mapped, or memory
/// past it is unmapped. Nothing may touch the region afterwards.
pub unsafe fn release_raw(usable: NonNull<u8>, requested: usize) -> Result<()> {
    let extent = Extent::new(requested, page_size())?;
    let total = extent.total();
    let reservation = usable.as_ptr().wrapping_sub(extent.page);

    if libc::munmap(reservation as *mut libc::c_void, total) != 0 {
        return Err(StackError::Release {
            size: total,
            source: io::Error::last_os_error(),
        });
    }

    debug!("released {total} bytes at {reservation:p}");
    Ok(())
}

/// An owned guarded stack. It remembers the size it was acquired with, so releasing it
/// always unmaps the right extent; dropping it releases it too.
pub struct GuardedStack {
    top: NonNull<u8>,
    size: usize,
    aligned: usize,
}

// The mapping is owned by the handle alone.
unsafe impl Send for GuardedStack {}

#[allow(clippy::len_without_is_empty)]
impl GuardedStack {
    pub fn acquire(size: usize) -> Result<Self> {
        let aligned = Extent::new(size, page_size())?.aligned;
        let top = acquire_raw(size)?;
        Ok(Self { top, size, aligned })
    }

    /// Lowest usable address, right above the leading guard page.
    pub fn top(&self) -> *mut u8 {
        self.top.as_ptr()
    }

    /// The initial stack pointer: `top() + len()`. The stack grows down from here.
    pub fn base(&self) -> *mut u8 {
        unsafe { self.top.as_ptr().add(self.size) }
    }

    /// The size the stack was acquired with.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Usable bytes once rounded up to whole pages; the trailing guard starts here.
    pub fn capacity(&self) -> usize {
        self.aligned
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.top.as_ptr(), self.size) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.top.as_ptr(), self.size) }
    }

    /// Releases the stack, reporting a failed unmap instead of only logging it.
    pub fn release(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        unsafe { release_raw(this.top, this.size) }
    }
}

impl Drop for GuardedStack {
    fn drop(&mut self) {
        if let Err(err) = unsafe { release_raw(self.top, self.size) } {
            warn!("{err}");
        }
    }
}

impl std::fmt::Debug for GuardedStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedStack")
            .field("top", &self.top)
            .field("size", &self.size)
            .field("aligned", &self.aligned)
            .finish()
    }
}
