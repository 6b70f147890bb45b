//! Helpers for tests that touch the address space directly.

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};

#[cfg(target_os = "linux")]
use crate::allocator::page_size;

#[derive(Debug, PartialEq, Eq)]
pub enum Exit {
    Code(i32),
    Signal(i32),
}

/// Runs `f` in a forked child, so deliberate faults and address space checks cannot
/// disturb the rest of the test binary.
pub fn in_child<F: FnOnce() -> i32>(f: F) -> Exit {
    unsafe {
        match libc::fork() {
            -1 => panic!("fork failed: {}", io::Error::last_os_error()),
            0 => {
                let no_core = libc::rlimit {
                    rlim_cur: 0,
                    rlim_max: 0,
                };
                libc::setrlimit(libc::RLIMIT_CORE, &no_core);
                let code = catch_unwind(AssertUnwindSafe(f)).unwrap_or(101);
                libc::_exit(code)
            }
            pid => {
                let mut status = 0;
                assert_eq!(libc::waitpid(pid, &mut status, 0), pid);
                if libc::WIFSIGNALED(status) {
                    Exit::Signal(libc::WTERMSIG(status))
                } else {
                    Exit::Code(libc::WEXITSTATUS(status))
                }
            }
        }
    }
}

pub fn is_access_violation(exit: &Exit) -> bool {
    matches!(exit, Exit::Signal(libc::SIGSEGV) | Exit::Signal(libc::SIGBUS))
}

/// Whether every page in `[addr, addr + len)` is mapped.
#[cfg(target_os = "linux")]
pub fn is_mapped(addr: *mut u8, len: usize) -> bool {
    let mut residency = [0u8; 64];
    assert!(len / page_size() <= residency.len());
    let ret = unsafe { libc::mincore(addr as *mut libc::c_void, len, residency.as_mut_ptr()) };
    ret == 0
}

/// Whether any page in `[addr, addr + len)` is still mapped.
#[cfg(target_os = "linux")]
pub fn any_page_mapped(addr: *mut u8, len: usize) -> bool {
    let page = page_size();
    (0..len)
        .step_by(page)
        .any(|offset| is_mapped(addr.wrapping_add(offset), page))
}
