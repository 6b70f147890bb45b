//! The boundary with compiled code. An entry point takes the base of the stack it should run
//! on and hands back one encoded [Value].

use crate::allocator::GuardedStack;
use crate::value::Value;

/// How compiled code is entered: stack base in the first argument register, encoded result
/// in the return register (C calling convention).
pub type EntryFn = unsafe extern "C" fn(stack_base: *mut u8) -> u64;

pub trait EntryPoint {
    /// # Safety
    ///
    /// This runs foreign machine code. `stack_base` must be the highest address of a stack
    /// the code may grow down into, such as [GuardedStack::base].
    unsafe fn invoke(&self, stack_base: *mut u8) -> Value;
}

/// An entry point that is already a function in this process, either linked in or produced
/// by a JIT.
#[derive(Clone, Copy)]
pub struct NativeEntry(EntryFn);

impl NativeEntry {
    pub fn new(entry: EntryFn) -> Self {
        Self(entry)
    }
}

impl EntryPoint for NativeEntry {
    unsafe fn invoke(&self, stack_base: *mut u8) -> Value {
        Value((self.0)(stack_base))
    }
}

/// Runs `entry` on `stack`, starting from its base.
///
/// # Safety
///
/// Same as [EntryPoint::invoke]; overflowing the stack faults on a guard page and kills the
/// process.
pub unsafe fn enter<E: EntryPoint + ?Sized>(entry: &E, stack: &mut GuardedStack) -> Value {
    entry.invoke(stack.base())
}
