//! Cooperative cancellation for long parses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polled by the assembler once per physical line.
pub trait CancellationSignal {
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancellationSignal for Never {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancellationSignal for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancellationSignal + ?Sized> CancellationSignal for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: CancellationSignal + ?Sized> CancellationSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
