//! Primitive sinkronisasi yang bisa ditukar dengan versi `loom`.
//!
//! Build biasa memakai `std`. Dengan `--cfg loom`, atomics, cell, dan pause
//! diarahkan ke `loom` supaya semua interleaving bisa dieksplorasi.

use std::time::Duration;

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(loom)]
pub(crate) use loom::cell::UnsafeCell;

/// `UnsafeCell` dengan API closure yang sama seperti `loom::cell::UnsafeCell`.
#[cfg(not(loom))]
#[derive(Debug)]
pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

#[cfg(not(loom))]
impl<T> UnsafeCell<T> {
    #[inline(always)]
    pub(crate) const fn new(data: T) -> Self {
        Self(std::cell::UnsafeCell::new(data))
    }

    #[inline(always)]
    pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
        f(self.0.get())
    }

    #[inline(always)]
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
        f(self.0.get())
    }
}

/// Suspend thread pemanggil selama `delay`.
///
/// Delay nol berarti spin murni (hanya hint ke CPU).
#[cfg(not(loom))]
#[inline]
pub(crate) fn pause(delay: Duration) {
    if delay.is_zero() {
        std::hint::spin_loop();
    } else {
        std::thread::sleep(delay);
    }
}

// loom tidak mengenal waktu; setiap pause adalah titik yield.
#[cfg(loom)]
#[inline]
pub(crate) fn pause(_delay: Duration) {
    loom::thread::yield_now();
}
