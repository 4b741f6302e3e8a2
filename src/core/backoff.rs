//! Retry policy dan exponential backoff untuk push/pop.
//!
//! Backoff hanya untuk mengurangi busy-spin saat buffer penuh/kosong,
//! bukan mekanisme correctness. Dengan `RetryPolicy::spin` algoritma
//! berjalan sebagai spin-retry murni.

use std::time::Duration;

use super::sync;

/// Default jumlah attempt per panggilan push/pop
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default delay awal backoff
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_micros(1);
/// Default batas atas backoff
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_micros(32);

/// Konfigurasi retry untuk operasi push/pop yang bounded.
///
/// Attempt pertama tidak pernah didahului sleep. Setelah attempt ke-k gagal
/// (dan masih ada sisa budget), thread tidur `min_backoff * 2^(k-1)`,
/// dibatasi `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Jumlah attempt maksimum. Nilai 0 diperlakukan sebagai 1.
    pub max_attempts: u32,
    /// Delay setelah attempt pertama gagal
    pub min_backoff: Duration,
    /// Cap untuk delay yang terus di-double
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Policy spin murni: tidak ada sleep di antara attempt.
    pub const fn spin(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Ganti jumlah attempt, backoff tetap.
    pub const fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Ganti jadwal backoff. `min` di-clamp ke `max`.
    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = min.min(max);
        self.max_backoff = max;
        self
    }

    /// State backoff baru untuk satu panggilan push/pop.
    #[inline(always)]
    pub(crate) fn backoff(&self) -> Backoff {
        Backoff::new(self.min_backoff, self.max_backoff)
    }
}

/// State backoff per panggilan. Dibuat ulang di setiap push/pop.
#[derive(Debug)]
pub(crate) struct Backoff {
    delay: Duration,
    max: Duration,
}

impl Backoff {
    fn new(min: Duration, max: Duration) -> Self {
        Self {
            delay: min.min(max),
            max,
        }
    }

    /// Delay yang akan dipakai oleh `snooze` berikutnya
    #[cfg(test)]
    pub(crate) fn current(&self) -> Duration {
        self.delay
    }

    /// Tidur selama delay saat ini lalu double-kan (dengan cap).
    #[inline]
    pub(crate) fn snooze(&mut self) {
        sync::pause(self.delay);
        self.advance();
    }

    #[inline(always)]
    fn advance(&mut self) {
        self.delay = self
            .delay
            .checked_mul(2)
            .map_or(self.max, |next| next.min(self.max));
    }
}
