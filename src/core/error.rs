//! Error untuk operasi ring buffer.
//!
//! Keduanya kondisi normal yang bisa di-recover: caller boleh retry,
//! drop, atau memberi backpressure ke upstream.

use std::fmt;

use thiserror::Error;

/// Push gagal karena buffer tetap penuh sampai budget attempt habis.
///
/// Item yang ditolak dikembalikan utuh ke caller, tidak pernah di-drop.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("ring buffer is full")]
pub struct BufferFull<T>(pub T);

impl<T> BufferFull<T> {
    /// Ambil kembali item yang gagal di-push.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Manual supaya `T` tidak wajib `Debug`.
impl<T> fmt::Debug for BufferFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BufferFull(..)")
    }
}

/// Pop/peek gagal karena buffer kosong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ring buffer is empty")]
pub struct BufferEmpty;
