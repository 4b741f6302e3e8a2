//! Producer/Consumer handle untuk pemakaian lintas thread.
//!
//! `RingBuffer::split` memindahkan buffer ke `Arc` bersama. Producer memiliki
//! write cursor, Consumer memiliki read cursor. Operasi yang memutasi butuh
//! `&mut self` dan kedua handle tidak bisa di-clone, jadi precondition
//! single-producer/single-consumer dijamin oleh type system.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::error::{BufferEmpty, BufferFull};
use super::ring_buffer::RingBuffer;
use crate::trace::debug;

/// Buffer yang dibagi oleh tepat satu Producer dan satu Consumer.
struct Shared<T, const N: usize> {
    ring: RingBuffer<T, N>,
}

// SAFETY: akses ke slot diatur protokol cursor. Producer hanya menulis slot
// Vacant, Consumer hanya membaca slot Occupied, dan masing-masing handle
// unik (tidak Clone, mutasi lewat &mut self).
unsafe impl<T: Send, const N: usize> Send for Shared<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for Shared<T, N> {}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Pecah buffer menjadi sisi producer dan consumer.
    ///
    /// Elemen yang sudah ada di buffer tetap ada dan bisa di-pop Consumer.
    ///
    /// ```
    /// use spsc_ring::RingBuffer;
    ///
    /// let (mut tx, mut rx) = RingBuffer::<u64, 1024>::new().split();
    /// let handle = std::thread::spawn(move || {
    ///     for i in 0..10 {
    ///         let mut item = i;
    ///         while let Err(full) = tx.push(item) {
    ///             item = full.into_inner();
    ///         }
    ///     }
    /// });
    /// handle.join().unwrap();
    /// for i in 0..10 {
    ///     assert_eq!(rx.pop(), Ok(i));
    /// }
    /// ```
    pub fn split(self) -> (Producer<T, N>, Consumer<T, N>) {
        debug!(capacity = N, len = self.len(), "ring buffer split");

        let shared = Arc::new(Shared { ring: self });
        (
            Producer {
                shared: Arc::clone(&shared),
            },
            Consumer {
                shared,
                _not_sync: PhantomData,
            },
        )
    }
}

/// Sisi producer dari ring buffer yang sudah di-split.
///
/// `Send` tapi tidak `Clone`: hanya ada satu producer.
pub struct Producer<T, const N: usize> {
    shared: Arc<Shared<T, N>>,
}

impl<T, const N: usize> Producer<T, N> {
    /// Push dengan budget attempt dari policy buffer.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), BufferFull<T>> {
        let ring = &self.shared.ring;
        // SAFETY: Producer unik dan diakses lewat &mut self
        unsafe { ring.push_raw(item, ring.policy().max_attempts) }
    }

    /// Push dengan budget attempt eksplisit.
    #[inline]
    pub fn push_with(&mut self, item: T, max_attempts: u32) -> Result<(), BufferFull<T>> {
        // SAFETY: Producer unik dan diakses lewat &mut self
        unsafe { self.shared.ring.push_raw(item, max_attempts) }
    }

    /// Satu attempt, tanpa sleep.
    #[inline]
    pub fn try_push(&mut self, item: T) -> Result<(), BufferFull<T>> {
        // SAFETY: Producer unik dan diakses lewat &mut self
        unsafe { self.shared.ring.push_raw(item, 1) }
    }

    /// Lihat [`RingBuffer::len`]. Advisory.
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.ring.len()
    }

    /// Advisory.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.ring.is_empty()
    }

    /// Advisory.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.shared.ring.is_full()
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` jika Consumer sudah di-drop; push berikutnya tidak akan dibaca.
    #[inline]
    pub fn is_abandoned(&self) -> bool {
        Arc::strong_count(&self.shared) == 1
    }
}

impl<T, const N: usize> fmt::Debug for Producer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("len", &self.len())
            .field("capacity", &N)
            .finish()
    }
}

/// Sisi consumer dari ring buffer yang sudah di-split.
///
/// `Send` tapi tidak `Sync` dan tidak `Clone`. Peek butuh `T: Clone`.
pub struct Consumer<T, const N: usize> {
    shared: Arc<Shared<T, N>>,
    // peek lewat &self tidak boleh jalan paralel dari dua thread
    _not_sync: PhantomData<Cell<()>>,
}

impl<T, const N: usize> Consumer<T, N> {
    /// Pop dengan budget attempt dari policy buffer.
    #[inline]
    pub fn pop(&mut self) -> Result<T, BufferEmpty> {
        let ring = &self.shared.ring;
        // SAFETY: Consumer unik dan diakses lewat &mut self
        unsafe { ring.pop_raw(ring.policy().max_attempts) }
    }

    /// Pop dengan budget attempt eksplisit.
    #[inline]
    pub fn pop_with(&mut self, max_attempts: u32) -> Result<T, BufferEmpty> {
        // SAFETY: Consumer unik dan diakses lewat &mut self
        unsafe { self.shared.ring.pop_raw(max_attempts) }
    }

    /// Satu attempt, tanpa sleep.
    #[inline]
    pub fn try_pop(&mut self) -> Result<T, BufferEmpty> {
        // SAFETY: Consumer unik dan diakses lewat &mut self
        unsafe { self.shared.ring.pop_raw(1) }
    }

    /// Salinan elemen tertua. Cursor tidak berubah.
    #[inline]
    pub fn peek_oldest(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        // SAFETY: Consumer !Sync, pop butuh &mut self, jadi tidak ada pop
        // yang berjalan selama peek
        unsafe { self.shared.ring.peek_oldest_raw() }
    }

    /// Salinan elemen terbaru yang sudah di-publish. Cursor tidak berubah.
    #[inline]
    pub fn peek_latest(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        // SAFETY: sama seperti peek_oldest
        unsafe { self.shared.ring.peek_latest_raw() }
    }

    /// Lihat [`RingBuffer::len`]. Advisory.
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.ring.len()
    }

    /// Advisory.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.ring.is_empty()
    }

    /// Advisory.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.shared.ring.is_full()
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` jika Producer sudah di-drop; tidak akan ada elemen baru.
    #[inline]
    pub fn is_abandoned(&self) -> bool {
        Arc::strong_count(&self.shared) == 1
    }
}

impl<T, const N: usize> fmt::Debug for Consumer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("len", &self.len())
            .field("capacity", &N)
            .finish()
    }
}
