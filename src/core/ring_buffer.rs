//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Implementasi Lamport Queue dengan cursor yang terus naik (wrapping `usize`).
//! Penuh/kosong diturunkan murni dari selisih cursor, tidak ada flag `full`
//! terpisah. Tidak ada Mutex, tidak ada alokasi setelah inisialisasi.
//!
//! Protokol per slot: `Vacant -> (producer tulis, release) -> Occupied ->
//! (consumer baca, release) -> Vacant`. Satu-satunya edge sinkronisasi
//! antar thread adalah pasangan acquire/release pada dua cursor.

use std::mem::MaybeUninit;

use crossbeam_utils::CachePadded;

use super::backoff::RetryPolicy;
use super::error::{BufferEmpty, BufferFull};
use super::sync::{AtomicUsize, Ordering, UnsafeCell};
use crate::trace::{debug, trace};

/// Slot dalam ring buffer
#[repr(C, align(64))] // Cache line alignment untuk menghindari false sharing
struct Slot<T> {
    data: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Bounded SPSC Ring Buffer dengan kapasitas `N` (power of 2).
///
/// Dipakai langsung, buffer ini single-owner: `push`/`pop` butuh `&mut self`.
/// Untuk dua thread, pecah dengan [`RingBuffer::split`] menjadi
/// [`Producer`](super::Producer) dan [`Consumer`](super::Consumer).
///
/// ```
/// use spsc_ring::RingBuffer;
///
/// let mut rb: RingBuffer<u64, 8> = RingBuffer::new();
/// rb.push(1).unwrap();
/// rb.push(2).unwrap();
/// assert_eq!(rb.pop(), Ok(1));
/// assert_eq!(rb.peek_latest(), Ok(2));
/// ```
pub struct RingBuffer<T, const N: usize> {
    // Producer side: ditulis hanya oleh producer
    write: CachePadded<AtomicUsize>,
    // Consumer side: ditulis hanya oleh consumer
    read: CachePadded<AtomicUsize>,
    // Pre-allocated di heap, panjang selalu N
    slots: Box<[Slot<T>]>,
    policy: RetryPolicy,
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    const MASK: usize = N - 1;

    // Dievaluasi saat monomorphization: N invalid gagal compile.
    const VALID_CAPACITY: () = assert!(N > 0 && N.is_power_of_two(), "N must be power of 2");

    /// Membuat ring buffer kosong dengan [`RetryPolicy::default`].
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Membuat ring buffer kosong dengan retry policy tertentu.
    ///
    /// Alokasi hanya terjadi sekali di sini.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        let slots = (0..N).map(|_| Slot::new()).collect::<Vec<_>>();

        Self {
            write: CachePadded::new(AtomicUsize::new(0)),
            read: CachePadded::new(AtomicUsize::new(0)),
            slots: slots.into_boxed_slice(),
            policy,
        }
    }

    /// Retry policy yang dipakai `push`/`pop`
    #[inline(always)]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Kapasitas buffer, tetap seumur hidup object
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Push dengan budget attempt dari policy.
    ///
    /// Jika buffer tetap penuh, item dikembalikan lewat [`BufferFull`].
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), BufferFull<T>> {
        // SAFETY: &mut self = satu-satunya producer
        unsafe { self.push_raw(item, self.policy.max_attempts) }
    }

    /// Push dengan budget attempt eksplisit.
    #[inline]
    pub fn push_with(&mut self, item: T, max_attempts: u32) -> Result<(), BufferFull<T>> {
        // SAFETY: &mut self = satu-satunya producer
        unsafe { self.push_raw(item, max_attempts) }
    }

    /// Satu attempt, tanpa sleep.
    #[inline]
    pub fn try_push(&mut self, item: T) -> Result<(), BufferFull<T>> {
        // SAFETY: &mut self = satu-satunya producer
        unsafe { self.push_raw(item, 1) }
    }

    /// Pop dengan budget attempt dari policy.
    #[inline]
    pub fn pop(&mut self) -> Result<T, BufferEmpty> {
        // SAFETY: &mut self = satu-satunya consumer
        unsafe { self.pop_raw(self.policy.max_attempts) }
    }

    /// Pop dengan budget attempt eksplisit.
    #[inline]
    pub fn pop_with(&mut self, max_attempts: u32) -> Result<T, BufferEmpty> {
        // SAFETY: &mut self = satu-satunya consumer
        unsafe { self.pop_raw(max_attempts) }
    }

    /// Satu attempt, tanpa sleep.
    #[inline]
    pub fn try_pop(&mut self) -> Result<T, BufferEmpty> {
        // SAFETY: &mut self = satu-satunya consumer
        unsafe { self.pop_raw(1) }
    }

    /// Salinan elemen tertua tanpa memindahkan cursor.
    #[inline]
    pub fn peek_oldest(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        // SAFETY: dengan &self tidak ada push/pop yang bisa berjalan
        unsafe { self.peek_oldest_raw() }
    }

    /// Salinan elemen yang paling baru di-publish tanpa memindahkan cursor.
    #[inline]
    pub fn peek_latest(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        // SAFETY: dengan &self tidak ada push/pop yang bisa berjalan
        unsafe { self.peek_latest_raw() }
    }

    /// Jumlah elemen dalam buffer (0..=N).
    ///
    /// Advisory: dua cursor dibaca terpisah, bukan snapshot atomik. Thread
    /// lain bisa mengubah hasilnya tepat setelah dibaca; jangan dipakai
    /// sebagai mekanisme sinkronisasi.
    #[inline(always)]
    pub fn len(&self) -> usize {
        // read dulu: write tidak pernah mundur, jadi selisihnya tidak negatif
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        write.wrapping_sub(read).min(N)
    }

    /// Cek apakah buffer kosong (advisory, lihat [`len`](Self::len))
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cek apakah buffer penuh (advisory, lihat [`len`](Self::len))
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Buffer kosong dengan kedua cursor dimulai dari `start`.
    #[cfg(test)]
    pub(crate) fn with_cursor(policy: RetryPolicy, start: usize) -> Self {
        let rb = Self::with_policy(policy);
        rb.write.store(start, Ordering::Relaxed);
        rb.read.store(start, Ordering::Relaxed);
        rb
    }

    #[inline(always)]
    fn slot(&self, cursor: usize) -> &Slot<T> {
        &self.slots[cursor & Self::MASK]
    }

    /// # Safety
    /// Caller harus satu-satunya producer yang aktif.
    pub(crate) unsafe fn push_raw(&self, item: T, max_attempts: u32) -> Result<(), BufferFull<T>> {
        let attempts = max_attempts.max(1);
        let mut backoff = self.policy.backoff();
        // Hanya producer yang menulis cursor ini
        let write = self.write.load(Ordering::Relaxed);

        for attempt in 1..=attempts {
            // Acquire: consumer sudah selesai membaca slot yang dia kosongkan
            let read = self.read.load(Ordering::Acquire);

            if write.wrapping_sub(read) < N {
                // SAFETY: slot ini Vacant; consumer tidak menyentuhnya sampai
                // write cursor di bawah ini di-publish
                self.slot(write).data.with_mut(|ptr| unsafe {
                    (*ptr).write(item);
                });

                // Release: tulisan slot visible sebelum cursor baru
                self.write.store(write.wrapping_add(1), Ordering::Release);
                return Ok(());
            }

            if attempt < attempts {
                backoff.snooze();
            }
        }

        trace!(attempts, capacity = N, "push gave up, buffer stayed full");
        Err(BufferFull(item))
    }

    /// # Safety
    /// Caller harus satu-satunya consumer yang aktif.
    pub(crate) unsafe fn pop_raw(&self, max_attempts: u32) -> Result<T, BufferEmpty> {
        let attempts = max_attempts.max(1);
        let mut backoff = self.policy.backoff();
        // Hanya consumer yang menulis cursor ini
        let read = self.read.load(Ordering::Relaxed);

        for attempt in 1..=attempts {
            // Acquire: tulisan producer ke slot sudah visible
            let write = self.write.load(Ordering::Acquire);

            if write != read {
                // SAFETY: slot ini Occupied dan sudah di-publish; producer
                // tidak menulisnya lagi sampai read cursor maju
                let value = self
                    .slot(read)
                    .data
                    .with(|ptr| unsafe { (*ptr).assume_init_read() });

                // Release: pembacaan selesai sebelum slot dikembalikan ke producer
                self.read.store(read.wrapping_add(1), Ordering::Release);
                return Ok(value);
            }

            if attempt < attempts {
                backoff.snooze();
            }
        }

        trace!(attempts, "pop gave up, buffer stayed empty");
        Err(BufferEmpty)
    }

    /// # Safety
    /// Caller harus satu-satunya consumer yang aktif (atau tidak ada
    /// consumer lain yang bisa pop selama peek).
    pub(crate) unsafe fn peek_oldest_raw(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        if write == read {
            return Err(BufferEmpty);
        }

        // SAFETY: sama seperti pop_raw, hanya tanpa memindahkan nilai
        Ok(self
            .slot(read)
            .data
            .with(|ptr| unsafe { (*ptr).assume_init_ref().clone() }))
    }

    /// # Safety
    /// Sama seperti [`peek_oldest_raw`](Self::peek_oldest_raw).
    pub(crate) unsafe fn peek_latest_raw(&self) -> Result<T, BufferEmpty>
    where
        T: Clone,
    {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        if write == read {
            return Err(BufferEmpty);
        }

        // SAFETY: read <= write-1 < write, slot Occupied. Producer hanya
        // menulis di cursor >= write dan < read+N, tidak pernah ke slot ini.
        let latest = write.wrapping_sub(1);
        Ok(self
            .slot(latest)
            .data
            .with(|ptr| unsafe { (*ptr).assume_init_ref().clone() }))
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        let mut read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Relaxed);

        if write != read {
            debug!(
                live = write.wrapping_sub(read),
                "dropping ring buffer with live elements"
            );
        }

        while read != write {
            // SAFETY: &mut self, semua slot di [read, write) Occupied
            self.slot(read)
                .data
                .with_mut(|ptr| unsafe { (*ptr).assume_init_drop() });
            read = read.wrapping_add(1);
        }
    }
}
