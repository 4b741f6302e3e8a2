//! Core module: Bounded Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic operations (acquire/release), tidak ada Mutex/Condvar
//! - Bounded: Setiap push/pop punya budget attempt, tidak pernah menunggu tanpa batas
//! - No-Allocation: Semua slot pre-allocated saat init

mod backoff;
mod error;
mod handle;
mod ring_buffer;
mod sync;

pub use backoff::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF};
pub use error::{BufferEmpty, BufferFull};
pub use handle::{Consumer, Producer};
pub use ring_buffer::RingBuffer;
