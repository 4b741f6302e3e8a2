//! Bounded lock-free single-producer single-consumer ring buffer.
//!
//! Arsitektur:
//! - Dua cursor `usize` yang terus naik, masing-masing hanya ditulis satu sisi
//! - Acquire/release pada cursor adalah satu-satunya sinkronisasi antar thread
//! - Push/pop bounded: retry dengan exponential backoff lalu gagal dengan error bertipe
//!
//! ```
//! use spsc_ring::{BufferEmpty, RingBuffer};
//!
//! let mut rb: RingBuffer<u32, 8> = RingBuffer::new();
//! for i in 0..8 {
//!     rb.push(i).unwrap();
//! }
//! assert!(rb.is_full());
//! assert_eq!(rb.push(8).unwrap_err().into_inner(), 8);
//!
//! for i in 0..8 {
//!     assert_eq!(rb.pop(), Ok(i));
//! }
//! assert_eq!(rb.pop(), Err(BufferEmpty));
//! ```
#![warn(unsafe_op_in_unsafe_fn)]

pub mod core;
mod trace;

pub use crate::core::{BufferEmpty, BufferFull, Consumer, Producer, RetryPolicy, RingBuffer};
pub use crate::trace::init_tracing;
