//! Stress Test - Producer/Consumer Lintas Thread
//!
//! Satu thread push `0..M` (retry saat penuh), satu thread pop sampai
//! menerima `M` nilai (retry saat kosong). Urutan yang diterima harus
//! persis `0..M` untuk kapasitas dan policy apa pun.
//!
//! Usage:
//!   cargo test --release --test stress_test -- --nocapture

#![cfg(not(loom))]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use spsc_ring::{BufferEmpty, RetryPolicy, RingBuffer};

/// Statistics collector
struct StressStats {
    full_retries: AtomicU64,
    empty_retries: AtomicU64,
}

impl StressStats {
    fn new() -> Self {
        Self {
            full_retries: AtomicU64::new(0),
            empty_retries: AtomicU64::new(0),
        }
    }
}

fn run_transfer<const N: usize>(count: u64, policy: RetryPolicy) -> (Vec<u64>, Arc<StressStats>) {
    let (mut producer, mut consumer) = RingBuffer::<u64, N>::with_policy(policy).split();
    let stats = Arc::new(StressStats::new());

    let producer_stats = Arc::clone(&stats);
    let producer_handle = thread::spawn(move || {
        for i in 0..count {
            let mut item = i;
            while let Err(full) = producer.push(item) {
                producer_stats.full_retries.fetch_add(1, Ordering::Relaxed);
                item = full.into_inner();
                thread::yield_now();
            }
        }
    });

    let consumer_stats = Arc::clone(&stats);
    let consumer_handle = thread::spawn(move || {
        let mut received = Vec::with_capacity(count as usize);
        while (received.len() as u64) < count {
            match consumer.pop() {
                Ok(v) => received.push(v),
                Err(BufferEmpty) => {
                    consumer_stats.empty_retries.fetch_add(1, Ordering::Relaxed);
                    thread::yield_now();
                }
            }
        }
        assert!(consumer.is_empty());
        received
    });

    producer_handle.join().unwrap();
    let received = consumer_handle.join().unwrap();
    (received, stats)
}

fn assert_sequence(received: &[u64], count: u64) {
    assert_eq!(received.len() as u64, count);
    for (expected, &got) in received.iter().enumerate() {
        assert_eq!(got, expected as u64, "FIFO violation at index {}", expected);
    }
}

#[test]
fn stress_default_policy_capacity_1024() {
    let (received, stats) = run_transfer::<1024>(200_000, RetryPolicy::default());
    assert_sequence(&received, 200_000);
    println!(
        "full retries: {}, empty retries: {}",
        stats.full_retries.load(Ordering::Relaxed),
        stats.empty_retries.load(Ordering::Relaxed)
    );
}

#[test]
fn stress_tiny_capacity_forces_contention() {
    // Kapasitas 1 dan 2: hampir setiap operasi menabrak full/empty
    let (received, _) = run_transfer::<1>(20_000, RetryPolicy::spin(8));
    assert_sequence(&received, 20_000);

    let (received, _) = run_transfer::<2>(20_000, RetryPolicy::spin(8));
    assert_sequence(&received, 20_000);
}

#[test]
fn stress_bare_spin_retry() {
    // Correctness tidak bergantung pada backoff
    let (received, _) = run_transfer::<8>(100_000, RetryPolicy::spin(1));
    assert_sequence(&received, 100_000);
}

#[test]
fn stress_long_backoff() {
    let policy = RetryPolicy::default()
        .with_attempts(5)
        .with_backoff(Duration::from_micros(10), Duration::from_micros(200));
    let (received, _) = run_transfer::<16>(20_000, policy);
    assert_sequence(&received, 20_000);
}

#[test]
fn stress_heap_values_not_leaked_or_duplicated() {
    const COUNT: usize = 50_000;
    let token = Arc::new(());
    let (mut producer, mut consumer) =
        RingBuffer::<(usize, Arc<()>), 32>::with_policy(RetryPolicy::spin(4)).split();

    let producer_token = Arc::clone(&token);
    let producer_handle = thread::spawn(move || {
        for i in 0..COUNT {
            let mut item = (i, Arc::clone(&producer_token));
            while let Err(full) = producer.push(item) {
                item = full.into_inner();
                thread::yield_now();
            }
        }
    });

    let mut next = 0;
    while next < COUNT {
        if let Ok((i, _held)) = consumer.pop() {
            assert_eq!(i, next);
            next += 1;
        } else {
            thread::yield_now();
        }
    }

    producer_handle.join().unwrap();
    drop(consumer);
    assert_eq!(Arc::strong_count(&token), 1);
}

#[test]
fn stress_peek_while_producing() {
    const COUNT: u64 = 50_000;
    let (mut producer, mut consumer) =
        RingBuffer::<u64, 64>::with_policy(RetryPolicy::spin(4)).split();

    let producer_handle = thread::spawn(move || {
        for i in 0..COUNT {
            let mut item = i;
            while let Err(full) = producer.push(item) {
                item = full.into_inner();
                thread::yield_now();
            }
        }
    });

    let mut expected = 0;
    while expected < COUNT {
        let oldest = consumer.peek_oldest();
        let latest = consumer.peek_latest();
        if let (Ok(oldest), Ok(latest)) = (oldest, latest) {
            // Producer hanya bisa menambah di belakang
            assert_eq!(oldest, expected);
            assert!(latest >= oldest);
            assert!(latest - oldest < 64);
            assert_eq!(consumer.pop(), Ok(expected));
            expected += 1;
        } else {
            thread::yield_now();
        }
    }

    producer_handle.join().unwrap();
}
