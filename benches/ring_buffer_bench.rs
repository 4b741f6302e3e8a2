//! Criterion benchmark untuk Ring Buffer
//!
//! Run dengan: cargo bench

use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spsc_ring::{RetryPolicy, RingBuffer};

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Elements(1));

    // Benchmark push
    group.bench_function("push", |b| {
        let mut rb: RingBuffer<u64, 65536> = RingBuffer::with_policy(RetryPolicy::spin(1));
        let mut i = 0u64;
        b.iter(|| {
            if let Err(full) = rb.try_push(black_box(i)) {
                let _ = rb.try_pop();
                let _ = rb.try_push(full.into_inner());
            }
            i = i.wrapping_add(1);
        });
    });

    // Benchmark pop
    group.bench_function("pop", |b| {
        let mut rb: RingBuffer<u64, 65536> = RingBuffer::with_policy(RetryPolicy::spin(1));
        // Pre-fill
        for i in 0..32768 {
            let _ = rb.try_push(i);
        }
        b.iter(|| {
            if let Ok(v) = rb.try_pop() {
                let _ = rb.try_push(black_box(v));
            }
        });
    });

    // Benchmark push+pop cycle
    group.bench_function("push_pop_cycle", |b| {
        let mut rb: RingBuffer<u64, 65536> = RingBuffer::new();
        let mut i = 0u64;
        b.iter(|| {
            let _ = rb.try_push(black_box(i));
            let _ = black_box(rb.try_pop());
            i = i.wrapping_add(1);
        });
    });

    // Benchmark peek
    group.bench_function("peek_oldest", |b| {
        let mut rb: RingBuffer<u64, 64> = RingBuffer::new();
        let _ = rb.try_push(7);
        b.iter(|| black_box(rb.peek_oldest()));
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    // Batch operations
    for batch_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_function(format!("batch_{}", batch_size), |b| {
            let mut rb: RingBuffer<u64, 65536> = RingBuffer::new();
            b.iter(|| {
                for i in 0..*batch_size {
                    let _ = rb.try_push(black_box(i as u64));
                }
                for _ in 0..*batch_size {
                    let _ = black_box(rb.try_pop());
                }
            });
        });
    }

    group.finish();
}

fn bench_cross_thread(c: &mut Criterion) {
    const COUNT: u64 = 100_000;
    let mut group = c.benchmark_group("cross_thread");
    group.throughput(Throughput::Elements(COUNT));
    group.sample_size(20);

    for (name, policy) in [
        ("spin", RetryPolicy::spin(64)),
        ("backoff", RetryPolicy::default()),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let (mut tx, mut rx) = RingBuffer::<u64, 1024>::with_policy(policy).split();
                let producer = thread::spawn(move || {
                    for i in 0..COUNT {
                        let mut item = i;
                        while let Err(full) = tx.push(item) {
                            item = full.into_inner();
                        }
                    }
                });
                let mut received = 0;
                while received < COUNT {
                    if let Ok(v) = rx.pop() {
                        black_box(v);
                        received += 1;
                    }
                }
                producer.join().unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_throughput, bench_cross_thread);
criterion_main!(benches);
