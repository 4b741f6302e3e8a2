//! Ring Stress - Producer/Consumer Throughput Driver
//!
//! Dua thread (satu producer, satu consumer) bertukar `u64` lewat
//! `RingBuffer` lalu memverifikasi urutan FIFO dan mencetak statistik:
//! - Throughput end-to-end
//! - Jumlah push/pop yang kehabisan budget (full/empty)
//! - Opsional: pin thread ke CPU 0/1 (Linux)
//!
//! Usage:
//!   cargo run --release --bin ring_stress -- [OPTIONS]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spsc_ring::{RetryPolicy, RingBuffer};

const CAPACITY: usize = 1024;

/// Konfigurasi stress run
struct StressConfig {
    count: u64,
    attempts: u32,
    min_backoff_us: u64,
    max_backoff_us: u64,
    pin: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            count: 10_000_000,
            attempts: 3,
            min_backoff_us: 1,
            max_backoff_us: 32,
            pin: false,
        }
    }
}

impl StressConfig {
    fn policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_attempts(self.attempts)
            .with_backoff(
                Duration::from_micros(self.min_backoff_us),
                Duration::from_micros(self.max_backoff_us),
            )
    }
}

/// Statistik run (lock-free)
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

    fn print_stats(&self, count: u64, elapsed: Duration) {
        let full = self.full_retries.load(Ordering::Relaxed);
        let empty = self.empty_retries.load(Ordering::Relaxed);
        let ns_per_op = elapsed.as_nanos() as f64 / count as f64;

        println!("\n📊 Ring Stress Stats (capacity: {})", CAPACITY);
        println!("   Transferred:    {}", count);
        println!("   Elapsed:        {:.3}s", elapsed.as_secs_f64());
        println!("   Latency:        {:.2} ns/op", ns_per_op);
        println!(
            "   Throughput:     {:.2} M ops/sec",
            count as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
        println!("   Push exhausted: {}", full);
        println!("   Pop exhausted:  {}", empty);
    }
}

/// Pin thread pemanggil ke satu CPU. Error diabaikan: pinning hanya optimasi.
#[cfg(target_os = "linux")]
fn pin_to_cpu(cpu: usize) {
    // SAFETY: cpu_set_t adalah plain bitmask, zeroed = set kosong
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);
        if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            eprintln!("⚠️  Failed to pin thread to CPU {}", cpu);
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn pin_to_cpu(_cpu: usize) {}

fn run_stress(config: StressConfig) -> Result<(), String> {
    let rb: RingBuffer<u64, CAPACITY> = RingBuffer::with_policy(config.policy());
    let (mut producer, mut consumer) = rb.split();
    let stats = Arc::new(StressStats::new());
    let count = config.count;
    let pin = config.pin;

    println!("🚀 Ring Stress - SPSC Ring Buffer");
    println!("=================================");
    println!("   Values:   {}", count);
    println!("   Policy:   {:?}", config.policy());
    println!("   Pinned:   {}\n", pin);

    let start = Instant::now();

    let producer_stats = Arc::clone(&stats);
    let producer_handle = thread::Builder::new()
        .name("producer".into())
        .spawn(move || {
            if pin {
                pin_to_cpu(0);
            }
            for i in 0..count {
                let mut item = i;
                while let Err(full) = producer.push(item) {
                    // Consumer berhenti (misalnya FIFO violation), tidak ada yang membaca lagi
                    if producer.is_abandoned() {
                        return;
                    }
                    producer_stats.full_retries.fetch_add(1, Ordering::Relaxed);
                    item = full.into_inner();
                }
            }
        })
        .map_err(|e| format!("spawn producer: {}", e))?;

    let consumer_stats = Arc::clone(&stats);
    let consumer_handle = thread::Builder::new()
        .name("consumer".into())
        .spawn(move || -> Result<(), String> {
            if pin {
                pin_to_cpu(1);
            }
            let mut expected = 0u64;
            while expected < count {
                match consumer.pop() {
                    Ok(value) if value == expected => expected += 1,
                    Ok(value) => {
                        return Err(format!(
                            "FIFO violation: expected {}, got {}",
                            expected, value
                        ))
                    }
                    Err(_) if consumer.is_abandoned() && consumer.is_empty() => {
                        return Err(format!(
                            "producer stopped early: received {} of {}",
                            expected, count
                        ));
                    }
                    Err(_) => {
                        consumer_stats.empty_retries.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            Ok(())
        })
        .map_err(|e| format!("spawn consumer: {}", e))?;

    // Consumer dulu: error-nya yang menghentikan producer
    let verified = consumer_handle
        .join()
        .map_err(|_| "consumer panicked".to_string())?;
    producer_handle
        .join()
        .map_err(|_| "producer panicked".to_string())?;
    verified?;

    stats.print_stats(count, start.elapsed());
    println!("\n✅ FIFO order verified for {} values", count);
    Ok(())
}

fn parse_args() -> StressConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = StressConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-n" => {
                if i + 1 < args.len() {
                    config.count = args[i + 1].parse().unwrap_or(config.count);
                    i += 1;
                }
            }
            "--attempts" | "-a" => {
                if i + 1 < args.len() {
                    config.attempts = args[i + 1].parse().unwrap_or(config.attempts);
                    i += 1;
                }
            }
            "--min-backoff-us" => {
                if i + 1 < args.len() {
                    config.min_backoff_us = args[i + 1].parse().unwrap_or(config.min_backoff_us);
                    i += 1;
                }
            }
            "--max-backoff-us" => {
                if i + 1 < args.len() {
                    config.max_backoff_us = args[i + 1].parse().unwrap_or(config.max_backoff_us);
                    i += 1;
                }
            }
            "--pin" | "-p" => {
                config.pin = true;
            }
            "--help" | "-h" => {
                println!("Ring Stress - SPSC Ring Buffer Stress Driver\n");
                println!("Usage: ring_stress [OPTIONS]\n");
                println!("Options:");
                println!("  -n, --count <N>          Values to transfer (default: 10000000)");
                println!("  -a, --attempts <N>       Attempts per push/pop (default: 3)");
                println!("      --min-backoff-us <N> Initial backoff in µs (default: 1)");
                println!("      --max-backoff-us <N> Backoff cap in µs (default: 32)");
                println!("  -p, --pin                Pin producer/consumer to CPU 0/1");
                println!("  -h, --help               Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    spsc_ring::init_tracing();
    let config = parse_args();

    if let Err(e) = run_stress(config) {
        eprintln!("❌ Stress error: {}", e);
        std::process::exit(1);
    }
}
