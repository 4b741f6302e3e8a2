//! Tracing untuk debugging ring buffer.
//!
//! Aktif dengan `--features tracing`. Tanpa feature itu semua macro menjadi
//! no-op, jadi hot path tidak membayar apa pun.

/// Pasang tracing subscriber dengan timestamp uptime.
///
/// Filter diambil dari `RUST_LOG`, default `spsc_ring=trace`.
/// Tidak melakukan apa-apa jika feature `tracing` tidak aktif.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spsc_ring=trace"));

    // try_init: aman dipanggil dua kali (misalnya dari beberapa test)
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace_noop as trace;
