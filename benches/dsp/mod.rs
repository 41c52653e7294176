//! Benchmarks for low-level DSP primitives.

mod analyser;
mod dynamics;
mod filter;
mod oscillator;

pub use analyser::bench_analyser;
pub use dynamics::bench_dynamics;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
