//! Real-world scenario benchmarks.
//!
//! These run the effect units, the full chain and the engine the way the
//! instrument does: held pads, drum hits and ambient one-shots summed into
//! buses.

mod effects;
mod engine;
mod graph;

pub use effects::bench_effects;
pub use engine::bench_engine;
pub use graph::bench_graph;
