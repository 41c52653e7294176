//! Block-rendering nodes and the fixed effect chain.
//!
//! Each effect unit wraps one or more `dsp` primitives behind the
//! [`GraphNode`](node::GraphNode) trait and maps normalized knob positions
//! onto physical ranges. [`SignalGraph`](signal_graph::SignalGraph) wires
//! them in their fixed order and exposes the named buses that voices and
//! one-shots render into.

/// Ensemble chorus (four modulated taps).
pub mod chorus;
/// Tempo-synced two-tap delay with damped feedback.
pub mod delay;
/// Warm waveshaper between a low-pass and a DC-blocking high-pass.
pub mod distortion;
/// Bus compressor and safety limiter.
pub mod dynamics;
/// Master low-pass filter.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Schroeder reverb with loudness-preserving wet/dry.
pub mod reverb;
/// The fixed chain, its buses and the analyser tap.
pub mod signal_graph;

pub use node::{GraphNode, RenderCtx};
pub use signal_graph::{Bus, BusBuffers, EffectSettings, SignalGraph};
