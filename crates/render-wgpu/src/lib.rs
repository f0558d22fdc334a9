//! wgpu backend for the glint compositor.
//!
//! Implements the backend contract against an offscreen RGBA target:
//! sprites batch into vertex runs broken on texture or blend changes,
//! shapes draw through their own flat-color pipeline in submission order.
//!
//! # Invariants
//! - The backend never reaches into compositor state; it only executes
//!   the call sequence it is given.
//! - Blend switches select between two prebuilt pipelines; no pipeline is
//!   created mid-frame.

mod gpu;
mod shaders;

pub use gpu::WgpuBackend;
