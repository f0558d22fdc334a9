//! Frame animation: time-keyed lookup from elapsed time to a texture region.
//!
//! An [`Animation`] is an immutable sequence; frame lookup is a pure function
//! of accumulated time. The mutable part, the accumulator and the
//! playing/paused state, lives in [`Playhead`], one per animated sprite.
//!
//! # Invariants
//! - Frame lookup never fails: `Once` clamps to the last frame, `Loop` wraps.
//! - "Finished" is a queryable predicate, not an error. A looping sequence
//!   never finishes.
//! - A paused playhead does not move, no matter how much delta is fed in.

pub mod sequence;

pub use sequence::{Animation, PlayMode, Playhead};

pub fn crate_info() -> &'static str {
    "glint-anim v0.1.0"
}
