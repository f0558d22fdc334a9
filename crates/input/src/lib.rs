//! Input collaborator: listener registry plus a small 2D event model.
//!
//! The compositor only consumes `add_listener`/`remove_listener`; listener
//! registration happens automatically when a listening object joins or
//! leaves a layer. Event delivery itself lives outside the render core.

pub mod router;

pub use router::{InputEvent, InputRouter, ListenerId, PointerButton};

pub fn crate_info() -> &'static str {
    "glint-input v0.1.0"
}
