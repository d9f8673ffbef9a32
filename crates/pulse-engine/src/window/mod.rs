//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single window, and wires them to the
//! GPU layer.

mod keys;
mod runtime;

pub use keys::is_escape_press;
pub use runtime::{Runtime, RuntimeConfig};
