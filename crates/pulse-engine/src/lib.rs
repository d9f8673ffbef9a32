//! Pulse engine crate.
//!
//! Shader programs (compile, link, uniforms) and a frame driver that draws
//! uploaded triangle geometry with them, on top of a `winit` window and a
//! `wgpu` device.

pub mod core;
pub mod device;
pub mod frame;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;
