//! Renderer-facing types.
//!
//! Shader programs and the frame driver record GPU commands through these
//! types; they never see the window or the surface directly.

mod color;
mod ctx;
mod vertex;
mod viewport;

pub use color::ColorRgba;
pub use ctx::{RenderCtx, RenderTarget};
pub use vertex::{VertexAttribute, VertexLayout};
pub use viewport::Viewport;
