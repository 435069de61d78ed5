//! Template layer: render contexts, the renderer seam and string escaping
//! shared by the derivers and the built-in templates.

pub mod context;
pub mod escape;
pub mod renderer;

pub use context::{RenderContext, RequestKind};
pub use renderer::{BUILTIN_TEMPLATES, Renderer, TeraRenderer};
