//! Graphics subsystem surface.
//!
//! A small capability trait plus the value types that cross it. Backends
//! live in their own crates (`framefx-glium` for OpenGL); everything here
//! is backend-neutral so node logic can be exercised without a GPU.

pub mod debug;
pub mod device;
pub mod state;

pub use debug::{DebugColor, DebugScope};
pub use device::{ClearFlags, ColorFormat, Device, TextureId};
pub use state::{BlendFactor, BlendFunction, CullMode, PassState};
