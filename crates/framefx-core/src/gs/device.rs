//! The graphics capability surface nodes render through.
//!
//! Hosts own the GPU; nodes get a [`Device`] for the duration of a render
//! callback and nothing else. One implementation exists per graphics
//! backend; nodes stay backend-agnostic and downcast via
//! [`Device::as_any_mut`] only when they need concrete resources (shader
//! programs, raw texture objects).

use std::any::Any;
use std::ops::BitOr;

use anyhow::Result;

use super::debug::DebugColor;
use super::state::PassState;

/// Opaque handle to a device-owned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Pixel layout of a color surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Rgba,
    Bgra,
    Rgba16F,
}

/// Which buffers a [`Device::clear`] touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearFlags(u32);

impl ClearFlags {
    pub const COLOR: ClearFlags = ClearFlags(1 << 0);
    pub const DEPTH: ClearFlags = ClearFlags(1 << 1);
    pub const STENCIL: ClearFlags = ClearFlags(1 << 2);

    pub fn contains(self, other: ClearFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ClearFlags {
    type Output = ClearFlags;

    fn bitor(self, rhs: ClearFlags) -> ClearFlags {
        ClearFlags(self.0 | rhs.0)
    }
}

/// Per-backend GPU device, serialized on the host's render thread.
///
/// Target binding and pass state are stacks: `begin_target`/`push_pass_state`
/// save whatever was active and the matching `end_target`/`pop_pass_state`
/// restore it, so nested passes compose without nodes knowing about each
/// other.
pub trait Device {
    /// Allocate a render-capable 2D texture. Fails on exhausted GPU memory.
    fn create_texture(&mut self, width: u32, height: u32, format: ColorFormat)
        -> Result<TextureId>;

    fn destroy_texture(&mut self, texture: TextureId);

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)>;

    /// Redirect draws to `texture` and set the viewport to its full size.
    fn begin_target(&mut self, texture: TextureId) -> Result<()>;

    /// Restore the target (and viewport) active before the matching
    /// [`begin_target`](Device::begin_target).
    fn end_target(&mut self);

    /// Set the projection for subsequent draws to an orthographic volume.
    fn set_ortho(&mut self, left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32);

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u8);

    fn push_pass_state(&mut self, state: &PassState);

    fn pop_pass_state(&mut self);

    /// Open a named scope in GPU capture/trace tools. Observability only.
    fn debug_group_begin(&mut self, color: DebugColor, label: &str);

    fn debug_group_end(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
