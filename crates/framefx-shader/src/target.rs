//! The reusable offscreen capture surface.

use std::ops::{Deref, DerefMut};

use anyhow::{bail, Result};

use framefx_core::gs::{ColorFormat, Device, TextureId};

/// A single color-only render surface, reallocated on demand.
///
/// Allocation is lazy: nothing is created until the first
/// [`render`](OffscreenTarget::render), and the backing texture is only
/// replaced when a render requests a different size. Consecutive renders at
/// the same size reuse the allocation.
pub struct OffscreenTarget {
    format: ColorFormat,
    texture: Option<TextureId>,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Color attachment only; no depth/stencil surface is ever attached.
    pub fn new(format: ColorFormat) -> Self {
        Self {
            format,
            texture: None,
            width: 0,
            height: 0,
        }
    }

    /// Begin rendering into the surface at the requested size.
    ///
    /// The returned scope ends the pass when dropped, on every exit path.
    /// After the scope ends, [`texture`](OffscreenTarget::texture) holds
    /// exactly what was drawn, at `width` x `height`.
    ///
    /// Reallocation failure means GPU memory is exhausted and is returned
    /// as a hard error.
    pub fn render<'a>(
        &mut self,
        device: &'a mut dyn Device,
        width: u32,
        height: u32,
    ) -> Result<TargetScope<'a>> {
        if width == 0 || height == 0 {
            bail!("degenerate target size {width}x{height}");
        }

        let texture = match self.texture {
            Some(texture) if (self.width, self.height) == (width, height) => texture,
            _ => {
                let texture = device.create_texture(width, height, self.format)?;
                if let Some(old) = self.texture.take() {
                    device.destroy_texture(old);
                }
                self.texture = Some(texture);
                self.width = width;
                self.height = height;
                texture
            }
        };

        device.begin_target(texture)?;
        Ok(TargetScope { device })
    }

    /// The backing texture. `None` until the first successful render.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the backing texture, e.g. when the owning node is torn down
    /// while the device is still alive.
    pub fn reset(&mut self, device: &mut dyn Device) {
        if let Some(texture) = self.texture.take() {
            device.destroy_texture(texture);
        }
        self.width = 0;
        self.height = 0;
    }
}

/// Open render pass into an [`OffscreenTarget`].
///
/// Derefs to the device so the pass can keep issuing commands; dropping it
/// ends the pass and restores the previously bound target.
pub struct TargetScope<'a> {
    device: &'a mut dyn Device,
}

impl<'a> Deref for TargetScope<'a> {
    type Target = dyn Device + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.device
    }
}

impl<'a> DerefMut for TargetScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.device
    }
}

impl Drop for TargetScope<'_> {
    fn drop(&mut self) {
        self.device.end_target();
    }
}
