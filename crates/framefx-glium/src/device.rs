//! OpenGL implementation of the graphics capability surface.
//!
//! Texture storage and allocation go through glium; target binding, pass
//! state, and debug markers drop to raw `gl` calls because they sit below
//! glium's per-draw abstraction. Every raw-state change is stack-saved and
//! restored, so the host (and glium itself) never observe leftover state.

use std::any::Any;
use std::collections::HashMap;
use std::ffi::CString;
use std::rc::Rc;

use anyhow::{anyhow, Context as _, Result};
use gl::types::{GLboolean, GLenum, GLint, GLuint};
use glium::backend::Context;
use glium::texture::{MipmapsOption, Texture2d, UncompressedFloatFormat};
use glium::GlObject;
use tracing::trace;

use framefx_core::gs::{
    BlendFactor, ClearFlags, ColorFormat, CullMode, DebugColor, Device, PassState, TextureId,
};

use crate::GliumContext;

struct TextureSlot {
    texture: Texture2d,
    /// GL framebuffer name, created on first use as a render target.
    fbo: Option<GLuint>,
}

/// Draw-framebuffer binding and viewport active before a target push.
struct SavedTarget {
    draw_fbo: GLint,
    viewport: [GLint; 4],
}

/// Raw GL pass state captured by `push_pass_state`.
struct SavedPassState {
    blend_enabled: bool,
    blend_src_rgb: GLint,
    blend_dst_rgb: GLint,
    blend_src_alpha: GLint,
    blend_dst_alpha: GLint,
    depth_test: bool,
    stencil_test: bool,
    stencil_writemask: GLint,
    color_mask: [GLboolean; 4],
    cull_enabled: bool,
    cull_mode: GLint,
}

/// [`Device`] over the host's GL context.
pub struct GliumDevice {
    ctx: Rc<Context>,
    textures: HashMap<TextureId, TextureSlot>,
    next_texture: u64,
    target_stack: Vec<SavedTarget>,
    state_stack: Vec<SavedPassState>,
    projection: [[f32; 4]; 4],
}

impl GliumDevice {
    pub fn new(ctx: &GliumContext) -> Self {
        Self {
            ctx: ctx.context().clone(),
            textures: HashMap::new(),
            next_texture: 1,
            target_stack: Vec::new(),
            state_stack: Vec::new(),
            projection: identity(),
        }
    }

    /// The glium context, for effect implementations that compile programs
    /// or build vertex buffers.
    pub fn context(&self) -> &Rc<Context> {
        &self.ctx
    }

    /// Resolve a handle to its glium texture for sampling.
    pub fn texture(&self, texture: TextureId) -> Option<&Texture2d> {
        self.textures.get(&texture).map(|slot| &slot.texture)
    }

    /// Current projection, column-major, as set by the active pass.
    pub fn projection(&self) -> [[f32; 4]; 4] {
        self.projection
    }

    fn ensure_fbo(&mut self, texture: TextureId) -> Result<GLuint> {
        let slot = self
            .textures
            .get_mut(&texture)
            .ok_or_else(|| anyhow!("unknown texture {texture:?}"))?;

        if let Some(fbo) = slot.fbo {
            return Ok(fbo);
        }

        let mut fbo: GLuint = 0;
        let tex_id = slot.texture.get_id();
        unsafe {
            gl::GenFramebuffers(1, &mut fbo);
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, fbo);
            gl::FramebufferTexture2D(
                gl::DRAW_FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                tex_id,
                0,
            );
            let status = gl::CheckFramebufferStatus(gl::DRAW_FRAMEBUFFER);
            if status != gl::FRAMEBUFFER_COMPLETE {
                gl::DeleteFramebuffers(1, &fbo);
                return Err(anyhow!("framebuffer incomplete: 0x{status:04x}"));
            }
        }

        slot.fbo = Some(fbo);
        Ok(fbo)
    }
}

impl Device for GliumDevice {
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: ColorFormat,
    ) -> Result<TextureId> {
        let texture = Texture2d::empty_with_format(
            &self.ctx,
            gl_format(format),
            MipmapsOption::NoMipmap,
            width,
            height,
        )
        .context("texture allocation failed")?;

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(
            id,
            TextureSlot {
                texture,
                fbo: None,
            },
        );

        trace!(?id, width, height, ?format, "created texture");
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.remove(&texture) {
            if let Some(fbo) = slot.fbo {
                unsafe {
                    gl::DeleteFramebuffers(1, &fbo);
                }
            }
        }
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures
            .get(&texture)
            .map(|slot| (slot.texture.get_width(), slot.texture.get_height().unwrap_or(1)))
    }

    fn begin_target(&mut self, texture: TextureId) -> Result<()> {
        let (width, height) = self
            .texture_size(texture)
            .ok_or_else(|| anyhow!("unknown texture {texture:?}"))?;

        // Save the caller's binding before FBO creation can disturb it.
        let mut saved = SavedTarget {
            draw_fbo: 0,
            viewport: [0; 4],
        };
        unsafe {
            gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut saved.draw_fbo);
            gl::GetIntegerv(gl::VIEWPORT, saved.viewport.as_mut_ptr());
        }

        let fbo = match self.ensure_fbo(texture) {
            Ok(fbo) => fbo,
            Err(err) => {
                unsafe {
                    gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, saved.draw_fbo as GLuint);
                }
                return Err(err);
            }
        };

        unsafe {
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, fbo);
            gl::Viewport(0, 0, width as GLint, height as GLint);
        }
        self.target_stack.push(saved);
        Ok(())
    }

    fn end_target(&mut self) {
        let Some(saved) = self.target_stack.pop() else {
            return;
        };
        unsafe {
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, saved.draw_fbo as GLuint);
            gl::Viewport(
                saved.viewport[0],
                saved.viewport[1],
                saved.viewport[2],
                saved.viewport[3],
            );
        }
    }

    fn set_ortho(&mut self, left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) {
        self.projection = ortho(left, right, top, bottom, near, far);
    }

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u8) {
        let mut bits: GLenum = 0;
        unsafe {
            if flags.contains(ClearFlags::COLOR) {
                gl::ClearColor(color[0], color[1], color[2], color[3]);
                bits |= gl::COLOR_BUFFER_BIT;
            }
            if flags.contains(ClearFlags::DEPTH) {
                gl::ClearDepth(depth as f64);
                bits |= gl::DEPTH_BUFFER_BIT;
            }
            if flags.contains(ClearFlags::STENCIL) {
                gl::ClearStencil(stencil as GLint);
                bits |= gl::STENCIL_BUFFER_BIT;
            }
            if bits != 0 {
                gl::Clear(bits);
            }
        }
    }

    fn push_pass_state(&mut self, state: &PassState) {
        let mut saved = SavedPassState {
            blend_enabled: false,
            blend_src_rgb: 0,
            blend_dst_rgb: 0,
            blend_src_alpha: 0,
            blend_dst_alpha: 0,
            depth_test: false,
            stencil_test: false,
            stencil_writemask: 0,
            color_mask: [0; 4],
            cull_enabled: false,
            cull_mode: 0,
        };
        unsafe {
            saved.blend_enabled = gl::IsEnabled(gl::BLEND) == gl::TRUE;
            gl::GetIntegerv(gl::BLEND_SRC_RGB, &mut saved.blend_src_rgb);
            gl::GetIntegerv(gl::BLEND_DST_RGB, &mut saved.blend_dst_rgb);
            gl::GetIntegerv(gl::BLEND_SRC_ALPHA, &mut saved.blend_src_alpha);
            gl::GetIntegerv(gl::BLEND_DST_ALPHA, &mut saved.blend_dst_alpha);
            saved.depth_test = gl::IsEnabled(gl::DEPTH_TEST) == gl::TRUE;
            saved.stencil_test = gl::IsEnabled(gl::STENCIL_TEST) == gl::TRUE;
            gl::GetIntegerv(gl::STENCIL_WRITEMASK, &mut saved.stencil_writemask);
            gl::GetBooleanv(gl::COLOR_WRITEMASK, saved.color_mask.as_mut_ptr());
            saved.cull_enabled = gl::IsEnabled(gl::CULL_FACE) == gl::TRUE;
            gl::GetIntegerv(gl::CULL_FACE_MODE, &mut saved.cull_mode);

            if state.blend_enabled {
                gl::Enable(gl::BLEND);
            } else {
                gl::Disable(gl::BLEND);
            }
            gl::BlendFuncSeparate(
                gl_blend_factor(state.blend.src_color),
                gl_blend_factor(state.blend.dst_color),
                gl_blend_factor(state.blend.src_alpha),
                gl_blend_factor(state.blend.dst_alpha),
            );
            if state.depth_test {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
            if state.stencil_test {
                gl::Enable(gl::STENCIL_TEST);
            } else {
                gl::Disable(gl::STENCIL_TEST);
            }
            gl::StencilMask(if state.stencil_write { 0xFF } else { 0 });
            gl::ColorMask(
                state.color_mask[0] as GLboolean,
                state.color_mask[1] as GLboolean,
                state.color_mask[2] as GLboolean,
                state.color_mask[3] as GLboolean,
            );
            match state.cull {
                CullMode::Neither => gl::Disable(gl::CULL_FACE),
                CullMode::Front => {
                    gl::Enable(gl::CULL_FACE);
                    gl::CullFace(gl::FRONT);
                }
                CullMode::Back => {
                    gl::Enable(gl::CULL_FACE);
                    gl::CullFace(gl::BACK);
                }
            }
        }
        self.state_stack.push(saved);
    }

    fn pop_pass_state(&mut self) {
        let Some(saved) = self.state_stack.pop() else {
            return;
        };
        unsafe {
            if saved.blend_enabled {
                gl::Enable(gl::BLEND);
            } else {
                gl::Disable(gl::BLEND);
            }
            gl::BlendFuncSeparate(
                saved.blend_src_rgb as GLenum,
                saved.blend_dst_rgb as GLenum,
                saved.blend_src_alpha as GLenum,
                saved.blend_dst_alpha as GLenum,
            );
            if saved.depth_test {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
            if saved.stencil_test {
                gl::Enable(gl::STENCIL_TEST);
            } else {
                gl::Disable(gl::STENCIL_TEST);
            }
            gl::StencilMask(saved.stencil_writemask as GLuint);
            gl::ColorMask(
                saved.color_mask[0],
                saved.color_mask[1],
                saved.color_mask[2],
                saved.color_mask[3],
            );
            if saved.cull_enabled {
                gl::Enable(gl::CULL_FACE);
                gl::CullFace(saved.cull_mode as GLenum);
            } else {
                gl::Disable(gl::CULL_FACE);
            }
        }
    }

    fn debug_group_begin(&mut self, color: DebugColor, label: &str) {
        if !gl::PushDebugGroup::is_loaded() {
            return;
        }
        // KHR_debug groups carry no color; encode it in the message id so
        // trace tools can still group by kind.
        let id = match color {
            DebugColor::Source => 1,
            DebugColor::Render => 2,
            DebugColor::Convert => 3,
        };
        let message = CString::new(label).unwrap_or_default();
        unsafe {
            gl::PushDebugGroup(
                gl::DEBUG_SOURCE_APPLICATION,
                id,
                message.as_bytes().len() as i32,
                message.as_ptr(),
            );
        }
    }

    fn debug_group_end(&mut self) {
        if gl::PopDebugGroup::is_loaded() {
            unsafe {
                gl::PopDebugGroup();
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn gl_format(format: ColorFormat) -> UncompressedFloatFormat {
    match format {
        // GL stores both as RGBA8; Bgra only changes host upload order.
        ColorFormat::Rgba | ColorFormat::Bgra => UncompressedFloatFormat::U8U8U8U8,
        ColorFormat::Rgba16F => UncompressedFloatFormat::F16F16F16F16,
    }
}

fn gl_blend_factor(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::Zero => gl::ZERO,
        BlendFactor::One => gl::ONE,
        BlendFactor::SrcColor => gl::SRC_COLOR,
        BlendFactor::InvSrcColor => gl::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => gl::SRC_ALPHA,
        BlendFactor::InvSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstColor => gl::DST_COLOR,
        BlendFactor::InvDstColor => gl::ONE_MINUS_DST_COLOR,
        BlendFactor::DstAlpha => gl::DST_ALPHA,
        BlendFactor::InvDstAlpha => gl::ONE_MINUS_DST_ALPHA,
    }
}

fn identity() -> [[f32; 4]; 4] {
    let mut m = [[0.0; 4]; 4];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

/// Column-major orthographic projection; `top`/`bottom` follow screen
/// convention (top-left origin when called as `(0, w, 0, h)`).
fn ortho(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> [[f32; 4]; 4] {
    let rl = right - left;
    let tb = top - bottom;
    let fne = far - near;

    let mut m = [[0.0; 4]; 4];
    m[0][0] = 2.0 / rl;
    m[1][1] = 2.0 / tb;
    m[2][2] = -2.0 / fne;
    m[3][0] = -(right + left) / rl;
    m[3][1] = -(top + bottom) / tb;
    m[3][2] = -(far + near) / fne;
    m[3][3] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ortho_maps_corners_to_clip_space() {
        let m = ortho(0.0, 1920.0, 0.0, 1080.0, -1.0, 1.0);

        // Top-left corner (0, 0) lands at clip (-1, +1): the y axis flips
        // because top precedes bottom in the argument order.
        let x0 = m[0][0] * 0.0 + m[3][0];
        let y0 = m[1][1] * 0.0 + m[3][1];
        assert!((x0 + 1.0).abs() < 1e-6);
        assert!((y0 - 1.0).abs() < 1e-6);

        // Bottom-right corner (1920, 1080) lands at clip (+1, -1).
        let x1 = m[0][0] * 1920.0 + m[3][0];
        let y1 = m[1][1] * 1080.0 + m[3][1];
        assert!((x1 - 1.0).abs() < 1e-6);
        assert!((y1 + 1.0).abs() < 1e-6);
    }
}
