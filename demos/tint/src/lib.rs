//! Tint effect engine for the framefx shader filter.
//!
//! The smallest useful [`Effect`]: multiplies the captured upstream image
//! by a configurable color. Demonstrates what an engine has to provide —
//! settings-derived parameters, periodic refresh, downstream sizing, and
//! the prepare/bind/render contract against the GL backend.

use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use gl::types::{GLint, GLuint};
use glium::backend::Context;
use glium::index::{NoIndices, PrimitiveType};
use glium::texture::{MipmapsOption, Texture2d, UncompressedFloatFormat};
use glium::uniform;
use glium::uniforms::MagnifySamplerFilter;
use glium::vertex::EmptyVertexAttributes;
use glium::{Frame, Program, Surface};
use tracing::debug;

use framefx_core::gs::{Device, TextureId};
use framefx_core::host::NodeHandle;
use framefx_core::properties::Properties;
use framefx_core::registry::Registry;
use framefx_core::settings::SettingsData;
use framefx_glium::GliumDevice;
use framefx_shader::effect::{Effect, EffectEngine, EffectMode};

const SETTING_COLOR: &str = "tint.color";
const SETTING_STRENGTH: &str = "tint.strength";
const SETTING_REFRESH: &str = "tint.refresh";

const VERTEX_SRC: &str = r#"
#version 330 core

out vec2 v_uv;

void main() {
    vec2 pos = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    v_uv = pos;
    gl_Position = vec4(pos * 2.0 - 1.0, 0.0, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"
#version 330 core

in vec2 v_uv;
out vec4 color;

uniform sampler2D u_image;
uniform vec4 u_tint;
uniform float u_strength;

void main() {
    vec4 px = texture(u_image, v_uv);
    color = vec4(mix(px.rgb, px.rgb * u_tint.rgb, u_strength), px.a);
}
"#;

/// 0xRRGGBB integer (how hosts persist color pickers) to linear-ish rgba.
fn unpack_color(packed: i64) -> [f32; 4] {
    let r = ((packed >> 16) & 0xFF) as f32 / 255.0;
    let g = ((packed >> 8) & 0xFF) as f32 / 255.0;
    let b = (packed & 0xFF) as f32 / 255.0;
    [r, g, b, 1.0]
}

pub struct TintEffect {
    node: NodeHandle,
    size: (u32, u32),
    color: [f32; 4],
    strength: f32,
    refresh_interval: f32,
    since_refresh: f32,
    input: Option<TextureId>,
    program: Option<Program>,
    output: Option<Texture2d>,
}

impl TintEffect {
    fn new(node: NodeHandle) -> Self {
        Self {
            node,
            size: (0, 0),
            color: [1.0; 4],
            strength: 1.0,
            refresh_interval: 1.0,
            since_refresh: 0.0,
            input: None,
            program: None,
            output: None,
        }
    }

    fn ensure_resources(&mut self, ctx: &Rc<Context>) -> Result<()> {
        if self.program.is_none() {
            self.program = Some(
                Program::from_source(ctx, VERTEX_SRC, FRAGMENT_SRC, None)
                    .context("tint shader failed to compile")?,
            );
            debug!(node = %self.node.name(), "compiled tint program");
        }

        let current = self
            .output
            .as_ref()
            .map(|t| (t.get_width(), t.get_height().unwrap_or(0)));
        if current != Some(self.size) {
            self.output = Some(
                Texture2d::empty_with_format(
                    ctx,
                    UncompressedFloatFormat::U8U8U8U8,
                    MipmapsOption::NoMipmap,
                    self.size.0,
                    self.size.1,
                )
                .context("tint output allocation failed")?,
            );
        }
        Ok(())
    }
}

impl Effect for TintEffect {
    fn width(&self) -> u32 {
        self.size.0
    }

    fn height(&self) -> u32 {
        self.size.1
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn tick(&mut self, seconds: f32) -> bool {
        self.since_refresh += seconds;
        if self.since_refresh >= self.refresh_interval {
            self.since_refresh = 0.0;
            return true;
        }
        false
    }

    fn update(&mut self, settings: &SettingsData) {
        self.color = unpack_color(settings.get_int_or(SETTING_COLOR, 0xFFFFFF));
        self.strength = settings.get_float_or(SETTING_STRENGTH, 1.0).clamp(0.0, 1.0) as f32;
        self.refresh_interval = settings.get_float_or(SETTING_REFRESH, 1.0).max(0.05) as f32;
    }

    fn properties(&self, props: &mut Properties) {
        props
            .add_color(SETTING_COLOR, "Tint Color")
            .add_float(SETTING_STRENGTH, "Strength", 0.0, 1.0, 0.01)
            .add_float(SETTING_REFRESH, "Refresh Interval", 0.05, 10.0, 0.05);
    }

    fn prepare_render(&mut self, device: &mut dyn Device) -> Result<()> {
        let gl_device = device
            .as_any_mut()
            .downcast_mut::<GliumDevice>()
            .ok_or_else(|| anyhow!("tint effect requires the GL backend"))?;
        let ctx = gl_device.context().clone();
        self.ensure_resources(&ctx)
    }

    fn set_input(&mut self, texture: TextureId) {
        self.input = Some(texture);
    }

    fn render(&mut self, device: &mut dyn Device) -> Result<()> {
        let gl_device = device
            .as_any_mut()
            .downcast_mut::<GliumDevice>()
            .ok_or_else(|| anyhow!("tint effect requires the GL backend"))?;
        let ctx = gl_device.context().clone();

        let input_id = self.input.ok_or_else(|| anyhow!("no input bound"))?;
        let input = gl_device
            .texture(input_id)
            .ok_or_else(|| anyhow!("input texture no longer exists"))?;
        let (program, output) = match (&self.program, &self.output) {
            (Some(program), Some(output)) => (program, output),
            _ => bail!("prepare_render was not called"),
        };

        // The host's compositing target is whatever is bound right now;
        // remember it before glium rebinds framebuffers underneath us.
        let mut host_draw: GLint = 0;
        unsafe {
            gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut host_draw);
        }

        let mut fb = glium::framebuffer::SimpleFrameBuffer::new(&ctx, output)
            .context("tint framebuffer failed")?;
        fb.clear_color(0.0, 0.0, 0.0, 0.0);
        fb.draw(
            EmptyVertexAttributes { len: 3 },
            NoIndices(PrimitiveType::TrianglesList),
            program,
            &uniform! {
                u_image: input
                    .sampled()
                    .magnify_filter(MagnifySamplerFilter::Linear),
                u_tint: self.color,
                u_strength: self.strength,
            },
            &glium::DrawParameters::default(),
        )?;

        // Fill the default framebuffer, then blit into the host's target.
        let (width, height) = self.size;
        let frame = Frame::new(ctx.clone(), (width, height));
        fb.fill(&frame, MagnifySamplerFilter::Nearest);
        unsafe {
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, host_draw as GLuint);
            gl::BlitFramebuffer(
                0,
                0,
                width as GLint,
                height as GLint,
                0,
                0,
                width as GLint,
                height as GLint,
                gl::COLOR_BUFFER_BIT,
                gl::NEAREST,
            );
        }
        frame.finish()?;

        Ok(())
    }
}

/// Engine wrapper: one effect type, filter hosting only.
pub struct TintEngine;

impl EffectEngine for TintEngine {
    fn create_effect(&self, node: NodeHandle, mode: EffectMode) -> Result<Box<dyn Effect>> {
        if mode != EffectMode::Filter {
            bail!("tint effect only supports filter hosting");
        }
        Ok(Box::new(TintEffect::new(node)))
    }

    fn defaults(&self, settings: &mut SettingsData) {
        settings.set_int(SETTING_COLOR, 0xFFFFFF);
        settings.set_float(SETTING_STRENGTH, 1.0);
        settings.set_float(SETTING_REFRESH, 1.0);
    }
}

/// Module entry: install logging and register the shader filter backed by
/// the tint engine.
pub fn module_load(registry: &mut Registry) -> bool {
    framefx_core::logging::init();
    framefx_shader::register(registry, Arc::new(TintEngine))
}

pub fn module_unload(registry: &mut Registry) {
    framefx_shader::unregister(registry);
}
