//! OpenGL backend for framefx nodes, built on glium over the host's GL
//! context.
//!
//! [`GliumContext`] bootstraps a glium context against the context the host
//! already made current; [`GliumDevice`] implements the backend-neutral
//! [`framefx_core::gs::Device`] surface on top of it.
//!
//! ### Warning
//!
//! This crate makes assumptions about the OpenGL context inside the host.
//! Use it only from host render callbacks.

use std::rc::Rc;

use anyhow::{Context as _, Result};
use glium::backend::Context;
use glium::CapabilitiesSource;
use tracing::debug;

pub mod backend;
pub mod device;

pub use backend::HostGlBackend;
pub use device::GliumDevice;

/// glium context wrapping the host's GL context.
pub struct GliumContext {
    backend: Rc<HostGlBackend>,
    ctx: Rc<Context>,
}

impl GliumContext {
    /// Build against the context current on this thread.
    pub fn from_host_gl(dimensions: (u32, u32)) -> Result<Self> {
        let backend = Rc::new(HostGlBackend::new(dimensions));

        let ctx = unsafe {
            Context::new(
                backend.clone(),
                false,
                glium::debug::DebugCallbackBehavior::Ignore,
            )
        }
        .context("host GL context is not glium-compatible")?;

        debug!(
            version = %ctx.get_opengl_version_string(),
            glsl = ?ctx.get_capabilities().supported_glsl_versions,
            "wrapped host GL context"
        );

        Ok(Self { backend, ctx })
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.ctx
    }

    /// Update the output dimensions the backend reports to glium.
    pub fn set_dimensions(&self, dimensions: (u32, u32)) {
        self.backend.set_dimensions(dimensions);
    }

    /// Resynchronize glium's state cache after raw GL calls touched
    /// bindings behind its back.
    pub fn resync(&self) {
        unsafe {
            if let Err(err) = self.ctx.rebuild(self.backend.clone()) {
                tracing::error!("glium context rebuild failed: {err:?}");
            }
        }
    }
}
