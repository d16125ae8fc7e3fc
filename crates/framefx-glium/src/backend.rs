//! glium backend over the GL context the host already made current.

use std::cell::Cell;
use std::sync::Once;

static GL_INIT_ONCE: Once = Once::new();

/// Wraps the host's context for glium. The host owns context currency and
/// buffer swaps; this backend only reports dimensions and resolves symbols.
pub struct HostGlBackend {
    dimensions: Cell<(u32, u32)>,
}

impl HostGlBackend {
    /// Create a backend for the current host context.
    ///
    /// GL function pointers are loaded exactly once per process via
    /// `gl_loader`.
    pub fn new(dimensions: (u32, u32)) -> Self {
        GL_INIT_ONCE.call_once(|| {
            gl_loader::init_gl();
            gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        });

        Self {
            dimensions: Cell::new(dimensions),
        }
    }

    /// Update the reported framebuffer dimensions. Hosts resize between
    /// frames, never mid-callback.
    pub fn set_dimensions(&self, dimensions: (u32, u32)) {
        self.dimensions.set(dimensions);
    }
}

/// # Safety
///
/// Only valid inside host render callbacks, where the host guarantees its
/// OpenGL context is current on the calling thread.
unsafe impl glium::backend::Backend for HostGlBackend {
    fn swap_buffers(&self) -> Result<(), glium::SwapBuffersError> {
        Ok(())
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const std::os::raw::c_void {
        gl_loader::get_proc_address(symbol).cast()
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.dimensions.get()
    }

    fn is_current(&self) -> bool {
        true
    }

    unsafe fn make_current(&self) {}

    fn resize(&self, _new_size: (u32, u32)) {}
}
