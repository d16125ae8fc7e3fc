//! The seam to the shader-effect engine.
//!
//! The engine owns everything about shaders: source loading, compilation,
//! parameter discovery, uniform binding. The filter only drives the
//! lifecycle below and stays ignorant of what the effect actually draws.

use anyhow::Result;

use framefx_core::gs::{Device, TextureId};
use framefx_core::host::NodeHandle;
use framefx_core::properties::Properties;
use framefx_core::settings::SettingsData;

/// How the effect is being hosted, which changes its sizing and parameter
/// behavior inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMode {
    Source,
    Filter,
    Transition,
}

/// One live shader effect bound to a node.
///
/// Render contract per frame: [`prepare_render`](Effect::prepare_render),
/// then [`set_input`](Effect::set_input) with the captured upstream
/// texture, then [`render`](Effect::render) into whatever target the host
/// currently composites into.
pub trait Effect {
    /// Declared output width. Zero until the effect has a usable size.
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Tell the effect how large its downstream target is. The engine may
    /// derive its declared size from this or override it per effect.
    fn set_size(&mut self, width: u32, height: u32);

    /// Advance time-driven state. Returns `true` when the effect's
    /// parameters must be re-derived from current settings (periodic
    /// reseeds, time uniforms crossing a refresh boundary).
    fn tick(&mut self, seconds: f32) -> bool;

    /// Re-derive all parameters from the settings snapshot.
    fn update(&mut self, settings: &SettingsData);

    /// Describe the effect's parameters for the host UI.
    fn properties(&self, props: &mut Properties);

    fn prepare_render(&mut self, device: &mut dyn Device) -> Result<()>;

    /// Bind the primary input texture for the next [`render`](Effect::render).
    fn set_input(&mut self, texture: TextureId);

    fn render(&mut self, device: &mut dyn Device) -> Result<()>;
}

/// Engine-level surface: effect construction and type defaults.
pub trait EffectEngine: Send + Sync {
    /// Create an effect bound to `node`. Fails on engine allocation
    /// failure, which callers treat as fatal.
    fn create_effect(&self, node: NodeHandle, mode: EffectMode) -> Result<Box<dyn Effect>>;

    /// Populate the engine's default settings for a fresh effect.
    fn defaults(&self, settings: &mut SettingsData);
}
