//! Per-node filter state and the two-pass render.

use anyhow::Result;
use tracing::error;

use framefx_core::gs::{ClearFlags, ColorFormat, DebugColor, DebugScope, Device, PassState};
use framefx_core::host::{BaseEffect, CaptureMode, EffectHandle, NodeHandle};
use framefx_core::properties::Properties;
use framefx_core::settings::SettingsData;
use framefx_core::source::SourceInstance;

use crate::effect::{Effect, EffectEngine, EffectMode};
use crate::target::OffscreenTarget;

/// One shader filter node.
///
/// Owns its effect and offscreen capture surface exclusively; the node
/// handle stays host-owned. Frames flow capture-first: the upstream image
/// is resolved into the offscreen surface, then the effect samples it while
/// drawing into whatever the host is compositing.
pub struct ShaderFilter {
    node: NodeHandle,
    fx: Box<dyn Effect>,
    rt: OffscreenTarget,
}

impl ShaderFilter {
    /// Create the node's effect (in filter mode) and capture surface, then
    /// apply the initial settings.
    ///
    /// Fails only when the engine cannot create the effect; nothing is
    /// left behind on failure.
    pub fn new(
        engine: &dyn EffectEngine,
        settings: &SettingsData,
        node: NodeHandle,
    ) -> Result<Self> {
        let fx = engine.create_effect(node.clone(), EffectMode::Filter)?;
        let rt = OffscreenTarget::new(ColorFormat::Rgba);

        let mut this = Self { node, fx, rt };
        this.update(settings);
        Ok(this)
    }
}

impl SourceInstance for ShaderFilter {
    fn width(&self) -> u32 {
        self.fx.width()
    }

    fn height(&self) -> u32 {
        self.fx.height()
    }

    fn properties(&mut self, props: &mut Properties) {
        self.fx.properties(props);
    }

    fn load(&mut self, settings: &SettingsData) {
        self.update(settings);
    }

    // No settings migrations have shipped; the hook stays so hosts can
    // version persisted settings without this filter caring.
    fn migrate(&mut self, _settings: &SettingsData, _version: u64) {}

    /// The one place effect parameters are derived from settings. Every
    /// other path (load, tick-triggered refresh) funnels through here.
    fn update(&mut self, settings: &SettingsData) {
        self.fx.update(settings);
    }

    fn video_tick(&mut self, seconds: f32) {
        if self.fx.tick(seconds) {
            let settings = self.node.settings();
            self.update(&settings);
        }

        let sizing = self
            .node
            .filter_target()
            .or_else(|| self.node.filter_parent());
        if let Some(source) = sizing {
            self.fx.set_size(source.base_width(), source.base_height());
        }
    }

    fn video_render(
        &mut self,
        device: &mut dyn Device,
        _effect: Option<EffectHandle>,
    ) -> Result<()> {
        let width = self.fx.width();
        let height = self.fx.height();
        if width == 0 || height == 0 {
            // Normal transient state (source not connected yet), not an
            // error: hand the frame back untouched.
            self.node.skip_video_filter();
            return Ok(());
        }

        let name = self.node.name();

        {
            let mut scope =
                DebugScope::begin(device, DebugColor::Source, &format!("{name}: Capture"));

            let mut pass = self.rt.render(&mut *scope, width, height)?;
            pass.set_ortho(0.0, width as f32, 0.0, height as f32, -1.0, 1.0);
            pass.clear(ClearFlags::COLOR | ClearFlags::DEPTH, [0.0; 4], 1.0, 0);

            if !self
                .node
                .begin_filter_capture(ColorFormat::Rgba, CaptureMode::Intermediate)
            {
                // No upstream frame this tick; skip and try again next frame.
                self.node.skip_video_filter();
                return Ok(());
            }

            pass.push_pass_state(&PassState::straight_copy());
            let effect = self.node.base_effect(BaseEffect::Default);
            self.node.end_filter_capture(effect, width, height);
            pass.pop_pass_state();
        }

        {
            let mut scope =
                DebugScope::begin(device, DebugColor::Render, &format!("{name}: Render"));

            let mut result = self.fx.prepare_render(&mut *scope);
            if result.is_ok() {
                if let Some(texture) = self.rt.texture() {
                    self.fx.set_input(texture);
                }
                result = self.fx.render(&mut *scope);
            }

            // Contained: the frame composites whatever the host has, state
            // stays clean for the next one.
            if let Err(err) = result {
                error!("{name}: effect render failed: {err:?}");
            }
        }

        Ok(())
    }
}
