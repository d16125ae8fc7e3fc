//! The node-type capability table.
//!
//! A host drives every node through one trait boundary: [`SourceFactory`]
//! for type-level concerns (metadata, defaults, properties, creation) and
//! [`SourceInstance`] for per-node lifecycle callbacks. Implement each
//! exactly once per node type.

use anyhow::Result;

use crate::gs::Device;
use crate::host::{EffectHandle, NodeHandle};
use crate::properties::Properties;
use crate::settings::SettingsData;

/// Node produces video output.
pub const OUTPUT_VIDEO: u32 = 1 << 0;
/// Node draws itself; the host must not apply its default compositing.
pub const OUTPUT_CUSTOM_DRAW: u32 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Input,
    Filter,
    Transition,
}

/// Static registration metadata for one node type.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Stable identifier persisted in scene data. Never change it.
    pub id: &'static str,
    pub source_type: SourceType,
    pub output_flags: u32,
}

/// Per-node lifecycle, called by the host on its render thread.
///
/// The host guarantees one `video_tick` followed by the matching
/// `video_render` per output frame, never interleaved with another node's
/// callbacks on the same thread. Destruction is `Drop`.
pub trait SourceInstance {
    /// Declared output width, used by the host to size the node before the
    /// first rendered frame.
    fn width(&self) -> u32;

    /// Declared output height.
    fn height(&self) -> u32;

    /// Describe editable settings. Default: no properties.
    fn properties(&mut self, _props: &mut Properties) {}

    /// Settings were loaded from persisted scene data.
    fn load(&mut self, _settings: &SettingsData) {}

    /// Settings changed at runtime.
    fn update(&mut self, _settings: &SettingsData) {}

    /// Persisted settings predate `version`; rewrite them in place.
    fn migrate(&mut self, _settings: &SettingsData, _version: u64) {}

    /// Time-driven state update, before the frame's render.
    fn video_tick(&mut self, _seconds: f32) {}

    /// Render the frame. `effect` is the host's compositing effect for
    /// nodes that want it.
    ///
    /// Errors are reserved for unrecoverable resource failures; the host
    /// tears the instance down on `Err`. Per-frame conditions (no upstream
    /// image, degenerate size) are handled internally and return `Ok`.
    fn video_render(
        &mut self,
        _device: &mut dyn Device,
        _effect: Option<EffectHandle>,
    ) -> Result<()> {
        Ok(())
    }

    /// Node became part of the active output.
    fn activate(&mut self) {}

    fn deactivate(&mut self) {}

    /// Node became visible in any view (preview included).
    fn show(&mut self) {}

    fn hide(&mut self) {}
}

/// Type-level surface registered with the host.
pub trait SourceFactory: Send + Sync {
    fn info(&self) -> &SourceInfo;

    /// Localized display name for UI listings.
    fn display_name(&self) -> String;

    /// Populate factory defaults for a fresh node's settings.
    fn defaults(&self, _settings: &mut SettingsData) {}

    /// Build the property descriptor set. `instance` is `None` when the
    /// host asks for type-level defaults with no live node.
    fn properties(&self, instance: Option<&mut dyn SourceInstance>) -> Properties;

    /// Create a node instance from its initial settings.
    ///
    /// Fails only on collaborator allocation failure; no partially
    /// constructed instance survives an `Err`.
    fn create(
        &self,
        settings: &SettingsData,
        node: NodeHandle,
    ) -> Result<Box<dyn SourceInstance>>;
}
