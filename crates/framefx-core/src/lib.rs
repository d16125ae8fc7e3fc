//! Host plugin protocol for framefx video nodes.
//!
//! This crate defines the boundary between a video-compositing host and the
//! node modules it loads:
//!
//! - [`source`] — the capability table a node type implements
//!   ([`SourceFactory`] / [`SourceInstance`]).
//! - [`host`] — the services a running node consumes ([`HostNode`]).
//! - [`gs`] — the backend-neutral graphics surface nodes render through.
//! - [`settings`] / [`properties`] — configuration data crossing the
//!   boundary in both directions.
//! - [`registry`] / [`logging`] / [`locale`] — module load plumbing.
//!
//! Everything is single-threaded by contract: hosts serialize all calls to
//! a given node on their render thread.

pub mod gs;
pub mod host;
pub mod locale;
pub mod logging;
pub mod properties;
pub mod registry;
pub mod settings;
pub mod source;

// Re-export primary types at crate root for convenience.
pub use gs::{ClearFlags, ColorFormat, DebugColor, DebugScope, Device, PassState, TextureId};
pub use host::{BaseEffect, CaptureMode, EffectHandle, HostNode, HostSource, NodeHandle};
pub use properties::{Properties, Property, PropertyKind};
pub use registry::Registry;
pub use settings::SettingsData;
pub use source::{
    SourceFactory, SourceInfo, SourceInstance, SourceType, OUTPUT_CUSTOM_DRAW, OUTPUT_VIDEO,
};
