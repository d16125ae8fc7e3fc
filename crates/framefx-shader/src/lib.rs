//! Shader filter node for framefx hosts.
//!
//! Captures the upstream source's image into an offscreen surface, runs it
//! through a user-configurable shader effect, and hands the result to the
//! host's render chain. The shader engine itself stays behind the
//! [`Effect`] seam; this crate only orchestrates its lifecycle:
//!
//! - [`OffscreenTarget`] — the resize-on-demand capture surface.
//! - [`ShaderFilter`] — per-node tick/render/settings orchestration.
//! - [`ShaderFilterFactory`] — host registration, defaults, properties.

pub mod effect;
pub mod factory;
pub mod instance;
pub mod target;

// Re-export primary types at crate root for convenience.
pub use effect::{Effect, EffectEngine, EffectMode};
pub use factory::{register, unregister, ShaderFilterFactory, FILTER_SHADER_ID};
pub use instance::ShaderFilter;
pub use target::{OffscreenTarget, TargetScope};
