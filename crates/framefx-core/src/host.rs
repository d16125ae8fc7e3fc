//! Services the host provides to a running node.
//!
//! Everything a node may ask of its host during a callback is collected in
//! [`HostNode`]. The host hands each node one shared handle at creation;
//! the node keeps it for its lifetime but never owns the underlying graph
//! entry.

use std::rc::Rc;

use crate::gs::ColorFormat;
use crate::settings::SettingsData;

/// Opaque handle to a host-owned shader effect (e.g. the host's default
/// passthrough effect used to resolve a source's pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectHandle(pub u64);

/// Which of the host's built-in effects to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEffect {
    Default,
    Opaque,
    Premultiplied,
}

/// How a filter capture resolves the upstream image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Host may draw the upstream chain straight into the bound target.
    Direct,
    /// Host resolves the upstream chain through its own intermediate
    /// surface before drawing it into the bound target.
    Intermediate,
}

/// Read-only view of another node in the graph, used for size negotiation.
pub trait HostSource {
    /// Width of the node's image before any filters are applied.
    fn base_width(&self) -> u32;

    /// Height of the node's image before any filters are applied.
    fn base_height(&self) -> u32;
}

/// Per-node host services, called only from the host's render thread.
pub trait HostNode {
    /// Display name of the node, for logs and debug markers.
    fn name(&self) -> String;

    /// Snapshot of the node's current persisted settings.
    fn settings(&self) -> SettingsData;

    /// The node this filter is directly attached to, if the graph exposes
    /// one.
    fn filter_target(&self) -> Option<Rc<dyn HostSource>>;

    /// The node at the root of this filter's chain.
    fn filter_parent(&self) -> Option<Rc<dyn HostSource>>;

    fn base_effect(&self, which: BaseEffect) -> EffectHandle;

    /// Start resolving the upstream image for a filter capture. Returns
    /// `false` when no upstream frame is available this frame.
    fn begin_filter_capture(&self, format: ColorFormat, mode: CaptureMode) -> bool;

    /// Draw the resolved upstream image into the currently bound target at
    /// the given size, using `effect`. Must follow a successful
    /// [`begin_filter_capture`](HostNode::begin_filter_capture).
    fn end_filter_capture(&self, effect: EffectHandle, width: u32, height: u32);

    /// Tell the host to composite the unmodified upstream frame instead of
    /// this filter's output for the current frame.
    fn skip_video_filter(&self);
}

/// Shared, host-owned node handle. Single render thread, so plain `Rc`.
pub type NodeHandle = Rc<dyn HostNode>;
