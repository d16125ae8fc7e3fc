//! Fixed-function pass state.

/// Source/destination weighting for one blend input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    SrcAlpha,
    InvSrcAlpha,
    DstColor,
    InvDstColor,
    DstAlpha,
    InvDstAlpha,
}

/// Separate color/alpha blend functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendFunction {
    pub src_color: BlendFactor,
    pub dst_color: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Front,
    Back,
    Neither,
}

/// Complete blend/depth/stencil/cull/mask state for one render pass.
///
/// Pushed around a pass via [`Device::push_pass_state`] and restored by the
/// matching pop; nodes never leave this state behind for the host.
///
/// [`Device::push_pass_state`]: super::Device::push_pass_state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassState {
    pub blend_enabled: bool,
    pub blend: BlendFunction,
    pub depth_test: bool,
    pub stencil_test: bool,
    pub stencil_write: bool,
    pub color_mask: [bool; 4],
    pub cull: CullMode,
}

impl Default for PassState {
    /// The compositing default most hosts run with: straight-alpha-over
    /// blending, no depth or stencil, all channels written, no culling.
    fn default() -> Self {
        Self {
            blend_enabled: true,
            blend: BlendFunction {
                src_color: BlendFactor::SrcAlpha,
                dst_color: BlendFactor::InvSrcAlpha,
                src_alpha: BlendFactor::One,
                dst_alpha: BlendFactor::InvSrcAlpha,
            },
            depth_test: false,
            stencil_test: false,
            stencil_write: false,
            color_mask: [true; 4],
            cull: CullMode::Neither,
        }
    }
}

impl PassState {
    /// State for copying a source into a target verbatim: blending off,
    /// color replaces destination, alpha replaces destination, every test
    /// disabled, every channel written, no culling.
    pub fn straight_copy() -> Self {
        Self {
            blend_enabled: false,
            blend: BlendFunction {
                src_color: BlendFactor::One,
                dst_color: BlendFactor::Zero,
                src_alpha: BlendFactor::SrcAlpha,
                dst_alpha: BlendFactor::Zero,
            },
            depth_test: false,
            stencil_test: false,
            stencil_write: false,
            color_mask: [true; 4],
            cull: CullMode::Neither,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_copy_replaces_destination() {
        let state = PassState::straight_copy();
        assert!(!state.blend_enabled);
        assert_eq!(state.blend.src_color, BlendFactor::One);
        assert_eq!(state.blend.dst_color, BlendFactor::Zero);
        assert_eq!(state.blend.src_alpha, BlendFactor::SrcAlpha);
        assert_eq!(state.blend.dst_alpha, BlendFactor::Zero);
        assert!(!state.depth_test);
        assert!(!state.stencil_test);
        assert!(!state.stencil_write);
        assert_eq!(state.color_mask, [true; 4]);
        assert_eq!(state.cull, CullMode::Neither);
    }
}
