//! Scoped debug markers for GPU trace tooling.

use std::ops::{Deref, DerefMut};

use super::device::Device;

/// Marker tint shown by capture tools that support colored scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    /// Pulling pixels out of a source.
    Source,
    /// Producing final output.
    Render,
    /// Format or colorspace conversion work.
    Convert,
}

impl DebugColor {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            DebugColor::Source => [0.0, 0.5, 1.0, 1.0],
            DebugColor::Render => [1.0, 0.5, 0.0, 1.0],
            DebugColor::Convert => [0.5, 0.0, 1.0, 1.0],
        }
    }
}

/// RAII debug group: opens on construction, closes when dropped, including
/// on early returns out of a pass.
///
/// Derefs to the wrapped [`Device`] so a pass can keep issuing commands
/// through the scope without juggling two bindings.
pub struct DebugScope<'a> {
    device: &'a mut dyn Device,
}

impl<'a> DebugScope<'a> {
    pub fn begin(device: &'a mut dyn Device, color: DebugColor, label: &str) -> Self {
        device.debug_group_begin(color, label);
        Self { device }
    }
}

impl<'a> Deref for DebugScope<'a> {
    type Target = dyn Device + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.device
    }
}

impl<'a> DerefMut for DebugScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.device
    }
}

impl Drop for DebugScope<'_> {
    fn drop(&mut self) {
        self.device.debug_group_end();
    }
}
