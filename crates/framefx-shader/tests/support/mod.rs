//! Recording doubles for the host, device, and effect engine.
//!
//! All doubles append to one shared event log so tests can assert ordering
//! across the host/device/effect boundaries, not just per-collaborator
//! call counts.
#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};

use framefx_core::gs::{
    ClearFlags, ColorFormat, DebugColor, Device, PassState, TextureId,
};
use framefx_core::host::{
    BaseEffect, CaptureMode, EffectHandle, HostNode, HostSource, NodeHandle,
};
use framefx_core::properties::Properties;
use framefx_core::settings::SettingsData;
use framefx_shader::effect::{Effect, EffectEngine, EffectMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateTexture { texture: u64, width: u32, height: u32 },
    DestroyTexture { texture: u64 },
    BeginTarget { texture: u64 },
    EndTarget,
    SetOrtho { right: f32, bottom: f32 },
    Clear { flags: ClearFlags },
    PushState { state: PassState },
    PopState,
    DebugBegin { label: String },
    DebugEnd,
    SettingsRead,
    BeginCapture { format: ColorFormat, mode: CaptureMode },
    EndCapture { effect: EffectHandle, width: u32, height: u32 },
    Skip,
    EffectCreate { mode: EffectMode },
    EffectUpdate { settings: SettingsData },
    EffectSetSize { width: u32, height: u32 },
    PrepareRender,
    SetInput { texture: u64 },
    RenderEffect,
}

#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| matches(e)).count()
    }

    /// Index of the first matching event, or panic with the full log.
    pub fn index_of(&self, matches: impl Fn(&Event) -> bool) -> usize {
        let events = self.events();
        events
            .iter()
            .position(matches)
            .unwrap_or_else(|| panic!("event not found in {events:#?}"))
    }
}

// ---------------------------------------------------------------------------
// Device double
// ---------------------------------------------------------------------------

pub struct MockDevice {
    log: Log,
    next_texture: u64,
    sizes: HashMap<u64, (u32, u32)>,
    pub allocations: usize,
    pub fail_create: bool,
    pub target_depth: usize,
    pub state_depth: usize,
}

impl MockDevice {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            next_texture: 1,
            sizes: HashMap::new(),
            allocations: 0,
            fail_create: false,
            target_depth: 0,
            state_depth: 0,
        }
    }

    pub fn live_textures(&self) -> usize {
        self.sizes.len()
    }
}

impl Device for MockDevice {
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        _format: ColorFormat,
    ) -> Result<TextureId> {
        if self.fail_create {
            bail!("out of GPU memory");
        }
        let texture = self.next_texture;
        self.next_texture += 1;
        self.allocations += 1;
        self.sizes.insert(texture, (width, height));
        self.log.push(Event::CreateTexture {
            texture,
            width,
            height,
        });
        Ok(TextureId(texture))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.sizes.remove(&texture.0);
        self.log.push(Event::DestroyTexture { texture: texture.0 });
    }

    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.sizes.get(&texture.0).copied()
    }

    fn begin_target(&mut self, texture: TextureId) -> Result<()> {
        if !self.sizes.contains_key(&texture.0) {
            return Err(anyhow!("unknown texture {texture:?}"));
        }
        self.target_depth += 1;
        self.log.push(Event::BeginTarget { texture: texture.0 });
        Ok(())
    }

    fn end_target(&mut self) {
        assert!(self.target_depth > 0, "unbalanced end_target");
        self.target_depth -= 1;
        self.log.push(Event::EndTarget);
    }

    fn set_ortho(
        &mut self,
        _left: f32,
        right: f32,
        _top: f32,
        bottom: f32,
        _near: f32,
        _far: f32,
    ) {
        self.log.push(Event::SetOrtho { right, bottom });
    }

    fn clear(&mut self, flags: ClearFlags, _color: [f32; 4], _depth: f32, _stencil: u8) {
        self.log.push(Event::Clear { flags });
    }

    fn push_pass_state(&mut self, state: &PassState) {
        self.state_depth += 1;
        self.log.push(Event::PushState { state: *state });
    }

    fn pop_pass_state(&mut self) {
        assert!(self.state_depth > 0, "unbalanced pop_pass_state");
        self.state_depth -= 1;
        self.log.push(Event::PopState);
    }

    fn debug_group_begin(&mut self, _color: DebugColor, label: &str) {
        self.log.push(Event::DebugBegin {
            label: label.to_string(),
        });
    }

    fn debug_group_end(&mut self) {
        self.log.push(Event::DebugEnd);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Host double
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct HostState {
    pub settings: SettingsData,
    pub target: Option<(u32, u32)>,
    pub parent: Option<(u32, u32)>,
    pub capture_ok: bool,
}

struct FixedSource {
    width: u32,
    height: u32,
}

impl HostSource for FixedSource {
    fn base_width(&self) -> u32 {
        self.width
    }

    fn base_height(&self) -> u32 {
        self.height
    }
}

pub struct MockHost {
    pub state: Arc<Mutex<HostState>>,
    log: Log,
}

impl MockHost {
    pub fn new(state: Arc<Mutex<HostState>>, log: Log) -> Self {
        Self { state, log }
    }
}

impl HostNode for MockHost {
    fn name(&self) -> String {
        "mock-filter".to_string()
    }

    fn settings(&self) -> SettingsData {
        self.log.push(Event::SettingsRead);
        self.state.lock().unwrap().settings.clone()
    }

    fn filter_target(&self) -> Option<Rc<dyn HostSource>> {
        let (width, height) = self.state.lock().unwrap().target?;
        Some(Rc::new(FixedSource { width, height }))
    }

    fn filter_parent(&self) -> Option<Rc<dyn HostSource>> {
        let (width, height) = self.state.lock().unwrap().parent?;
        Some(Rc::new(FixedSource { width, height }))
    }

    fn base_effect(&self, _which: BaseEffect) -> EffectHandle {
        EffectHandle(7)
    }

    fn begin_filter_capture(&self, format: ColorFormat, mode: CaptureMode) -> bool {
        self.log.push(Event::BeginCapture { format, mode });
        self.state.lock().unwrap().capture_ok
    }

    fn end_filter_capture(&self, effect: EffectHandle, width: u32, height: u32) {
        self.log.push(Event::EndCapture {
            effect,
            width,
            height,
        });
    }

    fn skip_video_filter(&self) {
        self.log.push(Event::Skip);
    }
}

// ---------------------------------------------------------------------------
// Effect engine double
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EffectState {
    pub size: (u32, u32),
    pub refresh_on_next_tick: bool,
    pub update_count: usize,
    pub last_update: Option<SettingsData>,
    pub fail_render: bool,
}

struct MockEffect {
    state: Arc<Mutex<EffectState>>,
    log: Log,
}

impl Effect for MockEffect {
    fn width(&self) -> u32 {
        self.state.lock().unwrap().size.0
    }

    fn height(&self) -> u32 {
        self.state.lock().unwrap().size.1
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.log.push(Event::EffectSetSize { width, height });
        self.state.lock().unwrap().size = (width, height);
    }

    fn tick(&mut self, _seconds: f32) -> bool {
        let mut state = self.state.lock().unwrap();
        std::mem::take(&mut state.refresh_on_next_tick)
    }

    fn update(&mut self, settings: &SettingsData) {
        self.log.push(Event::EffectUpdate {
            settings: settings.clone(),
        });
        let mut state = self.state.lock().unwrap();
        state.update_count += 1;
        state.last_update = Some(settings.clone());
    }

    fn properties(&self, props: &mut Properties) {
        props.add_float("mock.strength", "Strength", 0.0, 1.0, 0.01);
    }

    fn prepare_render(&mut self, _device: &mut dyn Device) -> Result<()> {
        self.log.push(Event::PrepareRender);
        Ok(())
    }

    fn set_input(&mut self, texture: TextureId) {
        self.log.push(Event::SetInput { texture: texture.0 });
    }

    fn render(&mut self, _device: &mut dyn Device) -> Result<()> {
        self.log.push(Event::RenderEffect);
        if self.state.lock().unwrap().fail_render {
            bail!("shader pass failed");
        }
        Ok(())
    }
}

pub struct MockEngine {
    pub state: Arc<Mutex<EffectState>>,
    pub log: Log,
    pub fail_create: bool,
}

impl EffectEngine for MockEngine {
    fn create_effect(&self, _node: NodeHandle, mode: EffectMode) -> Result<Box<dyn Effect>> {
        if self.fail_create {
            bail!("effect engine refused");
        }
        self.log.push(Event::EffectCreate { mode });
        Ok(Box::new(MockEffect {
            state: self.state.clone(),
            log: self.log.clone(),
        }))
    }

    fn defaults(&self, settings: &mut SettingsData) {
        settings.set_float("mock.strength", 0.25);
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub log: Log,
    pub effect: Arc<Mutex<EffectState>>,
    pub host_state: Arc<Mutex<HostState>>,
    pub host: Rc<MockHost>,
    pub engine: MockEngine,
}

impl Fixture {
    pub fn new() -> Self {
        let log = Log::default();
        let effect = Arc::new(Mutex::new(EffectState::default()));
        let host_state = Arc::new(Mutex::new(HostState {
            capture_ok: true,
            ..HostState::default()
        }));
        let host = Rc::new(MockHost::new(host_state.clone(), log.clone()));
        let engine = MockEngine {
            state: effect.clone(),
            log: log.clone(),
            fail_create: false,
        };
        Self {
            log,
            effect,
            host_state,
            host,
            engine,
        }
    }

    pub fn node(&self) -> NodeHandle {
        self.host.clone()
    }
}
