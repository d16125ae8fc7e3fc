//! Host-facing registration surface for the shader filter.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing::debug;

use framefx_core::host::NodeHandle;
use framefx_core::locale;
use framefx_core::properties::Properties;
use framefx_core::registry::Registry;
use framefx_core::settings::SettingsData;
use framefx_core::source::{
    SourceFactory, SourceInfo, SourceInstance, SourceType, OUTPUT_CUSTOM_DRAW, OUTPUT_VIDEO,
};

use crate::effect::EffectEngine;
use crate::instance::ShaderFilter;

/// Stable node-type id persisted in scene data.
pub const FILTER_SHADER_ID: &str = "framefx-filter-shader";

/// Factory for shader filter nodes. Stateless beyond the effect engine it
/// creates effects with.
pub struct ShaderFilterFactory {
    info: SourceInfo,
    engine: Arc<dyn EffectEngine>,
}

impl ShaderFilterFactory {
    pub fn new(engine: Arc<dyn EffectEngine>) -> Self {
        Self {
            info: SourceInfo {
                id: FILTER_SHADER_ID,
                source_type: SourceType::Filter,
                // Custom draw: the host must not composite this node itself,
                // the filter fully controls its output.
                output_flags: OUTPUT_VIDEO | OUTPUT_CUSTOM_DRAW,
            },
            engine,
        }
    }
}

impl SourceFactory for ShaderFilterFactory {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn display_name(&self) -> String {
        locale::translate("filter-shader.name")
    }

    fn defaults(&self, settings: &mut SettingsData) {
        self.engine.defaults(settings);
    }

    fn properties(&self, instance: Option<&mut dyn SourceInstance>) -> Properties {
        let mut props = Properties::for_source(FILTER_SHADER_ID);
        if let Some(instance) = instance {
            instance.properties(&mut props);
        }
        props
    }

    fn create(
        &self,
        settings: &SettingsData,
        node: NodeHandle,
    ) -> Result<Box<dyn SourceInstance>> {
        let filter = ShaderFilter::new(self.engine.as_ref(), settings, node)?;
        Ok(Box::new(filter))
    }
}

/// The one process-wide factory record, held between module load and
/// unload.
static FACTORY_INSTANCE: Lazy<Mutex<Option<Arc<ShaderFilterFactory>>>> =
    Lazy::new(|| Mutex::new(None));

/// Register the shader filter with the host. Called from module load.
///
/// Returns `false` when the filter is already registered (here or by
/// another module claiming the same id).
pub fn register(registry: &mut Registry, engine: Arc<dyn EffectEngine>) -> bool {
    let mut slot = FACTORY_INSTANCE
        .lock()
        .expect("factory record poisoned");
    if slot.is_some() {
        return false;
    }

    let factory = Arc::new(ShaderFilterFactory::new(engine));
    if !registry.register_source(factory.clone()) {
        return false;
    }

    debug!(id = FILTER_SHADER_ID, "shader filter registered");
    *slot = Some(factory);
    true
}

/// Remove the registration. Called from module unload.
pub fn unregister(registry: &mut Registry) -> bool {
    let mut slot = FACTORY_INSTANCE
        .lock()
        .expect("factory record poisoned");
    match slot.take() {
        Some(factory) => registry.unregister_source(factory.info().id),
        None => false,
    }
}

/// The live factory, if the module is loaded.
pub fn factory() -> Option<Arc<ShaderFilterFactory>> {
    FACTORY_INSTANCE
        .lock()
        .expect("factory record poisoned")
        .clone()
}
