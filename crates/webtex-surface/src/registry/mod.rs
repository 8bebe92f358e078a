//! All live surfaces of one host, keyed by id.
//!
//! The registry owns the texture host so every pump, import and release
//! happens against the same device. Capability resolution runs once inside
//! [`SurfaceRegistry::create`] and the outcome stays with the surface.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use webtex_common::{Event, EventBus, SurfaceId};
use webtex_config::schema::SurfaceConfig;
use webtex_config::WebtexConfig;
use webtex_render::{resolve, CapabilityEnv, ExtensionInjector, FrameReport, NoInjector, TextureHost};

use crate::engine::EnginePort;
use crate::errors::SurfaceError;
use crate::events::SurfaceEvent;
use crate::surface::{Surface, SurfaceSettings};

#[cfg(test)]
mod tests;

pub struct SurfaceRegistry<H: TextureHost> {
    host: H,
    env: CapabilityEnv,
    injector: Box<dyn ExtensionInjector + Send>,
    settings: SurfaceSettings,
    surfaces: HashMap<SurfaceId, Surface<H::Texture>>,
    next_id: u32,
    bus: Option<Arc<EventBus>>,
}

impl<H: TextureHost> SurfaceRegistry<H> {
    pub fn new(host: H, env: CapabilityEnv, config: &WebtexConfig) -> Self {
        Self {
            host,
            env,
            injector: Box::new(NoInjector),
            settings: SurfaceSettings::from_config(config),
            surfaces: HashMap::new(),
            next_id: 1,
            bus: None,
        }
    }

    /// Use `injector` for backends that need device extensions added.
    pub fn with_injector(mut self, injector: impl ExtensionInjector + Send + 'static) -> Self {
        self.injector = Box::new(injector);
        self
    }

    /// Publish lifecycle facts to `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn capability_env(&self) -> &CapabilityEnv {
        &self.env
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }

    /// Create a surface with the registry's default surface settings.
    pub fn create(&mut self) -> Result<(SurfaceId, EnginePort), SurfaceError> {
        let surface = self.settings.surface.clone();
        self.create_with(surface)
    }

    /// Create a surface with its own url, size and appearance.
    pub fn create_with(
        &mut self,
        surface: SurfaceConfig,
    ) -> Result<(SurfaceId, EnginePort), SurfaceError> {
        let id = SurfaceId(self.next_id);
        let settings = SurfaceSettings {
            surface,
            ..self.settings.clone()
        };
        let resolution = resolve(self.env, settings.render.accelerated, self.injector.as_ref());
        let (surface, port) = Surface::new(&mut self.host, id, resolution, &settings)?;
        self.next_id += 1;

        self.publish(Event::SurfaceAttached {
            surface: id,
            mode: resolution.mode,
        });
        self.surfaces.insert(id, surface);
        Ok((id, port))
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface<H::Texture>> {
        self.surfaces.get(&id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface<H::Texture>> {
        self.surfaces.get_mut(&id)
    }

    pub fn current_texture(&self, id: SurfaceId) -> Option<Arc<H::Texture>> {
        self.surfaces.get(&id).map(Surface::current_texture)
    }

    /// Pump one surface.
    pub fn pump(&mut self, id: SurfaceId) -> Result<FrameReport, SurfaceError> {
        let surface = self
            .surfaces
            .get_mut(&id)
            .ok_or(SurfaceError::NotFound(id))?;
        let report = surface.pump(&mut self.host);
        if let Some(reason) = report.downgraded {
            self.publish(Event::FallbackActivated { surface: id, reason });
        }
        Ok(report)
    }

    /// Pump every surface once and collect their host events, ordered by
    /// surface id and then by emission.
    pub fn pump_all(&mut self) -> Vec<(SurfaceId, SurfaceEvent)> {
        let mut ids = self.ids();
        ids.sort_by_key(|id| id.0);

        let mut out = Vec::new();
        for id in ids {
            if self.pump(id).is_err() {
                continue;
            }
            if let Some(surface) = self.surfaces.get_mut(&id) {
                out.extend(surface.drain_events().into_iter().map(|e| (id, e)));
            }
        }
        out
    }

    /// Tear down and forget a surface. Returns `false` for unknown ids.
    pub fn destroy(&mut self, id: SurfaceId) -> bool {
        let Some(mut surface) = self.surfaces.remove(&id) else {
            debug!(surface = %id, "destroy for unknown surface");
            return false;
        };
        surface.teardown(&mut self.host);
        self.publish(Event::SurfaceDetached(id));
        true
    }

    /// Destroy every surface. Used during shutdown.
    pub fn destroy_all(&mut self) {
        let ids = self.ids();
        let count = ids.len();
        for id in ids {
            self.destroy(id);
        }
        if count > 0 {
            info!(count, "all surfaces destroyed");
        }
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.surfaces.len()
    }
}

impl<H: TextureHost> Drop for SurfaceRegistry<H> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
