use super::*;
use webtex_common::{FallbackReason, PhysicalSize, RenderMode};
use webtex_render::{Arch, ExternalHandle, GpuBackend, MemoryHost, Platform, StaticInjector};

fn env(platform: Platform, backend: GpuBackend) -> CapabilityEnv {
    CapabilityEnv::new(platform, Arch::X86_64, backend)
}

fn registry(env: CapabilityEnv) -> SurfaceRegistry<MemoryHost> {
    let mut config = WebtexConfig::default();
    config.surface.width = 64;
    config.surface.height = 32;
    SurfaceRegistry::new(MemoryHost::new(), env, &config)
}

#[test]
fn ids_are_unique_and_counted() {
    let mut reg = registry(env(Platform::Windows, GpuBackend::Dx12));
    let (a, _) = reg.create().unwrap();
    let (b, _) = reg.create().unwrap();
    assert_ne!(a, b);
    assert_eq!(reg.count(), 2);
    assert!(reg.get(a).is_some());
}

#[test]
fn resolution_follows_environment() {
    let mut native = registry(env(Platform::Windows, GpuBackend::Dx12));
    let (id, _) = native.create().unwrap();
    assert_eq!(native.get(id).unwrap().current_mode(), RenderMode::Accelerated);

    let mut gl = registry(env(Platform::Windows, GpuBackend::Gl));
    let (id, _) = gl.create().unwrap();
    assert_eq!(
        gl.get(id).unwrap().fallback_reason(),
        Some(FallbackReason::BackendUnsupported)
    );
}

#[test]
fn injection_outcome_decides_mode() {
    let linux = env(Platform::Linux, GpuBackend::Vulkan);

    let mut refused = registry(linux);
    let (id, _) = refused.create().unwrap();
    assert_eq!(
        refused.get(id).unwrap().fallback_reason(),
        Some(FallbackReason::ExtensionUnavailable)
    );

    let mut injected = registry(linux).with_injector(StaticInjector(true));
    let (id, _) = injected.create().unwrap();
    assert_eq!(injected.get(id).unwrap().current_mode(), RenderMode::Accelerated);
}

#[test]
fn create_with_uses_own_size() {
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal));
    let config = SurfaceConfig {
        width: 10,
        height: 20,
        ..SurfaceConfig::default()
    };
    let (id, _) = reg.create_with(config).unwrap();
    assert_eq!(reg.get(id).unwrap().size(), PhysicalSize::new(10, 20));

    let bad = SurfaceConfig {
        width: 0,
        ..SurfaceConfig::default()
    };
    assert!(reg.create_with(bad).is_err());
    assert_eq!(reg.count(), 1);
}

#[test]
fn pump_all_collects_events_per_surface() {
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal));
    let (a, port_a) = reg.create().unwrap();
    let (b, port_b) = reg.create().unwrap();
    port_b.emit(crate::engine::EngineEvent::TitleChanged("B".into()));
    port_a.emit(crate::engine::EngineEvent::TitleChanged("A".into()));

    let events = reg.pump_all();
    assert_eq!(
        events,
        vec![
            (a, SurfaceEvent::TitleChanged("A".into())),
            (b, SurfaceEvent::TitleChanged("B".into())),
        ]
    );
    assert!(reg.pump_all().is_empty());
}

#[test]
fn pump_unknown_surface_is_not_found() {
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal));
    assert!(matches!(
        reg.pump(SurfaceId(9)),
        Err(SurfaceError::NotFound(SurfaceId(9)))
    ));
}

#[test]
fn destroy_releases_imports() {
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal));
    let (id, port) = reg.create().unwrap();
    port.submit_external_frame(ExternalHandle(5), 1, PhysicalSize::new(64, 32))
        .unwrap();
    reg.pump(id).unwrap();
    assert_eq!(reg.host().live_imports(), 1);

    assert!(reg.destroy(id));
    assert!(!reg.destroy(id));
    assert_eq!(reg.host().live_imports(), 0);
    assert!(port.is_closed());
    assert!(reg.current_texture(id).is_none());
}

#[test]
fn destroy_all_empties_registry() {
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal));
    let (_, a) = reg.create().unwrap();
    let (_, b) = reg.create().unwrap();
    reg.destroy_all();
    assert_eq!(reg.count(), 0);
    assert!(a.is_closed() && b.is_closed());
}

#[tokio::test]
async fn lifecycle_is_published_on_the_bus() {
    let bus = Arc::new(EventBus::new(16));
    let mut rx = bus.subscribe();
    let mut reg = registry(env(Platform::MacOs, GpuBackend::Metal)).with_event_bus(bus.clone());

    let (id, port) = reg.create().unwrap();
    let size = PhysicalSize::new(64, 32);
    reg.host_mut().reject_handle(ExternalHandle(2));
    port.submit_external_frame(ExternalHandle(2), 1, size).unwrap();
    let events = reg.pump_all();
    assert_eq!(
        events,
        vec![(
            id,
            SurfaceEvent::FallbackActivated {
                reason: FallbackReason::ImportFailed
            }
        )]
    );
    reg.destroy(id);

    assert!(matches!(
        rx.recv().await.unwrap(),
        Event::SurfaceAttached {
            mode: RenderMode::Accelerated,
            ..
        }
    ));
    assert!(matches!(
        rx.recv().await.unwrap(),
        Event::FallbackActivated {
            reason: FallbackReason::ImportFailed,
            ..
        }
    ));
    assert!(matches!(rx.recv().await.unwrap(), Event::SurfaceDetached(d) if d == id));
}
