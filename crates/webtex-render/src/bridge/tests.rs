use super::*;
use crate::capability::{resolve, Arch, CapabilityEnv, GpuBackend, NoInjector, Platform};
use crate::errors::SubmitRejection;
use crate::host::{handle_color, ExternalHandle, MemoryHost, MemoryTexture};
use webtex_common::PixelRect;

const SIZE: PhysicalSize = PhysicalSize::new(100, 100);

fn accelerated() -> Resolution {
    resolve(
        CapabilityEnv::new(Platform::Windows, Arch::X86_64, GpuBackend::Dx12),
        true,
        &NoInjector,
    )
}

fn unsupported() -> Resolution {
    resolve(
        CapabilityEnv::new(Platform::Linux, Arch::X86_64, GpuBackend::Gl),
        true,
        &NoInjector,
    )
}

fn bridge(
    host: &mut MemoryHost,
    resolution: Resolution,
) -> (RenderBridge<MemoryTexture>, FrameSender) {
    RenderBridge::new(
        host,
        SurfaceId(1),
        resolution,
        SIZE,
        &RenderConfig::default(),
        Color::WHITE,
    )
    .unwrap()
}

fn solid(bgra: [u8; 4]) -> Vec<u8> {
    bgra.repeat((SIZE.width * SIZE.height) as usize)
}

#[test]
fn placeholder_before_first_frame() {
    let mut host = MemoryHost::new();
    let (b, _tx) = bridge(&mut host, accelerated());
    assert_eq!(b.current_frame().origin, FrameOrigin::Placeholder);
    assert_eq!(b.current_texture().pixel(0, 0), Some(Color::WHITE.to_bgra()));
}

#[test]
fn unsupported_backend_is_software_from_the_start() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, unsupported());
    assert_eq!(b.current_mode(), RenderMode::Software);
    assert_eq!(b.fallback_reason(), Some(FallbackReason::BackendUnsupported));

    assert_eq!(
        tx.submit_external_frame(ExternalHandle(1), 1, SIZE),
        Err(SubmitRejection::NotAccelerated)
    );
    tx.submit_pixels(solid([1, 2, 3, 255]), SIZE.packed_stride(), SIZE, vec![PixelRect::full(SIZE)])
        .unwrap();
    let report = b.process(&mut host);
    assert_eq!(report.presented, Some(1));
    assert_eq!(b.current_frame().origin, FrameOrigin::Software);
}

#[test]
fn accelerated_frames_are_published_and_swapped() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());

    tx.submit_external_frame(ExternalHandle(10), 1, SIZE).unwrap();
    assert_eq!(b.process(&mut host).presented, Some(1));
    assert_eq!(b.current_texture().imported_from(), Some(ExternalHandle(10)));

    tx.submit_external_frame(ExternalHandle(11), 2, SIZE).unwrap();
    b.process(&mut host);
    assert_eq!(b.current_texture().imported_from(), Some(ExternalHandle(11)));
    assert_eq!(host.live_imports(), 1);
    assert_eq!(host.releases(), 1);
}

#[test]
fn stale_generation_never_changes_published_state() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 5, SIZE).unwrap();
    b.process(&mut host);

    assert!(tx.submit_external_frame(ExternalHandle(11), 5, SIZE).is_err());
    assert!(tx.submit_external_frame(ExternalHandle(12), 3, SIZE).is_err());
    let report = b.process(&mut host);
    assert_eq!(report, FrameReport::default());
    assert_eq!(b.current_frame().generation, 5);
    assert_eq!(b.current_texture().imported_from(), Some(ExternalHandle(10)));
}

#[test]
fn presented_generation_is_monotonic_across_paths() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    let mut last = 0;

    for i in 1..=4u64 {
        tx.submit_external_frame(ExternalHandle(100 + i), i * 2, SIZE).unwrap();
        tx.submit_pixels(solid([0; 4]), SIZE.packed_stride(), SIZE, vec![]).unwrap();
        b.process(&mut host);
        let g = b.current_frame().generation;
        assert!(g >= last);
        last = g;
    }
    host.reject_handle(ExternalHandle(200));
    tx.submit_external_frame(ExternalHandle(200), 100, SIZE).unwrap();
    b.process(&mut host);
    assert!(b.current_frame().generation >= last);
}

#[test]
fn import_failure_downgrades_for_good() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 1, SIZE).unwrap();
    b.process(&mut host);

    host.reject_handle(ExternalHandle(11));
    tx.submit_external_frame(ExternalHandle(11), 2, SIZE).unwrap();
    let report = b.process(&mut host);
    assert_eq!(report.downgraded, Some(FallbackReason::ImportFailed));
    assert_eq!(b.current_mode(), RenderMode::Software);
    assert_eq!(b.fallback_reason(), Some(FallbackReason::ImportFailed));

    // Later shared frames are refused outright.
    assert_eq!(
        tx.submit_external_frame(ExternalHandle(12), 3, SIZE),
        Err(SubmitRejection::NotAccelerated)
    );
    assert!(!b.downgrade(FallbackReason::ExtensionUnavailable));
    assert_eq!(b.current_mode(), RenderMode::Software);
}

#[test]
fn last_accelerated_frame_stays_until_first_software_frame() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 1, SIZE).unwrap();
    b.process(&mut host);

    host.lose_context();
    tx.submit_external_frame(ExternalHandle(11), 2, SIZE).unwrap();
    b.process(&mut host);
    assert_eq!(b.current_frame().origin, FrameOrigin::Accelerated);
    assert_eq!(b.current_texture().pixel(0, 0), Some(handle_color(ExternalHandle(10))));
    assert!(host.is_live(ExternalHandle(10)));

    tx.submit_pixels(solid([9, 9, 9, 255]), SIZE.packed_stride(), SIZE, vec![PixelRect::full(SIZE)])
        .unwrap();
    b.process(&mut host);
    assert_eq!(b.current_frame().origin, FrameOrigin::Software);
    assert!(b.current_frame().generation > 1);
    assert_eq!(host.live_imports(), 0);
    assert_eq!(host.double_releases(), 0);
}

#[test]
fn size_mismatch_is_treated_as_import_failure() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 1, PhysicalSize::new(50, 50)).unwrap();
    let report = b.process(&mut host);
    assert_eq!(report.downgraded, Some(FallbackReason::ImportFailed));
    assert_eq!(host.imports(), 0);
}

#[test]
fn dirty_region_updates_only_that_region() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, unsupported());
    let stride = SIZE.packed_stride();

    tx.submit_pixels(solid([0, 0, 0, 255]), stride, SIZE, vec![PixelRect::full(SIZE)]).unwrap();
    b.process(&mut host);
    tx.submit_pixels(solid([255, 0, 0, 255]), stride, SIZE, vec![PixelRect::new(0, 0, 10, 10)])
        .unwrap();
    b.process(&mut host);

    let tex = b.current_texture();
    assert_eq!(tex.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(tex.pixel(9, 9), Some([255, 0, 0, 255]));
    assert_eq!(tex.pixel(10, 0), Some([0, 0, 0, 255]));
    assert_eq!(tex.pixel(0, 10), Some([0, 0, 0, 255]));
    assert_eq!(tex.pixel(99, 99), Some([0, 0, 0, 255]));
}

#[test]
fn rejected_pixel_buffer_keeps_previous_frame() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, unsupported());
    tx.submit_pixels(solid([1; 4]), SIZE.packed_stride(), SIZE, vec![]).unwrap();
    b.process(&mut host);

    assert!(tx
        .submit_pixels(vec![0u8; 12], SIZE.packed_stride(), SIZE, vec![])
        .is_err());
    assert_eq!(b.process(&mut host), FrameReport::default());
    assert_eq!(b.current_frame().generation, 1);
}

#[test]
fn resize_drops_pending_shared_frame() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 1, SIZE).unwrap();
    b.resize(PhysicalSize::new(200, 100));
    assert_eq!(b.process(&mut host), FrameReport::default());
    assert_eq!(b.current_mode(), RenderMode::Accelerated);

    tx.submit_external_frame(ExternalHandle(11), 2, PhysicalSize::new(200, 100)).unwrap();
    assert_eq!(b.process(&mut host).presented, Some(2));
}

#[test]
fn teardown_releases_import_and_closes_ingress() {
    let mut host = MemoryHost::new();
    let (mut b, tx) = bridge(&mut host, accelerated());
    tx.submit_external_frame(ExternalHandle(10), 1, SIZE).unwrap();
    b.process(&mut host);
    tx.submit_external_frame(ExternalHandle(11), 2, SIZE).unwrap();

    b.teardown(&mut host);
    assert!(b.is_closed());
    assert_eq!(host.live_imports(), 0);
    assert_eq!(host.imports(), 1);
    assert_eq!(
        tx.submit_pixels(solid([0; 4]), SIZE.packed_stride(), SIZE, vec![]),
        Err(SubmitRejection::Closed)
    );
    assert_eq!(b.process(&mut host), FrameReport::default());
}
