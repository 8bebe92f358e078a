//! Render bridge for embedded browser surfaces.
//!
//! Decides per surface whether frames arrive as shared GPU textures or as
//! raw pixel buffers, imports or uploads them into the host device, and
//! publishes exactly one front texture for the host scene to sample.

pub mod bridge;
pub mod capability;
pub mod errors;
pub mod frame;
pub mod gpu;
pub mod host;
pub mod import;
pub mod presentation;
pub mod software;

pub use bridge::{FrameReport, RenderBridge};
pub use capability::{
    resolve, Arch, CapabilityEnv, ExportPath, ExtensionInjector, GpuBackend, NoInjector,
    Platform, Resolution, StaticInjector,
};
pub use errors::{ImportError, RendererError, SubmitRejection};
pub use frame::{ExternalFrame, FrameMailbox, FrameSender, PixelFrame};
pub use gpu::{GpuContext, NativeImporter, UnsupportedImporter, WgpuHost};
pub use host::{ExternalHandle, MemoryHost, MemoryTexture, TextureHost, BYTES_PER_PIXEL};
pub use import::ImportSlot;
pub use presentation::{FrameOrigin, PresentationController, PresentedFrame};
pub use software::SoftwareUploader;
