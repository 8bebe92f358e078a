use webtex_common::PhysicalSize;

/// Why an external GPU handle could not be turned into a host texture.
///
/// Always recovered inside the bridge by downgrading the surface to the
/// software path. Never surfaced to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("invalid or expired external handle {0:#x}")]
    InvalidHandle(u64),

    #[error("external frame is {actual}, surface is {expected}")]
    SizeMismatch {
        expected: PhysicalSize,
        actual: PhysicalSize,
    },

    #[error("GPU context lost")]
    ContextLost,

    #[error("no shared-texture import path on this backend")]
    Unsupported,
}

/// Why a frame submission was refused at the ingress boundary.
///
/// A rejected frame never touches published state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("generation {generation} is not newer than {last}")]
    OutOfOrder { generation: u64, last: u64 },

    #[error("pixel buffer is {actual_len} bytes, expected {expected_len}")]
    SizeMismatch {
        expected_len: usize,
        actual_len: usize,
    },

    #[error("dirty rect {x},{y} {width}x{height} lies outside the frame")]
    DirtyRectOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid frame geometry: {0}")]
    InvalidSize(String),

    #[error("surface is not in accelerated mode")]
    NotAccelerated,

    #[error("surface is closed")]
    Closed,
}

/// Errors from the GPU texture host.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("device error: {0}")]
    DeviceError(String),

    #[error("texture error: {0}")]
    TextureError(String),
}

impl From<wgpu::RequestDeviceError> for RendererError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RendererError::DeviceError(e.to_string())
    }
}

impl From<RendererError> for webtex_common::WebtexError {
    fn from(e: RendererError) -> Self {
        webtex_common::WebtexError::Renderer(e.to_string())
    }
}
