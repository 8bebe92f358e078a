use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// How a surface's frames reach the host GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Shared GPU textures imported without a CPU copy.
    Accelerated,
    /// Raw BGRA8 buffers uploaded into a host-owned texture.
    Software,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accelerated => f.write_str("accelerated"),
            Self::Software => f.write_str("software"),
        }
    }
}

/// Why a surface renders in software although acceleration was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    DisabledByConfig,
    BackendUnsupported,
    ExtensionUnavailable,
    /// A shared texture could not be imported at runtime.
    ImportFailed,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DisabledByConfig => "disabled_by_config",
            Self::BackendUnsupported => "backend_unsupported",
            Self::ExtensionUnavailable => "extension_unavailable",
            Self::ImportFailed => "import_failed",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_id_display() {
        assert_eq!(SurfaceId(7).to_string(), "surface-7");
    }

    #[test]
    fn fallback_reason_serializes_snake_case() {
        let json = serde_json::to_string(&FallbackReason::BackendUnsupported).unwrap();
        assert_eq!(json, "\"backend_unsupported\"");
        let back: FallbackReason = serde_json::from_str("\"extension_unavailable\"").unwrap();
        assert_eq!(back, FallbackReason::ExtensionUnavailable);
    }

    #[test]
    fn fallback_reason_display_matches_serde() {
        for reason in [
            FallbackReason::DisabledByConfig,
            FallbackReason::BackendUnsupported,
            FallbackReason::ExtensionUnavailable,
            FallbackReason::ImportFailed,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json.trim_matches('"'), reason.to_string());
        }
    }

    #[test]
    fn render_mode_display() {
        assert_eq!(RenderMode::Accelerated.to_string(), "accelerated");
        assert_eq!(RenderMode::Software.to_string(), "software");
    }
}
