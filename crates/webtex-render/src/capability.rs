//! Backend capability detection.
//!
//! A pure lookup from (platform, architecture, GPU backend) to the way a
//! shared texture can cross from the engine process into the host device.
//! Evaluated once per surface at creation and never re-run automatically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};
use webtex_common::{FallbackReason, RenderMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Other
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "macos" | "mac" | "darwin" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86_64,
    Aarch64,
    X86,
    Other,
}

impl Arch {
    pub fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            Self::X86_64
        } else if cfg!(target_arch = "aarch64") {
            Self::Aarch64
        } else if cfg!(target_arch = "x86") {
            Self::X86
        } else {
            Self::Other
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            "x86" | "i686" => Ok(Self::X86),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown architecture: {other}")),
        }
    }
}

/// The host's active GPU backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuBackend {
    Vulkan,
    Metal,
    Dx12,
    Gl,
    WebGpu,
    Empty,
}

impl From<wgpu::Backend> for GpuBackend {
    fn from(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Vulkan => Self::Vulkan,
            wgpu::Backend::Metal => Self::Metal,
            wgpu::Backend::Dx12 => Self::Dx12,
            wgpu::Backend::Gl => Self::Gl,
            wgpu::Backend::BrowserWebGpu => Self::WebGpu,
            _ => Self::Empty,
        }
    }
}

impl FromStr for GpuBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vulkan" | "vk" => Ok(Self::Vulkan),
            "metal" => Ok(Self::Metal),
            "dx12" | "d3d12" => Ok(Self::Dx12),
            "gl" | "opengl" | "gles" => Ok(Self::Gl),
            "webgpu" => Ok(Self::WebGpu),
            "empty" | "none" => Ok(Self::Empty),
            other => Err(format!("unknown GPU backend: {other}")),
        }
    }
}

impl fmt::Display for GpuBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vulkan => "vulkan",
            Self::Metal => "metal",
            Self::Dx12 => "dx12",
            Self::Gl => "gl",
            Self::WebGpu => "webgpu",
            Self::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// How shared textures reach the host device for one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPath {
    /// The backend opens the engine's shared handle directly.
    Native,
    /// Import works only after external-memory extensions are injected
    /// into the host device.
    ExtensionInjection,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityEnv {
    pub platform: Platform,
    pub arch: Arch,
    pub backend: GpuBackend,
}

impl CapabilityEnv {
    pub fn new(platform: Platform, arch: Arch, backend: GpuBackend) -> Self {
        Self {
            platform,
            arch,
            backend,
        }
    }

    /// The running platform and architecture with the given backend.
    pub fn current(backend: GpuBackend) -> Self {
        Self::new(Platform::current(), Arch::current(), backend)
    }

    pub fn export_path(&self) -> ExportPath {
        export_path(self)
    }
}

/// The capability table.
pub fn export_path(env: &CapabilityEnv) -> ExportPath {
    use Arch::*;
    use GpuBackend::*;
    use Platform::*;

    match (env.platform, env.backend, env.arch) {
        (Windows, Dx12, X86_64 | Aarch64) => ExportPath::Native,
        (Windows, Vulkan, X86_64) => ExportPath::ExtensionInjection,
        (MacOs, Metal, X86_64 | Aarch64) => ExportPath::Native,
        (Linux, Vulkan, X86_64 | Aarch64) => ExportPath::ExtensionInjection,
        _ => ExportPath::Unsupported,
    }
}

/// Installs the external-memory extensions an `ExtensionInjection` path
/// needs. Implemented by backend glue that owns device creation.
pub trait ExtensionInjector {
    fn inject(&self, env: &CapabilityEnv) -> Result<(), String>;
}

/// Injector for hosts that cannot add device extensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInjector;

impl ExtensionInjector for NoInjector {
    fn inject(&self, _env: &CapabilityEnv) -> Result<(), String> {
        Err("no extension injector installed".into())
    }
}

/// Injector with a fixed answer, for probing and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticInjector(pub bool);

impl ExtensionInjector for StaticInjector {
    fn inject(&self, _env: &CapabilityEnv) -> Result<(), String> {
        if self.0 {
            Ok(())
        } else {
            Err("extension injection refused".into())
        }
    }
}

/// Outcome of capability resolution for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub env: CapabilityEnv,
    pub path: ExportPath,
    pub mode: RenderMode,
    /// Set whenever `mode` is software.
    pub reason: Option<FallbackReason>,
}

impl Resolution {
    fn software(env: CapabilityEnv, path: ExportPath, reason: FallbackReason) -> Self {
        Self {
            env,
            path,
            mode: RenderMode::Software,
            reason: Some(reason),
        }
    }

    fn accelerated(env: CapabilityEnv, path: ExportPath) -> Self {
        Self {
            env,
            path,
            mode: RenderMode::Accelerated,
            reason: None,
        }
    }
}

/// Decide the render mode for a new surface.
pub fn resolve(
    env: CapabilityEnv,
    accelerated: bool,
    injector: &dyn ExtensionInjector,
) -> Resolution {
    let path = env.export_path();

    let resolution = if !accelerated {
        Resolution::software(env, path, FallbackReason::DisabledByConfig)
    } else {
        match path {
            ExportPath::Native => Resolution::accelerated(env, path),
            ExportPath::ExtensionInjection => match injector.inject(&env) {
                Ok(()) => Resolution::accelerated(env, path),
                Err(e) => {
                    warn!(backend = %env.backend, error = %e, "extension injection failed");
                    Resolution::software(env, path, FallbackReason::ExtensionUnavailable)
                }
            },
            ExportPath::Unsupported => {
                Resolution::software(env, path, FallbackReason::BackendUnsupported)
            }
        }
    };

    info!(
        platform = ?env.platform,
        arch = ?env.arch,
        backend = %env.backend,
        path = ?resolution.path,
        mode = %resolution.mode,
        reason = ?resolution.reason,
        "render capability resolved"
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(platform: Platform, arch: Arch, backend: GpuBackend) -> CapabilityEnv {
        CapabilityEnv::new(platform, arch, backend)
    }

    #[test]
    fn native_paths() {
        assert_eq!(
            env(Platform::Windows, Arch::X86_64, GpuBackend::Dx12).export_path(),
            ExportPath::Native
        );
        assert_eq!(
            env(Platform::MacOs, Arch::Aarch64, GpuBackend::Metal).export_path(),
            ExportPath::Native
        );
    }

    #[test]
    fn vulkan_injection_depends_on_arch() {
        assert_eq!(
            env(Platform::Windows, Arch::X86_64, GpuBackend::Vulkan).export_path(),
            ExportPath::ExtensionInjection
        );
        assert_eq!(
            env(Platform::Windows, Arch::Aarch64, GpuBackend::Vulkan).export_path(),
            ExportPath::Unsupported
        );
        assert_eq!(
            env(Platform::Linux, Arch::Aarch64, GpuBackend::Vulkan).export_path(),
            ExportPath::ExtensionInjection
        );
        assert_eq!(
            env(Platform::Linux, Arch::X86, GpuBackend::Vulkan).export_path(),
            ExportPath::Unsupported
        );
    }

    #[test]
    fn gl_and_mobile_are_unsupported() {
        for e in [
            env(Platform::Linux, Arch::X86_64, GpuBackend::Gl),
            env(Platform::Android, Arch::Aarch64, GpuBackend::Vulkan),
            env(Platform::Ios, Arch::Aarch64, GpuBackend::Metal),
            env(Platform::MacOs, Arch::Aarch64, GpuBackend::Vulkan),
        ] {
            assert_eq!(e.export_path(), ExportPath::Unsupported, "{e:?}");
        }
    }

    #[test]
    fn disabled_flag_wins() {
        let r = resolve(
            env(Platform::Windows, Arch::X86_64, GpuBackend::Dx12),
            false,
            &NoInjector,
        );
        assert_eq!(r.mode, RenderMode::Software);
        assert_eq!(r.reason, Some(FallbackReason::DisabledByConfig));
    }

    #[test]
    fn unsupported_backend_resolves_to_software() {
        let r = resolve(
            env(Platform::Linux, Arch::X86_64, GpuBackend::Gl),
            true,
            &StaticInjector(true),
        );
        assert_eq!(r.mode, RenderMode::Software);
        assert_eq!(r.reason, Some(FallbackReason::BackendUnsupported));
    }

    #[test]
    fn injection_outcome_decides_mode() {
        let e = env(Platform::Linux, Arch::X86_64, GpuBackend::Vulkan);
        let ok = resolve(e, true, &StaticInjector(true));
        assert_eq!(ok.mode, RenderMode::Accelerated);
        assert_eq!(ok.reason, None);

        let failed = resolve(e, true, &NoInjector);
        assert_eq!(failed.mode, RenderMode::Software);
        assert_eq!(failed.reason, Some(FallbackReason::ExtensionUnavailable));
    }

    #[test]
    fn native_path_ignores_injector() {
        let r = resolve(
            env(Platform::MacOs, Arch::X86_64, GpuBackend::Metal),
            true,
            &NoInjector,
        );
        assert_eq!(r.mode, RenderMode::Accelerated);
    }

    #[test]
    fn parse_names() {
        assert_eq!("D3D12".parse::<GpuBackend>(), Ok(GpuBackend::Dx12));
        assert_eq!("arm64".parse::<Arch>(), Ok(Arch::Aarch64));
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::MacOs));
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn wgpu_backend_maps() {
        assert_eq!(GpuBackend::from(wgpu::Backend::Vulkan), GpuBackend::Vulkan);
        assert_eq!(GpuBackend::from(wgpu::Backend::Dx12), GpuBackend::Dx12);
    }

    #[test]
    fn resolution_serializes_snake_case() {
        let r = resolve(
            env(Platform::Linux, Arch::X86_64, GpuBackend::Gl),
            true,
            &NoInjector,
        );
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"mode\":\"software\""));
        assert!(json.contains("\"reason\":\"backend_unsupported\""));
        assert!(json.contains("\"path\":\"unsupported\""));
    }
}
