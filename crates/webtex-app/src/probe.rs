//! `webtex probe`: capability resolution without creating a surface.

use webtex_config::WebtexConfig;
use webtex_render::{resolve, Arch, CapabilityEnv, NoInjector, Platform, Resolution, StaticInjector};

use crate::cli::ProbeArgs;

pub fn resolution(args: &ProbeArgs, config: &WebtexConfig) -> Resolution {
    let env = CapabilityEnv::new(
        args.os.unwrap_or_else(Platform::current),
        args.arch.unwrap_or_else(Arch::current),
        args.backend,
    );
    let accelerated = config.render.accelerated && !args.no_accel;
    if args.assume_injection {
        resolve(env, accelerated, &StaticInjector(true))
    } else {
        resolve(env, accelerated, &NoInjector)
    }
}

pub fn run(args: &ProbeArgs, config: &WebtexConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&resolution(args, config))
}
