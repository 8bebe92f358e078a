mod context;
mod host;

pub use context::*;
pub use host::*;
