mod config;
mod context;
mod host;

pub use config::*;
pub use context::*;
pub use host::*;
