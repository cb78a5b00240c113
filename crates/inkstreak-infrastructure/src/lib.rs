// Infrastructure layer - Technical implementations
// Depends on domain layer, implements its interfaces

pub mod config;
pub mod events;
pub mod logging;
pub mod persistence;

mod result_ext;

pub use result_ext::ResultExt;
