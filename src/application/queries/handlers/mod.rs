//! Query Handlers 实现

mod artifact_handlers;
mod catalog_handlers;
mod generation_handlers;

pub use artifact_handlers::*;
pub use catalog_handlers::*;
pub use generation_handlers::*;
