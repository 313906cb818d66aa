//! HTTP Handlers

mod artifact;
mod catalog;
mod generate;
mod key;
mod ping;
mod websocket;

pub use artifact::*;
pub use catalog::*;
pub use generate::*;
pub use key::*;
pub use ping::*;
pub use websocket::*;
