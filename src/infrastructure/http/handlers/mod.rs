//! HTTP Handlers

mod chapter;
mod operation;
mod persona;
mod ping;
mod project;
mod websocket;

pub use chapter::*;
pub use operation::*;
pub use persona::*;
pub use ping::*;
pub use project::*;
pub use websocket::*;
