//! Graphics backend implementations
//!
//! Contains implementations of the [`RenderBackend`](crate::render::RenderBackend)
//! trait. The crate ships the command-recording headless backend; real
//! graphics-API backends live with the embedding application.

mod headless;

pub use headless::{Command, HeadlessBackend};
