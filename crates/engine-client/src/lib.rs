//! Engine communication layer: a client for an external UCI analysis
//! process.
//!
//! The client serializes analysis requests over a single command channel,
//! parses the engine's streamed output, and resolves each request with a
//! ranked evaluation snapshot. Construct one client per engine process in
//! the application's composition root and hand out clones of the handle.

pub use engine_core;

pub mod client;
pub mod config;
pub mod error;
pub mod process;
pub mod report;

pub use client::EngineClient;
pub use config::EngineConfig;
pub use error::EngineError;
