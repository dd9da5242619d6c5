//! Print orchestration
//!
//! Drives a rendering surface through populate, print and close detection.
//! Surfaces are abstract; the browser module provides the Chrome-backed one.

pub mod orchestrator;
pub mod poll;
pub mod surface;

pub use orchestrator::{CloseReason, PrintConfig, PrintOrchestrator, PrintOutcome, PrintState};
pub use poll::Poller;
pub use surface::{PrintSurface, SurfaceProvider};
