//! Live browser boundary
//!
//! Reads host pages from Chrome tabs and provides tab-backed print surfaces.

pub mod config;
pub mod session;
pub mod surface;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::{snapshot_tab, BrowserSession};
pub use surface::{PrintMode, TabSurface, TabSurfaceProvider};
