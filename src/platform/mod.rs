//! Platform registry and profile resolution
//!
//! - PlatformProfile: selectors and naming for one chat platform
//! - PlatformRegistry: immutable site-key to profile mapping with `resolve`
//! - host_from_url: hostname extraction for resolution

pub mod host;
pub mod profile;
pub mod registry;

pub use host::host_from_url;
pub use profile::{Classification, CompiledProfile, PlatformProfile, Speaker, HUMAN_NAME};
pub use registry::{PlatformRegistry, ResolvedPlatform};
