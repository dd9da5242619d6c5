//! Conversation extraction
//!
//! Walks a page snapshot with a compiled profile and produces ordered,
//! cleaned, deduplicated messages.

pub mod extractor;
pub mod message;

pub use crate::platform::profile::Speaker;
pub use extractor::{is_injection_noise, ContainerRange, Extractor};
pub use message::{Extraction, ExtractionStats, Message};
