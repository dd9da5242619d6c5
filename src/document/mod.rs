//! Print document assembly
//!
//! Renders extracted messages into a self-contained, print-ready HTML
//! document, with a Markdown rendering of the same transcript.

pub mod assembler;
pub mod markdown;
pub mod style;

pub use assembler::{format_title_time, DocumentAssembler, MessageBlock, PrintDocument};
pub use markdown::to_markdown;
pub use style::STYLESHEET;
