//! # chat-print
//!
//! Extracts a conversation rendered by an AI chat web interface and turns it
//! into a clean, deduplicated, print-ready transcript.
//!
//! ## Features
//!
//! - **Platform Registry**: declarative selector profiles for Claude, ChatGPT, DeepSeek and Perplexity
//! - **Extraction**: classifies message containers, strips UI chrome, drops duplicates and noise
//! - **Assembly**: self-contained HTML with print styles, plus Markdown and JSON exports
//! - **Printing**: drives a Chrome tab through print and close detection
//!
//! ## Command Line
//!
//! ```bash
//! # Print the conversation open in a running Chrome (started with --remote-debugging-port)
//! chat-print --ws-endpoint ws://127.0.0.1:9222/devtools/browser/<id>
//!
//! # Render a saved page to PDF
//! chat-print --html saved.html --host claude.ai --pdf conversation.pdf
//! ```
//!
//! ## Library Usage
//!
//! ```rust
//! use chat_print::{prepare, PageSnapshot, PlatformRegistry, PrepareOptions};
//!
//! # fn main() -> chat_print::Result<()> {
//! let html = r#"
//!     <div class="text-base"><div class="whitespace-pre-wrap">Hi!</div></div>
//!     <div class="text-base"><div class="prose">Hello, how can I help?</div></div>
//! "#;
//! let snapshot = PageSnapshot::from_url("https://chatgpt.com/c/123", html);
//!
//! let transcript = prepare(&PlatformRegistry::builtin(), &snapshot, &PrepareOptions::default())?;
//! assert_eq!(transcript.extraction.messages.len(), 2);
//!
//! let html = transcript.document.to_html();
//! assert!(html.contains("ChatGPT conversation on"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`platform`]: profiles, the registry and host resolution
//! - [`dom`]: structural predicates, page snapshots and detached fragments
//! - [`extract`]: message extraction
//! - [`document`]: print document assembly
//! - [`print`]: print orchestration over abstract surfaces
//! - [`browser`]: Chrome session, snapshots and tab surfaces
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod document;
pub mod dom;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod platform;
pub mod print;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions, PrintMode, TabSurfaceProvider};
pub use document::{DocumentAssembler, PrintDocument};
pub use dom::{ElementNode, PageSnapshot, Predicate};
pub use error::{PrintError, Result};
pub use extract::{ContainerRange, Extraction, Extractor, Message, Speaker};
pub use pipeline::{prepare, print_conversation, PrepareOptions, Transcript};
pub use platform::{PlatformProfile, PlatformRegistry};
pub use print::{PrintConfig, PrintOrchestrator, PrintOutcome, PrintState};
