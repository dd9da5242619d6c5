use crate::dom::element::ElementNode;
use crate::platform::profile::Speaker;
use serde::{Deserialize, Serialize};

/// One speaker-tagged message recovered from a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub speaker: Speaker,

    /// Cleaned, detached copy of the message payload
    pub content: ElementNode,

    /// Trimmed text of `content`
    pub text: String,

    /// Best-effort timestamp, correlated by position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Position in emission order; the only ordering signal
    pub sequence_index: usize,
}

impl Message {
    pub fn is_human(&self) -> bool {
        self.speaker == Speaker::Human
    }

    /// HTML of the cleaned payload
    pub fn content_html(&self) -> String {
        self.content.to_html()
    }
}

/// Counters describing why containers did or did not become messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Containers matched by the candidate selector
    pub candidates: usize,
    /// Containers outside the requested range
    pub out_of_range: usize,
    /// Containers that matched neither speaker predicate
    pub unclassified: usize,
    /// Containers without a content-selector match
    pub missing_content: usize,
    pub empty: usize,
    pub duplicates: usize,
    pub noise: usize,
    pub kept: usize,
}

/// Result of one extraction run
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub messages: Vec<Message>,

    /// Text of every timestamp-selector match in document order; empty when a
    /// match carries neither text nor `datetime`
    pub document_timestamps: Vec<String>,

    pub stats: ExtractionStats,
}

impl Extraction {
    /// First non-empty timestamp found in the document
    pub fn first_timestamp(&self) -> Option<&str> {
        self.document_timestamps.iter().map(String::as_str).find(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Export the messages to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages)
    }
}
