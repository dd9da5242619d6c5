use crate::dom::element::{escape_attribute, escape_text};
use crate::document::style::{icon_data_url, STYLESHEET};
use crate::extract::message::Message;
use crate::platform::profile::{CompiledProfile, Speaker};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Format used for the wall-clock fallback in titles
pub const TITLE_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// Format a local time the way document titles show it
pub fn format_title_time(time: &DateTime<Local>) -> String {
    time.format(TITLE_TIME_FORMAT).to_string()
}

/// One rendered message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBlock {
    speaker: Speaker,
    label: String,
    timestamp: Option<String>,
    content_html: String,
}

impl MessageBlock {
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn content_html(&self) -> &str {
        &self.content_html
    }

    fn write_html(&self, out: &mut String) {
        out.push_str(&format!("<div class=\"message {}\">", self.speaker.css_class()));
        out.push_str(&format!("<div class=\"message-label\">{}:</div>", escape_text(&self.label)));
        if let Some(timestamp) = &self.timestamp {
            out.push_str(&format!(
                "<span class=\"message-timestamp\">{}</span>",
                escape_text(timestamp)
            ));
        }
        out.push_str(&self.content_html);
        out.push_str("</div>\n");
    }
}

/// Self-contained printable transcript.
///
/// Built once by [`DocumentAssembler`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintDocument {
    title: String,
    stylesheet: &'static str,
    icon_href: String,
    blocks: Vec<MessageBlock>,
}

impl PrintDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn stylesheet(&self) -> &str {
        self.stylesheet
    }

    pub fn blocks(&self) -> &[MessageBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Full markup of the document
    pub fn to_html(&self) -> String {
        let title = escape_text(&self.title);
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", title));
        out.push_str(&format!("<style>{}</style>\n", self.stylesheet));
        out.push_str(&format!(
            "<link rel=\"icon\" type=\"image/svg+xml\" href=\"{}\">\n",
            escape_attribute(&self.icon_href)
        ));
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!("<div class=\"header\"><h3>{}</h3></div>\n", title));
        for block in &self.blocks {
            block.write_html(&mut out);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Renders messages into a [`PrintDocument`]
pub struct DocumentAssembler<'p> {
    profile: &'p CompiledProfile,
    generated_at: String,
}

impl<'p> DocumentAssembler<'p> {
    /// Assembler whose wall-clock fallback is the current local time
    pub fn new(profile: &'p CompiledProfile) -> Self {
        Self {
            profile,
            generated_at: format_title_time(&Local::now()),
        }
    }

    /// Builder method: fix the wall-clock fallback used in the title
    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// `"<Name> conversation on <timestamp-or-now>"`
    pub fn title(&self, first_timestamp: Option<&str>) -> String {
        let when = first_timestamp
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.generated_at.as_str());
        format!("{} conversation on {}", self.profile.display_name, when)
    }

    pub fn assemble(&self, messages: &[Message], first_timestamp: Option<&str>) -> PrintDocument {
        let blocks = messages
            .iter()
            .map(|message| MessageBlock {
                speaker: message.speaker,
                label: self.profile.speaker_name(message.speaker).to_string(),
                timestamp: message.timestamp.clone(),
                content_html: message.content_html(),
            })
            .collect();

        PrintDocument {
            title: self.title(first_timestamp),
            stylesheet: STYLESHEET,
            icon_href: icon_data_url(),
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::ElementNode;
    use crate::platform::profile::PlatformProfile;

    fn message(speaker: Speaker, html_text: &str, index: usize) -> Message {
        Message {
            speaker,
            content: ElementNode::new("div").with_text(html_text),
            text: html_text.to_string(),
            timestamp: None,
            sequence_index: index,
        }
    }

    fn profile() -> CompiledProfile {
        PlatformProfile::new("Claude", ".m").compile().unwrap()
    }

    #[test]
    fn test_title_prefers_first_timestamp() {
        let profile = profile();
        let assembler = DocumentAssembler::new(&profile).with_generated_at("10/19/2026, 09:00:00");

        assert_eq!(assembler.title(Some("Oct 1")), "Claude conversation on Oct 1");
        assert_eq!(assembler.title(Some("  ")), "Claude conversation on 10/19/2026, 09:00:00");
        assert_eq!(assembler.title(None), "Claude conversation on 10/19/2026, 09:00:00");
    }

    #[test]
    fn test_blocks_follow_messages() {
        let profile = profile();
        let messages = vec![message(Speaker::Human, "Hi", 0), message(Speaker::Assistant, "Hello", 1)];
        let document = DocumentAssembler::new(&profile).assemble(&messages, None);

        let labels: Vec<&str> = document.blocks().iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["Human", "Claude"]);
        assert_eq!(document.blocks()[1].speaker(), Speaker::Assistant);
        assert_eq!(document.blocks()[0].content_html(), "<div>Hi</div>");
    }

    #[test]
    fn test_to_html_is_self_contained() {
        let profile = profile();
        let mut with_time = message(Speaker::Assistant, "<script>", 1);
        with_time.timestamp = Some("10:01".to_string());
        let messages = vec![message(Speaker::Human, "Hi", 0), with_time];

        let html = DocumentAssembler::new(&profile)
            .with_generated_at("now")
            .assemble(&messages, None)
            .to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Claude conversation on now</title>"));
        assert!(html.contains("<h3>Claude conversation on now</h3>"));
        assert!(html.contains("<div class=\"message human\"><div class=\"message-label\">Human:</div>"));
        assert!(html.contains("<div class=\"message assistant\">"));
        assert!(html.contains("<span class=\"message-timestamp\">10:01</span>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"data:image/svg+xml;base64,"));
        assert!(!html.contains("http://"));
        assert!(!html.contains("src=\"http"));
    }

    #[test]
    fn test_title_is_escaped() {
        let profile = PlatformProfile::new("A<B>", ".m").compile().unwrap();
        let html = DocumentAssembler::new(&profile)
            .with_generated_at("now")
            .assemble(&[], None)
            .to_html();
        assert!(html.contains("<title>A&lt;B&gt; conversation on now</title>"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let profile = profile();
        let messages = vec![message(Speaker::Human, "Hi", 0)];
        let assembler = DocumentAssembler::new(&profile).with_generated_at("fixed");

        assert_eq!(assembler.assemble(&messages, None), assembler.assemble(&messages, None));
    }
}
