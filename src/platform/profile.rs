use crate::dom::predicate::{Matches, Predicate};
use crate::error::{PrintError, Result};
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clean selectors used when a profile does not declare any
pub const DEFAULT_CLEAN_SELECTORS: &[&str] = &["button", "[role=\"button\"]"];

/// Label used for the human side of every conversation
pub const HUMAN_NAME: &str = "Human";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Human,
    Assistant,
}

impl Speaker {
    /// CSS class of the rendered block
    pub fn css_class(&self) -> &'static str {
        match self {
            Speaker::Human => "human",
            Speaker::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Declarative description of how to extract one platform's conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformProfile {
    /// Label of the assistant speaker
    #[serde(alias = "name")]
    pub display_name: String,

    /// Candidate message containers
    pub message_selector: String,

    /// Mixed-role container selector used instead of `message_selector` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_predicate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_predicate: Option<String>,

    /// Narrows a container to its renderable payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_selector: Option<String>,

    /// UI chrome stripped from copied content, applied in order
    #[serde(default = "default_clean_selectors")]
    pub clean_selectors: Vec<String>,
}

fn default_clean_selectors() -> Vec<String> {
    DEFAULT_CLEAN_SELECTORS.iter().map(|s| s.to_string()).collect()
}

impl PlatformProfile {
    /// Create a profile with only the required fields set
    pub fn new(display_name: impl Into<String>, message_selector: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            message_selector: message_selector.into(),
            container_selector: None,
            human_predicate: None,
            assistant_predicate: None,
            content_selector: None,
            timestamp_selector: None,
            clean_selectors: default_clean_selectors(),
        }
    }

    /// Builder method: set the mixed-role container selector
    pub fn with_container(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = Some(selector.into());
        self
    }

    /// Builder method: set the human predicate
    pub fn with_human(mut self, selector: impl Into<String>) -> Self {
        self.human_predicate = Some(selector.into());
        self
    }

    /// Builder method: set the assistant predicate
    pub fn with_assistant(mut self, selector: impl Into<String>) -> Self {
        self.assistant_predicate = Some(selector.into());
        self
    }

    /// Builder method: set the content selector
    pub fn with_content(mut self, selector: impl Into<String>) -> Self {
        self.content_selector = Some(selector.into());
        self
    }

    /// Builder method: set the timestamp selector
    pub fn with_timestamp(mut self, selector: impl Into<String>) -> Self {
        self.timestamp_selector = Some(selector.into());
        self
    }

    /// Builder method: replace the clean selectors
    pub fn with_clean_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clean_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Check the invariants that do not need selector compilation
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            return Err(PrintError::ProfileConfig("display_name must not be empty".to_string()));
        }
        if self.message_selector.trim().is_empty() {
            return Err(PrintError::ProfileConfig(format!(
                "message_selector of '{}' must not be empty",
                self.display_name
            )));
        }
        Ok(())
    }

    /// Compile every selector of the profile.
    ///
    /// The candidate selector is required; malformed optional selectors are
    /// logged and disabled.
    pub fn compile(&self) -> Result<CompiledProfile> {
        self.validate()?;

        let candidates = match &self.container_selector {
            Some(container) => Predicate::parse(container)?,
            None => Predicate::parse(&self.message_selector)?,
        };

        let human = Predicate::parse_optional("human_predicate", self.human_predicate.as_deref());
        let assistant = Predicate::parse_optional("assistant_predicate", self.assistant_predicate.as_deref());

        let clean = self
            .clean_selectors
            .iter()
            .filter_map(|s| Predicate::parse_optional("clean selector", Some(s)))
            .collect();

        Ok(CompiledProfile {
            display_name: self.display_name.clone(),
            candidates,
            classification: Classification::from_predicates(human, assistant),
            content: Predicate::parse_optional("content_selector", self.content_selector.as_deref()),
            timestamp: Predicate::parse_optional("timestamp_selector", self.timestamp_selector.as_deref()),
            clean,
        })
    }
}

/// How containers are assigned a speaker
#[derive(Debug, Clone)]
pub enum Classification {
    /// Containers must match one of the two predicates; others are skipped
    DualPredicate { human: Predicate, assistant: Predicate },
    /// Matches are Human, everything else is Assistant
    HumanWithDefaultAssistant { human: Predicate },
    /// Matches are Assistant; others are skipped
    AssistantPredicateOnly { assistant: Predicate },
    /// No predicate declared; every container is Assistant
    AssistantOnly,
}

impl Classification {
    /// Pick the policy from the predicates a profile declares
    pub fn from_predicates(human: Option<Predicate>, assistant: Option<Predicate>) -> Self {
        match (human, assistant) {
            (Some(human), Some(assistant)) => Classification::DualPredicate { human, assistant },
            (Some(human), None) => Classification::HumanWithDefaultAssistant { human },
            (None, Some(assistant)) => Classification::AssistantPredicateOnly { assistant },
            (None, None) => Classification::AssistantOnly,
        }
    }

    /// Speaker of `container`, or `None` when the container is not a message
    pub fn classify(&self, container: &ElementRef<'_>) -> Option<Speaker> {
        match self {
            Classification::DualPredicate { human, assistant } => {
                if human.matches(container) {
                    Some(Speaker::Human)
                } else if assistant.matches(container) {
                    Some(Speaker::Assistant)
                } else {
                    None
                }
            }
            Classification::HumanWithDefaultAssistant { human } => Some(if human.matches(container) {
                Speaker::Human
            } else {
                Speaker::Assistant
            }),
            Classification::AssistantPredicateOnly { assistant } => {
                assistant.matches(container).then_some(Speaker::Assistant)
            }
            Classification::AssistantOnly => Some(Speaker::Assistant),
        }
    }
}

/// A profile with every selector compiled, ready for one extraction run
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub display_name: String,
    pub candidates: Predicate,
    pub classification: Classification,
    pub content: Option<Predicate>,
    pub timestamp: Option<Predicate>,
    pub clean: Vec<Predicate>,
}

impl CompiledProfile {
    /// Label for a speaker on this platform
    pub fn speaker_name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Human => HUMAN_NAME,
            Speaker::Assistant => &self.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_profile_builder() {
        let profile = PlatformProfile::new("Claude", ".message")
            .with_human(".user")
            .with_content(".body")
            .with_timestamp("time")
            .with_clean_selectors(["button"]);

        assert_eq!(profile.display_name, "Claude");
        assert_eq!(profile.human_predicate.as_deref(), Some(".user"));
        assert_eq!(profile.clean_selectors, vec!["button".to_string()]);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_empty_message_selector_is_rejected() {
        let profile = PlatformProfile::new("Claude", "  ");
        assert!(matches!(profile.validate(), Err(PrintError::ProfileConfig(_))));
        assert!(profile.compile().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"name": "Claude", "message_selector": ".message"}"#;
        let profile: PlatformProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.display_name, "Claude");
        assert_eq!(profile.clean_selectors, vec!["button", "[role=\"button\"]"]);
        assert!(profile.content_selector.is_none());
    }

    #[test]
    fn test_compile_picks_policy() {
        let dual = PlatformProfile::new("X", ".m").with_human(".h").with_assistant(".a");
        let human_only = PlatformProfile::new("X", ".m").with_human(".h");
        let assistant_only = PlatformProfile::new("X", ".m").with_assistant(".a");
        let neither = PlatformProfile::new("X", ".m");

        assert!(matches!(dual.compile().unwrap().classification, Classification::DualPredicate { .. }));
        assert!(matches!(
            human_only.compile().unwrap().classification,
            Classification::HumanWithDefaultAssistant { .. }
        ));
        assert!(matches!(
            assistant_only.compile().unwrap().classification,
            Classification::AssistantPredicateOnly { .. }
        ));
        assert!(matches!(neither.compile().unwrap().classification, Classification::AssistantOnly));
    }

    #[test]
    fn test_malformed_optional_selectors_are_disabled() {
        let profile = PlatformProfile::new("X", ".m")
            .with_content("div[")
            .with_timestamp("time[")
            .with_clean_selectors(["button", "[["]);

        let compiled = profile.compile().unwrap();
        assert!(compiled.content.is_none());
        assert!(compiled.timestamp.is_none());
        assert_eq!(compiled.clean.len(), 1);
    }

    #[test]
    fn test_malformed_candidate_selector_fails() {
        let profile = PlatformProfile::new("X", "div[");
        assert!(matches!(profile.compile(), Err(PrintError::InvalidSelector { .. })));
    }

    #[test]
    fn test_container_selector_replaces_message_selector() {
        let profile = PlatformProfile::new("X", ".m").with_container(".c");
        assert_eq!(profile.compile().unwrap().candidates.to_string(), ".c");
    }

    #[test]
    fn test_classify() {
        let html = Html::parse_fragment(r#"<div class="m h a" id="both"></div><div class="m" id="none"></div>"#);
        let both = Predicate::parse("#both").unwrap().find_first(html.root_element()).unwrap();
        let none = Predicate::parse("#none").unwrap().find_first(html.root_element()).unwrap();

        let dual = Classification::from_predicates(Predicate::parse(".h").ok(), Predicate::parse(".a").ok());
        assert_eq!(dual.classify(&both), Some(Speaker::Human));
        assert_eq!(dual.classify(&none), None);

        let default_assistant = Classification::from_predicates(Predicate::parse(".h").ok(), None);
        assert_eq!(default_assistant.classify(&none), Some(Speaker::Assistant));

        let assistant_only = Classification::from_predicates(None, Predicate::parse(".a").ok());
        assert_eq!(assistant_only.classify(&none), None);
        assert_eq!(assistant_only.classify(&both), Some(Speaker::Assistant));
    }

    #[test]
    fn test_speaker_name() {
        let compiled = PlatformProfile::new("ChatGPT", ".m").compile().unwrap();
        assert_eq!(compiled.speaker_name(Speaker::Human), "Human");
        assert_eq!(compiled.speaker_name(Speaker::Assistant), "ChatGPT");
    }
}
