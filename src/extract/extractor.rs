use crate::dom::element::ElementNode;
use crate::dom::predicate::Matches;
use crate::dom::snapshot::PageSnapshot;
use crate::extract::message::{Extraction, ExtractionStats, Message};
use crate::platform::profile::CompiledProfile;
use scraper::ElementRef;

/// Text prefixes of script fragments some platforms leak into message containers
pub const INJECTION_NOISE_PREFIXES: &[&str] = &["window.__oai_logHTML?"];

/// Inclusive range of candidate container indices to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRange {
    start: usize,
    end: usize,
}

impl ContainerRange {
    /// Endpoints may be given in either order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Turns a page snapshot into ordered messages for one compiled profile.
///
/// Extraction is a pure function of the snapshot and the profile: running it
/// twice on the same snapshot yields identical results.
pub struct Extractor<'p> {
    profile: &'p CompiledProfile,
    range: Option<ContainerRange>,
}

impl<'p> Extractor<'p> {
    pub fn new(profile: &'p CompiledProfile) -> Self {
        Self { profile, range: None }
    }

    /// Builder method: only extract containers inside `range`
    pub fn with_range(mut self, range: ContainerRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn extract(&self, snapshot: &PageSnapshot) -> Extraction {
        let containers = snapshot.select(&self.profile.candidates);
        let document_timestamps = self.document_timestamps(snapshot);

        let mut stats = ExtractionStats {
            candidates: containers.len(),
            ..Default::default()
        };
        let mut messages: Vec<Message> = Vec::new();

        for (index, container) in containers.into_iter().enumerate() {
            if let Some(range) = &self.range {
                if !range.contains(index) {
                    stats.out_of_range += 1;
                    continue;
                }
            }

            let Some(speaker) = self.profile.classification.classify(&container) else {
                log::debug!("Container {} matches neither speaker predicate", index);
                stats.unclassified += 1;
                continue;
            };

            let content = match &self.profile.content {
                Some(selector) => match selector.find_first(container) {
                    Some(content) => content,
                    None => {
                        log::debug!("Container {} has no content matching '{}'", index, selector);
                        stats.missing_content += 1;
                        continue;
                    }
                },
                None => container,
            };

            let fragment = self.clean_copy(content);
            let text = fragment.text_content().trim().to_string();

            if text.is_empty() {
                log::debug!("Container {} is empty after cleaning", index);
                stats.empty += 1;
                continue;
            }

            if messages.last().is_some_and(|last| last.text == text) {
                log::debug!("Container {} repeats the previous message", index);
                stats.duplicates += 1;
                continue;
            }

            if is_injection_noise(&text) {
                log::debug!("Container {} holds injected script text", index);
                stats.noise += 1;
                continue;
            }

            let sequence_index = messages.len();
            messages.push(Message {
                speaker,
                content: fragment,
                text,
                timestamp: document_timestamps.get(index).filter(|t| !t.is_empty()).cloned(),
                sequence_index,
            });
        }

        stats.kept = messages.len();
        log::info!(
            "Extracted {} of {} candidate containers for {}",
            stats.kept,
            stats.candidates,
            self.profile.display_name
        );

        Extraction {
            messages,
            document_timestamps,
            stats,
        }
    }

    /// Detached copy of `content` with every clean-selector match left out
    fn clean_copy(&self, content: ElementRef<'_>) -> ElementNode {
        let clean = &self.profile.clean;
        ElementNode::detach(content, &|el: &ElementRef<'_>| clean.iter().any(|p| p.matches(el)))
    }

    /// Text of every timestamp match, falling back to its `datetime` attribute.
    ///
    /// Empty matches are kept so that the nth entry still belongs to the nth
    /// candidate container. Pages give no stronger link between the two.
    fn document_timestamps(&self, snapshot: &PageSnapshot) -> Vec<String> {
        let Some(selector) = &self.profile.timestamp else {
            return Vec::new();
        };

        snapshot
            .select(selector)
            .into_iter()
            .map(|el| {
                let text = el.text().collect::<String>();
                let text = text.trim();
                if text.is_empty() {
                    el.value().attr("datetime").unwrap_or("").trim().to_string()
                } else {
                    text.to_string()
                }
            })
            .collect()
    }
}

/// Whether cleaned text is a known platform injection artefact
pub fn is_injection_noise(text: &str) -> bool {
    let trimmed = text.trim();
    INJECTION_NOISE_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}
