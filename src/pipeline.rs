use crate::document::assembler::{DocumentAssembler, PrintDocument};
use crate::dom::snapshot::PageSnapshot;
use crate::error::{PrintError, Result};
use crate::extract::extractor::{ContainerRange, Extractor};
use crate::extract::message::Extraction;
use crate::platform::registry::PlatformRegistry;
use crate::print::orchestrator::{PrintConfig, PrintOrchestrator, PrintOutcome};
use crate::print::surface::SurfaceProvider;

/// Per-run extraction and rendering options
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// Only extract candidate containers in this range
    pub range: Option<ContainerRange>,
    /// Fixed wall-clock label for the title; current local time when `None`
    pub generated_at: Option<String>,
}

/// A fully assembled conversation, ready to print or export
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Registry key of the resolved platform
    pub platform: String,
    pub extraction: Extraction,
    pub document: PrintDocument,
}

/// Resolve the platform, extract its messages and assemble the document.
///
/// Fails with `UnsupportedPlatform` when no profile matches the snapshot's
/// host, with `ExtractionFault` when its message selector cannot be compiled
/// and with `EmptyExtraction` when no message survives.
pub fn prepare(registry: &PlatformRegistry, snapshot: &PageSnapshot, options: &PrepareOptions) -> Result<Transcript> {
    let resolved = registry.resolve(snapshot.host())?;
    let profile = resolved.profile.compile().map_err(|e| match e {
        PrintError::InvalidSelector { .. } => {
            PrintError::ExtractionFault(format!("{} profile cannot be applied: {}", resolved.profile.display_name, e))
        }
        other => other,
    })?;

    let mut extractor = Extractor::new(&profile);
    if let Some(range) = options.range {
        extractor = extractor.with_range(range);
    }
    let extraction = extractor.extract(snapshot);
    log::debug!("Extraction stats: {:?}", extraction.stats);

    if extraction.is_empty() {
        return Err(PrintError::EmptyExtraction);
    }

    let mut assembler = DocumentAssembler::new(&profile);
    if let Some(generated_at) = &options.generated_at {
        assembler = assembler.with_generated_at(generated_at.clone());
    }
    let document = assembler.assemble(&extraction.messages, extraction.first_timestamp());

    Ok(Transcript {
        platform: resolved.key.to_string(),
        extraction,
        document,
    })
}

/// Prepare the transcript and print it on a new surface
pub fn print_conversation<P: SurfaceProvider>(
    registry: &PlatformRegistry,
    snapshot: &PageSnapshot,
    options: &PrepareOptions,
    provider: &mut P,
    config: PrintConfig,
) -> Result<PrintOutcome> {
    let transcript = prepare(registry, snapshot, options)?;
    PrintOrchestrator::new(config).run(provider, &transcript.document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::profile::PlatformProfile;

    #[test]
    fn test_prepare_unsupported_host() {
        let snapshot = PageSnapshot::from_host("example.com", "<div class=\"message\">hi</div>");
        let result = prepare(&PlatformRegistry::builtin(), &snapshot, &PrepareOptions::default());

        match result {
            Err(PrintError::UnsupportedPlatform { supported, .. }) => {
                assert!(supported.contains(&"claude.ai".to_string()));
                assert!(supported.contains(&"chatgpt.com".to_string()));
            }
            other => panic!("Expected UnsupportedPlatform, got {:?}", other.map(|t| t.platform)),
        }
    }

    #[test]
    fn test_prepare_empty_page() {
        let snapshot = PageSnapshot::from_url("https://claude.ai/new", "<main></main>");
        let result = prepare(&PlatformRegistry::builtin(), &snapshot, &PrepareOptions::default());
        assert!(matches!(result, Err(PrintError::EmptyExtraction)));
    }

    #[test]
    fn test_prepare_broken_message_selector() {
        let registry = PlatformRegistry::new([("bot.example", PlatformProfile::new("Bot", "div["))]).unwrap();
        let snapshot = PageSnapshot::from_host("bot.example", "<div>hi</div>");

        let err = prepare(&registry, &snapshot, &PrepareOptions::default()).unwrap_err();

        assert!(matches!(err, PrintError::ExtractionFault(_)));
        assert!(err.alert_message().starts_with("Error while printing: Extraction failed: Bot profile"));
    }

    #[test]
    fn test_prepare_claude_page() {
        let html = r#"
            <div class="font-user-message">How do I reverse a list?</div>
            <div class="font-claude-message">Use <code>reverse()</code>.<button>Copy</button></div>
        "#;
        let snapshot = PageSnapshot::from_url("https://claude.ai/chat/1", html);
        let options = PrepareOptions {
            generated_at: Some("10/19/2026, 12:00:00".to_string()),
            ..Default::default()
        };

        let transcript = prepare(&PlatformRegistry::builtin(), &snapshot, &options).unwrap();

        assert_eq!(transcript.platform, "claude.ai");
        assert_eq!(transcript.document.title(), "Claude conversation on 10/19/2026, 12:00:00");
        assert_eq!(transcript.extraction.messages.len(), 2);
        assert!(transcript.extraction.messages[0].is_human());
        assert!(!transcript.document.to_html().contains("<button>"));
    }
}
