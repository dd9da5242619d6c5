use chat_print::{
    prepare, BrowserSession, LaunchOptions, PlatformRegistry, PrepareOptions, PrintConfig, PrintMode,
    PrintOrchestrator, PrintState, TabSurfaceProvider,
};
use chat_print::print::CloseReason;
use std::time::Duration;

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_snapshot_from_live_tab() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    session
        .navigate(&data_url("<html><body><div class='message'>Hello</div><button>Copy</button></body></html>"))
        .expect("Failed to navigate");

    let snapshot = session.snapshot().expect("Failed to snapshot");
    assert!(snapshot.url().is_some_and(|url| url.starts_with("data:")));
    assert!(snapshot.count_elements() >= 4);
}

#[test]
#[ignore]
fn test_print_to_pdf_surface() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    let html = r#"
        <div class="font-user-message">Summarize this.</div>
        <div class="font-claude-message"><p>Here is a summary.</p><button>Copy</button></div>
    "#;
    let snapshot = chat_print::PageSnapshot::from_url("https://claude.ai/chat/1", html);
    let transcript = prepare(&PlatformRegistry::builtin(), &snapshot, &PrepareOptions::default())
        .expect("Failed to prepare transcript");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pdf = dir.path().join("conversation.pdf");
    let tabs_before = session.get_tabs().expect("Failed to get tabs").len();

    let mut provider = TabSurfaceProvider::new(&session, PrintMode::Pdf(pdf.clone()));
    let config = PrintConfig::new()
        .settle_delay(Duration::from_millis(200))
        .poll_interval(Duration::from_millis(50));
    let mut orchestrator = PrintOrchestrator::new(config);

    let outcome = orchestrator
        .run(&mut provider, &transcript.document)
        .expect("Failed to print");

    assert_eq!(outcome.reason, CloseReason::FocusRegained);
    assert!(outcome.closed_surface);
    assert_eq!(orchestrator.state(), PrintState::Closed);

    let bytes = std::fs::read(&pdf).expect("PDF not written");
    assert!(bytes.starts_with(b"%PDF"));

    std::thread::sleep(Duration::from_millis(200));
    let tabs_after = session.get_tabs().expect("Failed to get tabs").len();
    assert_eq!(tabs_after, tabs_before);
}

#[test]
#[ignore]
fn test_surface_keeps_tab_open_without_auto_close() {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    let snapshot = chat_print::PageSnapshot::from_url(
        "https://chatgpt.com/c/1",
        r#"<div class="text-base"><div class="whitespace-pre-wrap">Hi</div></div>"#,
    );
    let transcript = prepare(&PlatformRegistry::builtin(), &snapshot, &PrepareOptions::default())
        .expect("Failed to prepare transcript");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut provider = TabSurfaceProvider::new(&session, PrintMode::Pdf(dir.path().join("out.pdf")));
    let outcome = PrintOrchestrator::new(PrintConfig::new().auto_close(false))
        .run(&mut provider, &transcript.document)
        .expect("Failed to print");

    assert!(!outcome.closed_surface);

    let tabs = session.get_tabs().expect("Failed to get tabs");
    let titles: Vec<String> = tabs.iter().filter_map(|tab| tab.get_title().ok()).collect();
    assert!(titles.iter().any(|t| t.starts_with("ChatGPT conversation on")));
}
