//! chat-print command line
//!
//! Reads a conversation from a live Chrome tab or a saved page, then prints
//! it through a new browser tab or exports it to files.

use anyhow::Context;
use chat_print::browser::{BrowserSession, ConnectionOptions, LaunchOptions, PrintMode, TabSurfaceProvider};
use chat_print::document::to_markdown;
use chat_print::{ContainerRange, PageSnapshot, PlatformRegistry, PrepareOptions, PrintConfig, PrintError, PrintOrchestrator, prepare};
use clap::{ArgAction, CommandFactory, Parser};
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "chat-print")]
#[command(version)]
#[command(about = "Print AI chat conversations as clean transcripts", long_about = None)]
struct Cli {
    /// Saved page to read instead of a live tab
    #[arg(long, value_name = "FILE", requires = "host", conflicts_with_all = ["url", "ws_endpoint"])]
    html: Option<PathBuf>,

    /// Host the saved page was captured from (e.g. claude.ai)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Open this conversation URL in a launched browser
    #[arg(long, value_name = "URL", conflicts_with = "ws_endpoint")]
    url: Option<String>,

    /// WebSocket endpoint of a running browser; its active tab is printed
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Launch browser in headed mode
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// JSON file of extra platform profiles, merged over the built-in ones
    #[arg(long, value_name = "FILE")]
    profiles: Option<PathBuf>,

    /// List supported platforms and exit
    #[arg(long)]
    list_platforms: bool,

    /// First candidate container to extract (zero-based, inclusive)
    #[arg(long, value_name = "N", requires = "to")]
    from: Option<usize>,

    /// Last candidate container to extract (zero-based, inclusive)
    #[arg(long, value_name = "N", requires = "from")]
    to: Option<usize>,

    /// Render the transcript to a PDF file instead of opening the print dialog
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,

    /// Write the print document to an HTML file
    #[arg(long, value_name = "FILE")]
    html_out: Option<PathBuf>,

    /// Write the transcript as Markdown
    #[arg(long, value_name = "FILE")]
    markdown: Option<PathBuf>,

    /// Write the extracted messages as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Leave the print tab open after printing
    #[arg(long)]
    keep_open: bool,

    /// Delay between writing the document and printing
    #[arg(long, value_name = "MS", default_value = "100")]
    settle_ms: u64,

    /// Close-detection poll interval
    #[arg(long, value_name = "MS", default_value = "100")]
    poll_ms: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn has_source(&self) -> bool {
        self.html.is_some() || self.url.is_some() || self.ws_endpoint.is_some()
    }

    fn has_file_exports(&self) -> bool {
        self.html_out.is_some() || self.markdown.is_some() || self.json.is_some()
    }

    /// Printing happens for `--pdf` or when no file export was requested
    fn print_mode(&self) -> Option<PrintMode> {
        match &self.pdf {
            Some(path) => Some(PrintMode::Pdf(path.clone())),
            None if !self.has_file_exports() => Some(PrintMode::Dialog),
            None => None,
        }
    }

    fn launch_options(&self, headed: bool) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!headed);
        if let Some(path) = &self.chrome_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        options
    }

    fn print_config(&self) -> PrintConfig {
        PrintConfig::new()
            .settle_delay(Duration::from_millis(self.settle_ms))
            .poll_interval(Duration::from_millis(self.poll_ms))
            .auto_close(!self.keep_open)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if !cli.list_platforms && !cli.has_source() {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "one of --html, --url or --ws-endpoint is required")
            .exit();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<PrintError>() {
                Some(err) => err.alert_message(),
                None => format!("Error while printing: {:#}", e),
            };
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn load_registry(cli: &Cli) -> anyhow::Result<PlatformRegistry> {
    let builtin = PlatformRegistry::builtin();
    match &cli.profiles {
        Some(path) => {
            let extra = PlatformRegistry::load(path).with_context(|| format!("Failed to load profiles from {}", path.display()))?;
            Ok(builtin.merged(&extra)?)
        }
        None => Ok(builtin),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let registry = load_registry(cli)?;

    if cli.list_platforms {
        for (key, profile) in registry.iter() {
            println!("{:<20} {}", key, profile.display_name);
        }
        return Ok(());
    }

    let mode = cli.print_mode();
    // The native print dialog needs a visible window
    let headed = cli.headed || mode == Some(PrintMode::Dialog);

    let mut session = None;
    let snapshot = if let Some(path) = &cli.html {
        let html = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let host = cli.host.as_deref().unwrap_or_default();
        PageSnapshot::from_host(host, &html)
    } else if let Some(ws_url) = &cli.ws_endpoint {
        let browser = session.insert(BrowserSession::connect(ConnectionOptions::new(ws_url))?);
        browser.snapshot()?
    } else if let Some(url) = &cli.url {
        let browser = session.insert(BrowserSession::launch(cli.launch_options(headed))?);
        browser.navigate(url)?;
        browser.snapshot()?
    } else {
        return Ok(());
    };

    let options = PrepareOptions {
        range: cli.from.zip(cli.to).map(|(from, to)| ContainerRange::new(from, to)),
        generated_at: None,
    };
    let transcript = prepare(&registry, &snapshot, &options)?;
    log::info!(
        "Extracted {} messages from {}",
        transcript.extraction.messages.len(),
        transcript.platform
    );

    if let Some(path) = &cli.html_out {
        std::fs::write(path, transcript.document.to_html()).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &cli.markdown {
        std::fs::write(path, to_markdown(&transcript.document)).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        let json = transcript.extraction.to_json().map_err(PrintError::from)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let Some(mode) = mode else {
        return Ok(());
    };

    let session = match session {
        Some(session) => session,
        None => BrowserSession::launch(cli.launch_options(headed))?,
    };

    let mut provider = TabSurfaceProvider::new(&session, mode);
    let outcome = PrintOrchestrator::new(cli.print_config()).run(&mut provider, &transcript.document)?;
    log::info!("Print finished: {:?} after {} polls", outcome.reason, outcome.polls);

    Ok(())
}
