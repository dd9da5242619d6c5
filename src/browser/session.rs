use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            dom::PageSnapshot,
            error::{PrintError, Result}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Chat platforms refuse to render for automation-flagged browsers
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the session alive while the user sits in the print dialog
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        log::info!("Launching browser (headless: {})", options.headless);
        let browser = Browser::new(launch_opts).map_err(|e| PrintError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| PrintError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        log::info!("Connecting to browser at {}", options.ws_url);
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| PrintError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Create a new tab
    pub fn new_tab(&self) -> Result<Arc<Tab>> {
        self.browser
            .new_tab()
            .map_err(|e| PrintError::TabOperationFailed(format!("Failed to create tab: {}", e)))
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| PrintError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // First pass: visible and focused
        for tab in &tabs {
            if evaluate_bool(tab, "document.visibilityState === 'visible' && document.hasFocus()") {
                return Ok(tab.clone());
            }
        }

        // Second pass: visible only
        for tab in &tabs {
            if evaluate_bool(tab, "document.visibilityState === 'visible'") {
                return Ok(tab.clone());
            }
        }

        // Headless tabs may report neither; fall back to the most recent page
        tabs.iter()
            .rev()
            .find(|tab| !tab.get_url().starts_with("about:"))
            .or_else(|| tabs.last())
            .cloned()
            .ok_or_else(|| PrintError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the active tab to a URL and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| PrintError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| PrintError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Capture a read-only snapshot of the active tab
    pub fn snapshot(&self) -> Result<PageSnapshot> {
        snapshot_tab(&self.tab()?)
    }

    /// Close all tabs
    pub fn close(&self) -> Result<()> {
        // headless_chrome closes the browser process when Browser is dropped
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false);
        }
        Ok(())
    }
}

/// Capture the address and current markup of `tab`
pub fn snapshot_tab(tab: &Arc<Tab>) -> Result<PageSnapshot> {
    let url = tab.get_url();
    let html = tab
        .get_content()
        .map_err(|e| PrintError::EvaluationFailed(format!("Failed to read page content: {}", e)))?;

    log::debug!("Captured {} bytes of markup from {}", html.len(), url);
    Ok(PageSnapshot::from_url(url, &html))
}

/// Evaluate an expression expected to return a boolean; errors count as false
pub(crate) fn evaluate_bool(tab: &Tab, expression: &str) -> bool {
    match tab.evaluate(expression, false) {
        Ok(remote_object) => remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false),
        Err(e) => {
            log::debug!("Failed to evaluate '{}': {}", expression, e);
            false
        }
    }
}
