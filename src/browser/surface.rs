use crate::browser::session::{evaluate_bool, BrowserSession};
use crate::error::{PrintError, Result};
use crate::print::surface::{PrintSurface, SurfaceProvider};
use headless_chrome::Tab;
use headless_chrome::types::PrintToPdfOptions;
use std::path::PathBuf;
use std::sync::Arc;

/// How a browser surface prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintMode {
    /// Open the browser's native print dialog (headed browsers)
    Dialog,
    /// Render the page to a PDF file
    Pdf(PathBuf),
}

/// Opens print surfaces as new tabs of a browser session
pub struct TabSurfaceProvider<'a> {
    session: &'a BrowserSession,
    mode: PrintMode,
}

impl<'a> TabSurfaceProvider<'a> {
    pub fn new(session: &'a BrowserSession, mode: PrintMode) -> Self {
        Self { session, mode }
    }
}

impl<'a> SurfaceProvider for TabSurfaceProvider<'a> {
    type Surface = TabSurface<'a>;

    fn open(&mut self) -> Result<Option<TabSurface<'a>>> {
        match self.session.new_tab() {
            Ok(tab) => Ok(Some(TabSurface {
                session: self.session,
                tab,
                mode: self.mode.clone(),
                printed: false,
            })),
            Err(e) => {
                // The browser refusing a new target is the equivalent of a popup blocker
                log::warn!("{}", e);
                Ok(None)
            }
        }
    }
}

/// A browser tab holding a print document
pub struct TabSurface<'a> {
    session: &'a BrowserSession,
    tab: Arc<Tab>,
    mode: PrintMode,
    printed: bool,
}

impl TabSurface<'_> {
    fn evaluate(&self, script: &str) -> Result<()> {
        self.tab
            .evaluate(script, false)
            .map(|_| ())
            .map_err(|e| PrintError::EvaluationFailed(e.to_string()))
    }
}

impl PrintSurface for TabSurface<'_> {
    fn write_document(&mut self, html: &str) -> Result<()> {
        let literal = serde_json::to_string(html)?;
        self.evaluate(&format!("document.open(); document.write({}); document.close();", literal))
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        let literal = serde_json::to_string(title)?;
        self.evaluate(&format!("document.title = {};", literal))
    }

    fn print(&mut self) -> Result<()> {
        match &self.mode {
            PrintMode::Dialog => {
                // Scheduled so evaluation returns before the dialog blocks the page
                self.evaluate("setTimeout(() => window.print(), 0);")?;
            }
            PrintMode::Pdf(path) => {
                let options = PrintToPdfOptions {
                    print_background: Some(true),
                    ..Default::default()
                };
                let pdf = self
                    .tab
                    .print_to_pdf(Some(options))
                    .map_err(|e| PrintError::PrintFailed(e.to_string()))?;
                std::fs::write(path, pdf)?;
                log::info!("Wrote PDF to {}", path.display());
            }
        }
        self.printed = true;
        Ok(())
    }

    fn is_closed(&self) -> Result<bool> {
        let target = self.tab.get_target_id();
        let open = self.session.get_tabs()?.iter().any(|tab| tab.get_target_id() == target);
        Ok(!open)
    }

    fn has_focus(&self) -> Result<bool> {
        match self.mode {
            PrintMode::Dialog => Ok(self.printed && evaluate_bool(&self.tab, "document.hasFocus()")),
            PrintMode::Pdf(_) => Ok(self.printed),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.tab
            .close(false)
            .map(|_| ())
            .map_err(|e| PrintError::TabOperationFailed(format!("Failed to close tab: {}", e)))
    }
}
