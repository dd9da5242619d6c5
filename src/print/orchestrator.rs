use crate::document::assembler::PrintDocument;
use crate::error::{PrintError, Result};
use crate::print::poll::Poller;
use crate::print::surface::{PrintSurface, SurfaceProvider};
use std::ops::ControlFlow;
use std::time::Duration;

/// Lifecycle of one print surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintState {
    Created,
    /// The host refused to open a surface (terminal)
    PopupBlocked,
    Populated,
    Printing,
    AwaitingClose,
    /// Terminal; the poll has ended
    Closed,
}

impl PrintState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PrintState::PopupBlocked | PrintState::Closed)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: PrintState) -> bool {
        use PrintState::*;
        matches!(
            (self, next),
            (Created, PopupBlocked)
                | (Created, Populated)
                | (Populated, Printing)
                | (Printing, AwaitingClose)
                | (Created, Closed)
                | (Populated, Closed)
                | (Printing, Closed)
                | (AwaitingClose, Closed)
        )
    }
}

/// Why the poll stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The surface reported itself closed
    SurfaceClosed,
    /// The surface regained focus, taken as the print dialog being dismissed
    FocusRegained,
    /// Probing the surface failed
    ProbeFailed,
}

/// Outcome of a completed print run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOutcome {
    pub reason: CloseReason,
    /// Number of poll ticks observed
    pub polls: u64,
    /// Whether the orchestrator closed the surface itself
    pub closed_surface: bool,
}

/// Timing and close behaviour of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    /// Pause between populating the surface and printing
    pub settle_delay: Duration,
    /// Interval of the close-detection poll
    pub poll_interval: Duration,
    /// Close the surface once the print interaction ends
    pub auto_close: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            poll_interval: Duration::from_millis(100),
            auto_close: true,
        }
    }
}

impl PrintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the settle delay
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Builder method: set the poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder method: enable or disable closing the surface after printing
    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }
}

/// Drives a print surface from creation to a terminal state
#[derive(Debug)]
pub struct PrintOrchestrator {
    config: PrintConfig,
    state: PrintState,
    history: Vec<PrintState>,
}

impl PrintOrchestrator {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            config,
            state: PrintState::Created,
            history: vec![PrintState::Created],
        }
    }

    pub fn state(&self) -> PrintState {
        self.state
    }

    /// Every state visited so far, in order
    pub fn history(&self) -> &[PrintState] {
        &self.history
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    fn transition(&mut self, next: PrintState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid print transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("Print surface {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    /// Open a surface, write `document` into it, print and wait for the
    /// interaction to end.
    ///
    /// The document is serialized before the surface is opened, so a
    /// failure never leaves a half-written surface behind.
    pub fn run<P: SurfaceProvider>(&mut self, provider: &mut P, document: &PrintDocument) -> Result<PrintOutcome> {
        if self.state != PrintState::Created {
            return Err(PrintError::PrintFailed(format!(
                "orchestrator already used (state {:?})",
                self.state
            )));
        }

        let html = document.to_html();

        let Some(mut surface) = provider.open()? else {
            log::warn!("Print surface creation was blocked");
            self.transition(PrintState::PopupBlocked);
            return Err(PrintError::PopupBlocked);
        };

        if let Err(e) = self.populate_and_print(&mut surface, &html, document.title()) {
            log::warn!("Print surface failed before printing finished: {}", e);
            if let Err(close_err) = surface.close() {
                log::debug!("Closing print surface failed: {}", close_err);
            }
            self.transition(PrintState::Closed);
            return Err(e);
        }
        log::info!("Print started for '{}'", document.title());

        self.transition(PrintState::AwaitingClose);
        let mut polls = 0;
        let reason = Poller::new(self.config.poll_interval).run(|tick| {
            polls = tick + 1;
            probe(&surface)
        });

        let mut closed_surface = false;
        if reason != CloseReason::SurfaceClosed && self.config.auto_close {
            match surface.close() {
                Ok(()) => closed_surface = true,
                Err(e) => log::debug!("Closing print surface failed: {}", e),
            }
        }

        self.transition(PrintState::Closed);
        log::info!("Print surface closed ({:?} after {} polls)", reason, polls);

        Ok(PrintOutcome {
            reason,
            polls,
            closed_surface,
        })
    }

    fn populate_and_print<S: PrintSurface>(&mut self, surface: &mut S, html: &str, title: &str) -> Result<()> {
        surface.write_document(html)?;
        surface.set_title(title)?;
        self.transition(PrintState::Populated);

        std::thread::sleep(self.config.settle_delay);
        surface.print()?;
        self.transition(PrintState::Printing);
        Ok(())
    }
}

fn probe<S: PrintSurface>(surface: &S) -> ControlFlow<CloseReason> {
    match surface.is_closed() {
        Ok(true) => ControlFlow::Break(CloseReason::SurfaceClosed),
        Ok(false) => match surface.has_focus() {
            Ok(true) => ControlFlow::Break(CloseReason::FocusRegained),
            Ok(false) => ControlFlow::Continue(()),
            Err(e) => {
                log::debug!("Focus probe failed: {}", e);
                ControlFlow::Break(CloseReason::ProbeFailed)
            }
        },
        Err(e) => {
            log::debug!("Liveness probe failed: {}", e);
            ControlFlow::Break(CloseReason::ProbeFailed)
        }
    }
}
