use crate::error::Result;

/// A rendering target that receives a finished document and prints it
pub trait PrintSurface {
    /// Replace the surface's content with `html`
    fn write_document(&mut self, html: &str) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Invoke the native print action
    fn print(&mut self) -> Result<()>;

    /// Whether the surface has gone away
    fn is_closed(&self) -> Result<bool>;

    /// Whether the surface holds input focus again after printing
    fn has_focus(&self) -> Result<bool>;

    fn close(&mut self) -> Result<()>;
}

/// Opens new print surfaces
pub trait SurfaceProvider {
    type Surface: PrintSurface;

    /// Open a blank surface; `Ok(None)` means the host refused to open one
    fn open(&mut self) -> Result<Option<Self::Surface>>;
}
