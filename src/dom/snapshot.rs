use crate::dom::predicate::{Matches, Predicate};
use crate::platform::host::host_from_url;
use scraper::{ElementRef, Html};

/// Read-only parse of a host page.
///
/// The extractor only ever reads from a snapshot; content that ends up in a
/// transcript is copied out into owned fragments first.
pub struct PageSnapshot {
    url: Option<String>,
    host: String,
    document: Html,
}

impl PageSnapshot {
    /// Parse a page captured from `url`; the host is taken from the address
    pub fn from_url(url: impl Into<String>, html: &str) -> Self {
        let url = url.into();
        let host = host_from_url(&url);
        Self {
            url: Some(url),
            host,
            document: Html::parse_document(html),
        }
    }

    /// Parse a page for an explicitly named host
    pub fn from_host(host: impl Into<String>, html: &str) -> Self {
        Self {
            url: None,
            host: host_from_url(&host.into()),
            document: Html::parse_document(html),
        }
    }

    /// Address the page was captured from, when known
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Hostname used for platform resolution
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Root element of the document
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Every element in the document matching `predicate`, in document order
    pub fn select(&self, predicate: &Predicate) -> Vec<ElementRef<'_>> {
        self.document
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| predicate.matches(el))
            .collect()
    }

    /// Count elements in the document
    pub fn count_elements(&self) -> usize {
        self.document
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .count()
    }
}
