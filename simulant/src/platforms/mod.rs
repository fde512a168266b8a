//! The platform capability set injected into the core.
//!
//! Real deployments back [`PlatformAdapter`] with an engine bridge (CDP,
//! WebDriver, an in-page script host); tests use the in-memory
//! [`mock`] platform. The core itself depends only on this trait.

use crate::automation::Interaction;
use crate::element::DomElement;
use crate::errors::AutomationError;
use serde::{Deserialize, Serialize};

pub mod mock;

/// Engine-family identity flags gating the quirk corrections in the
/// scrollability analyzer.
///
/// Passed in explicitly rather than sniffed from a global so that each
/// quirk branch is unit-testable per engine without a real browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserFlags {
    pub is_ie: bool,
    pub is_chrome: bool,
    pub is_firefox: bool,
}

impl BrowserFlags {
    pub fn ie() -> Self {
        Self { is_ie: true, ..Self::default() }
    }

    pub fn chrome() -> Self {
        Self { is_chrome: true, ..Self::default() }
    }

    pub fn firefox() -> Self {
        Self { is_firefox: true, ..Self::default() }
    }
}

/// The common trait every hosting environment must implement.
///
/// Element-local measurements live on [`DomElement`]; this trait covers
/// everything that needs document context (style resolution, ancestor and
/// frame traversal, role predicates) plus the two async suspension points
/// of the action lifecycle: waiting for a render to settle and dispatching
/// a simulated interaction.
#[async_trait::async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Engine identity of the page this adapter is attached to.
    fn browser_flags(&self) -> BrowserFlags;

    /// Computed style value for `property`, engine-normalized (e.g. the
    /// overflow keywords).
    fn computed_style(
        &self,
        element: &DomElement,
        property: &str,
    ) -> Result<String, AutomationError>;

    /// The `documentElement` of the document owning `element`.
    fn find_document(&self, element: &DomElement) -> Result<DomElement, AutomationError>;

    /// The `<body>` of the document whose root is `document_root`, if any.
    /// Documents synthesized without a body (e.g. srcless iframes mid-load)
    /// return `None`.
    fn body_of(&self, document_root: &DomElement) -> Result<Option<DomElement>, AutomationError>;

    fn is_body_element(&self, element: &DomElement) -> bool;

    fn is_html_element(&self, element: &DomElement) -> bool;

    /// Ordered ancestor chain, nearest ancestor first, within the
    /// element's own document.
    fn parents(&self, element: &DomElement) -> Result<Vec<DomElement>, AutomationError>;

    /// Whether the element lives inside an embedded frame of this page.
    fn is_element_in_iframe(&self, element: &DomElement) -> bool;

    /// The host `<iframe>` element in the outer document, when
    /// `is_element_in_iframe` holds.
    fn iframe_by_element(
        &self,
        element: &DomElement,
    ) -> Result<Option<DomElement>, AutomationError>;

    /// Suspends until the last applied mutation (typically a scroll) has
    /// taken visual effect and fresh measurements are meaningful.
    async fn wait_for_render(&self) -> Result<(), AutomationError>;

    /// Injects the simulated interaction into the page and suspends until
    /// the page acknowledged the dispatch.
    async fn dispatch(
        &self,
        element: &DomElement,
        interaction: &Interaction,
    ) -> Result<(), AutomationError>;
}
