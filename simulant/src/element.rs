use crate::errors::AutomationError;
use crate::geometry::{AxisValues, BoundaryValues};
use std::fmt::Debug;

/// Interface for platform-specific element handle implementations.
///
/// The core never touches engine APIs directly; everything it knows about
/// a live DOM node flows through this contract. All measurements are
/// re-read on every call because layout and computed style are mutable
/// between calls.
pub trait DomElementImpl: Send + Sync + Debug {
    /// Stable identity of the underlying node for the lifetime of the page.
    fn object_id(&self) -> usize;

    /// Lowercased tag name, e.g. `div`, `body`, `html`, `iframe`.
    fn tag_name(&self) -> String;

    /// Attribute lookup; `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the node is still connected to its document.
    fn is_attached(&self) -> Result<bool, AutomationError>;

    /// Whether the node is rendered and interactable.
    fn is_visible(&self) -> Result<bool, AutomationError>;

    /// Border-box edges in viewport coordinates.
    fn bounding_rect(&self) -> Result<BoundaryValues<f64>, AutomationError>;

    /// `scrollWidth`/`scrollHeight`.
    fn scroll_size(&self) -> Result<AxisValues<f64>, AutomationError>;

    /// `clientWidth`/`clientHeight`.
    fn client_size(&self) -> Result<AxisValues<f64>, AutomationError>;

    /// Current `scrollLeft`/`scrollTop`.
    fn scroll_position(&self) -> Result<AxisValues<f64>, AutomationError>;

    /// Sets `scrollLeft`/`scrollTop`. The only mutation this core performs
    /// outside of dispatched interactions.
    fn set_scroll_position(&self, position: AxisValues<f64>) -> Result<(), AutomationError>;

    fn clone_box(&self) -> Box<dyn DomElementImpl>;
}

/// A resolved DOM element handle.
#[derive(Debug)]
pub struct DomElement {
    inner: Box<dyn DomElementImpl>,
}

impl DomElement {
    pub fn new(inner: Box<dyn DomElementImpl>) -> Self {
        Self { inner }
    }

    pub fn object_id(&self) -> usize {
        self.inner.object_id()
    }

    pub fn tag_name(&self) -> String {
        self.inner.tag_name()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attribute(name)
    }

    pub fn is_attached(&self) -> Result<bool, AutomationError> {
        self.inner.is_attached()
    }

    pub fn is_visible(&self) -> Result<bool, AutomationError> {
        self.inner.is_visible()
    }

    pub fn bounding_rect(&self) -> Result<BoundaryValues<f64>, AutomationError> {
        self.inner.bounding_rect()
    }

    pub fn scroll_size(&self) -> Result<AxisValues<f64>, AutomationError> {
        self.inner.scroll_size()
    }

    pub fn client_size(&self) -> Result<AxisValues<f64>, AutomationError> {
        self.inner.client_size()
    }

    pub fn scroll_position(&self) -> Result<AxisValues<f64>, AutomationError> {
        self.inner.scroll_position()
    }

    pub fn set_scroll_position(&self, position: AxisValues<f64>) -> Result<(), AutomationError> {
        self.inner.set_scroll_position(position)
    }
}

impl Clone for DomElement {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone_box() }
    }
}

impl PartialEq for DomElement {
    fn eq(&self, other: &Self) -> bool {
        self.object_id() == other.object_id()
    }
}

impl Eq for DomElement {}
