//! An in-memory page and platform adapter.
//!
//! `MockPage` models just enough of a document for the geometry, scrolling
//! and lifecycle layers to be exercised without a browser: nodes carry a
//! tag, attributes, computed styles, scroll/client metrics and a
//! viewport-space rect; scrolling a container shifts every descendant's
//! measured rect; embedded documents hang off a host `<iframe>` element.
//! Dispatched interactions are recorded for assertions, and nodes can be
//! detached mid-run to exercise the failure paths.

use crate::automation::Interaction;
use crate::element::{DomElement, DomElementImpl};
use crate::errors::AutomationError;
use crate::geometry::{AxisValues, BoundaryValues};
use crate::platforms::{BrowserFlags, PlatformAdapter};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct NodeData {
    tag: String,
    parent: Option<usize>,
    /// Node id of the `documentElement` owning this node.
    document: usize,
    /// For the root of an embedded document: the host `<iframe>` element
    /// in the outer document.
    iframe_host: Option<usize>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    /// Border-box edges with every ancestor scroll position at zero. The
    /// measured rect subtracts the cumulative ancestor scroll offsets.
    rect: BoundaryValues<f64>,
    scroll_size: AxisValues<f64>,
    client_size: AxisValues<f64>,
    scroll_position: AxisValues<f64>,
    attached: bool,
    visible: bool,
}

/// One dispatched interaction, by target node id.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub element: usize,
    pub interaction: Interaction,
}

#[derive(Debug, Default)]
struct PageState {
    nodes: Vec<NodeData>,
    dispatched: Vec<DispatchRecord>,
    render_waits: usize,
    pending_detach: Vec<usize>,
    never_settles: bool,
}

/// An in-memory document tree implementing [`PlatformAdapter`].
#[derive(Clone)]
pub struct MockPage {
    state: Arc<Mutex<PageState>>,
    flags: BrowserFlags,
}

const VIEWPORT_WIDTH: f64 = 1024.0;
const VIEWPORT_HEIGHT: f64 = 768.0;

impl MockPage {
    /// A fresh page with an `html` root and a `body` filling a
    /// 1024x768 viewport, under the given engine identity.
    pub fn new(flags: BrowserFlags) -> Self {
        let page = Self {
            state: Arc::new(Mutex::new(PageState::default())),
            flags,
        };
        {
            let mut state = page.lock();
            state.nodes.push(NodeData {
                tag: "html".to_string(),
                parent: None,
                document: 0,
                iframe_host: None,
                attributes: HashMap::new(),
                styles: HashMap::new(),
                rect: BoundaryValues::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                scroll_size: AxisValues::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                client_size: AxisValues::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                scroll_position: AxisValues::default(),
                attached: true,
                visible: true,
            });
            state.nodes.push(NodeData {
                tag: "body".to_string(),
                parent: Some(0),
                document: 0,
                iframe_host: None,
                attributes: HashMap::new(),
                styles: HashMap::new(),
                rect: BoundaryValues::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                scroll_size: AxisValues::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                client_size: AxisValues::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                scroll_position: AxisValues::default(),
                attached: true,
                visible: true,
            });
        }
        page
    }

    pub fn document_root(&self) -> DomElement {
        self.handle(0)
    }

    pub fn body(&self) -> DomElement {
        self.handle(1)
    }

    /// Starts a new element under the top document's body.
    pub fn element(&self, tag: &str) -> NodeBuilder {
        NodeBuilder {
            page: self.clone(),
            tag: tag.to_string(),
            parent: Some(1),
            iframe_host: None,
            attributes: Vec::new(),
            styles: Vec::new(),
            rect: None,
            scroll_size: None,
            client_size: None,
            visible: true,
        }
    }

    /// Creates the root (`html`) element of a document embedded in the
    /// given host `<iframe>`. Add a `body` (or not, for a srcless frame
    /// mid-load) with `element("body").child_of(&root)`.
    pub fn embed_document(&self, host_iframe: &DomElement) -> DomElement {
        let host_id = host_iframe.object_id();
        let host_rect = {
            let state = self.lock();
            state.nodes[host_id].rect
        };
        let builder = NodeBuilder {
            page: self.clone(),
            tag: "html".to_string(),
            parent: None,
            iframe_host: Some(host_id),
            attributes: Vec::new(),
            styles: Vec::new(),
            rect: Some(host_rect),
            scroll_size: Some(AxisValues::new(host_rect.width(), host_rect.height())),
            client_size: Some(AxisValues::new(host_rect.width(), host_rect.height())),
            visible: true,
        };
        builder.insert()
    }

    pub fn set_style(&self, element: &DomElement, property: &str, value: &str) {
        let mut state = self.lock();
        let node = &mut state.nodes[element.object_id()];
        node.styles.insert(property.to_string(), value.to_string());
    }

    pub fn set_rect(&self, element: &DomElement, left: f64, top: f64, right: f64, bottom: f64) {
        let mut state = self.lock();
        state.nodes[element.object_id()].rect = BoundaryValues::new(left, top, right, bottom);
    }

    pub fn set_scroll_size(&self, element: &DomElement, width: f64, height: f64) {
        let mut state = self.lock();
        state.nodes[element.object_id()].scroll_size = AxisValues::new(width, height);
    }

    pub fn set_client_size(&self, element: &DomElement, width: f64, height: f64) {
        let mut state = self.lock();
        state.nodes[element.object_id()].client_size = AxisValues::new(width, height);
    }

    pub fn set_visible(&self, element: &DomElement, visible: bool) {
        let mut state = self.lock();
        state.nodes[element.object_id()].visible = visible;
    }

    /// Removes the element (and everything under it) from its document.
    pub fn detach(&self, element: &DomElement) {
        let mut state = self.lock();
        detach_subtree(&mut state, element.object_id());
    }

    /// Schedules a detach that takes effect on the next render settle,
    /// i.e. while an automation is mid-run.
    pub fn detach_on_next_render(&self, element: &DomElement) {
        let mut state = self.lock();
        let id = element.object_id();
        state.pending_detach.push(id);
    }

    /// When set, render settling and dispatch suspend forever; used to
    /// exercise orchestrator-level timeouts.
    pub fn set_never_settles(&self, never_settles: bool) {
        self.lock().never_settles = never_settles;
    }

    pub fn dispatched(&self) -> Vec<DispatchRecord> {
        self.lock().dispatched.clone()
    }

    pub fn render_waits(&self) -> usize {
        self.lock().render_waits
    }

    fn handle(&self, id: usize) -> DomElement {
        DomElement::new(Box::new(MockElement {
            state: Arc::clone(&self.state),
            id,
        }))
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().expect("mock page state poisoned")
    }
}

fn detach_subtree(state: &mut PageState, root: usize) {
    let ids: Vec<usize> = (0..state.nodes.len())
        .filter(|&id| id == root || has_ancestor(state, id, root))
        .collect();
    for id in ids {
        state.nodes[id].attached = false;
    }
}

fn has_ancestor(state: &PageState, id: usize, ancestor: usize) -> bool {
    let mut current = id;
    while let Some(parent) = state.nodes[current].parent {
        if parent == ancestor {
            return true;
        }
        current = parent;
    }
    false
}

/// Cumulative scroll offset applied to a node by every ancestor, crossing
/// from an embedded document into its host frame's chain.
fn ancestor_scroll_offset(state: &PageState, id: usize) -> AxisValues<f64> {
    let mut total = AxisValues::default();
    let mut current = id;
    loop {
        let node = &state.nodes[current];
        let next = match node.parent {
            Some(parent) => parent,
            None => match node.iframe_host {
                Some(host) => host,
                None => break,
            },
        };
        total = total.add(state.nodes[next].scroll_position);
        current = next;
    }
    total
}

/// Incrementally builds one node of a [`MockPage`].
pub struct NodeBuilder {
    page: MockPage,
    tag: String,
    parent: Option<usize>,
    iframe_host: Option<usize>,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    rect: Option<BoundaryValues<f64>>,
    scroll_size: Option<AxisValues<f64>>,
    client_size: Option<AxisValues<f64>>,
    visible: bool,
}

impl NodeBuilder {
    pub fn child_of(mut self, parent: &DomElement) -> Self {
        self.parent = Some(parent.object_id());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.push((property.to_string(), value.to_string()));
        self
    }

    /// Border-box edges with all ancestor scrolls at zero. Client size
    /// defaults to the rect's dimensions and scroll size to the client
    /// size, so a plain element does not overflow.
    pub fn rect(mut self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        self.rect = Some(BoundaryValues::new(left, top, right, bottom));
        self
    }

    pub fn scroll_size(mut self, width: f64, height: f64) -> Self {
        self.scroll_size = Some(AxisValues::new(width, height));
        self
    }

    pub fn client_size(mut self, width: f64, height: f64) -> Self {
        self.client_size = Some(AxisValues::new(width, height));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn insert(self) -> DomElement {
        let page = self.page.clone();
        let mut state = page.lock();
        let id = state.nodes.len();
        let document = match self.parent {
            Some(parent) => state.nodes[parent].document,
            None => id,
        };
        let rect = self.rect.unwrap_or_default();
        let client_size = self
            .client_size
            .unwrap_or_else(|| AxisValues::new(rect.width(), rect.height()));
        let scroll_size = self.scroll_size.unwrap_or(client_size);
        state.nodes.push(NodeData {
            tag: self.tag,
            parent: self.parent,
            document,
            iframe_host: self.iframe_host,
            attributes: self.attributes.into_iter().collect(),
            styles: self.styles.into_iter().collect(),
            rect,
            scroll_size,
            client_size,
            scroll_position: AxisValues::default(),
            attached: true,
            visible: self.visible,
        });
        drop(state);
        page.handle(id)
    }
}

struct MockElement {
    state: Arc<Mutex<PageState>>,
    id: usize,
}

impl MockElement {
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().expect("mock page state poisoned")
    }
}

impl fmt::Debug for MockElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        write!(f, "MockElement(#{} <{}>)", self.id, state.nodes[self.id].tag)
    }
}

impl DomElementImpl for MockElement {
    fn object_id(&self) -> usize {
        self.id
    }

    fn tag_name(&self) -> String {
        self.lock().nodes[self.id].tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.lock().nodes[self.id].attributes.get(name).cloned()
    }

    fn is_attached(&self) -> Result<bool, AutomationError> {
        Ok(self.lock().nodes[self.id].attached)
    }

    fn is_visible(&self) -> Result<bool, AutomationError> {
        let state = self.lock();
        let node = &state.nodes[self.id];
        Ok(node.attached && node.visible)
    }

    fn bounding_rect(&self) -> Result<BoundaryValues<f64>, AutomationError> {
        let state = self.lock();
        let node = &state.nodes[self.id];
        if !node.attached {
            return Err(AutomationError::TargetDetached(format!(
                "cannot measure detached <{}>",
                node.tag
            )));
        }
        let offset = ancestor_scroll_offset(&state, self.id);
        Ok(BoundaryValues::new(
            node.rect.left - offset.x,
            node.rect.top - offset.y,
            node.rect.right - offset.x,
            node.rect.bottom - offset.y,
        ))
    }

    fn scroll_size(&self) -> Result<AxisValues<f64>, AutomationError> {
        Ok(self.lock().nodes[self.id].scroll_size)
    }

    fn client_size(&self) -> Result<AxisValues<f64>, AutomationError> {
        Ok(self.lock().nodes[self.id].client_size)
    }

    fn scroll_position(&self) -> Result<AxisValues<f64>, AutomationError> {
        Ok(self.lock().nodes[self.id].scroll_position)
    }

    fn set_scroll_position(&self, position: AxisValues<f64>) -> Result<(), AutomationError> {
        self.lock().nodes[self.id].scroll_position = position;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn DomElementImpl> {
        Box::new(Self {
            state: Arc::clone(&self.state),
            id: self.id,
        })
    }
}

fn default_style(property: &str) -> String {
    if property.starts_with("overflow") {
        "visible".to_string()
    } else {
        String::new()
    }
}

#[async_trait::async_trait]
impl PlatformAdapter for MockPage {
    fn browser_flags(&self) -> BrowserFlags {
        self.flags
    }

    fn computed_style(
        &self,
        element: &DomElement,
        property: &str,
    ) -> Result<String, AutomationError> {
        let state = self.lock();
        let node = &state.nodes[element.object_id()];
        Ok(node
            .styles
            .get(property)
            .cloned()
            .unwrap_or_else(|| default_style(property)))
    }

    fn find_document(&self, element: &DomElement) -> Result<DomElement, AutomationError> {
        let document = self.lock().nodes[element.object_id()].document;
        Ok(self.handle(document))
    }

    fn body_of(&self, document_root: &DomElement) -> Result<Option<DomElement>, AutomationError> {
        let root = document_root.object_id();
        let body = {
            let state = self.lock();
            state
                .nodes
                .iter()
                .position(|node| node.tag == "body" && node.parent == Some(root) && node.attached)
        };
        Ok(body.map(|id| self.handle(id)))
    }

    fn is_body_element(&self, element: &DomElement) -> bool {
        self.lock().nodes[element.object_id()].tag == "body"
    }

    fn is_html_element(&self, element: &DomElement) -> bool {
        self.lock().nodes[element.object_id()].tag == "html"
    }

    fn parents(&self, element: &DomElement) -> Result<Vec<DomElement>, AutomationError> {
        let ids = {
            let state = self.lock();
            let mut ids = Vec::new();
            let mut current = element.object_id();
            while let Some(parent) = state.nodes[current].parent {
                ids.push(parent);
                current = parent;
            }
            ids
        };
        Ok(ids.into_iter().map(|id| self.handle(id)).collect())
    }

    fn is_element_in_iframe(&self, element: &DomElement) -> bool {
        let state = self.lock();
        let document = state.nodes[element.object_id()].document;
        state.nodes[document].iframe_host.is_some()
    }

    fn iframe_by_element(
        &self,
        element: &DomElement,
    ) -> Result<Option<DomElement>, AutomationError> {
        let host = {
            let state = self.lock();
            let document = state.nodes[element.object_id()].document;
            state.nodes[document].iframe_host
        };
        Ok(host.map(|id| self.handle(id)))
    }

    async fn wait_for_render(&self) -> Result<(), AutomationError> {
        let never_settles = {
            let mut state = self.lock();
            state.render_waits += 1;
            let pending = std::mem::take(&mut state.pending_detach);
            for id in pending {
                detach_subtree(&mut state, id);
            }
            state.never_settles
        };
        if never_settles {
            futures::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn dispatch(
        &self,
        element: &DomElement,
        interaction: &Interaction,
    ) -> Result<(), AutomationError> {
        if self.lock().never_settles {
            futures::future::pending::<()>().await;
        }
        self.lock().dispatched.push(DispatchRecord {
            element: element.object_id(),
            interaction: interaction.clone(),
        });
        tokio::task::yield_now().await;
        Ok(())
    }
}
