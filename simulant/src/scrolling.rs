//! Scrollability detection and the scrollable-ancestor chain.
//!
//! Deciding whether an element can actually scroll is the most
//! engine-sensitive computation in the crate: overflow handling differs
//! between engine families, the root and the body report scroll extents
//! against each other, and borderless iframe documents mis-report root
//! scroll. Every rule here is a measurement, never a mutation, and every
//! operation degrades to a best-effort answer instead of failing.

use crate::element::DomElement;
use crate::geometry::AxisValues;
use crate::platforms::PlatformAdapter;
use tracing::debug;

/// Matches the computed overflow keywords that permit scrolling,
/// case-insensitively (engines disagree on keyword casing in quirks
/// documents).
fn overflow_permits_scroll(keyword: &str) -> bool {
    let keyword = keyword.trim();
    keyword.eq_ignore_ascii_case("auto") || keyword.eq_ignore_ascii_case("scroll")
}

fn overflow_is_hidden(keyword: &str) -> bool {
    keyword.trim().eq_ignore_ascii_case("hidden")
}

fn overflow_is_visible(keyword: &str) -> bool {
    keyword.trim().eq_ignore_ascii_case("visible")
}

/// Per-element scrollability analysis over an injected platform adapter.
pub struct ScrollabilityAnalyzer<'a> {
    adapter: &'a dyn PlatformAdapter,
}

impl<'a> ScrollabilityAnalyzer<'a> {
    pub fn new(adapter: &'a dyn PlatformAdapter) -> Self {
        Self { adapter }
    }

    /// Per-axis scrollability: overflowing content on that axis *and*
    /// computed style permitting scroll, with the engine corrections
    /// applied. Recomputed on every call; layout is mutable between calls.
    pub fn scrollability(&self, element: &DomElement) -> AxisValues<bool> {
        if self.adapter.is_body_element(element) {
            self.body_scrollability(element)
        } else if self.adapter.is_html_element(element) {
            self.root_scrollability(element)
        } else {
            self.element_scrollability(element)
        }
    }

    /// Whether the element is scrollable on either axis.
    pub fn has_scroll(&self, element: &DomElement) -> bool {
        let result = self.scrollability(element);
        result.x || result.y
    }

    /// The ordered scrollable-ancestor chain, nearest ancestor first.
    ///
    /// When the element lives inside an embedded frame the chain continues
    /// with the host frame element's ancestors after exhausting the inner
    /// document's chain, preserving inside-out order across the boundary.
    /// The filter is stable and order-preserving, and an element that
    /// legitimately appears in both traversals is kept twice; downstream
    /// adjustment logic relies on the exact ordering.
    pub fn scrollable_parents(&self, element: &DomElement) -> Vec<DomElement> {
        let mut chain = self.adapter.parents(element).unwrap_or_default();

        if self.adapter.is_element_in_iframe(element) {
            if let Ok(Some(frame)) = self.adapter.iframe_by_element(element) {
                chain.extend(self.adapter.parents(&frame).unwrap_or_default());
            }
        }

        chain.into_iter().filter(|parent| self.has_scroll(parent)).collect()
    }

    fn style(&self, element: &DomElement, property: &str) -> String {
        self.adapter
            .computed_style(element, property)
            .unwrap_or_default()
    }

    /// Body elements scroll on behalf of the document: compare the body's
    /// scroll extent against the document root's. Chrome- and
    /// Firefox-family engines fold the root's top offset into the body's
    /// measured scroll height, so it is subtracted back out before the
    /// comparison to avoid double-counting border/margin offsets.
    fn body_scrollability(&self, body: &DomElement) -> AxisValues<bool> {
        let Ok(root) = self.adapter.find_document(body) else {
            return AxisValues::default();
        };
        let (Ok(body_scroll), Ok(root_scroll)) = (body.scroll_size(), root.scroll_size()) else {
            return AxisValues::default();
        };

        let mut body_scroll_height = body_scroll.y;
        let flags = self.adapter.browser_flags();
        if flags.is_chrome || flags.is_firefox {
            let root_top = root.bounding_rect().map(|rect| rect.top).unwrap_or(0.0);
            body_scroll_height -= root_top;
        }

        AxisValues::new(
            body_scroll.x > root_scroll.x,
            body_scroll_height > root_scroll.y,
        )
    }

    /// The root (`html`) element. An element can report a nonzero scroll
    /// extent even though overflow is disabled on both axes, so that case
    /// short-circuits to non-scrollable before any measurement.
    fn root_scrollability(&self, root: &DomElement) -> AxisValues<bool> {
        let overflow_x = self.style(root, "overflow-x");
        let overflow_y = self.style(root, "overflow-y");
        if overflow_is_hidden(&overflow_x) && overflow_is_hidden(&overflow_y) {
            return AxisValues::default();
        }

        let (Ok(scroll), Ok(client)) = (root.scroll_size(), root.client_size()) else {
            return AxisValues::default();
        };
        let direct = AxisValues::new(scroll.x > client.x, scroll.y > client.y);
        if direct.x || direct.y {
            return direct;
        }

        // Borderless iframe documents report no root scroll even when the
        // body overflows; fall back to inspecting the body.
        let Ok(Some(body)) = self.adapter.body_of(root) else {
            return AxisValues::default();
        };
        let body_result = self.body_scrollability(&body);
        if body_result.x || body_result.y {
            // The body is scrolling instead of the root; reporting both
            // would double-count the same overflow.
            return AxisValues::default();
        }

        let (Ok(body_scroll), Ok(body_client)) = (body.scroll_size(), body.client_size()) else {
            return AxisValues::default();
        };
        let client_width = client.x.min(body_client.x);
        let client_height = client.y.min(body_client.y);
        AxisValues::new(body_scroll.x > client_width, body_scroll.y > client_height)
    }

    /// Any other element: per-axis permission from computed overflow,
    /// then extent-vs-client comparison on the permitted axes.
    fn element_scrollability(&self, element: &DomElement) -> AxisValues<bool> {
        let overflow_x = self.style(element, "overflow-x");
        let overflow_y = self.style(element, "overflow-y");

        let mut permits_x = overflow_permits_scroll(&overflow_x);
        let mut permits_y = overflow_permits_scroll(&overflow_y);

        // IE-family engines silently treat an explicit `visible` axis as
        // `auto` when the opposite axis permits scroll.
        if self.adapter.browser_flags().is_ie {
            if permits_x && !permits_y && overflow_is_visible(&overflow_y) {
                permits_y = true;
            }
            if permits_y && !permits_x && overflow_is_visible(&overflow_x) {
                permits_x = true;
            }
        }

        if !permits_x && !permits_y {
            return AxisValues::default();
        }

        let (Ok(scroll), Ok(client)) = (element.scroll_size(), element.client_size()) else {
            debug!(
                element = element.object_id(),
                "scrollability: measurement unavailable, treating as non-scrollable"
            );
            return AxisValues::default();
        };

        AxisValues::new(
            permits_x && scroll.x > client.x,
            permits_y && scroll.y > client.y,
        )
    }
}
