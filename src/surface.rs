use std::future::Future;
use std::time::Duration;

use fintable_core::{Grid, TableElement, extract_grid};

use crate::error::HostError;

/// Opaque handle to an ancestor element of the table on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    pub const fn allows_scrolling(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll)
    }
}

/// What gets scrolled: an ancestor element, or the page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Element(NodeId),
    Viewport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn overflows(&self) -> bool {
        self.scroll_height > self.client_height
    }

    pub fn at_bottom(&self, tolerance_px: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - tolerance_px
    }

    /// Scroll position as a share of the content height, capped at 99 so
    /// 100 only ever means a finished collection.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress_percent(&self) -> u8 {
        if self.scroll_height <= 0.0 {
            return 0;
        }
        (self.scroll_top / self.scroll_height * 100.0)
            .round()
            .clamp(0.0, 99.0) as u8
    }
}

/// The live table as the collector sees it: its current rendering and the
/// scroll state around it.
pub trait ScrollSurface: TableElement {
    /// Normalized grid of whatever rows are rendered right now.
    fn read_grid(&self) -> Result<Grid, HostError> {
        Ok(extract_grid(self))
    }

    /// Ancestors of the table, nearest first.
    fn ancestors(&self) -> Vec<NodeId>;

    /// Computed vertical overflow of an ancestor.
    fn overflow(&self, node: NodeId) -> Overflow;

    fn metrics(&self, target: ScrollTarget) -> Result<ScrollMetrics, HostError>;

    fn scroll_to(&mut self, target: ScrollTarget, top: f64) -> Result<(), HostError>;

    /// Host timer. The collector never polls; it only waits.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Nearest ancestor that both allows scrolling and has content taller than
/// its box, else the viewport.
pub fn find_scroll_target<S>(surface: &S) -> ScrollTarget
where
    S: ScrollSurface,
{
    surface
        .ancestors()
        .into_iter()
        .find(|&node| {
            surface.overflow(node).allows_scrolling()
                && surface
                    .metrics(ScrollTarget::Element(node))
                    .is_ok_and(|metrics| metrics.overflows())
        })
        .map_or(ScrollTarget::Viewport, ScrollTarget::Element)
}
