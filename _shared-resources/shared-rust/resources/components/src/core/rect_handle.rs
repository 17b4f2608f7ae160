// Rectangle Registry
// Tracks where each menu element was drawn so pointer events can be hit-tested
//
// Usage:
//   let mut registry = RectRegistry::new();
//   registry.register(&tab_id, rect);
//   // Later...
//   if let Some(id) = registry.hit_test(column, row) {
//       println!("pointer is over {}", id);
//   }

use ratatui::layout::Rect;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::ids::ElementId;

/// Registry shared between a menu root and the outside-click watchers of its tabs
pub type SharedRegistry = Rc<RefCell<RectRegistry>>;

/// Metrics for a registered rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectMetrics {
    /// Top-left X coordinate
    pub x: u16,
    /// Top-left Y coordinate
    pub y: u16,
    /// Width of the rectangle
    pub width: u16,
    /// Height of the rectangle
    pub height: u16,
}

impl RectMetrics {
    /// Check if a cell (x, y) is within these bounds
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.width as u32
            && (y as u32) < self.y as u32 + self.height as u32
    }
}

impl From<Rect> for RectMetrics {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<RectMetrics> for Rect {
    fn from(metrics: RectMetrics) -> Self {
        Self {
            x: metrics.x,
            y: metrics.y,
            width: metrics.width,
            height: metrics.height,
        }
    }
}

/// Registry of drawn element rectangles, in draw order
#[derive(Debug, Clone, Default)]
pub struct RectRegistry {
    /// Map of element id to its last drawn bounds
    regions: HashMap<ElementId, RectMetrics>,
    /// Draw order, topmost last
    order: Vec<ElementId>,
}

impl RectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that can be shared with pointer listeners
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register (or move to the top and update) an element's bounds
    pub fn register(&mut self, id: &ElementId, rect: Rect) {
        self.order.retain(|existing| existing != id);
        self.order.push(id.clone());
        self.regions.insert(id.clone(), RectMetrics::from(rect));
    }

    /// Update bounds of an already registered element without changing its stacking
    pub fn update(&mut self, id: &ElementId, rect: Rect) -> bool {
        if let Some(metrics) = self.regions.get_mut(id) {
            *metrics = RectMetrics::from(rect);
            true
        } else {
            false
        }
    }

    /// Remove an element from the registry
    pub fn unregister(&mut self, id: &ElementId) -> bool {
        self.order.retain(|existing| existing != id);
        self.regions.remove(id).is_some()
    }

    /// Get current metrics for an element
    pub fn get_metrics(&self, id: &ElementId) -> Option<RectMetrics> {
        self.regions.get(id).copied()
    }

    /// Check whether the cell lies inside the element's last drawn bounds
    pub fn contains(&self, id: &ElementId, x: u16, y: u16) -> bool {
        self.regions
            .get(id)
            .map(|metrics| metrics.contains(x, y))
            .unwrap_or(false)
    }

    /// Topmost element under the cell
    pub fn hit_test(&self, x: u16, y: u16) -> Option<&ElementId> {
        self.hit_test_where(x, y, |_| true)
    }

    /// Topmost element under the cell among those accepted by `filter`
    pub fn hit_test_where(&self, x: u16, y: u16, filter: impl Fn(&ElementId) -> bool) -> Option<&ElementId> {
        self.order
            .iter()
            .rev()
            .filter(|id| filter(id))
            .find(|id| self.contains(id, x, y))
    }

    /// Check if an element is registered
    pub fn exists(&self, id: &ElementId) -> bool {
        self.regions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every region (called at the start of each frame)
    pub fn clear(&mut self) {
        self.regions.clear();
        self.order.clear();
    }
}
