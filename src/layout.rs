use std::collections::HashMap;

use ratatui::layout::{Position, Rect};

use crate::page::NodeId;

/// Where pointer coordinates meet the page: resolves screen positions to
/// elements, and elements back to the line boxes they were drawn in.
pub trait PointerGeometry {
    /// Screen rectangle of the page's content area, in cells.
    fn viewport(&self) -> Rect;

    /// Topmost element at a screen position, overlays included.
    fn element_at(&self, position: Position) -> Option<NodeId>;

    /// The first on-screen line box of `node`, in screen cells.
    fn first_line_rect(&self, node: NodeId) -> Option<Rect>;
}

/// Geometry recorded while drawing one frame.
///
/// The renderer claims a cell range for every inline fragment it places;
/// overlays claim theirs afterwards, so the last writer is on top. All
/// coordinates are absolute screen cells, the same space pointer events
/// arrive in.
pub struct LayoutMap {
    area: Rect,
    grid: HitGrid,
    boxes: HashMap<NodeId, Vec<Rect>>,
}

impl LayoutMap {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            grid: HitGrid::new(area.width, area.height),
            boxes: HashMap::new(),
        }
    }

    /// Claims `rect` for `node`. A box continuing the node's previous box
    /// on the same line extends it instead of starting a new one.
    pub fn record(&mut self, node: NodeId, rect: Rect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.grid.fill(
            rect.x.saturating_sub(self.area.x),
            rect.y.saturating_sub(self.area.y),
            rect.width,
            rect.height,
            node,
        );
        let boxes = self.boxes.entry(node).or_default();
        if let Some(last) = boxes.last_mut() {
            if last.y == rect.y && last.x + last.width == rect.x {
                last.width += rect.width;
                return;
            }
        }
        boxes.push(rect);
    }
}

impl PointerGeometry for LayoutMap {
    fn viewport(&self) -> Rect {
        self.area
    }

    fn element_at(&self, position: Position) -> Option<NodeId> {
        if !self.area.contains(position) {
            return None;
        }
        self.grid.get(position.x - self.area.x, position.y - self.area.y)
    }

    fn first_line_rect(&self, node: NodeId) -> Option<Rect> {
        self.boxes.get(&node)?.first().copied()
    }
}

/// Cell-to-node lookup for one frame, flat row-major storage.
struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<NodeId>>,
}

impl HitGrid {
    fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![None; size],
        }
    }

    fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, node: NodeId) {
        for dy in 0..height {
            let cy = y + dy;
            if cy >= self.height {
                break;
            }
            for dx in 0..width {
                let cx = x + dx;
                if cx >= self.width {
                    break;
                }
                self.cells[cy as usize * self.width as usize + cx as usize] = Some(node);
            }
        }
    }

    fn get(&self, x: u16, y: u16) -> Option<NodeId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }
}
