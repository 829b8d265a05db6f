use tracing::debug;

use crate::page::{NodeId, Page, Tag};
use crate::pointer::{PointerEvent, PointerEventKind};

/// Shows link titles as popups anchored to the hovered link.
///
/// The host only reacts to delivered pointer events, so synthetic bursts
/// from the sequencer and translated terminal mouse events go through the
/// same path. An `Enter` or `Over` whose target sits inside a titled link
/// opens the popup; hover leaving the link or any click outside the popup
/// closes it. At most one popup is open at a time, and one whose anchor
/// was detached by a page rewrite is swept on the next delivery or tick.
pub struct TooltipHost {
    open: Option<OpenPopup>,
}

#[derive(Clone, Copy)]
struct OpenPopup {
    node: NodeId,
    link: NodeId,
}

impl TooltipHost {
    pub fn new() -> Self {
        Self { open: None }
    }

    /// The popup element currently on the page, if any.
    pub fn popup(&self) -> Option<NodeId> {
        self.open.map(|open| open.node)
    }

    /// Routes one pointer event. Mutates the page when a popup opens or
    /// closes and is a no-op otherwise.
    pub fn deliver(&mut self, page: &mut Page, event: &PointerEvent) {
        self.sweep_stale(page);

        match event.kind {
            PointerEventKind::Enter | PointerEventKind::Over => {
                if let Some(link) = titled_link_above(page, event.target) {
                    self.show(page, link);
                }
            }
            PointerEventKind::Leave | PointerEventKind::Out => {
                let Some(open) = self.open else {
                    return;
                };
                if !is_within(page, event.target, open.link)
                    && !is_within(page, event.target, open.node)
                {
                    self.close(page);
                }
            }
            PointerEventKind::Click => {
                let Some(open) = self.open else {
                    return;
                };
                if !is_within(page, event.target, open.node) {
                    self.close(page);
                }
            }
            PointerEventKind::Move | PointerEventKind::Down | PointerEventKind::Up => {}
        }
    }

    /// Removes a popup whose anchor no longer hangs off the page.
    pub fn on_tick(&mut self, page: &mut Page) {
        self.sweep_stale(page);
    }

    fn show(&mut self, page: &mut Page, link: NodeId) {
        if let Some(open) = self.open
            && open.link == link
        {
            return;
        }
        self.close(page);

        let Some(title) = page.title_of(link).map(str::to_owned) else {
            return;
        };
        let popup = page.create_element(Tag::Popup);
        let text = page.create_text(&title);
        page.append_child(popup, text);
        page.set_anchor(popup, link);
        let root = page.root();
        page.append_child(root, popup);
        debug!(?link, "tooltip popup opened");
        self.open = Some(OpenPopup { node: popup, link });
    }

    fn close(&mut self, page: &mut Page) {
        if let Some(open) = self.open.take() {
            page.detach(open.node);
        }
    }

    fn sweep_stale(&mut self, page: &mut Page) {
        let Some(open) = self.open else {
            return;
        };
        if !page.is_attached(open.link) || !page.is_attached(open.node) {
            self.close(page);
        }
    }
}

impl Default for TooltipHost {
    fn default() -> Self {
        Self::new()
    }
}

/// The nearest enclosing link that carries a title, starting at `node`
/// itself. Detached nodes have no ancestors and resolve to nothing.
fn titled_link_above(page: &Page, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if page.tag_of(id) == Some(Tag::Link) && page.title_of(id).is_some() {
            return Some(id);
        }
        current = page.parent_of(id);
    }
    None
}

fn is_within(page: &Page, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = page.parent_of(id);
    }
    false
}
