use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::layout::PointerGeometry;
use crate::page::{NodeId, Page, Tag};

/// Delay between scheduling a hover and dispatching it, so a scroll issued
/// alongside the request has been drawn by the time geometry is read.
const HOVER_DELAY: Duration = Duration::from_millis(100);
/// Delay between the hover burst and the follow-up press.
const CLICK_DELAY: Duration = Duration::from_millis(100);
/// Delay before the off-content dismiss fires after a step.
const DISMISS_DELAY: Duration = Duration::from_millis(100);
/// How long the transient marker stays up after a click-through.
const SETTLE_DELAY: Duration = Duration::from_millis(2000);
/// Cells kept clear of the viewport edge for the dismiss point.
const CORNER_MARGIN: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Enter,
    Over,
    Move,
    Leave,
    Out,
    Down,
    Up,
    Click,
}

/// One synthetic pointer event, addressed to the element that was under
/// the position when the dispatch fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Position,
    pub target: NodeId,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    /// Hover dispatch is scheduled; the target was captured at request
    /// time and is revalidated when the deadline passes.
    Hovering { due: Instant, target: NodeId },
    /// Hover burst went out, press at the same point is pending.
    Clicking { due: Instant, target: NodeId, position: Position },
    /// Interaction done, the marker lingers until the deadline.
    Settling { due: Instant },
}

/// Drives simulated pointer interactions from explicit deadlines.
///
/// Nothing here dispatches on its own; [`PointerSequencer::on_tick`]
/// advances whatever is due at the given instant and returns the events
/// to deliver, in dispatch order. Targets captured when an interaction
/// was requested are re-resolved at fire time, so a rewrite of the page
/// in between turns the rest of the sequence into a no-op.
pub struct PointerSequencer {
    phase: Phase,
    press_due: Option<Instant>,
    dismiss_due: Option<Instant>,
    marker: Option<NodeId>,
    marker_at: Option<Position>,
}

impl PointerSequencer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            press_due: None,
            dismiss_due: None,
            marker: None,
            marker_at: None,
        }
    }

    /// Schedules the interaction burst that follows a completed step: an
    /// immediate press at the viewport center, and a dismiss at the empty
    /// bottom-right corner shortly after. Rapid steps coalesce onto the
    /// latest deadlines.
    pub fn schedule_step_interaction(&mut self, now: Instant) {
        self.press_due = Some(now);
        self.dismiss_due = Some(now + DISMISS_DELAY);
    }

    /// Begins a click-through on `target`. Any interaction already in
    /// flight is abandoned and cleaned up first.
    pub fn begin_click_through(&mut self, page: &mut Page, target: NodeId, now: Instant) {
        self.remove_marker(page);
        self.phase = Phase::Hovering {
            due: now + HOVER_DELAY,
            target,
        };
    }

    /// The transient marker's node and screen position while one is up.
    /// The marker never claims hit-test cells.
    pub fn marker(&self) -> Option<(NodeId, Position)> {
        Some((self.marker?, self.marker_at?))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.press_due.is_none() && self.dismiss_due.is_none()
    }

    /// Drops all pending work and removes any on-page residue.
    pub fn reset(&mut self, page: &mut Page) {
        self.phase = Phase::Idle;
        self.press_due = None;
        self.dismiss_due = None;
        self.remove_marker(page);
    }

    /// Fires every deadline that has passed, in chronological order, and
    /// returns the pointer events to deliver.
    pub fn on_tick(
        &mut self,
        page: &mut Page,
        geometry: &dyn PointerGeometry,
        now: Instant,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        if self.press_due.is_some_and(|due| now >= due) {
            self.press_due = None;
            let center = center_of(geometry.viewport());
            push_press(&mut events, geometry, center);
        }

        if self.dismiss_due.is_some_and(|due| now >= due) {
            self.dismiss_due = None;
            let corner = corner_of(geometry.viewport());
            if let Some(target) = geometry.element_at(corner) {
                events.push(PointerEvent {
                    kind: PointerEventKind::Move,
                    position: corner,
                    target,
                });
                events.push(PointerEvent {
                    kind: PointerEventKind::Leave,
                    position: corner,
                    target,
                });
                events.push(PointerEvent {
                    kind: PointerEventKind::Out,
                    position: corner,
                    target,
                });
            }
            push_press(&mut events, geometry, corner);
        }

        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Hovering { due, target } if now >= due => {
                if !page.is_attached(target) || !page.is_unit(target) {
                    debug!("hover target gone, dropping click-through");
                    Phase::Idle
                } else if let Some(rect) = geometry.first_line_rect(target) {
                    let position = on_sentence_point(rect);
                    self.place_marker(page, position);
                    page.set_cursor_hidden(true);
                    if let Some(under) = geometry.element_at(position) {
                        events.push(PointerEvent {
                            kind: PointerEventKind::Enter,
                            position,
                            target: under,
                        });
                        events.push(PointerEvent {
                            kind: PointerEventKind::Move,
                            position,
                            target: under,
                        });
                        events.push(PointerEvent {
                            kind: PointerEventKind::Over,
                            position,
                            target: under,
                        });
                    }
                    Phase::Clicking {
                        due: now + CLICK_DELAY,
                        target,
                        position,
                    }
                } else {
                    debug!("hover target has no on-screen box, dropping click-through");
                    Phase::Idle
                }
            }
            Phase::Clicking { due, target, position } if now >= due => {
                if page.is_attached(target) && page.is_unit(target) {
                    push_press(&mut events, geometry, position);
                }
                Phase::Settling {
                    due: now + SETTLE_DELAY,
                }
            }
            Phase::Settling { due } if now >= due => {
                self.remove_marker(page);
                Phase::Idle
            }
            waiting => waiting,
        };

        events
    }

    fn place_marker(&mut self, page: &mut Page, position: Position) {
        let marker = match self.marker {
            Some(existing) => existing,
            None => {
                let created = page.create_element(Tag::PointerMarker);
                self.marker = Some(created);
                created
            }
        };
        let root = page.root();
        page.append_child(root, marker);
        self.marker_at = Some(position);
    }

    fn remove_marker(&mut self, page: &mut Page) {
        if let Some(marker) = self.marker {
            page.detach(marker);
        }
        self.marker_at = None;
        page.set_cursor_hidden(false);
    }
}

impl Default for PointerSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Press, release, click at one point, addressed to whatever is under it.
/// Nothing under the point means nothing is dispatched.
fn push_press(events: &mut Vec<PointerEvent>, geometry: &dyn PointerGeometry, position: Position) {
    let Some(target) = geometry.element_at(position) else {
        return;
    };
    events.push(PointerEvent {
        kind: PointerEventKind::Down,
        position,
        target,
    });
    events.push(PointerEvent {
        kind: PointerEventKind::Up,
        position,
        target,
    });
    events.push(PointerEvent {
        kind: PointerEventKind::Click,
        position,
        target,
    });
}

fn center_of(viewport: Rect) -> Position {
    Position::new(viewport.x + viewport.width / 2, viewport.y + viewport.height / 2)
}

fn corner_of(viewport: Rect) -> Position {
    Position::new(
        viewport.right().saturating_sub(CORNER_MARGIN),
        viewport.bottom().saturating_sub(CORNER_MARGIN),
    )
}

/// The dispatch point for a sentence: just inside the top-left of its
/// first line box.
fn on_sentence_point(rect: Rect) -> Position {
    let offset = 1.min(rect.width.saturating_sub(1));
    Position::new(rect.x + offset, rect.y)
}

#[cfg(test)]
#[path = "pointer_tests.rs"]
mod pointer_tests;
