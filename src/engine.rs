use std::time::{Duration, Instant};

use ratatui::layout::Position;
use tracing::debug;

use crate::layout::PointerGeometry;
use crate::page::{NodeId, Page};
use crate::pointer::{PointerEvent, PointerSequencer};
use crate::segment::{SentenceSegmenter, UnicodeSegmenter};

pub mod monitor;
pub mod runs;
pub mod wrap;

use monitor::DriftMonitor;

/// Sentence-by-sentence navigation over one [`Page`].
///
/// On activation the page's prose is rewritten into addressable sentence
/// units and exactly one of them carries the highlight from then on. The
/// navigator owns the unit list, the current position, the drift monitor
/// and the pointer sequencer; the page stays outside so the host keeps
/// mutating it freely between calls.
///
/// All time-dependent behavior runs through [`SentenceNavigator::on_tick`]
/// with an explicit `now`, never from background threads.
pub struct SentenceNavigator<S = UnicodeSegmenter> {
    segmenter: S,
    units: Vec<NodeId>,
    current: usize,
    active: bool,
    extend_held: bool,
    monitor: DriftMonitor,
    pointer: PointerSequencer,
}

impl SentenceNavigator<UnicodeSegmenter> {
    pub fn new() -> Self {
        Self::with_segmenter(UnicodeSegmenter::default())
    }
}

impl Default for SentenceNavigator<UnicodeSegmenter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SentenceSegmenter> SentenceNavigator<S> {
    pub fn with_segmenter(segmenter: S) -> Self {
        Self {
            segmenter,
            units: Vec::new(),
            current: 0,
            active: false,
            extend_held: false,
            monitor: DriftMonitor::new(),
            pointer: PointerSequencer::new(),
        }
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.monitor.set_poll_interval(interval);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The current unit list, in document order.
    pub fn units(&self) -> &[NodeId] {
        &self.units
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_unit(&self) -> Option<NodeId> {
        self.units.get(self.current).copied()
    }

    pub fn extend_held(&self) -> bool {
        self.extend_held
    }

    /// The transient pointer marker, while a click-through has one up.
    pub fn marker(&self) -> Option<(NodeId, Position)> {
        self.pointer.marker()
    }

    /// Builds the sentence layer and starts watching for outside changes.
    /// Requesting activation while already active rebuilds the layer
    /// instead of stacking a second one.
    pub fn activate(&mut self, page: &mut Page, now: Instant) {
        if self.active {
            debug!("already active, rebuilding");
            self.rebuild(page);
            return;
        }
        self.units = wrap::wrap_page(page, &self.segmenter);
        self.current = 0;
        self.highlight(page);
        self.active = true;
        self.monitor.start(page, now);
        debug!(units = self.units.len(), "sentence navigation active");
    }

    /// Tears the sentence layer down and restores the page's plain text.
    pub fn deactivate(&mut self, page: &mut Page) {
        if !self.active {
            return;
        }
        self.clear_highlight(page);
        page.clear_selection();
        wrap::unwrap_all(page);
        self.units.clear();
        self.current = 0;
        self.active = false;
        self.monitor.stop();
        self.pointer.reset(page);
        debug!("sentence navigation inactive");
    }

    /// Advances the highlight by one sentence. Returns whether the key
    /// was consumed; at the last unit the step is consumed but moves
    /// nothing and schedules no interaction.
    pub fn step_forward(&mut self, page: &mut Page, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        if self.current + 1 < self.units.len() {
            self.current += 1;
            self.highlight(page);
            self.pointer.schedule_step_interaction(now);
        }
        true
    }

    /// Moves the highlight back by one sentence. Boundary behavior matches
    /// [`SentenceNavigator::step_forward`].
    pub fn step_backward(&mut self, page: &mut Page, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        if self.current > 0 {
            self.current -= 1;
            self.highlight(page);
            self.pointer.schedule_step_interaction(now);
        }
        true
    }

    /// Moves the highlight to `unit`, addressed by identity. Returns false
    /// when the node is not in the current unit list.
    pub fn jump_to(&mut self, page: &mut Page, unit: NodeId) -> bool {
        if !self.active {
            return false;
        }
        let Some(position) = self.units.iter().position(|&u| u == unit) else {
            return false;
        };
        self.current = position;
        self.highlight(page);
        true
    }

    /// Applies or clears the held-modifier selection over the current
    /// unit. The current position never changes here.
    pub fn set_extend_held(&mut self, page: &mut Page, held: bool) {
        self.extend_held = held;
        if !self.active {
            return;
        }
        match self.current_unit() {
            Some(unit) if held => page.select_contents(unit),
            _ => page.clear_selection(),
        }
    }

    /// Requests a simulated click-through on the current unit. The target
    /// is captured now and revalidated when each stage of the sequence
    /// fires.
    pub fn request_click_through(&mut self, page: &mut Page, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let Some(unit) = self.current_unit() else {
            return false;
        };
        self.pointer.begin_click_through(page, unit, now);
        true
    }

    /// Tears the sentence layer down and builds it afresh from the page's
    /// present text. The position resets to the first unit; pending
    /// pointer work aimed at the old units dies on revalidation.
    pub fn rebuild(&mut self, page: &mut Page) {
        wrap::unwrap_all(page);
        self.units = wrap::wrap_page(page, &self.segmenter);
        self.current = 0;
        self.highlight(page);
        self.monitor.resync(page);
        debug!(units = self.units.len(), "sentence layer rebuilt");
    }

    /// Advances everything time-driven: runs the drift and structure
    /// checks, rebuilds when they demand it, then fires due pointer
    /// dispatches. Returns the pointer events to deliver, in order.
    pub fn on_tick(
        &mut self,
        page: &mut Page,
        geometry: &dyn PointerGeometry,
        now: Instant,
    ) -> Vec<PointerEvent> {
        if !self.active {
            return Vec::new();
        }
        if self.monitor.check(page, now) {
            self.rebuild(page);
        }
        self.pointer.on_tick(page, geometry, now)
    }

    /// Puts the highlight on the current unit and nowhere else, then
    /// applies the held-modifier selection to it.
    fn highlight(&mut self, page: &mut Page) {
        self.clear_highlight(page);
        if let Some(unit) = self.current_unit() {
            page.set_focused(unit, true);
            if self.extend_held {
                page.select_contents(unit);
            } else {
                page.clear_selection();
            }
        }
    }

    fn clear_highlight(&mut self, page: &mut Page) {
        for &unit in &self.units {
            page.set_focused(unit, false);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
