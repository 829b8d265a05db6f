use super::*;
use crate::layout::LayoutMap;

fn page_with_unit() -> (Page, NodeId) {
    let mut page = Page::new();
    let paragraph = page.create_element(Tag::Paragraph);
    let unit = page.create_element(Tag::SentenceUnit);
    let text = page.create_text("Hello world. ");
    page.append_child(unit, text);
    page.mark_unit(unit, 0);
    page.append_child(paragraph, unit);
    let root = page.root();
    page.append_child(root, paragraph);
    (page, unit)
}

fn kinds(events: &[PointerEvent]) -> Vec<PointerEventKind> {
    events.iter().map(|event| event.kind).collect()
}

#[test]
fn click_through_runs_hover_then_press_then_settle() {
    let (mut page, unit) = page_with_unit();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(unit, Rect::new(4, 2, 13, 1));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.begin_click_through(&mut page, unit, start);
    assert!(sequencer.on_tick(&mut page, &map, start).is_empty());

    let hover = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY);
    assert_eq!(
        kinds(&hover),
        [PointerEventKind::Enter, PointerEventKind::Move, PointerEventKind::Over],
    );
    assert!(hover.iter().all(|event| event.target == unit));
    assert_eq!(hover[0].position, Position::new(5, 2));
    assert!(page.cursor_hidden());
    let (marker, marker_at) = sequencer.marker().unwrap();
    assert!(page.is_attached(marker));
    assert_eq!(marker_at, Position::new(5, 2));

    let press = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY + CLICK_DELAY);
    assert_eq!(
        kinds(&press),
        [PointerEventKind::Down, PointerEventKind::Up, PointerEventKind::Click],
    );
    assert_eq!(press[0].position, Position::new(5, 2));
    assert_eq!(press[0].target, unit);

    let mid_settle = start + HOVER_DELAY + CLICK_DELAY + Duration::from_millis(500);
    assert!(sequencer.on_tick(&mut page, &map, mid_settle).is_empty());
    assert!(page.is_attached(marker));

    let after_settle = start + HOVER_DELAY + CLICK_DELAY + SETTLE_DELAY;
    assert!(sequencer.on_tick(&mut page, &map, after_settle).is_empty());
    assert!(!page.is_attached(marker));
    assert!(!page.cursor_hidden());
    assert!(sequencer.is_idle());
}

#[test]
fn stale_target_drops_the_sequence() {
    let (mut page, unit) = page_with_unit();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(unit, Rect::new(0, 0, 13, 1));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.begin_click_through(&mut page, unit, start);
    page.detach(unit);

    let events = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY);
    assert!(events.is_empty());
    assert!(sequencer.is_idle());
    assert!(sequencer.marker().is_none());
    assert!(!page.cursor_hidden());
}

#[test]
fn target_lost_after_hover_skips_the_press() {
    let (mut page, unit) = page_with_unit();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(unit, Rect::new(0, 0, 13, 1));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.begin_click_through(&mut page, unit, start);
    let hover = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY);
    assert_eq!(hover.len(), 3);
    let (marker, _) = sequencer.marker().unwrap();

    page.detach(unit);

    let press = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY + CLICK_DELAY);
    assert!(press.is_empty());

    let after_settle = start + HOVER_DELAY + CLICK_DELAY + SETTLE_DELAY;
    sequencer.on_tick(&mut page, &map, after_settle);
    assert!(!page.is_attached(marker));
    assert!(sequencer.is_idle());
}

#[test]
fn target_without_on_screen_box_is_dropped() {
    let (mut page, unit) = page_with_unit();
    let map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.begin_click_through(&mut page, unit, start);

    let events = sequencer.on_tick(&mut page, &map, start + HOVER_DELAY);
    assert!(events.is_empty());
    assert!(sequencer.is_idle());
    assert!(sequencer.marker().is_none());
}

#[test]
fn step_interaction_presses_center_then_dismisses_corner() {
    let (mut page, unit) = page_with_unit();
    let backdrop = page.root();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(backdrop, Rect::new(0, 0, 40, 10));
    map.record(unit, Rect::new(0, 0, 13, 1));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.schedule_step_interaction(start);

    let center = sequencer.on_tick(&mut page, &map, start);
    assert_eq!(
        kinds(&center),
        [PointerEventKind::Down, PointerEventKind::Up, PointerEventKind::Click],
    );
    assert_eq!(center[0].position, Position::new(20, 5));
    assert_eq!(center[0].target, backdrop);

    let corner = sequencer.on_tick(&mut page, &map, start + DISMISS_DELAY);
    assert_eq!(
        kinds(&corner),
        [
            PointerEventKind::Move,
            PointerEventKind::Leave,
            PointerEventKind::Out,
            PointerEventKind::Down,
            PointerEventKind::Up,
            PointerEventKind::Click,
        ],
    );
    assert_eq!(corner[0].position, Position::new(38, 8));
    assert!(sequencer.is_idle());
}

#[test]
fn empty_corner_dismisses_silently() {
    let (mut page, unit) = page_with_unit();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(unit, Rect::new(0, 0, 13, 1));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.schedule_step_interaction(start);
    sequencer.on_tick(&mut page, &map, start);

    let corner = sequencer.on_tick(&mut page, &map, start + DISMISS_DELAY);
    assert!(corner.is_empty());
    assert!(sequencer.is_idle());
}

#[test]
fn rapid_steps_coalesce_onto_the_latest_deadlines() {
    let (mut page, _) = page_with_unit();
    let backdrop = page.root();
    let mut map = LayoutMap::new(Rect::new(0, 0, 40, 10));
    map.record(backdrop, Rect::new(0, 0, 40, 10));
    let mut sequencer = PointerSequencer::new();
    let start = Instant::now();

    sequencer.schedule_step_interaction(start);
    sequencer.schedule_step_interaction(start + Duration::from_millis(50));

    let mut presses = 0;
    for offset in [0u64, 50, 100, 150, 200, 300] {
        let events = sequencer.on_tick(&mut page, &map, start + Duration::from_millis(offset));
        presses += events
            .iter()
            .filter(|event| event.kind == PointerEventKind::Down)
            .count();
    }
    assert_eq!(presses, 2);
    assert!(sequencer.is_idle());
}
