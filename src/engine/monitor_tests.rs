use super::*;
use crate::page::{NodeId, Tag};

fn page_with_unit(text: &str) -> (Page, NodeId, NodeId) {
    let mut page = Page::new();
    let paragraph = page.create_element(Tag::Paragraph);
    let unit = page.create_element(Tag::SentenceUnit);
    let leaf = page.create_text(text);
    page.append_child(unit, leaf);
    page.mark_unit(unit, 0);
    page.append_child(paragraph, unit);
    let root = page.root();
    page.append_child(root, paragraph);
    (page, unit, leaf)
}

#[test]
fn drift_is_reported_only_at_poll_cadence() {
    let (mut page, _, leaf) = page_with_unit("Before. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    page.set_text(leaf, "After. ");

    assert!(!monitor.check(&page, start + Duration::from_millis(100)));
    assert!(monitor.check(&page, start + DEFAULT_POLL_INTERVAL));
}

#[test]
fn unchanged_page_never_reports() {
    let (page, _, _) = page_with_unit("Steady. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    assert!(!monitor.check(&page, start + DEFAULT_POLL_INTERVAL));
    assert!(!monitor.check(&page, start + DEFAULT_POLL_INTERVAL * 2));
}

#[test]
fn vanished_units_report_before_the_poll_is_due() {
    let (mut page, unit, _) = page_with_unit("Gone. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    page.detach(unit);

    assert!(monitor.check(&page, start + Duration::from_millis(1)));
}

#[test]
fn mutations_that_keep_units_wait_for_the_poll() {
    let (mut page, _, _) = page_with_unit("Kept. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    let root = page.root();
    let aside = page.create_element(Tag::Paragraph);
    let extra = page.create_text("Appended later.");
    page.append_child(aside, extra);
    page.append_child(root, aside);

    assert!(!monitor.check(&page, start + Duration::from_millis(1)));
    assert!(monitor.check(&page, start + DEFAULT_POLL_INTERVAL));
}

#[test]
fn changes_past_the_snapshot_bound_are_invisible() {
    let (mut page, _, _) = page_with_unit(&"x".repeat(1200));
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    let root = page.root();
    let tail = page.create_element(Tag::Paragraph);
    let text = page.create_text("Far past the bound.");
    page.append_child(tail, text);
    page.append_child(root, tail);

    assert!(!monitor.check(&page, start + DEFAULT_POLL_INTERVAL));
}

#[test]
fn resync_absorbs_the_layers_own_rewrites() {
    let (mut page, _, leaf) = page_with_unit("Original. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);

    page.set_text(leaf, "Rewritten. ");
    monitor.resync(&page);

    assert!(!monitor.check(&page, start + DEFAULT_POLL_INTERVAL));
}

#[test]
fn stopped_monitor_reports_nothing() {
    let (mut page, unit, _) = page_with_unit("Stopped. ");
    let mut monitor = DriftMonitor::new();
    let start = Instant::now();
    monitor.start(&page, start);
    monitor.stop();

    page.detach(unit);

    assert!(!monitor.check(&page, start + DEFAULT_POLL_INTERVAL * 2));
    assert!(!monitor.is_running());
}

#[test]
fn poll_interval_is_configurable() {
    let (mut page, _, leaf) = page_with_unit("Fast. ");
    let mut monitor = DriftMonitor::new();
    monitor.set_poll_interval(Duration::from_millis(10));
    let start = Instant::now();
    monitor.start(&page, start);

    page.set_text(leaf, "Faster. ");

    assert!(monitor.check(&page, start + Duration::from_millis(10)));
}
