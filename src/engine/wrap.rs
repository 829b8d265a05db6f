use tracing::warn;

use crate::engine::runs::{TextRun, collect_runs};
use crate::page::{NodeId, Page, Tag};
use crate::segment::SentenceSegmenter;

/// Replaces every text run on the page with addressable sentence units.
///
/// Runs are collected once up front, then rewritten one by one; rewriting
/// a run only touches that run's leaves, so the remaining runs stay valid.
/// Returns the created units in document order, indices starting at zero.
pub fn wrap_page<S: SentenceSegmenter>(page: &mut Page, segmenter: &S) -> Vec<NodeId> {
    let runs = collect_runs(page);
    let mut units = Vec::new();
    for run in &runs {
        let created = wrap_run(page, run, segmenter, units.len());
        units.extend(created);
    }
    units
}

/// Rewrites one run into sentence-unit elements at the run's position.
///
/// The run's leaf texts are joined with single spaces and handed to the
/// oracle. Each sentence becomes a unit element carrying the sentence text
/// plus a trailing space, indexed from `next_index` onward. The units are
/// inserted in one batch after the run's last leaf, then the original
/// leaves are removed. A run whose leaves no longer share a parent is
/// skipped wholly, as is a run the oracle finds no sentences in.
pub fn wrap_run<S: SentenceSegmenter>(
    page: &mut Page,
    run: &TextRun,
    segmenter: &S,
    next_index: usize,
) -> Vec<NodeId> {
    let Some(parent) = run.resolve_parent(page) else {
        warn!(leaves = run.leaves().len(), "skipped text run with mixed parents");
        return Vec::new();
    };
    let Some(last_leaf) = run.last_leaf() else {
        return Vec::new();
    };

    let sentences = segmenter.split(&run.joined_text(page));
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut units = Vec::with_capacity(sentences.len());
    for (offset, sentence) in sentences.iter().enumerate() {
        let unit = page.create_element(Tag::SentenceUnit);
        let text = page.create_text(&format!("{sentence} "));
        page.append_child(unit, text);
        page.mark_unit(unit, next_index + offset);
        units.push(unit);
    }

    if !page.insert_all_after(parent, last_leaf, &units) {
        return Vec::new();
    }
    for &leaf in run.leaves() {
        if page.parent_of(leaf) == Some(parent) {
            page.detach(leaf);
        }
    }
    units
}

/// Dissolves every sentence unit back into a plain text node at its tree
/// position, restoring the page to unwrapped form. Returns how many units
/// were dissolved.
pub fn unwrap_all(page: &mut Page) -> usize {
    let mut count = 0;
    for unit in page.unit_elements() {
        let text = page.text_content(unit);
        if page.replace_with_text(unit, &text).is_some() {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
#[path = "wrap_tests.rs"]
mod wrap_tests;
