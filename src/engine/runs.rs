use crate::page::{Display, NodeId, Page, Tag};

/// A maximal group of adjacent inline text leaves, the unit of
/// segmentation input.
///
/// Grouping follows rendered flow: consecutive leaves in inline context
/// accumulate into one run; a leaf in block context flushes the
/// accumulator and forms a run of its own. Leaves are expected to share
/// one parent, but adjacent inline siblings can break that expectation —
/// [`TextRun::resolve_parent`] is how the wrapper finds out.
#[derive(Clone, Debug)]
pub struct TextRun {
    leaves: Vec<NodeId>,
}

impl TextRun {
    fn single(leaf: NodeId) -> Self {
        Self { leaves: vec![leaf] }
    }

    fn from_group(leaves: Vec<NodeId>) -> Self {
        Self { leaves }
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn last_leaf(&self) -> Option<NodeId> {
        self.leaves.last().copied()
    }

    /// The common parent of every leaf, or `None` when the run turned out
    /// to span multiple parents and must be rejected wholly.
    pub fn resolve_parent(&self, page: &Page) -> Option<NodeId> {
        let first = self.leaves.first()?;
        let parent = page.parent_of(*first)?;
        for &leaf in &self.leaves[1..] {
            if page.parent_of(leaf) != Some(parent) {
                return None;
            }
        }
        Some(parent)
    }

    /// The run's concatenated text, leaves joined with single spaces.
    pub fn joined_text(&self, page: &Page) -> String {
        let mut parts = Vec::with_capacity(self.leaves.len());
        for &leaf in &self.leaves {
            if let Some(text) = page.text_of(leaf) {
                parts.push(text);
            }
        }
        parts.join(" ")
    }
}

/// Partitions the page's text into runs covering every non-empty,
/// non-script leaf in document order.
pub fn collect_runs(page: &Page) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut group: Vec<NodeId> = Vec::new();

    for leaf in page.text_leaves() {
        let Some(text) = page.text_of(leaf) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        let Some(container) = page.parent_of(leaf) else {
            continue;
        };
        if in_opaque_subtree(page, container) {
            continue;
        }

        if is_inline_context(page, container) {
            group.push(leaf);
        } else {
            if !group.is_empty() {
                runs.push(TextRun::from_group(std::mem::take(&mut group)));
            }
            runs.push(TextRun::single(leaf));
        }
    }

    if !group.is_empty() {
        runs.push(TextRun::from_group(group));
    }

    runs
}

/// A leaf sits in inline context when its container's effective layout is
/// inline, or the container is one of the known inline kinds regardless of
/// layout (span-like, link-like).
fn is_inline_context(page: &Page, container: NodeId) -> bool {
    page.display_of(container) == Display::Inline
        || matches!(page.tag_of(container), Some(Tag::Span | Tag::Link))
}

fn in_opaque_subtree(page: &Page, container: NodeId) -> bool {
    let mut current = container;
    loop {
        if page.tag_of(current).is_some_and(Tag::is_opaque) {
            return true;
        }
        match page.parent_of(current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod runs_tests;
