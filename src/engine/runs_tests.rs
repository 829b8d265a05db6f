use super::*;

fn page_with_body() -> (Page, NodeId) {
    let page = Page::new();
    let root = page.root();
    (page, root)
}

fn block_with_text(page: &mut Page, parent: NodeId, tag: Tag, text: &str) -> NodeId {
    let block = page.create_element(tag);
    let leaf = page.create_text(text);
    page.append_child(block, leaf);
    page.append_child(parent, block);
    leaf
}

#[test]
fn block_leaves_form_single_runs() {
    let (mut page, root) = page_with_body();
    let first = block_with_text(&mut page, root, Tag::Paragraph, "First.");
    let second = block_with_text(&mut page, root, Tag::Paragraph, "Second.");

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].leaves(), &[first]);
    assert_eq!(runs[1].leaves(), &[second]);
}

#[test]
fn adjacent_leaves_in_one_inline_container_group() {
    let (mut page, root) = page_with_body();
    let paragraph = page.create_element(Tag::Paragraph);
    let span = page.create_element(Tag::Span);
    let first = page.create_text("One.");
    let second = page.create_text("Two.");
    page.append_child(span, first);
    page.append_child(span, second);
    page.append_child(paragraph, span);
    page.append_child(root, paragraph);

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].leaves(), &[first, second]);
    assert_eq!(runs[0].resolve_parent(&page), Some(span));
}

#[test]
fn block_leaf_flushes_a_pending_inline_group() {
    let (mut page, root) = page_with_body();
    let span = page.create_element(Tag::Span);
    let inline_leaf = page.create_text("Inline text.");
    page.append_child(span, inline_leaf);
    page.append_child(root, span);
    let block_leaf = block_with_text(&mut page, root, Tag::Paragraph, "Block text.");

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].leaves(), &[inline_leaf]);
    assert_eq!(runs[1].leaves(), &[block_leaf]);
}

#[test]
fn skips_whitespace_and_opaque_leaves() {
    let (mut page, root) = page_with_body();
    let paragraph = page.create_element(Tag::Paragraph);
    let blank = page.create_text("   \n ");
    page.append_child(paragraph, blank);
    page.append_child(root, paragraph);

    let script = page.create_element(Tag::Script);
    let nested = page.create_element(Tag::Span);
    let script_text = page.create_text("let hidden = true;");
    page.append_child(nested, script_text);
    page.append_child(script, nested);
    page.append_child(root, script);

    block_with_text(&mut page, root, Tag::CodeBlock, "fn main() {}");
    let prose = block_with_text(&mut page, root, Tag::Paragraph, "Visible prose.");

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].leaves(), &[prose]);
}

#[test]
fn joined_text_uses_single_spaces() {
    let (mut page, root) = page_with_body();
    let span = page.create_element(Tag::Span);
    let first = page.create_text("One");
    let second = page.create_text("Two");
    page.append_child(span, first);
    page.append_child(span, second);
    page.append_child(root, span);

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].joined_text(&page), "One Two");
}

#[test]
fn group_across_different_inline_parents_resolves_none() {
    let (mut page, root) = page_with_body();
    let paragraph = page.create_element(Tag::Paragraph);
    let emphasis = page.create_element(Tag::Emphasis);
    let strong = page.create_element(Tag::Strong);
    let first = page.create_text("Soft.");
    let second = page.create_text("Loud.");
    page.append_child(emphasis, first);
    page.append_child(strong, second);
    page.append_child(paragraph, emphasis);
    page.append_child(paragraph, strong);
    page.append_child(root, paragraph);

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].leaves(), &[first, second]);
    assert_eq!(runs[0].resolve_parent(&page), None);
}

#[test]
fn span_stays_inline_even_when_block_styled() {
    let (mut page, root) = page_with_body();
    let paragraph = page.create_element(Tag::Paragraph);
    let span = page.create_element(Tag::Span);
    page.set_display(span, Display::Block);
    let first = page.create_text("Styled.");
    page.append_child(span, first);
    let emphasis = page.create_element(Tag::Emphasis);
    let second = page.create_text("Plain.");
    page.append_child(emphasis, second);
    page.append_child(paragraph, span);
    page.append_child(paragraph, emphasis);
    page.append_child(root, paragraph);

    let runs = collect_runs(&page);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].leaves(), &[first, second]);
}
