use std::time::Instant;

use ratatui::layout::Position;
use ratatui::style::Color;

use super::*;
use crate::engine::SentenceNavigator;
use crate::layout::PointerGeometry;
use crate::markdown;

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn rendered_lines(page: &Page, width: u16) -> Vec<String> {
    render_page(page, width, &Theme::default())
        .lines
        .iter()
        .map(line_text)
        .collect()
}

fn span_style(rendered: &RenderedPage, text: &str) -> Style {
    rendered
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .find(|span| span.content.as_ref() == text)
        .map(|span| span.style)
        .unwrap_or_else(|| panic!("no span {text:?} in rendered output"))
}

fn find_tag(page: &Page, tag: Tag) -> NodeId {
    page.descendants(page.root())
        .into_iter()
        .find(|&id| page.tag_of(id) == Some(tag))
        .unwrap_or_else(|| panic!("no {tag:?} element in page"))
}

#[test]
fn wraps_paragraph_text_at_the_given_width() {
    let page = markdown::parse_page("Alpha beta gamma delta.");

    let lines = rendered_lines(&page, 11);

    assert_eq!(lines, ["Alpha beta ", "gamma ", "delta."]);
}

#[test]
fn blank_line_separates_blocks() {
    let page = markdown::parse_page("First block.\n\nSecond block.");

    let lines = rendered_lines(&page, 40);

    assert_eq!(lines, ["First block.", "", "Second block."]);
}

#[test]
fn headings_are_bold_with_level_underlines() {
    let page = markdown::parse_page("## Two\n\n### Three\n");

    let rendered = render_page(&page, 40, &Theme::default());
    let lines: Vec<String> = rendered.lines.iter().map(line_text).collect();

    assert_eq!(lines, ["Two", "===", "", "Three", "-----"]);
    assert!(rendered.lines[0].spans[0]
        .style
        .add_modifier
        .contains(Modifier::BOLD));
}

#[test]
fn quote_paragraphs_share_the_bar_prefix() {
    let page = markdown::parse_page("> One.\n>\n> Two.\n");

    let lines = rendered_lines(&page, 40);

    assert_eq!(lines, ["| One.", "", "| Two."]);
}

#[test]
fn list_items_get_bullets_and_hanging_indent() {
    let page = markdown::parse_page("- one\n- two\n");
    assert_eq!(rendered_lines(&page, 40), ["• one", "", "• two"]);

    let page = markdown::parse_page("- alpha beta gamma\n");
    assert_eq!(rendered_lines(&page, 8), ["• alpha ", "  beta ", "  gamma"]);
}

#[test]
fn code_blocks_are_fenced_and_never_wrap() {
    let page = markdown::parse_page("```\nlet value = alpha + beta + gamma + delta;\n```\n");

    let lines = rendered_lines(&page, 10);

    assert_eq!(lines[0], "----------");
    assert_eq!(lines[1], "let value = alpha + beta + gamma + delta;");
    assert_eq!(lines[2], "----------");
}

#[test]
fn script_blocks_are_invisible() {
    let page = markdown::parse_page("Visible.\n\n<script>\nvar x = 1;\n</script>\n");

    let lines = rendered_lines(&page, 40);

    assert_eq!(lines, ["Visible."]);
}

#[test]
fn hard_break_starts_a_new_line() {
    let page = markdown::parse_page("First line  \nSecond line.");

    let lines = rendered_lines(&page, 40);

    assert_eq!(lines, ["First line", "Second line."]);
}

#[test]
fn empty_page_renders_one_blank_line() {
    let page = Page::new();

    let rendered = render_page(&page, 40, &Theme::default());

    assert_eq!(rendered.total_lines, 1);
    assert_eq!(line_text(&rendered.lines[0]), "");
    assert_eq!(rendered.focus_line, None);
}

#[test]
fn inline_markup_styles_spans() {
    let page = markdown::parse_page("Plain **loud** and `run()` and [docs](https://example.net).");

    let rendered = render_page(&page, 60, &Theme::default());

    assert!(span_style(&rendered, "loud")
        .add_modifier
        .contains(Modifier::BOLD));
    assert_eq!(span_style(&rendered, "run()").fg, Some(Color::DarkGray));
    let link = span_style(&rendered, "docs");
    assert_eq!(link.fg, Some(Color::Blue));
    assert!(link.add_modifier.contains(Modifier::UNDERLINED));
}

#[test]
fn screen_layout_resolves_cells_to_the_innermost_element() {
    let mut page = markdown::parse_page("One two. Three.");
    let mut navigator = SentenceNavigator::new();
    navigator.activate(&mut page, Instant::now());
    let units = navigator.units().to_vec();

    let theme = Theme::default();
    let rendered = render_page(&page, 40, &theme);
    let area = Rect::new(0, 0, 40, 10);
    let screen = rendered.screen_layout(&page, area, 0, &theme);

    // "One two. Three." with the first unit owning its trailing space.
    assert_eq!(screen.map.element_at(Position::new(0, 0)), Some(units[0]));
    assert_eq!(screen.map.element_at(Position::new(8, 0)), Some(units[0]));
    assert_eq!(screen.map.element_at(Position::new(9, 0)), Some(units[1]));
    assert_eq!(screen.map.element_at(Position::new(30, 0)), Some(page.root()));
    assert_eq!(screen.map.first_line_rect(units[0]), Some(Rect::new(0, 0, 9, 1)));
}

#[test]
fn scrolled_projection_shifts_the_hit_grid() {
    let mut page = markdown::parse_page("First paragraph here.\n\nSecond paragraph there.");
    let mut navigator = SentenceNavigator::new();
    navigator.activate(&mut page, Instant::now());
    let units = navigator.units().to_vec();

    let theme = Theme::default();
    let rendered = render_page(&page, 40, &theme);
    let area = Rect::new(0, 0, 40, 5);
    let screen = rendered.screen_layout(&page, area, 2, &theme);

    assert_eq!(screen.map.element_at(Position::new(0, 0)), Some(units[1]));
    assert_eq!(screen.map.first_line_rect(units[0]), None);
}

#[test]
fn focused_unit_sets_the_focus_line_and_highlight() {
    let mut page = markdown::parse_page("One two. Three.");
    let mut navigator = SentenceNavigator::new();
    let now = Instant::now();
    navigator.activate(&mut page, now);
    navigator.step_forward(&mut page, now);

    let rendered = render_page(&page, 10, &Theme::default());

    assert_eq!(rendered.total_lines, 2);
    assert_eq!(rendered.focus_line, Some(1));
    let focused = span_style(&rendered, "Three.");
    assert_eq!(focused.bg, Some(Color::LightYellow));
    assert_eq!(focused.fg, Some(Color::Black));
    assert_eq!(span_style(&rendered, "One").bg, None);
}

#[test]
fn held_selection_overrides_the_focus_highlight() {
    let mut page = markdown::parse_page("One two. Three.");
    let mut navigator = SentenceNavigator::new();
    navigator.activate(&mut page, Instant::now());
    navigator.set_extend_held(&mut page, true);

    let rendered = render_page(&page, 40, &Theme::default());

    let selected = span_style(&rendered, "One");
    assert_eq!(selected.bg, Some(Color::LightBlue));
    assert_eq!(selected.fg, Some(Color::White));
}

#[test]
fn tooltip_popup_floats_below_its_anchor() {
    let mut page = markdown::parse_page("See [docs](https://example.net \"Manual page\") now.");
    let link = find_tag(&page, Tag::Link);
    let popup = page.create_element(Tag::Popup);
    let label = page.create_text("Manual page");
    page.append_child(popup, label);
    let root = page.root();
    page.append_child(root, popup);
    page.set_anchor(popup, link);

    let theme = Theme::default();
    let rendered = render_page(&page, 40, &theme);
    assert_eq!(rendered.total_lines, 1);

    let area = Rect::new(0, 0, 40, 10);
    let screen = rendered.screen_layout(&page, area, 0, &theme);

    assert_eq!(screen.popups.len(), 1);
    let overlay = &screen.popups[0];
    assert_eq!(overlay.area, Rect::new(4, 1, 13, 1));
    assert_eq!(line_text(&overlay.lines[0]), " Manual page ");
    assert_eq!(screen.map.element_at(Position::new(5, 1)), Some(popup));
    assert_eq!(screen.map.element_at(Position::new(5, 0)), Some(link));
}

#[test]
fn offscreen_anchor_suppresses_the_popup() {
    let mut page = markdown::parse_page("See [docs](https://example.net \"Manual page\") now.");
    let link = find_tag(&page, Tag::Link);
    let popup = page.create_element(Tag::Popup);
    let label = page.create_text("Manual page");
    page.append_child(popup, label);
    let root = page.root();
    page.append_child(root, popup);
    page.set_anchor(popup, link);

    let theme = Theme::default();
    let rendered = render_page(&page, 40, &theme);
    let screen = rendered.screen_layout(&page, Rect::new(0, 0, 40, 10), 5, &theme);

    assert!(screen.popups.is_empty());
}
