use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::layout::{LayoutMap, PointerGeometry};
use crate::page::{Display, NodeId, Page, Tag};
use crate::theme::Theme;

/// Widest a tooltip popup gets before its text wraps.
const POPUP_MAX_WIDTH: u16 = 40;

/// One frame's worth of wrapped document lines, in document space.
///
/// The lines themselves do not depend on scrolling; [`RenderedPage::screen_layout`]
/// projects the recorded fragment placements into screen cells for one
/// viewport position.
pub struct RenderedPage {
    pub lines: Vec<Line<'static>>,
    pub total_lines: usize,
    /// First document line the focused sentence appears on.
    pub focus_line: Option<usize>,
    placements: Vec<Placement>,
}

/// A tooltip box ready to be drawn over the document text.
pub struct PopupOverlay {
    pub node: NodeId,
    pub area: Rect,
    pub lines: Vec<Line<'static>>,
}

/// Pointer geometry plus overlays for one drawn frame.
pub struct ScreenLayout {
    pub map: LayoutMap,
    pub popups: Vec<PopupOverlay>,
}

/// Horizontal run of cells owned by one element on one document line.
#[derive(Clone, Copy, Debug)]
struct Placement {
    owner: NodeId,
    line: usize,
    column: u16,
    width: u16,
}

/// Lays out the page as wrapped terminal lines of the given width.
pub fn render_page(page: &Page, width: u16, theme: &Theme) -> RenderedPage {
    let mut renderer = Renderer::new(page, theme, (width as usize).max(1));
    renderer.render_children(page.root(), "", "");
    renderer.finish()
}

impl RenderedPage {
    /// Projects the document-space placements into `area` at the given
    /// scroll offset. The page root claims the whole area first and every
    /// fragment then claims its cells outermost ancestor first, so the
    /// innermost element wins the hit grid while ancestors keep line
    /// boxes. Popups claim their cells last and sit on top of everything.
    pub fn screen_layout(
        &self,
        page: &Page,
        area: Rect,
        scroll_top: usize,
        theme: &Theme,
    ) -> ScreenLayout {
        let mut map = LayoutMap::new(area);
        map.record(page.root(), area);

        let root = page.root();
        let visible = scroll_top..scroll_top + area.height as usize;
        for placement in &self.placements {
            if !visible.contains(&placement.line) {
                continue;
            }
            let x = area.x.saturating_add(placement.column);
            if x >= area.right() {
                continue;
            }
            let rect = Rect::new(
                x,
                area.y + (placement.line - scroll_top) as u16,
                placement.width.min(area.right() - x),
                1,
            );
            let mut chain = vec![placement.owner];
            let mut current = placement.owner;
            while let Some(parent) = page.parent_of(current) {
                if parent == root {
                    break;
                }
                chain.push(parent);
                current = parent;
            }
            for &node in chain.iter().rev() {
                map.record(node, rect);
            }
        }

        let popups = popup_overlays(page, &mut map, area, theme);
        ScreenLayout { map, popups }
    }
}

struct Renderer<'a> {
    page: &'a Page,
    theme: &'a Theme,
    wrap_width: usize,
    lines: Vec<Line<'static>>,
    placements: Vec<Placement>,
}

impl<'a> Renderer<'a> {
    fn new(page: &'a Page, theme: &'a Theme, wrap_width: usize) -> Self {
        Self {
            page,
            theme,
            wrap_width,
            lines: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Renders the children of `container`, flowing consecutive inline
    /// children as one wrapped run and recursing into block children, with
    /// a blank line between pieces. `first_prefix` opens the first line of
    /// the first piece; later lines and pieces get `continuation_prefix`.
    fn render_children(&mut self, container: NodeId, first_prefix: &str, continuation_prefix: &str) {
        let page = self.page;
        let mut flow: Vec<NodeId> = Vec::new();
        let mut prefix = first_prefix.to_string();
        let mut first = true;
        for &child in page.children_of(container) {
            if self.is_skipped(child) {
                continue;
            }
            if self.is_flow(child) {
                flow.push(child);
                continue;
            }
            if !flow.is_empty() {
                if !first {
                    self.push_blank_line();
                }
                self.render_flow(container, &flow, &prefix, continuation_prefix, Style::default());
                flow.clear();
                first = false;
                prefix = continuation_prefix.to_string();
            }
            if !first {
                self.push_blank_line();
            }
            self.render_block(child, &prefix, continuation_prefix);
            first = false;
            prefix = continuation_prefix.to_string();
        }
        if !flow.is_empty() {
            if !first {
                self.push_blank_line();
            }
            self.render_flow(container, &flow, &prefix, continuation_prefix, Style::default());
        }
    }

    fn render_block(&mut self, id: NodeId, first_prefix: &str, continuation_prefix: &str) {
        match self.page.tag_of(id) {
            Some(Tag::Heading(level)) => self.render_heading(id, level, first_prefix),
            Some(Tag::CodeBlock) => self.render_code_block(id, first_prefix),
            Some(Tag::BlockQuote) => {
                let quoted_first = format!("{first_prefix}| ");
                let quoted_rest = format!("{continuation_prefix}| ");
                self.render_children(id, &quoted_first, &quoted_rest);
            }
            Some(Tag::ListItem) => {
                let bullet_first = format!("{first_prefix}• ");
                let bullet_rest = format!("{continuation_prefix}  ");
                self.render_children(id, &bullet_first, &bullet_rest);
            }
            _ => self.render_children(id, first_prefix, continuation_prefix),
        }
    }

    fn render_heading(&mut self, id: NodeId, level: u8, prefix: &str) {
        let page = self.page;
        let base = Style::default().add_modifier(Modifier::BOLD);
        self.render_flow(id, page.children_of(id), prefix, prefix, base);

        let underline_char = match level {
            2 => '=',
            3 => '-',
            _ => return,
        };
        let width = self.lines.last().map(line_width).unwrap_or(0);
        let underline = underline_string(width, underline_char);
        self.push_owned_line(&underline, Style::default(), id);
    }

    fn render_code_block(&mut self, id: NodeId, prefix: &str) {
        let fence = self.code_block_fence(prefix);
        let style = self.theme.code_style();
        self.push_owned_line(&fence, style, id);

        let raw = self.page.text_content(id);
        // The source's final newline closes the block, it is not an extra
        // blank line.
        let content = raw.strip_suffix('\n').unwrap_or(&raw);
        for raw_line in content.split('\n') {
            let expanded = raw_line.replace('\t', "    ").replace('\r', "");
            let text = format!("{prefix}{expanded}");
            self.push_owned_line(&text, style, id);
        }

        self.push_owned_line(&fence, style, id);
    }

    fn render_flow(
        &mut self,
        container: NodeId,
        nodes: &[NodeId],
        first_prefix: &str,
        continuation_prefix: &str,
        base: Style,
    ) {
        let mut fragments = Vec::new();
        for &node in nodes {
            self.collect_fragments(node, base, false, &mut fragments);
        }
        let outputs = wrap_fragments(
            &fragments,
            first_prefix,
            continuation_prefix,
            self.wrap_width,
            container,
        );
        self.consume_lines(outputs);
    }

    /// Flattens an inline subtree into word and whitespace fragments. Each
    /// text node's fragments are owned by its parent element, which is what
    /// pointer hits on those cells resolve to.
    fn collect_fragments(
        &self,
        id: NodeId,
        base: Style,
        selected: bool,
        fragments: &mut Vec<FragmentItem>,
    ) {
        let page = self.page;
        if let Some(text) = page.text_of(id) {
            if text.is_empty() {
                return;
            }
            let style = if selected {
                base.patch(self.theme.selection_style())
            } else {
                base
            };
            let owner = page.parent_of(id).unwrap_or_else(|| page.root());
            tokenize_text(text, style, owner, fragments);
            return;
        }
        let Some(tag) = page.tag_of(id) else {
            return;
        };
        if tag.is_hidden() || tag == Tag::Popup {
            return;
        }
        let selected = selected || page.selection() == Some(id);
        let style = self.element_style(id, tag, base);
        for &child in page.children_of(id) {
            self.collect_fragments(child, style, selected, fragments);
        }
    }

    fn element_style(&self, id: NodeId, tag: Tag, base: Style) -> Style {
        let mut style = match tag {
            Tag::Strong => base.add_modifier(Modifier::BOLD),
            Tag::Emphasis => base.add_modifier(Modifier::ITALIC),
            Tag::Code => base.patch(self.theme.code_style()),
            Tag::Link => base
                .patch(self.theme.link_style())
                .add_modifier(Modifier::UNDERLINED),
            _ => base,
        };
        if self.page.is_focused(id) {
            style = style.patch(self.theme.focused_style());
        }
        style
    }

    fn is_skipped(&self, id: NodeId) -> bool {
        match self.page.tag_of(id) {
            Some(tag) => tag.is_hidden() || tag == Tag::Popup,
            None => false,
        }
    }

    fn is_flow(&self, id: NodeId) -> bool {
        self.page.is_text(id) || self.page.display_of(id) == Display::Inline
    }

    fn push_blank_line(&mut self) {
        self.lines.push(Line::from(""));
    }

    /// Pushes a line whose every cell belongs to one element.
    fn push_owned_line(&mut self, text: &str, style: Style, owner: NodeId) {
        let width = visible_width(text).min(u16::MAX as usize) as u16;
        if width > 0 {
            self.placements.push(Placement {
                owner,
                line: self.lines.len(),
                column: 0,
                width,
            });
        }
        self.lines
            .push(Line::from(Span::styled(text.to_string(), style)));
    }

    fn code_block_fence(&self, prefix: &str) -> String {
        const MIN_FENCE_WIDTH: usize = 4;
        let available_width = self.wrap_width.saturating_sub(visible_width(prefix));
        let dash_count = available_width.max(MIN_FENCE_WIDTH);
        format!("{}{}", prefix, "-".repeat(dash_count))
    }

    fn consume_lines(&mut self, outputs: Vec<LineOutput>) {
        for output in outputs {
            let line_index = self.lines.len();
            let mut column: u16 = 0;
            let mut spans: Vec<Span<'static>> = Vec::with_capacity(output.segments.len());
            for segment in output.segments {
                let width = segment.width.min(u16::MAX as usize) as u16;
                if width > 0 {
                    if let Some(owner) = segment.owner {
                        self.placements.push(Placement {
                            owner,
                            line: line_index,
                            column,
                            width,
                        });
                    }
                }
                column = column.saturating_add(width);
                spans.push(Span::styled(segment.text, segment.style));
            }
            self.lines.push(Line::from(spans));
        }
    }

    fn finish(mut self) -> RenderedPage {
        if self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
        let total_lines = self.lines.len();
        let focus_line = self.locate_focus();
        RenderedPage {
            lines: self.lines,
            total_lines,
            focus_line,
            placements: self.placements,
        }
    }

    fn locate_focus(&self) -> Option<usize> {
        for placement in &self.placements {
            let mut current = Some(placement.owner);
            while let Some(node) = current {
                if self.page.is_focused(node) {
                    return Some(placement.line);
                }
                current = self.page.parent_of(node);
            }
        }
        None
    }
}

fn popup_overlays(page: &Page, map: &mut LayoutMap, area: Rect, theme: &Theme) -> Vec<PopupOverlay> {
    let mut popups = Vec::new();
    if area.width < 3 || area.height == 0 {
        return popups;
    }
    for &child in page.children_of(page.root()) {
        if page.tag_of(child) != Some(Tag::Popup) {
            continue;
        }
        let Some(anchor) = page.anchor_of(child) else {
            continue;
        };
        // An anchor with no on-screen box is scrolled away; its tooltip
        // stays undrawn until it comes back.
        let Some(anchor_box) = map.first_line_rect(anchor) else {
            continue;
        };
        let text = page.text_content(child);
        let rows = wrap_plain(&text, POPUP_MAX_WIDTH.min(area.width) as usize - 2);
        if rows.is_empty() {
            continue;
        }
        let content_width = rows
            .iter()
            .map(|row| visible_width(row))
            .max()
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16;
        let box_width = (content_width + 2).min(area.width);
        let box_height = (rows.len() as u16).min(area.height);
        let x = anchor_box
            .x
            .min(area.right().saturating_sub(box_width))
            .max(area.x);
        let below = anchor_box.y.saturating_add(1);
        let y = if below + box_height <= area.bottom() {
            below
        } else {
            anchor_box.y.saturating_sub(box_height).max(area.y)
        };
        let popup_area = Rect::new(x, y, box_width, box_height);
        map.record(child, popup_area);

        let style = theme.popup_style();
        let lines = rows
            .iter()
            .map(|row| {
                let pad = " ".repeat((content_width as usize).saturating_sub(visible_width(row)));
                Line::from(Span::styled(format!(" {row}{pad} "), style))
            })
            .collect();
        popups.push(PopupOverlay {
            node: child,
            area: popup_area,
            lines,
        });
    }
    popups
}

#[derive(Clone)]
struct LineSegment {
    text: String,
    style: Style,
    owner: Option<NodeId>,
    width: usize,
}

struct LineOutput {
    segments: Vec<LineSegment>,
}

#[derive(Clone)]
struct Fragment {
    text: String,
    style: Style,
    owner: NodeId,
    kind: FragmentKind,
    width: usize,
}

#[derive(Clone, Copy)]
enum FragmentKind {
    Word,
    Whitespace,
}

#[derive(Clone)]
enum FragmentItem {
    Token(Fragment),
    LineBreak,
}

fn tokenize_text(text: &str, style: Style, owner: NodeId, fragments: &mut Vec<FragmentItem>) {
    let mut builder: Option<TokenBuilder> = None;
    for raw in text.chars() {
        if raw == '\r' {
            continue;
        }
        if raw == '\n' {
            if let Some(token) = builder.take() {
                fragments.push(FragmentItem::Token(token.finish()));
            }
            fragments.push(FragmentItem::LineBreak);
            continue;
        }
        let (ch, repeat) = if raw == '\t' { (' ', 4) } else { (raw, 1) };
        for _ in 0..repeat {
            let is_whitespace = ch.is_whitespace();
            match builder.as_mut() {
                Some(current) if current.kind_matches(is_whitespace) => current.push_char(ch),
                _ => {
                    if let Some(existing) = builder.take() {
                        fragments.push(FragmentItem::Token(existing.finish()));
                    }
                    let mut next = TokenBuilder::new(style, owner, is_whitespace);
                    next.push_char(ch);
                    builder = Some(next);
                }
            }
        }
    }
    if let Some(token) = builder {
        fragments.push(FragmentItem::Token(token.finish()));
    }
}

struct TokenBuilder {
    text: String,
    style: Style,
    owner: NodeId,
    kind: FragmentKind,
    width: usize,
}

impl TokenBuilder {
    fn new(style: Style, owner: NodeId, is_whitespace: bool) -> Self {
        Self {
            text: String::new(),
            style,
            owner,
            kind: if is_whitespace {
                FragmentKind::Whitespace
            } else {
                FragmentKind::Word
            },
            width: 0,
        }
    }

    fn kind_matches(&self, is_whitespace: bool) -> bool {
        matches!(
            (self.kind, is_whitespace),
            (FragmentKind::Whitespace, true) | (FragmentKind::Word, false)
        )
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }

    fn finish(self) -> Fragment {
        Fragment {
            text: self.text,
            style: self.style,
            owner: self.owner,
            kind: self.kind,
            width: self.width,
        }
    }
}

fn wrap_fragments(
    fragments: &[FragmentItem],
    first_prefix: &str,
    continuation_prefix: &str,
    width: usize,
    block_owner: NodeId,
) -> Vec<LineOutput> {
    let mut outputs = Vec::new();
    let mut builder = LineBuilder::new(first_prefix.to_string(), block_owner);
    let mut pending_whitespace: Vec<Fragment> = Vec::new();

    for fragment in fragments {
        match fragment {
            FragmentItem::LineBreak => {
                builder.consume_pending(&mut pending_whitespace);
                outputs.push(builder.build_line());
                builder = LineBuilder::new(continuation_prefix.to_string(), block_owner);
            }
            FragmentItem::Token(token) => match token.kind {
                FragmentKind::Whitespace => {
                    pending_whitespace.push(token.clone());
                }
                FragmentKind::Word => {
                    let whitespace_width: usize =
                        pending_whitespace.iter().map(|item| item.width).sum();
                    if builder.current_width() > builder.prefix_width
                        && builder.current_width() + whitespace_width + token.width > width
                    {
                        builder.consume_pending(&mut pending_whitespace);
                        outputs.push(builder.build_line());
                        builder = LineBuilder::new(continuation_prefix.to_string(), block_owner);
                    }

                    builder.append_with_pending(token.clone(), &mut pending_whitespace);
                }
            },
        }
    }

    builder.consume_pending(&mut pending_whitespace);
    outputs.push(builder.build_line());
    outputs
}

struct LineBuilder {
    segments: Vec<LineSegment>,
    width: usize,
    prefix_width: usize,
}

impl LineBuilder {
    fn new(prefix: String, block_owner: NodeId) -> Self {
        let prefix_width = visible_width(&prefix);
        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(LineSegment {
                text: prefix,
                style: Style::default(),
                owner: Some(block_owner),
                width: prefix_width,
            });
        }
        Self {
            segments,
            width: prefix_width,
            prefix_width,
        }
    }

    fn current_width(&self) -> usize {
        self.width
    }

    fn append_with_pending(&mut self, token: Fragment, pending_whitespace: &mut Vec<Fragment>) {
        self.consume_pending(pending_whitespace);
        self.append_token(token);
    }

    fn consume_pending(&mut self, pending_whitespace: &mut Vec<Fragment>) {
        for fragment in pending_whitespace.drain(..) {
            self.append_token(fragment);
        }
    }

    fn append_token(&mut self, fragment: Fragment) {
        if fragment.text.is_empty() {
            return;
        }
        self.width += fragment.width;
        self.segments.push(LineSegment {
            text: fragment.text,
            style: fragment.style,
            owner: Some(fragment.owner),
            width: fragment.width,
        });
    }

    fn build_line(mut self) -> LineOutput {
        if self.segments.is_empty() {
            self.segments.push(LineSegment {
                text: String::new(),
                style: Style::default(),
                owner: None,
                width: 0,
            });
        }
        LineOutput {
            segments: self.segments,
        }
    }
}

fn wrap_plain(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for word in text.split_whitespace() {
        let word_width = visible_width(word);
        if current_width > 0 && current_width + 1 + word_width > width {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| visible_width(span.content.as_ref()))
        .sum()
}

fn underline_string(width: usize, ch: char) -> String {
    std::iter::repeat(ch).take(width.max(1)).collect()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
