use pulldown_cmark::{Event, Parser, Tag as MdTag};

use crate::page::{NodeId, Page, Tag};

/// Parses Markdown into a fresh page tree.
///
/// Block constructs become block elements, inline markup becomes nested
/// inline containers, and raw HTML blocks land as opaque script elements
/// that segmentation and rendering both skip. Link titles are kept; they
/// are what the tooltip layer pops up on hover.
pub fn parse_page(input: &str) -> Page {
    let mut page = Page::new();
    ingest(&mut page, input);
    page
}

/// Re-parses `input` into `page`, replacing the whole body.
///
/// Everything currently under the root is detached first, so sentence
/// units, popups and markers from before the reload are gone afterwards.
/// This is the mutation path a file reload takes; the drift monitor picks
/// it up like any other outside change.
pub fn replace_body(page: &mut Page, input: &str) {
    let root = page.root();
    page.replace_children(root, Vec::new());
    ingest(page, input);
}

fn ingest(page: &mut Page, input: &str) {
    let mut builder = TreeBuilder::new(page);
    for event in Parser::new(input) {
        builder.on_event(event);
    }
}

/// Stack-based assembly of the page tree from the parser's event stream.
///
/// Every `Start` records whether it opened an element, so the matching
/// `End` knows whether to close one; tags with no terminal rendering
/// (metadata, unsupported extensions) stay transparent and their content
/// flows into the enclosing container.
struct TreeBuilder<'a> {
    page: &'a mut Page,
    stack: Vec<NodeId>,
    opened: Vec<bool>,
}

impl<'a> TreeBuilder<'a> {
    fn new(page: &'a mut Page) -> Self {
        let root = page.root();
        Self {
            page,
            stack: vec![root],
            opened: Vec::new(),
        }
    }

    fn top(&self) -> NodeId {
        *self.stack.last().unwrap_or(&self.page.root())
    }

    fn on_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.on_start(tag),
            Event::End(_) => self.on_end(),
            Event::Text(text) => self.append_text(&text),
            Event::Code(text) => self.append_inline(Tag::Code, &text),
            Event::Html(text) => self.append_text(&text),
            Event::SoftBreak => self.append_text(" "),
            Event::HardBreak => self.append_text("\n"),
            _ => {}
        }
    }

    fn on_start(&mut self, tag: MdTag<'_>) {
        let element = match tag {
            MdTag::Paragraph => Some(self.open(Tag::Paragraph)),
            MdTag::Heading { level, .. } => Some(self.open(Tag::Heading(level as u8))),
            MdTag::BlockQuote(_) => Some(self.open(Tag::BlockQuote)),
            MdTag::CodeBlock(_) => Some(self.open(Tag::CodeBlock)),
            MdTag::HtmlBlock => Some(self.open(Tag::Script)),
            MdTag::List(_) => Some(self.open(Tag::Section)),
            MdTag::Item => Some(self.open(Tag::ListItem)),
            MdTag::Emphasis => Some(self.open(Tag::Emphasis)),
            MdTag::Strong => Some(self.open(Tag::Strong)),
            MdTag::Link { dest_url, title, .. } => {
                let link = self.open(Tag::Link);
                self.page.set_href(link, &dest_url);
                if !title.is_empty() {
                    self.page.set_title(link, &title);
                }
                Some(link)
            }
            // Images keep their alt text in the prose flow.
            MdTag::Image { .. } => Some(self.open(Tag::Span)),
            _ => None,
        };
        self.opened.push(element.is_some());
    }

    fn on_end(&mut self) {
        if self.opened.pop() == Some(true) {
            self.stack.pop();
        }
    }

    fn open(&mut self, tag: Tag) -> NodeId {
        let element = self.page.create_element(tag);
        let parent = self.top();
        self.page.append_child(parent, element);
        self.stack.push(element);
        element
    }

    /// Appends text to the current container, merging into a trailing
    /// text node so escapes and soft breaks do not shatter one flow of
    /// prose into many leaves.
    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.top();
        if let Some(&last) = self.page.children_of(parent).last() {
            if let Some(existing) = self.page.text_of(last) {
                let merged = format!("{existing}{text}");
                self.page.set_text(last, &merged);
                return;
            }
        }
        let leaf = self.page.create_text(text);
        self.page.append_child(parent, leaf);
    }

    fn append_inline(&mut self, tag: Tag, text: &str) {
        let element = self.page.create_element(tag);
        let leaf = self.page.create_text(text);
        self.page.append_child(element, leaf);
        let parent = self.top();
        self.page.append_child(parent, element);
    }
}
