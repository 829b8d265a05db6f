use std::fmt;

/// Handle into a [`Page`]'s node arena.
///
/// Ids stay valid after the node is detached from the tree; a detached node
/// simply resolves as unattached. This mirrors how outside code may keep
/// references to nodes that a rebuild has since removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Body,
    Section,
    Paragraph,
    Heading(u8),
    BlockQuote,
    ListItem,
    CodeBlock,
    Script,
    Span,
    Link,
    Emphasis,
    Strong,
    Code,
    Popup,
    PointerMarker,
    SentenceUnit,
}

impl Tag {
    pub fn default_display(self) -> Display {
        match self {
            Tag::Body
            | Tag::Section
            | Tag::Paragraph
            | Tag::Heading(_)
            | Tag::BlockQuote
            | Tag::ListItem
            | Tag::CodeBlock
            | Tag::Script
            | Tag::Popup
            | Tag::PointerMarker => Display::Block,
            Tag::Span | Tag::Link | Tag::Emphasis | Tag::Strong | Tag::Code | Tag::SentenceUnit => {
                Display::Inline
            }
        }
    }

    /// Containers whose text is not prose to segment: script blocks and,
    /// in a markdown page, fenced code. Inline `Code` spans stay part of
    /// the surrounding prose.
    pub fn is_opaque(self) -> bool {
        matches!(self, Tag::Script | Tag::CodeBlock)
    }

    /// Containers that never render: script text is invisible on a page,
    /// and the pointer marker is a zero-visibility overlay aid.
    pub fn is_hidden(self) -> bool {
        matches!(self, Tag::Script | Tag::PointerMarker)
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    tag: Tag,
    children: Vec<NodeId>,
    display_override: Option<Display>,
    title: Option<String>,
    href: Option<String>,
    anchor: Option<NodeId>,
    unit_index: Option<usize>,
    focused: bool,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            children: Vec::new(),
            display_override: None,
            title: None,
            href: None,
            anchor: None,
            unit_index: None,
            focused: false,
        }
    }
}

#[derive(Clone, Debug)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// The live document tree the navigation engine operates on.
///
/// Structural and text mutations bump a monotonic epoch, which observers
/// compare after a mutation batch settles. Detached nodes keep their slot
/// so stale handles can still be inspected (and found unattached).
pub struct Page {
    nodes: Vec<Node>,
    root: NodeId,
    epoch: u64,
    selection: Option<NodeId>,
    cursor_hidden: bool,
}

impl Page {
    pub fn new() -> Self {
        let body = Node {
            parent: None,
            data: NodeData::Element(Element::new(Tag::Body)),
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            epoch: 0,
            selection: None,
            cursor_hidden: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn bump(&mut self) {
        self.epoch += 1;
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Construction & mutation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            data: NodeData::Element(Element::new(tag)),
        });
        id
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            data: NodeData::Text(text.to_string()),
        });
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
            self.node_mut(child).parent = Some(parent);
            self.bump();
        }
    }

    /// Inserts `children` right after `reference` under `parent`, preserving
    /// order. No-op when `reference` is not currently a child of `parent`.
    pub fn insert_all_after(&mut self, parent: NodeId, reference: NodeId, children: &[NodeId]) -> bool {
        let Some(position) = self
            .element(parent)
            .and_then(|el| el.children.iter().position(|&c| c == reference))
        else {
            return false;
        };
        for (offset, &child) in children.iter().enumerate() {
            self.detach(child);
            if let Some(el) = self.element_mut(parent) {
                el.children.insert(position + 1 + offset, child);
            }
            self.node_mut(child).parent = Some(parent);
        }
        if !children.is_empty() {
            self.bump();
        }
        true
    }

    /// Removes `id` from its parent's child list. The node itself survives,
    /// unattached, so existing handles stay resolvable.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        if let Some(el) = self.element_mut(parent) {
            el.children.retain(|&c| c != id);
        }
        self.node_mut(id).parent = None;
        self.bump();
    }

    /// Replaces `id` with a fresh text node at the same tree position.
    /// Returns the new text node, or `None` when `id` is unattached.
    pub fn replace_with_text(&mut self, id: NodeId, text: &str) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let position = self
            .element(parent)
            .and_then(|el| el.children.iter().position(|&c| c == id))?;
        let replacement = self.create_text(text);
        if let Some(el) = self.element_mut(parent) {
            el.children[position] = replacement;
        }
        self.node_mut(replacement).parent = Some(parent);
        self.node_mut(id).parent = None;
        self.bump();
        Some(replacement)
    }

    /// Detaches all current children of `parent` and appends `children`.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        let old = match self.element(parent) {
            Some(el) => el.children.clone(),
            None => return,
        };
        for child in old {
            self.node_mut(child).parent = None;
        }
        if let Some(el) = self.element_mut(parent) {
            el.children.clear();
        }
        for child in children {
            self.detach(child);
            if let Some(el) = self.element_mut(parent) {
                el.children.push(child);
            }
            self.node_mut(child).parent = Some(parent);
        }
        self.bump();
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(current) = &mut self.node_mut(id).data {
            if current != text {
                *current = text.to_string();
                self.bump();
            }
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn set_display(&mut self, id: NodeId, display: Display) {
        if let Some(el) = self.element_mut(id) {
            el.display_override = Some(display);
        }
    }

    pub fn set_title(&mut self, id: NodeId, title: &str) {
        if let Some(el) = self.element_mut(id) {
            el.title = Some(title.to_string());
        }
    }

    pub fn title_of(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(|el| el.title.as_deref())
    }

    pub fn set_href(&mut self, id: NodeId, href: &str) {
        if let Some(el) = self.element_mut(id) {
            el.href = Some(href.to_string());
        }
    }

    pub fn href_of(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(|el| el.href.as_deref())
    }

    /// Tie an overlay element (a tooltip popup) to the element it describes,
    /// so layout can place it next to its anchor.
    pub fn set_anchor(&mut self, id: NodeId, anchor: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.anchor = Some(anchor);
        }
    }

    pub fn anchor_of(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|el| el.anchor)
    }

    pub fn mark_unit(&mut self, id: NodeId, index: usize) {
        if let Some(el) = self.element_mut(id) {
            el.unit_index = Some(index);
        }
    }

    pub fn unit_index(&self, id: NodeId) -> Option<usize> {
        self.element(id).and_then(|el| el.unit_index)
    }

    pub fn is_unit(&self, id: NodeId) -> bool {
        self.unit_index(id).is_some()
    }

    pub fn set_focused(&mut self, id: NodeId, focused: bool) {
        if let Some(el) = self.element_mut(id) {
            el.focused = focused;
        }
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.focused)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn tag_of(&self, id: NodeId) -> Option<Tag> {
        self.element(id).map(|el| el.tag)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Text(_))
    }

    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Effective layout of an element: the per-node override when present,
    /// the tag default otherwise. Looked up fresh on every call.
    pub fn display_of(&self, id: NodeId) -> Display {
        match self.element(id) {
            Some(el) => el.display_override.unwrap_or_else(|| el.tag.default_display()),
            None => Display::Inline,
        }
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).data {
            NodeData::Element(el) => &el.children,
            NodeData::Text(_) => &[],
        }
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// All nodes under `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children_of(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Attached text nodes in document order.
    pub fn text_leaves(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.is_text(id))
            .collect()
    }

    /// Attached sentence-unit elements in document order.
    pub fn unit_elements(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.is_unit(id))
            .collect()
    }

    pub fn any_units(&self) -> bool {
        self.descendants(self.root).iter().any(|&id| self.is_unit(id))
    }

    /// Concatenated text of the subtree rooted at `id`, opaque containers
    /// included (the `textContent` analog).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                for &child in &el.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// The page's rendered text in document order: hidden subtrees are
    /// skipped and block boundaries become newlines (the `innerText`
    /// analog used for drift snapshots).
    pub fn rendered_text(&self) -> String {
        let mut out = String::new();
        self.collect_rendered(self.root, &mut out);
        out
    }

    fn collect_rendered(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                if el.tag.is_hidden() {
                    return;
                }
                let block = self.display_of(id) == Display::Block;
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for &child in &el.children {
                    self.collect_rendered(child, out);
                }
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    /// Bounded prefix of the rendered text, in characters. The staleness
    /// heuristic the drift poll compares against.
    pub fn snapshot(&self, limit: usize) -> String {
        self.rendered_text().chars().take(limit).collect()
    }

    // ------------------------------------------------------------------
    // Selection & cursor state
    // ------------------------------------------------------------------

    /// Extends the platform text selection over the contents of `id`.
    pub fn select_contents(&mut self, id: NodeId) {
        self.selection = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn set_cursor_hidden(&mut self, hidden: bool) {
        self.cursor_hidden = hidden;
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
