//! Document - Headless element tree.
//!
//! Manages the lifecycle of element nodes:
//! - Generational arena with a free slot pool for O(1) reuse
//! - Attributes, class list, inline style and text per node
//! - Parent/child links in document order
//! - Document focus (`active_element`), scroll offset and viewport
//!
//! Widgets never own nodes. They hold [`NodeId`]s, and every accessor on a
//! stale id quietly returns `None` / `false`.

use crate::types::NodeId;

use super::selector::Selector;

// =============================================================================
// Node storage
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn put_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    fn has_raw(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }

    /// Reserialize `class` from the class list.
    fn sync_class(&mut self) {
        let value = self.classes.join(" ");
        self.put_attribute("class", value);
    }

    /// Reserialize `style` from the inline declarations.
    fn sync_style(&mut self) {
        let value = self
            .style
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.put_attribute("style", value);
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Default viewport, in CSS pixels.
pub const DEFAULT_VIEWPORT: (f32, f32) = (1024.0, 768.0);

/// Tags that take focus without a `tabindex`.
const NATIVE_FOCUSABLE: [&str; 5] = ["a", "button", "input", "select", "textarea"];

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    scroll_y: i64,
    viewport: (f32, f32),
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// New document with an `html` root and a `body` child.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
            active: None,
            scroll_y: 0,
            viewport: DEFAULT_VIEWPORT,
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        };

        // Reuse free slot or allocate new
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    /// Create an element with attributes and append it to `parent`.
    ///
    /// `class` and `style` attributes are split into the class list and
    /// inline style, like the HTML parser does.
    pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    /// Check whether a handle still resolves to a live node.
    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Detach `id` and release it with its whole subtree.
    ///
    /// Focus inside the subtree is dropped.
    pub fn remove(&mut self, id: NodeId) {
        if !self.exists(id) || id == self.root {
            return;
        }
        self.detach(id);

        // FIRST: release children (recursive!)
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else { continue };
            stack.extend(node.children.iter().copied());

            if self.active == Some(current) {
                self.active = None;
            }
            let slot = &mut self.slots[current.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Append `child` under `parent`, moving it if already attached.
    ///
    /// Refuses to create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else { return };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// `id` followed by its ancestors, nearest first.
    pub fn self_and_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.exists(id).then_some(id);
        std::iter::successors(start, move |&n| self.parent(n))
    }

    /// Inclusive, like `Node.contains`: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.self_and_ancestors(node).any(|n| n == ancestor)
    }

    /// Descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Every attached element in document order, root first.
    pub fn all_elements(&self) -> Vec<NodeId> {
        let mut out = vec![self.root];
        out.extend(self.descendants(self.root));
        out
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let node = self.node(id)?;
        node.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set a raw attribute. `class` and `style` also replace the class list
    /// and inline declarations they serialize.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        match name {
            "class" => {
                let classes = value.split_whitespace().map(str::to_string).collect();
                if let Some(node) = self.node_mut(id) {
                    node.classes = classes;
                }
            }
            "style" => {
                if let Some(node) = self.node_mut(id) {
                    node.style.clear();
                }
                for decl in value.split(';') {
                    if let Some((prop, val)) = decl.split_once(':') {
                        self.set_style(id, prop.trim(), val.trim());
                    }
                }
            }
            _ => {}
        }
        if let Some(node) = self.node_mut(id) {
            node.put_attribute(name, value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.retain(|(k, _)| k != name);
            match name {
                "class" => node.classes.clear(),
                "style" => node.style.clear(),
                _ => {}
            }
        }
    }

    /// First element in document order whose `name` attribute equals `value`.
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|&n| self.attribute(n, name) == Some(value))
    }

    /// Nearest of `id` and its ancestors carrying the `name` attribute.
    pub fn closest_with_attribute(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.self_and_ancestors(id).find(|&n| self.has_attribute(n, name))
    }

    /// First descendant of `id` carrying the `name` attribute.
    pub fn first_with_attribute(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.has_attribute(n, name))
    }

    // =========================================================================
    // Class list
    // =========================================================================

    pub fn classes(&self, id: NodeId) -> &[String] {
        self.node(id).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        if let Some(node) = self.node_mut(id) {
            node.classes.push(class.to_string());
            node.sync_class();
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|c| c != class);
            if node.has_raw("class") {
                node.sync_class();
            }
        }
    }

    // =========================================================================
    // Inline style
    // =========================================================================

    /// Inline style value, `""` when unset (like `element.style.prop`).
    pub fn style(&self, id: NodeId, property: &str) -> &str {
        self.node(id)
            .and_then(|n| n.style.iter().find(|(k, _)| k == property))
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Set an inline style property. An empty value removes it.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(node) = self.node_mut(id) else { return };
        if value.is_empty() {
            node.style.retain(|(k, _)| k != property);
            if node.has_raw("style") {
                node.sync_style();
            }
            return;
        }
        match node.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => node.style.push((property.to_string(), value.to_string())),
        }
        node.sync_style();
    }

    /// Inline pixel length (`"120px"`, `"120"`), if set and well-formed.
    pub fn style_px(&self, id: NodeId, property: &str) -> Option<f32> {
        let raw = self.style(id, property).trim();
        let number = raw.strip_suffix("px").unwrap_or(raw).trim();
        number.parse::<f32>().ok().filter(|v| v.is_finite())
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn text(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.text = text.to_string();
        }
    }

    // =========================================================================
    // Rendering & focusability
    // =========================================================================

    /// Rendered unless it or an ancestor is `display: none` or `hidden`.
    /// Detached subtrees are not rendered.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut top = None;
        for n in self.self_and_ancestors(id) {
            if self.style(n, "display") == "none" || self.has_attribute(n, "hidden") {
                return false;
            }
            top = Some(n);
        }
        top == Some(self.root)
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.has_attribute(id, "disabled")
    }

    /// Parsed `tabindex`, if present and numeric.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.attribute(id, "tabindex")?.trim().parse().ok()
    }

    /// Interactive without a `tabindex`: links with `href`, enabled
    /// form controls and buttons.
    pub fn is_natively_focusable(&self, id: NodeId) -> bool {
        match self.tag(id) {
            Some("a") => self.has_attribute(id, "href"),
            Some(tag) if NATIVE_FOCUSABLE.contains(&tag) => !self.is_disabled(id),
            _ => false,
        }
    }

    /// Whether `focus()` on this node would take effect.
    pub fn can_accept_focus(&self, id: NodeId) -> bool {
        if !self.is_rendered(id) || self.is_disabled(id) {
            return false;
        }
        self.is_natively_focusable(id) || self.tab_index(id).is_some()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&n| self.exists(n))
    }

    /// Move focus. Returns `false` (and leaves focus alone) when the node
    /// cannot accept focus.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.can_accept_focus(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    pub fn scroll_to(&mut self, y: i64) {
        self.scroll_y = y.max(0);
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width.max(0.0), height.max(0.0));
    }

    // =========================================================================
    // Selector queries
    // =========================================================================

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.exists(id) && selector.matches(self, id)
    }

    /// Nearest of `id` and its ancestors matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.self_and_ancestors(id).find(|&n| selector.matches(self, n))
    }

    /// First match in the whole document.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// All descendants of `scope` matching `selector`, document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
