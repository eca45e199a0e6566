use std::collections::{BTreeMap, HashMap};

use crate::selector::{SelectorGroups, parse_selector_groups};
use crate::{Error, Result};

// Deeply nested markup recurses once per level.
const RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// Handle to a node in a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    // Ordered so that dumps are stable.
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
}

impl Element {
    fn new(tag_name: String, attrs: BTreeMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        Self {
            tag_name,
            attrs,
            value,
            disabled,
        }
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }
}

/// In-memory document tree the page behaviors operate on.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    /// Appends a new element under `parent`.
    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<NodeId> {
        if !self.can_have_children(parent) {
            return Err(Error::Markup(format!(
                "{} cannot have children",
                self.node_label(parent)
            )));
        }
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect::<BTreeMap<_, _>>();
        let element = Element::new(tag_name.to_ascii_lowercase(), attrs);
        let id_attr = element.attrs.get("id").cloned();
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = id_attr.filter(|value| !value.is_empty()) {
            self.id_index.entry(id_attr).or_insert(id);
        }
        Ok(id)
    }

    pub fn create_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        if !self.can_have_children(parent) {
            return Err(Error::Markup(format!(
                "{} cannot have children",
                self.node_label(parent)
            )));
        }
        Ok(self.create_node(Some(parent), NodeType::Text(text.to_string())))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn expect_element_mut(&mut self, node_id: NodeId, what: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::TypeMismatch {
                selector: format!("node-{}", node_id.0),
                expected: "element".into(),
                actual: what.into(),
            })
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Returns the ancestors of `node_id`, nearest first.
    pub fn ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.parent(current);
        }
        out
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document | NodeType::Element(_) => {
                stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                    node.children
                        .iter()
                        .map(|child| self.text_content(*child))
                        .collect()
                })
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.element(node_id).ok_or_else(|| Error::TypeMismatch {
            selector: format!("node-{}", node_id.0),
            expected: "element".into(),
            actual: "value target".into(),
        })?;
        Ok(element.value.clone())
    }

    /// Sets the live form value. Like a script assignment, this does not
    /// touch the `value` attribute and fires no events.
    pub fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id, "value target")?;
        element.value = value.to_string();
        Ok(())
    }

    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    /// Reflects the `disabled` property onto the attribute the way a button's
    /// `disabled` setter does.
    pub fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        let element = self.expect_element_mut(node_id, "disabled target")?;
        element.disabled = disabled;
        if disabled {
            element.attrs.insert("disabled".into(), String::new());
        } else {
            element.attrs.remove("disabled");
        }
        Ok(())
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self.expect_element_mut(node_id, "setAttribute target")?;
        element.attrs.insert(lowered.clone(), value.to_string());
        match lowered.as_str() {
            "disabled" => element.disabled = true,
            "value" => element.value = value.to_string(),
            _ => {}
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self.expect_element_mut(node_id, "removeAttribute target")?;
        element.attrs.remove(&lowered);
        match lowered.as_str() {
            "disabled" => element.disabled = false,
            "value" => element.value.clear(),
            _ => {}
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let element = self.element(node_id).ok_or_else(|| Error::TypeMismatch {
            selector: format!("node-{}", node_id.0),
            expected: "element".into(),
            actual: "classList target".into(),
        })?;
        Ok(element.has_class(class_name))
    }

    pub fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id, "classList target")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id, "classList target")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    /// Flips `class_name` and returns whether it is now present.
    pub fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name)? {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    /// Adds every whitespace-separated token of `class_list`.
    pub fn class_add_all(&mut self, node_id: NodeId, class_list: &str) -> Result<()> {
        for class_name in class_list.split_whitespace() {
            self.class_add(node_id, class_name)?;
        }
        Ok(())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        if let Some(id) = groups.id_only() {
            return Ok(self.by_id(id).into_iter().collect());
        }
        Ok(self.match_descendants(self.root, &groups))
    }

    fn match_descendants(&self, root: NodeId, groups: &SelectorGroups) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        for child in self.children(root) {
            self.collect_elements_dfs(*child, &mut candidates);
        }
        candidates
            .into_iter()
            .filter(|candidate| groups.matches(self, *candidate))
            .collect()
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if !self.is_element(node_id) {
            return Ok(None);
        }
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups.matches(self, current) {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    fn can_have_children(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        )
    }

    fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id").filter(|id| !id.is_empty()) {
                    next.entry(id.clone()).or_insert(node);
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_element(node_id) {
            out.push(node_id);
        }
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
            for child in self.children(node_id) {
                self.collect_elements_dfs(*child, out);
            }
        });
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|id| *id == node_id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|id| self.is_element(*id))
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|id| *id == node_id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|id| self.is_element(*id))
    }

    /// Short label used in errors and logs: `#id`, or the tag name.
    pub fn node_label(&self, node_id: NodeId) -> String {
        if let Some(id) = self.attr(node_id, "id").filter(|id| !id.is_empty()) {
            return format!("#{id}");
        }
        self.tag_name(node_id)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node_id.0))
    }

    pub fn dump_node(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document => stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                node.children
                    .iter()
                    .map(|child| self.dump_node(*child))
                    .collect()
            }),
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in &element.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                if crate::html::is_void_tag(&element.tag_name) {
                    return out;
                }
                stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                    for child in &node.children {
                        out.push_str(&self.dump_node(*child));
                    }
                });
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
