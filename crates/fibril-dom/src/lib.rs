//! # In-memory document
//!
//! `Document` is a small DOM-like host for `fibril-core`: element and text
//! nodes in a slotmap arena, with properties, listeners and parent/child
//! links. Every host call is appended to a mutation log (filtered by
//! `MutationKinds`), which makes it the host of choice for tests and
//! headless demos.
//!
//! ```rust
//! use fibril_core::*;
//! use fibril_dom::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("body");
//! let mut renderer = Renderer::new(doc);
//! renderer.render(element!("p", None, "hello"), root);
//! renderer.flush().unwrap();
//! assert_eq!(renderer.host().inner_html(root), "<p>hello</p>");
//! ```

mod html;
pub mod mutation;
pub mod tests;

use std::fmt;
use std::rc::Rc;

use fibril_core::{Callback, Host, NODE_VALUE, PropValue, TEXT_ELEMENT};
use slotmap::SlotMap;
use thiserror::Error;

pub use mutation::{Mutation, MutationKinds};

slotmap::new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("text node {0:?} cannot have children")]
    TextNodeChildren(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element(String),
    Text,
}

pub struct Node {
    pub kind: NodeKind,
    properties: Vec<(String, PropValue)>,
    listeners: Vec<(String, Callback)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Tag name, `None` for text nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Content of a text node.
    pub fn text(&self) -> Option<String> {
        if !self.is_text() {
            return None;
        }
        Some(
            self.property(NODE_VALUE)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        )
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.iter().filter(|(e, _)| e == event).count()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("properties", &self.properties)
            .field(
                "listeners",
                &self.listeners.iter().map(|(e, _)| e).collect::<Vec<_>>(),
            )
            .field("children", &self.children)
            .field("parent", &self.parent)
            .finish()
    }
}

pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    mutations: Vec<Mutation>,
    record: MutationKinds,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_recording(MutationKinds::all())
    }

    pub fn with_recording(record: MutationKinds) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            mutations: Vec::new(),
            record,
        }
    }

    pub fn set_recording(&mut self, record: MutationKinds) {
        self.record = record;
    }

    /// Detached element, typically a container to render into.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeKind::Element(tag.to_string()), tag)
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.insert(NodeKind::Text, TEXT_ELEMENT);
        self.nodes[id]
            .properties
            .push((NODE_VALUE.to_string(), PropValue::from(text)));
        id
    }

    fn insert(&mut self, kind: NodeKind, tag: &str) -> NodeId {
        let id = self.nodes.insert(Node::new(kind));
        self.push_mutation(Mutation::Create {
            node: id,
            tag: tag.to_string(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Nodes currently allocated, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// First node in preorder below `root` (inclusive) with the given tag.
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id)?;
            if node.tag() == Some(tag) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Concatenated text of all text nodes below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if let Some(text) = node.text() {
                out.push_str(&text);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        html::write_node(self, id, &mut out);
        out
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            html::write_node(self, child, &mut out);
        }
        out
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Invokes the listeners registered on `id` for `event`, in registration
    /// order. Returns how many ran.
    pub fn dispatch(&self, id: NodeId, event: &str) -> Result<usize, DomError> {
        let node = self.nodes.get(id).ok_or(DomError::UnknownNode(id))?;
        let listeners: Vec<Callback> = node
            .listeners
            .iter()
            .filter(|(e, _)| e == event)
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        log::debug!("dispatch {event} on {id:?}: {} listeners", listeners.len());
        for listener in &listeners {
            listener();
        }
        Ok(listeners.len())
    }

    fn push_mutation(&mut self, mutation: Mutation) {
        log::trace!("dom: {mutation:?}");
        if self.record.contains(mutation.kind()) {
            self.mutations.push(mutation);
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let p = self.nodes.get(parent).ok_or(DomError::UnknownNode(parent))?;
        if p.is_text() {
            return Err(DomError::TextNodeChildren(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(DomError::UnknownNode(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }
}

impl Host for Document {
    type Node = NodeId;
    type Error = DomError;

    fn create_node(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let kind = if tag == TEXT_ELEMENT {
            NodeKind::Text
        } else {
            NodeKind::Element(tag.to_string())
        };
        Ok(self.insert(kind, tag))
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), DomError> {
        let n = self.node_mut(*node)?;
        match n.properties.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value.clone(),
            None => n.properties.push((name.to_string(), value.clone())),
        }
        self.push_mutation(Mutation::SetProperty {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn clear_property(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.node_mut(*node)?.properties.retain(|(k, _)| k != name);
        self.push_mutation(Mutation::ClearProperty {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Callback,
    ) -> Result<(), DomError> {
        self.node_mut(*node)?
            .listeners
            .push((event.to_string(), Rc::clone(listener)));
        self.push_mutation(Mutation::AddListener {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn remove_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Callback,
    ) -> Result<(), DomError> {
        let n = self.node_mut(*node)?;
        if let Some(pos) = n
            .listeners
            .iter()
            .position(|(e, cb)| e == event && Rc::ptr_eq(cb, listener))
        {
            n.listeners.remove(pos);
        }
        self.push_mutation(Mutation::RemoveListener {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);
        self.check_attach(parent, child)?;
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.push_mutation(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        before: &NodeId,
    ) -> Result<(), DomError> {
        let (parent, child, before) = (*parent, *child, *before);
        self.check_attach(parent, child)?;
        if self.parent(before) != Some(parent) || before == child {
            return Err(DomError::NotAChild {
                parent,
                child: before,
            });
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent].children;
        let pos = siblings.iter().position(|c| *c == before).unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.nodes[child].parent = Some(parent);
        self.push_mutation(Mutation::InsertBefore {
            parent,
            child,
            before,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);
        let p = self.node_mut(parent)?;
        let Some(pos) = p.children.iter().position(|c| *c == child) else {
            return Err(DomError::NotAChild { parent, child });
        };
        p.children.remove(pos);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.push_mutation(Mutation::RemoveChild { parent, child });
        Ok(())
    }

    /// Frees `node` and everything below it.
    fn dispose(&mut self, node: &NodeId) {
        if !self.nodes.contains_key(*node) {
            return;
        }
        self.detach(*node);
        let mut stack = vec![*node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                stack.extend(n.children);
            }
        }
        self.push_mutation(Mutation::Dispose { node: *node });
    }
}
