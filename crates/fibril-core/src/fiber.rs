use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::element::{Component, ElementType, NODE_VALUE, Props, TEXT_ELEMENT};
use crate::hooks::Hook;

slotmap::new_key_type! {
    /// Arena key of a fiber. Keys of released fibers never resolve again.
    pub struct FiberId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectTag {
    Placement,
    Update,
    Deletion,
}

#[derive(Clone, PartialEq)]
pub enum FiberType {
    /// Top of a pass; its dom is the container handed to `render`.
    Root,
    Host(Rc<str>),
    Component(Component),
}

impl FiberType {
    pub fn matches(&self, ty: &ElementType) -> bool {
        match (self, ty) {
            (FiberType::Host(a), ElementType::Host(b)) => a == b,
            (FiberType::Component(a), ElementType::Component(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FiberType::Host(tag) if &**tag == TEXT_ELEMENT)
    }
}

impl From<&ElementType> for FiberType {
    fn from(ty: &ElementType) -> Self {
        match ty {
            ElementType::Host(tag) => FiberType::Host(tag.clone()),
            ElementType::Component(c) => FiberType::Component(*c),
        }
    }
}

impl fmt::Debug for FiberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiberType::Root => f.write_str("#root"),
            FiberType::Host(tag) => f.write_str(tag),
            FiberType::Component(c) => c.fmt(f),
        }
    }
}

/// One tree position for one render pass.
pub struct Fiber<N> {
    pub(crate) ty: FiberType,
    pub(crate) props: Rc<Props>,
    pub(crate) dom: Option<N>,
    pub(crate) parent: Option<FiberId>,
    pub(crate) child: Option<FiberId>,
    pub(crate) sibling: Option<FiberId>,
    pub(crate) alternate: Option<FiberId>,
    pub(crate) effect: Option<EffectTag>,
    pub(crate) hooks: SmallVec<[Hook; 2]>,
    /// Slot position among the parent's children, empty slots included.
    pub(crate) index: usize,
}

impl<N> Fiber<N> {
    pub(crate) fn root(container: N, props: Rc<Props>, alternate: Option<FiberId>) -> Self {
        Fiber {
            ty: FiberType::Root,
            props,
            dom: Some(container),
            parent: None,
            child: None,
            sibling: None,
            alternate,
            effect: None,
            hooks: SmallVec::new(),
            index: 0,
        }
    }

    pub(crate) fn new(ty: FiberType, props: Rc<Props>, parent: FiberId, index: usize) -> Self {
        Fiber {
            ty,
            props,
            dom: None,
            parent: Some(parent),
            child: None,
            sibling: None,
            alternate: None,
            effect: None,
            hooks: SmallVec::new(),
            index,
        }
    }

    pub fn ty(&self) -> &FiberType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn dom(&self) -> Option<&N> {
        self.dom.as_ref()
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    pub fn effect(&self) -> Option<EffectTag> {
        self.effect
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Text content for `TEXT_ELEMENT` fibers.
    pub fn text(&self) -> Option<String> {
        if !self.ty.is_text() {
            return None;
        }
        self.props.get(NODE_VALUE).map(|v| v.to_string())
    }
}

impl<N: fmt::Debug> fmt::Debug for Fiber<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("type", &self.ty)
            .field("dom", &self.dom)
            .field("effect", &self.effect)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .field("sibling", &self.sibling)
            .field("alternate", &self.alternate)
            .field("index", &self.index)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Arena holding every live fiber: the committed tree and, while a pass is
/// in progress, the work-in-progress tree.
pub struct FiberTree<N> {
    fibers: SlotMap<FiberId, Fiber<N>>,
}

impl<N> Default for FiberTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FiberTree<N> {
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
        }
    }

    pub(crate) fn insert(&mut self, fiber: Fiber<N>) -> FiberId {
        self.fibers.insert(fiber)
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.fibers.get_mut(id)
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Children of `id` in sibling-chain order.
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        Children {
            tree: self,
            next: self.get(id).and_then(|f| f.child),
        }
    }

    /// Depth-first successor of `id`: its child, else the sibling of the
    /// nearest ancestor-or-self that has one.
    pub fn next_unit(&self, id: FiberId) -> Option<FiberId> {
        let fiber = self.get(id)?;
        if fiber.child.is_some() {
            return fiber.child;
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if fiber.sibling.is_some() {
                return fiber.sibling;
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Nearest proper ancestor of `id` that owns a host node.
    pub fn dom_parent(&self, id: FiberId) -> Option<FiberId> {
        let mut cursor = self.get(id)?.parent;
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if fiber.dom.is_some() {
                return Some(current);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Every descendant of `root` (not `root` itself) in preorder: a fiber,
    /// then its child subtree, then its following siblings.
    pub fn descendants(&self, root: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        let mut stack: Vec<FiberId> = self.get(root).and_then(|f| f.child).into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(fiber) = self.get(id) else { continue };
            out.push(id);
            if let Some(sibling) = fiber.sibling {
                stack.push(sibling);
            }
            if let Some(child) = fiber.child {
                stack.push(child);
            }
        }
        out
    }

    /// Removes `root` and all its descendants, returning them.
    pub(crate) fn release_subtree(&mut self, root: FiberId) -> Vec<Fiber<N>> {
        let mut ids = self.descendants(root);
        ids.push(root);
        ids.into_iter()
            .filter_map(|id| self.fibers.remove(id))
            .collect()
    }
}

impl<N> Index<FiberId> for FiberTree<N> {
    type Output = Fiber<N>;

    fn index(&self, id: FiberId) -> &Fiber<N> {
        &self.fibers[id]
    }
}

impl<N> IndexMut<FiberId> for FiberTree<N> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<N> {
        &mut self.fibers[id]
    }
}

pub struct Children<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|f| f.sibling);
        Some(id)
    }
}
