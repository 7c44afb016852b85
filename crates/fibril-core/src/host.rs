use crate::element::{Callback, PropValue};

/// The rendering surface the commit phase writes to.
///
/// Node creation and initial property application happen during units of
/// work; tree mutation (`append_child`/`insert_before`/`remove_child`) only
/// ever happens during commit.
pub trait Host {
    type Node: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// New, detached node for `tag`; a text node for `TEXT_ELEMENT`.
    fn create_node(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), Self::Error>;

    fn clear_property(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    fn add_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Callback,
    ) -> Result<(), Self::Error>;

    fn remove_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Callback,
    ) -> Result<(), Self::Error>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), Self::Error>;

    /// Attaches `child` under `parent` directly before `before`, which is
    /// already a child of `parent`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        before: &Self::Node,
    ) -> Result<(), Self::Error>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), Self::Error>;

    /// The runtime will not reference `node` again: it was removed by a
    /// deletion, or created by a pass that got superseded before commit.
    fn dispose(&mut self, _node: &Self::Node) {}
}
