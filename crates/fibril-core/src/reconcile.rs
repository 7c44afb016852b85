use std::rc::Rc;

use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberTree, FiberType};

/// Diffs the child slots in `elements` against the child chain of `wip`'s
/// alternate, position by position, and links the resulting fibers under
/// `wip`.
///
/// An old fiber is paired with the slot matching its recorded index, so an
/// empty slot (`None`) keeps later siblings in place. Old fibers that lose
/// their slot (empty, missing, or a different type) are tagged `Deletion`
/// and pushed to `deletions`; they stay in the old tree until the commit has
/// removed their host nodes.
pub(crate) fn reconcile_children<N: Clone>(
    tree: &mut FiberTree<N>,
    wip: FiberId,
    elements: &[Option<Element>],
    deletions: &mut Vec<FiberId>,
) {
    let mut old = tree[wip]
        .alternate
        .and_then(|alt| tree.get(alt))
        .and_then(|alt| alt.child);
    let mut prev: Option<FiberId> = None;
    let mut index = 0;

    tree[wip].child = None;

    while index < elements.len() || old.is_some() {
        let element = elements.get(index).and_then(Option::as_ref);
        let counterpart = old.filter(|&o| tree[o].index <= index);
        let same_type = match (counterpart, element) {
            (Some(o), Some(e)) => tree[o].ty.matches(e.ty()),
            _ => false,
        };

        let new_fiber = match (counterpart, element) {
            (Some(o), Some(e)) if same_type => {
                let ty = tree[o].ty.clone();
                let dom = tree[o].dom.clone();
                let mut fiber = Fiber::new(ty, Rc::clone(e.props()), wip, index);
                fiber.dom = dom;
                fiber.alternate = Some(o);
                fiber.effect = Some(EffectTag::Update);
                Some(tree.insert(fiber))
            }
            (_, Some(e)) => {
                let ty = FiberType::from(e.ty());
                let mut fiber = Fiber::new(ty, Rc::clone(e.props()), wip, index);
                fiber.effect = Some(EffectTag::Placement);
                Some(tree.insert(fiber))
            }
            (_, None) => None,
        };

        if let Some(o) = counterpart {
            if !same_type {
                tree[o].effect = Some(EffectTag::Deletion);
                deletions.push(o);
            }
            old = tree[o].sibling;
        }

        if let Some(new) = new_fiber {
            match prev {
                None => tree[wip].child = Some(new),
                Some(p) => tree[p].sibling = Some(new),
            }
            prev = Some(new);
        }

        index += 1;
    }
}
