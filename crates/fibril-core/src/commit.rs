use crate::element::{CHILDREN, Props, event_name, is_event};
use crate::fiber::{EffectTag, FiberId, FiberTree};
use crate::host::Host;

/// What the last pass did, for devtools and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Units of work performed since the pass was seeded.
    pub units: usize,
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
    /// Fibers of the previous generation released after commit.
    pub released: usize,
    /// Fibers alive in the arena once the commit finished.
    pub live_fibers: usize,
}

fn is_attribute(key: &str) -> bool {
    key != CHILDREN && !is_event(key)
}

/// Brings `node` from `prev` to `next`: stale listeners out, vanished
/// attributes cleared, new or changed attributes set, new listeners in.
pub(crate) fn update_dom<H: Host>(
    host: &mut H,
    node: &H::Node,
    prev: &Props,
    next: &Props,
) -> Result<(), H::Error> {
    for (key, value) in prev.iter().filter(|(k, _)| is_event(k)) {
        if next.get(key) == Some(value) {
            continue;
        }
        if let Some(listener) = value.as_listener() {
            host.remove_listener(node, &event_name(key), listener)?;
        }
    }

    for (key, _) in prev.iter().filter(|(k, _)| is_attribute(k)) {
        if !next.contains(key) {
            host.clear_property(node, key)?;
        }
    }

    for (key, value) in next.iter().filter(|(k, _)| is_attribute(k)) {
        if prev.get(key) != Some(value) {
            host.set_property(node, key, value)?;
        }
    }

    for (key, value) in next.iter().filter(|(k, _)| is_event(k)) {
        if prev.get(key) == Some(value) {
            continue;
        }
        if let Some(listener) = value.as_listener() {
            host.add_listener(node, &event_name(key), listener)?;
        }
    }

    Ok(())
}

/// Applies a finished work-in-progress tree: deletions first, then every
/// descendant of `root` in preorder. Runs to completion.
pub(crate) fn commit_root<H: Host>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    root: FiberId,
    deletions: &[FiberId],
    stats: &mut CommitStats,
) -> Result<(), H::Error> {
    for &id in deletions {
        commit_work(host, tree, id, stats)?;
    }
    for id in tree.descendants(root) {
        commit_work(host, tree, id, stats)?;
    }
    Ok(())
}

fn commit_work<H: Host>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    id: FiberId,
    stats: &mut CommitStats,
) -> Result<(), H::Error> {
    let Some(fiber) = tree.get(id) else {
        return Ok(());
    };
    let Some(dom_parent) = tree.dom_parent(id).and_then(|p| tree[p].dom.as_ref()) else {
        return Ok(());
    };

    match (fiber.effect, fiber.dom.as_ref()) {
        (Some(EffectTag::Placement), Some(dom)) => {
            log::trace!("commit: place {:?}", fiber.ty);
            match host_sibling(tree, id).and_then(|s| tree[s].dom.as_ref()) {
                Some(before) => host.insert_before(dom_parent, dom, before)?,
                None => host.append_child(dom_parent, dom)?,
            }
            stats.placements += 1;
        }
        (Some(EffectTag::Update), Some(dom)) => {
            if let Some(alternate) = fiber.alternate.and_then(|alt| tree.get(alt)) {
                update_dom(host, dom, &alternate.props, &fiber.props)?;
                stats.updates += 1;
            }
        }
        (Some(EffectTag::Deletion), _) => {
            commit_deletion(host, tree, id, dom_parent)?;
            stats.deletions += 1;
        }
        _ => {}
    }
    Ok(())
}

/// First fiber after `id` in host order whose node is already attached:
/// the nearest following sibling (looking through component fibers, which
/// own no node) that is not itself being placed. `None` means `id` goes
/// last under its host parent.
fn host_sibling<N>(tree: &FiberTree<N>, id: FiberId) -> Option<FiberId> {
    let mut node = id;
    'siblings: loop {
        while tree[node].sibling.is_none() {
            let parent = tree[node].parent?;
            if tree[parent].dom.is_some() {
                return None;
            }
            node = parent;
        }
        node = tree[node].sibling?;

        loop {
            let fiber = &tree[node];
            if fiber.effect == Some(EffectTag::Placement) {
                continue 'siblings;
            }
            if fiber.dom.is_some() {
                return Some(node);
            }
            match fiber.child {
                Some(child) => node = child,
                None => continue 'siblings,
            }
        }
    }
}

/// Removes the host node owned by `id`, or, for components, the one owned
/// by their first host descendant.
fn commit_deletion<H: Host>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    id: FiberId,
    dom_parent: &H::Node,
) -> Result<(), H::Error> {
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let fiber = &tree[current];
        if let Some(dom) = fiber.dom.as_ref() {
            log::trace!("commit: remove {:?}", fiber.ty);
            host.remove_child(dom_parent, dom)?;
            host.dispose(dom);
            return Ok(());
        }
        cursor = fiber.child;
    }
    Ok(())
}
