use std::rc::Rc;

use smallvec::SmallVec;

use crate::commit::{self, CommitStats};
use crate::config::RendererConfig;
use crate::deadline::{Deadline, Unbounded};
use crate::element::{Component, Element, Props};
use crate::error::RenderError;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberTree, FiberType};
use crate::hooks::{Hooks, UpdateSignal};
use crate::host::Host;
use crate::reconcile::reconcile_children;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No pass in progress.
    Idle,
    /// The deadline ran out with units left; call `step` again.
    Yielded,
    /// The pass finished and was committed during this step.
    Committed,
}

/// One independent rendering session: the committed tree, the pass in
/// progress, and the host it commits to.
///
/// Work happens only inside [`Renderer::step`]; the embedding application
/// calls it from its idle callback or event loop.
pub struct Renderer<H: Host> {
    host: H,
    config: RendererConfig,
    tree: FiberTree<H::Node>,
    next_unit: Option<FiberId>,
    wip_root: Option<FiberId>,
    current_root: Option<FiberId>,
    deletions: Vec<FiberId>,
    updates: UpdateSignal,
    stats: CommitStats,
    last_commit: Option<CommitStats>,
}

impl<H: Host> Renderer<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RendererConfig::default())
    }

    pub fn with_config(host: H, config: RendererConfig) -> Self {
        Self {
            host,
            config,
            tree: FiberTree::new(),
            next_unit: None,
            wip_root: None,
            current_root: None,
            deletions: Vec::new(),
            updates: UpdateSignal::default(),
            stats: CommitStats::default(),
            last_commit: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn tree(&self) -> &FiberTree<H::Node> {
        &self.tree
    }

    /// Root of the last committed tree.
    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    /// Root of the pass in progress, if any.
    pub fn wip_root(&self) -> Option<FiberId> {
        self.wip_root
    }

    pub fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    /// Fibers tagged for deletion by the pass in progress.
    pub fn deletions(&self) -> &[FiberId] {
        &self.deletions
    }

    pub fn last_commit(&self) -> Option<&CommitStats> {
        self.last_commit.as_ref()
    }

    /// Whether a call to `step` would do anything.
    pub fn has_pending_work(&self) -> bool {
        self.wip_root.is_some() || (self.updates.is_requested() && self.current_root.is_some())
    }

    /// Seeds a new top-level pass rendering `element` into `container`.
    /// A pass still in progress is abandoned.
    pub fn render(&mut self, element: Element, container: H::Node) {
        // Queued state actions are picked up by this pass anyway.
        self.updates.take();
        let props = Rc::new(Props::from_children(vec![Some(element)]));
        log::debug!("render: seeding pass (alternate: {:?})", self.current_root);
        self.seed(Fiber::root(container, props, self.current_root));
    }

    /// Performs units of work until the deadline drops below the yield
    /// threshold, committing once none remain. At least one unit is
    /// performed per call when work is pending.
    pub fn step(&mut self, deadline: &impl Deadline) -> Result<StepOutcome, RenderError> {
        if self.updates.is_requested() {
            self.schedule_update();
        }

        let mut unit = self.next_unit;
        while let Some(id) = unit {
            self.next_unit = self.perform_unit_of_work(id)?;
            self.stats.units += 1;
            unit = self.next_unit;
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
        }

        if self.next_unit.is_some() {
            return Ok(StepOutcome::Yielded);
        }
        if self.wip_root.is_some() {
            self.commit_root()?;
            return Ok(StepOutcome::Committed);
        }
        Ok(StepOutcome::Idle)
    }

    /// Runs the pass in progress (and any update it triggers) to completion.
    pub fn flush(&mut self) -> Result<(), RenderError> {
        while self.step(&Unbounded)? != StepOutcome::Idle {}
        Ok(())
    }

    /// Re-renders from the last committed root after a state update.
    fn schedule_update(&mut self) {
        let Some(current) = self.current_root else {
            // Nothing committed yet; keep the request until there is.
            return;
        };
        self.updates.take();
        let (container, props) = {
            let root = &self.tree[current];
            (root.dom.clone(), Rc::clone(&root.props))
        };
        let Some(container) = container else {
            log::warn!("schedule_update: committed root has no container");
            return;
        };
        log::debug!("state update: seeding pass from committed root");
        self.seed(Fiber::root(container, props, Some(current)));
    }

    fn seed(&mut self, root: Fiber<H::Node>) {
        self.abandon_wip();
        let id = self.tree.insert(root);
        self.wip_root = Some(id);
        self.next_unit = Some(id);
        self.deletions.clear();
        self.stats = CommitStats::default();
    }

    /// Drops the pass in progress. Committed fibers it tagged for deletion
    /// are untagged; host nodes its placements created are disposed.
    fn abandon_wip(&mut self) {
        let Some(root) = self.wip_root.take() else {
            return;
        };
        self.next_unit = None;
        for id in self.deletions.drain(..) {
            if let Some(fiber) = self.tree.get_mut(id) {
                fiber.effect = None;
            }
        }

        let released = self.tree.release_subtree(root);
        let mut disposed = 0;
        if self.config.dispose_abandoned {
            for fiber in &released {
                if fiber.effect == Some(EffectTag::Placement)
                    && let Some(dom) = fiber.dom.as_ref()
                {
                    self.host.dispose(dom);
                    disposed += 1;
                }
            }
        }
        log::debug!(
            "abandoned pass: released {} fibers, disposed {} host nodes",
            released.len(),
            disposed
        );
    }

    fn perform_unit_of_work(&mut self, id: FiberId) -> Result<Option<FiberId>, RenderError> {
        let ty = self.tree[id].ty.clone();
        log::trace!("unit of work: {ty:?}");
        match ty {
            FiberType::Component(component) => self.update_component(id, component),
            FiberType::Host(_) | FiberType::Root => self.update_host(id)?,
        }
        Ok(self.tree.next_unit(id))
    }

    fn update_component(&mut self, id: FiberId, component: Component) {
        let fiber = &self.tree[id];
        let props = Rc::clone(&fiber.props);
        let previous: Option<SmallVec<[_; 2]>> = fiber
            .alternate
            .and_then(|alt| self.tree.get(alt))
            .map(|alt| alt.hooks.clone());

        let mut current = SmallVec::new();
        let child = {
            let mut hooks = Hooks::new(previous.as_deref(), &mut current, &self.updates);
            component.render(&mut hooks, &props)
        };
        self.tree[id].hooks = current;

        reconcile_children(&mut self.tree, id, &[Some(child)], &mut self.deletions);
    }

    fn update_host(&mut self, id: FiberId) -> Result<(), RenderError> {
        let props = Rc::clone(&self.tree[id].props);
        if self.tree[id].dom.is_none()
            && let FiberType::Host(tag) = self.tree[id].ty.clone()
        {
            let dom = self.create_dom(&tag, &props)?;
            self.tree[id].dom = Some(dom);
        }
        reconcile_children(&mut self.tree, id, props.children(), &mut self.deletions);
        Ok(())
    }

    /// New host node initialised against an empty baseline.
    fn create_dom(&mut self, tag: &str, props: &Props) -> Result<H::Node, RenderError> {
        let node = self.host.create_node(tag).map_err(RenderError::render)?;
        commit::update_dom(&mut self.host, &node, &Props::new(), props)
            .map_err(RenderError::render)?;
        Ok(node)
    }

    fn commit_root(&mut self) -> Result<(), RenderError> {
        let Some(root) = self.wip_root else {
            return Ok(());
        };
        commit::commit_root(
            &mut self.host,
            &self.tree,
            root,
            &self.deletions,
            &mut self.stats,
        )
        .map_err(RenderError::commit)?;

        // The previous generation (deleted fibers included) is no longer
        // needed once its props have been diffed.
        if let Some(previous) = self.current_root.replace(root) {
            self.stats.released = self.tree.release_subtree(previous).len();
        }
        self.wip_root = None;
        self.deletions.clear();
        for id in self.tree.descendants(root) {
            self.tree[id].alternate = None;
        }
        self.tree[root].alternate = None;

        self.stats.live_fibers = self.tree.len();
        log::debug!("commit: {:?}", self.stats);
        self.last_commit = Some(self.stats);
        Ok(())
    }
}
