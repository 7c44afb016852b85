use std::fmt::Write;

use serde::Serialize;
use web_time::Instant;

use fibril_core::{CommitStats, FiberId, FiberType, Host, Renderer, StepOutcome};

pub mod tests;

/// Commit counter with a smoothed commits-per-second rate.
pub struct Hud {
    pub enabled: bool,
    commit_count: u64,
    last_commit: Option<Instant>,
    rate_smooth: f32,
    pub stats: Option<CommitStats>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            enabled: false,
            commit_count: 0,
            last_commit: None,
            rate_smooth: 0.0,
            stats: None,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn record(&mut self, stats: CommitStats) {
        self.record_at(stats, Instant::now());
    }

    pub fn record_at(&mut self, stats: CommitStats, now: Instant) {
        self.commit_count += 1;
        if let Some(prev) = self.last_commit.replace(now) {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let rate = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.rate_smooth = if self.rate_smooth == 0.0 {
                    rate
                } else {
                    (1.0 - a) * self.rate_smooth + a * rate
                };
            }
        }
        self.stats = Some(stats);
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn commits_per_second(&self) -> f32 {
        self.rate_smooth
    }

    pub fn status_line(&self) -> String {
        let mut lines = vec![
            format!("commit: {}", self.commit_count),
            format!("rate: {:.1}/s", self.rate_smooth),
        ];
        if let Some(s) = &self.stats {
            lines.push(format!("units: {}", s.units));
            lines.push(format!(
                "+{} ~{} -{}",
                s.placements, s.updates, s.deletions
            ));
            lines.push(format!("fibers: {}", s.live_fibers));
        }
        lines.join("  |  ")
    }
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    /// Feeds the outcome of a `step` call; commits are recorded and, with
    /// the HUD enabled, logged together with the committed tree.
    pub fn observe<H: Host>(&mut self, outcome: StepOutcome, renderer: &Renderer<H>) {
        if outcome != StepOutcome::Committed {
            return;
        }
        let Some(stats) = renderer.last_commit() else {
            return;
        };
        self.hud.record(*stats);
        if self.hud.enabled {
            log::info!("{}", self.hud.status_line());
            log::debug!("committed tree:\n{}", dump_tree(renderer));
        }
    }
}

fn label<H: Host>(renderer: &Renderer<H>, id: FiberId) -> String {
    let fiber = &renderer.tree()[id];
    let mut out = String::new();
    match fiber.ty() {
        FiberType::Root => out.push_str("#root"),
        ty if ty.is_text() => {
            let _ = write!(out, "{:?}", fiber.text().unwrap_or_default());
        }
        FiberType::Host(tag) => {
            let _ = write!(out, "<{tag}");
            for (name, value) in fiber.props().iter() {
                let _ = write!(out, " {name}={value:?}");
            }
            out.push('>');
        }
        FiberType::Component(c) => {
            let _ = write!(out, "{} hooks={}", c.name(), fiber.hook_count());
        }
    }
    if let Some(effect) = fiber.effect() {
        let _ = write!(out, " [{effect:?}]");
    }
    out
}

/// Indented outline of the committed fiber tree, one fiber per line,
/// suffixed with the effect tag it carried in the last commit.
pub fn dump_tree<H: Host>(renderer: &Renderer<H>) -> String {
    let Some(root) = renderer.current_root() else {
        return "<nothing committed>".to_string();
    };
    let mut lines = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        lines.push(format!("{}{}", "  ".repeat(depth), label(renderer, id)));
        let children: Vec<_> = renderer.tree().children(id).collect();
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
    lines.join("\n")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FiberKind {
    Root,
    Host,
    Text,
    Component,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropSnapshot {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FiberSnapshot {
    pub kind: FiberKind,
    /// Tag, component name, or the content of a text fiber.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<PropSnapshot>,
    #[serde(skip_serializing_if = "is_zero")]
    pub hooks: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FiberSnapshot>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[derive(Clone, Debug, Serialize)]
pub struct CommitSnapshot {
    pub units: usize,
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
    pub released: usize,
    pub live_fibers: usize,
}

impl From<&CommitStats> for CommitSnapshot {
    fn from(s: &CommitStats) -> Self {
        Self {
            units: s.units,
            placements: s.placements,
            updates: s.updates,
            deletions: s.deletions,
            released: s.released,
            live_fibers: s.live_fibers,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TreeSnapshot {
    pub root: Option<FiberSnapshot>,
    pub live_fibers: usize,
    pub pending_work: bool,
    pub last_commit: Option<CommitSnapshot>,
}

impl TreeSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn snapshot_fiber<H: Host>(renderer: &Renderer<H>, id: FiberId) -> FiberSnapshot {
    let fiber = &renderer.tree()[id];
    let (kind, name) = match fiber.ty() {
        FiberType::Root => (FiberKind::Root, "#root".to_string()),
        ty if ty.is_text() => (FiberKind::Text, fiber.text().unwrap_or_default()),
        FiberType::Host(tag) => (FiberKind::Host, tag.to_string()),
        FiberType::Component(c) => (FiberKind::Component, c.name().to_string()),
    };
    let props = if kind == FiberKind::Host {
        fiber
            .props()
            .iter()
            .map(|(name, value)| PropSnapshot {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect()
    } else {
        Vec::new()
    };
    FiberSnapshot {
        kind,
        name,
        effect: fiber.effect().map(|e| format!("{e:?}")),
        props,
        hooks: fiber.hook_count(),
        children: renderer
            .tree()
            .children(id)
            .map(|c| snapshot_fiber(renderer, c))
            .collect(),
    }
}

/// Serialisable picture of the committed tree and the last commit.
pub fn snapshot<H: Host>(renderer: &Renderer<H>) -> TreeSnapshot {
    TreeSnapshot {
        root: renderer.current_root().map(|id| snapshot_fiber(renderer, id)),
        live_fibers: renderer.tree().len(),
        pending_work: renderer.has_pending_work(),
        last_commit: renderer.last_commit().map(CommitSnapshot::from),
    }
}
