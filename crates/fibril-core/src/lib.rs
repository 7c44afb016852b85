//! # Elements, Fibers, and Commits
//!
//! Fibril renders an immutable element tree into a host surface
//! incrementally. There are four main pieces:
//!
//! - `Element`: immutable description of the UI, built with
//!   `create_element` / `element!`.
//! - `Renderer`: owns the fiber tree, performs one fiber per unit of work
//!   and commits once a pass is complete.
//! - `Host`: the rendering surface (node creation, properties, listeners,
//!   tree mutation). See `fibril-dom` for an in-memory one.
//! - `Hooks`: per-fiber state slots for components.
//!
//! ## Elements
//!
//! ```rust
//! use fibril_core::*;
//!
//! let el = element!(
//!     "div",
//!     Some(Props::new().set("id", "foo")),
//!     element!("a", None, "bar"),
//!     element!("b"),
//! );
//! assert_eq!(el.children().len(), 2);
//! ```
//!
//! Non-element children (strings, numbers, booleans) become `TEXT_ELEMENT`
//! elements carrying a `nodeValue` property; `None` children are empty
//! slots that keep their position.
//!
//! ## Passes
//!
//! `Renderer::render` seeds a pass. Nothing happens until the embedding
//! application calls `step` with a `Deadline`; each call performs units of
//! work until the deadline reports less than the yield threshold, then
//! returns `StepOutcome::Yielded`. The step that performs the last unit
//! also commits:
//!
//! ```rust,ignore
//! renderer.render(app, container);
//! loop {
//!     match renderer.step(&TimeSlice::new(Duration::from_millis(8)))? {
//!         StepOutcome::Yielded => continue,
//!         StepOutcome::Committed | StepOutcome::Idle => break,
//!     }
//! }
//! ```
//!
//! Fibers are diffed by position against the last committed tree: same type
//! keeps the host node (`Update`), a new or different type creates one
//! (`Placement`), and leftover old fibers are removed (`Deletion`). There
//! are no keys.
//!
//! ## State
//!
//! Components are plain functions taking a `Hooks` context. `use_state`
//! slots are order-based; their setters queue an action and request a new
//! pass from the last committed tree, which the next `step` picks up.

pub mod commit;
pub mod config;
pub mod deadline;
pub mod element;
pub mod error;
pub mod fiber;
pub mod hooks;
pub mod host;
pub mod prelude;
mod reconcile;
pub mod renderer;

pub use commit::*;
pub use config::*;
pub use deadline::*;
pub use element::*;
pub use error::*;
pub use fiber::*;
pub use hooks::*;
pub use host::*;
pub use renderer::*;
