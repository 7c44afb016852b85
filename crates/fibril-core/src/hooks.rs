//! # State hooks
//!
//! Components receive a [`Hooks`] context while they are evaluated. Hooks
//! are order-based: the Nth `use_state` call of a component always refers to
//! the Nth slot recorded on the same fiber during the previous commit.
//!
//! ```
//! use fibril_core::*;
//!
//! fn counter(hooks: &mut Hooks<'_>, _props: &Props) -> Element {
//!     let (count, set_count) = hooks.use_state(0i32);
//!     element!(
//!         "button",
//!         Some(Props::new().handler("onClick", move || set_count.update(|c| c + 1))),
//!         format!("Count: {count}"),
//!     )
//! }
//!
//! let app = element!(Component::new("Counter", counter), None);
//! assert!(matches!(app.ty(), ElementType::Component(_)));
//! ```
//!
//! Calling hooks conditionally breaks the slot order; the runtime panics when
//! it detects a slot that does not line up with the previous render.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

enum Action<T> {
    Replace(T),
    Update(Rc<dyn Fn(&T) -> T>),
}

impl<T: Clone> Action<T> {
    fn apply(&self, state: T) -> T {
        match self {
            Action::Replace(v) => v.clone(),
            Action::Update(f) => f(&state),
        }
    }
}

type ActionQueue<T> = RefCell<Vec<Action<T>>>;

/// A realized hook slot: its state and the actions queued against it.
///
/// Both halves are type-erased; `use_state` recovers the concrete type.
/// Queued actions are applied without draining, so a pass that gets
/// abandoned before commit does not lose them.
#[derive(Clone)]
pub(crate) struct Hook {
    state: Rc<dyn Any>,
    queue: Rc<dyn Any>,
}

/// Shared "re-render requested" flag between a renderer and its setters.
#[derive(Clone, Default)]
pub(crate) struct UpdateSignal(Rc<Cell<bool>>);

impl UpdateSignal {
    pub(crate) fn request(&self) {
        self.0.set(true);
    }

    pub(crate) fn take(&self) -> bool {
        self.0.replace(false)
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.0.get()
    }
}

/// Hook context of the component currently being evaluated.
pub struct Hooks<'a> {
    previous: Option<&'a [Hook]>,
    current: &'a mut SmallVec<[Hook; 2]>,
    index: usize,
    signal: &'a UpdateSignal,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        previous: Option<&'a [Hook]>,
        current: &'a mut SmallVec<[Hook; 2]>,
        signal: &'a UpdateSignal,
    ) -> Self {
        Self {
            previous,
            current,
            index: 0,
            signal,
        }
    }

    /// Returns the slot's current value and a setter for it.
    ///
    /// The baseline is the slot recorded at the same call index during the
    /// last commit (or `initial` on first render); actions queued through the
    /// setter since then are applied in submission order.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let index = self.index;
        let mut state = initial;

        if let Some(previous) = self.previous {
            let hook = previous.get(index).unwrap_or_else(|| {
                panic!(
                    "use_state: hook #{index} has no counterpart in the previous render \
                     ({} recorded); hooks must be called in the same order every render",
                    previous.len()
                )
            });
            state = (*hook.state)
                .downcast_ref::<T>()
                .unwrap_or_else(|| panic!("use_state: hook #{index} changed its state type"))
                .clone();
            if let Ok(queue) = Rc::clone(&hook.queue).downcast::<ActionQueue<T>>() {
                for action in queue.borrow().iter() {
                    state = action.apply(state);
                }
            }
        }

        let queue: Rc<ActionQueue<T>> = Rc::new(RefCell::new(Vec::new()));
        self.current.push(Hook {
            state: Rc::new(state.clone()),
            queue: queue.clone(),
        });
        self.index += 1;

        let setter = SetState {
            queue,
            signal: self.signal.clone(),
        };
        (state, setter)
    }

    /// Number of hooks called so far during this evaluation.
    pub fn len(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index == 0
    }
}

/// Updater returned by [`Hooks::use_state`]. Each call queues an action and
/// requests a new render pass seeded from the last committed tree.
pub struct SetState<T> {
    queue: Rc<ActionQueue<T>>,
    signal: UpdateSignal,
}

impl<T: 'static> SetState<T> {
    pub fn set(&self, value: T) {
        self.push(Action::Replace(value));
    }

    pub fn update(&self, f: impl Fn(&T) -> T + 'static) {
        self.push(Action::Update(Rc::new(f)));
    }

    fn push(&self, action: Action<T>) {
        self.queue.borrow_mut().push(action);
        self.signal.request();
        log::trace!(
            "SetState: queued action ({} pending)",
            self.queue.borrow().len()
        );
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            signal: self.signal.clone(),
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}
