pub use crate::commit::CommitStats;
pub use crate::config::RendererConfig;
pub use crate::deadline::{Deadline, TimeSlice, Unbounded};
pub use crate::element::{
    Callback, Child, Component, Element, ElementType, NODE_VALUE, PropValue, Props, TEXT_ELEMENT,
    create_element,
};
pub use crate::element;
pub use crate::error::{Phase, RenderError};
pub use crate::fiber::{EffectTag, FiberId, FiberTree, FiberType};
pub use crate::hooks::{Hooks, SetState};
pub use crate::host::Host;
pub use crate::renderer::{Renderer, StepOutcome};
