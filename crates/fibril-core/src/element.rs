use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::hooks::Hooks;

/// Host tag reserved for text nodes.
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";
/// Property carrying a text node's content.
pub const NODE_VALUE: &str = "nodeValue";
/// Reserved property name; children live in [`Props::children`].
pub const CHILDREN: &str = "children";

const EVENT_PREFIX: &str = "on";

pub type Callback = Rc<dyn Fn()>;

/// Render function of a component: evaluated once per unit of work.
pub type RenderFn = fn(&mut Hooks<'_>, &Props) -> Element;

#[derive(Clone)]
pub enum PropValue {
    Str(Rc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Listener(Callback),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_listener(&self) -> Option<&Callback> {
        match self {
            PropValue::Listener(cb) => Some(cb),
            _ => None,
        }
    }
}

/// Scalars compare by value, listeners by identity.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Listener(a), PropValue::Listener(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => write!(f, "{s:?}"),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Listener(_) => write!(f, "<callback>"),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Listener(_) => f.write_str("<callback>"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(Rc::from(s))
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(Rc::from(s))
    }
}

impl From<Rc<str>> for PropValue {
    fn from(s: Rc<str>) -> Self {
        PropValue::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f32> for PropValue {
    fn from(x: f32) -> Self {
        PropValue::Float(x as f64)
    }
}

impl From<f64> for PropValue {
    fn from(x: f64) -> Self {
        PropValue::Float(x)
    }
}

impl From<Callback> for PropValue {
    fn from(cb: Callback) -> Self {
        PropValue::Listener(cb)
    }
}

macro_rules! int_prop_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PropValue {
                fn from(i: $t) -> Self {
                    PropValue::Int(i as i64)
                }
            }
        )*
    };
}

int_prop_value!(i8, i16, i32, i64, u8, u16, u32, usize);

/// Whether a property key names an event listener (`onClick`, `onInput`, ...).
pub fn is_event(key: &str) -> bool {
    key.starts_with(EVENT_PREFIX)
}

/// Event name for a listener key: `onClick` -> `click`.
pub fn event_name(key: &str) -> String {
    key.strip_prefix(EVENT_PREFIX).unwrap_or(key).to_lowercase()
}

/// Property bag of an element: named values in insertion order plus the
/// ordered child slots. An empty slot (`None`) still occupies its position.
#[derive(Clone, Default)]
pub struct Props {
    entries: SmallVec<[(Rc<str>, PropValue); 4]>,
    children: Vec<Option<Element>>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_children(children: Vec<Option<Element>>) -> Self {
        Props {
            entries: SmallVec::new(),
            children,
        }
    }

    pub fn set(mut self, name: impl Into<Rc<str>>, value: impl Into<PropValue>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    /// Attaches a listener under a full event key such as `"onClick"`.
    pub fn handler(self, key: impl Into<Rc<str>>, f: impl Fn() + 'static) -> Self {
        let key = key.into();
        debug_assert!(is_event(&key), "listener key `{key}` must start with `on`");
        let cb: Callback = Rc::new(f);
        self.set(key, cb)
    }

    fn insert(&mut self, name: Rc<str>, value: PropValue) {
        if &*name == CHILDREN {
            log::warn!("Props: `children` is reserved; pass children to create_element instead");
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Child slots in order; `None` marks an empty slot.
    pub fn children(&self) -> &[Option<Element>] {
        &self.children
    }

    /// Children actually present, skipping empty slots.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().flatten()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&k, v);
        }
        if !self.children.is_empty() {
            map.entry(&CHILDREN, &self.children);
        }
        map.finish()
    }
}

/// A function component. Identity is the render function's address, so two
/// `Component` values built from the same function have the same type.
#[derive(Clone, Copy)]
pub struct Component {
    name: &'static str,
    render: RenderFn,
}

impl Component {
    pub const fn new(name: &'static str, render: RenderFn) -> Self {
        Self { name, render }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn render(&self, hooks: &mut Hooks<'_>, props: &Props) -> Element {
        (self.render)(hooks, props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.render, other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

#[derive(Clone, PartialEq)]
pub enum ElementType {
    Host(Rc<str>),
    Component(Component),
}

impl ElementType {
    pub fn is_text(&self) -> bool {
        matches!(self, ElementType::Host(tag) if &**tag == TEXT_ELEMENT)
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Host(tag) => f.write_str(tag),
            ElementType::Component(c) => c.fmt(f),
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<Component> for ElementType {
    fn from(c: Component) -> Self {
        ElementType::Component(c)
    }
}

/// Immutable description of the UI at one tree position.
#[derive(Clone)]
pub struct Element {
    ty: ElementType,
    props: Rc<Props>,
}

impl Element {
    pub fn text(value: impl Into<PropValue>) -> Self {
        Element {
            ty: ElementType::from(TEXT_ELEMENT),
            props: Rc::new(Props::new().set(NODE_VALUE, value)),
        }
    }

    pub fn ty(&self) -> &ElementType {
        &self.ty
    }

    pub fn props(&self) -> &Rc<Props> {
        &self.props
    }

    pub fn children(&self) -> &[Option<Element>] {
        self.props.children()
    }

    pub fn is_text(&self) -> bool {
        self.ty.is_text()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.ty)
            .field("props", &*self.props)
            .finish()
    }
}

/// A child slot passed to [`create_element`]. Anything that is not already
/// an element becomes a text element; `None` is an empty slot that keeps its
/// position, so siblings after a conditional child are not shifted.
pub struct Child(Option<Element>);

impl Child {
    pub fn into_element(self) -> Option<Element> {
        self.0
    }
}

impl From<Element> for Child {
    fn from(e: Element) -> Self {
        Child(Some(e))
    }
}

impl From<Option<Element>> for Child {
    fn from(e: Option<Element>) -> Self {
        Child(e)
    }
}

macro_rules! text_child {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(v: $t) -> Self {
                    Child(Some(Element::text(v)))
                }
            }
        )*
    };
}

text_child!(&str, String, Rc<str>, bool, f32, f64, i8, i16, i32, i64, u8, u16, u32, usize);

/// Builds an element from a type, an optional property bag and children.
pub fn create_element<I>(ty: impl Into<ElementType>, props: Option<Props>, children: I) -> Element
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    let mut props = props.unwrap_or_default();
    props.children = children
        .into_iter()
        .map(|c| c.into().into_element())
        .collect();
    Element {
        ty: ty.into(),
        props: Rc::new(props),
    }
}

/// Variadic form of [`create_element`]:
///
/// ```
/// use fibril_core::{element, Props};
///
/// let el = element!(
///     "div",
///     Some(Props::new().set("id", "foo")),
///     element!("a", None, "bar"),
///     element!("b"),
/// );
/// assert_eq!(el.children().len(), 2);
/// let anchor = el.children()[0].as_ref().unwrap();
/// assert!(anchor.children()[0].as_ref().is_some_and(|t| t.is_text()));
/// ```
#[macro_export]
macro_rules! element {
    ($ty:expr) => {
        $crate::create_element($ty, None, ::std::vec::Vec::<$crate::Child>::new())
    };
    ($ty:expr, $props:expr $(, $child:expr)* $(,)?) => {{
        let children: ::std::vec::Vec<$crate::Child> = ::std::vec![$($crate::Child::from($child)),*];
        $crate::create_element($ty, $props, children)
    }};
}
