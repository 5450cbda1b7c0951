//! Widget kinds and their message handlers.
//!
//! Every node in a [`Gui`](crate::Gui) tree is a [`Widget`]: the shared
//! [`Element`] state plus a [`WidgetKind`] carrying per-type state. Behaviour
//! lives in one handler function per kind. A handler recognizes the messages it
//! cares about and forwards everything else to a shared base handler, so a
//! checkbox falls back to the control state machine, which falls back to the
//! plain element behaviour:
//!
//! ```text
//! checkbox::handle -> control::handle -> element::handle -> Reply::Unhandled
//! ```
//!
//! Handlers never panic. A message that is not recognized at any level comes
//! back as [`Reply::Unhandled`].

pub mod button;
pub mod checkbox;
pub mod container;
pub mod control;
pub mod element;
pub mod list;
pub mod text;
pub mod textbox;
pub mod window;

use std::collections::BTreeMap;
use std::sync::Arc;

use plume_core::flags::class;
use plume_core::message::subtype;
use plume_core::{AbsRect, AbsVec, Backend, CRect, FontDesc, Message, MessageKind, NodeId, Reply, Transform};
use plume_style::{Style, StyleEntry};

use crate::gui::Gui;

pub use button::ButtonState;
pub use checkbox::CheckboxState;
pub use control::{ControlPhase, ControlState};
pub use list::ListState;
pub use text::TextState;
pub use textbox::TextboxState;
pub use window::WindowState;

/// How a widget came to be in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Created by the host application.
    #[default]
    User,
    /// Created by its parent's constructor, such as a checkbox's text.
    Internal,
    /// Created from a skin; removed when the parent's skin changes.
    Skin,
}

/// State shared by every widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub transform: Transform,
    pub flags: u32,
    /// Packed units of the transform's area and center.
    pub units: u16,
    pub margin: AbsRect,
    pub margin_units: u16,
    pub padding: AbsRect,
    pub padding_units: u16,
    pub alpha: f32,
    pub color: u32,
    pub edge_color: u32,
    pub outline: f32,
    pub asset: Option<Arc<str>>,
    pub uv: CRect,
    /// Minimum size; zero is unbounded.
    pub min_dim: AbsVec,
    /// Maximum size; negative is unbounded.
    pub max_dim: AbsVec,
    /// Layout order among siblings.
    pub order: i32,
    pub skin: Option<Arc<str>>,
    /// Current style mask.
    pub style: u32,
    /// Style blocks replayed when the style mask changes.
    pub styles: Vec<StyleEntry>,
    pub user_data: BTreeMap<String, String>,
    pub origin: Origin,
}

impl Element {
    pub fn new(transform: Transform, flags: u32) -> Self {
        Self {
            transform,
            flags,
            units: 0,
            margin: AbsRect::ZERO,
            margin_units: 0,
            padding: AbsRect::ZERO,
            padding_units: 0,
            alpha: 1.0,
            color: 0,
            edge_color: 0,
            outline: 0.0,
            asset: None,
            uv: CRect::FILL,
            min_dim: AbsVec::new(0.0, 0.0),
            max_dim: AbsVec::new(-1.0, -1.0),
            order: 0,
            skin: None,
            style: 0,
            styles: Vec::new(),
            user_data: BTreeMap::new(),
            origin: Origin::User,
        }
    }

    /// True if every bit of `flag` is set.
    pub fn has(&self, flag: u32) -> bool {
        plume_core::flags::has(self.flags, flag)
    }
}

/// Widget class tags, one per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetClass {
    Element,
    Text,
    Control,
    Button,
    Checkbox,
    Textbox,
    Container,
    Window,
    List,
}

impl WidgetClass {
    pub const ALL: [WidgetClass; 9] = [
        Self::Element,
        Self::Text,
        Self::Control,
        Self::Button,
        Self::Checkbox,
        Self::Textbox,
        Self::Container,
        Self::Window,
        Self::List,
    ];

    /// Look a class up by its name, as used in skin files.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Element => class::ELEMENT,
            Self::Text => class::TEXT,
            Self::Control => class::CONTROL,
            Self::Button => class::BUTTON,
            Self::Checkbox => class::CHECKBOX,
            Self::Textbox => class::TEXTBOX,
            Self::Container => class::CONTAINER,
            Self::Window => class::WINDOW,
            Self::List => class::LIST,
        }
    }
}

/// Per-type widget state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Element,
    Text(TextState),
    Control(ControlState),
    Button(ButtonState),
    Checkbox(CheckboxState),
    Textbox(TextboxState),
    Container,
    Window(WindowState),
    List(ListState),
}

impl WidgetKind {
    /// Fresh state for a class.
    pub fn new(class: WidgetClass) -> Self {
        match class {
            WidgetClass::Element => Self::Element,
            WidgetClass::Text => Self::Text(TextState::default()),
            WidgetClass::Control => Self::Control(ControlState::default()),
            WidgetClass::Button => Self::Button(ButtonState::default()),
            WidgetClass::Checkbox => Self::Checkbox(CheckboxState::default()),
            WidgetClass::Textbox => Self::Textbox(TextboxState::default()),
            WidgetClass::Container => Self::Container,
            WidgetClass::Window => Self::Window(WindowState::default()),
            WidgetClass::List => Self::List(ListState::default()),
        }
    }

    pub fn class(&self) -> WidgetClass {
        match self {
            Self::Element => WidgetClass::Element,
            Self::Text(_) => WidgetClass::Text,
            Self::Control(_) => WidgetClass::Control,
            Self::Button(_) => WidgetClass::Button,
            Self::Checkbox(_) => WidgetClass::Checkbox,
            Self::Textbox(_) => WidgetClass::Textbox,
            Self::Container => WidgetClass::Container,
            Self::Window(_) => WidgetClass::Window,
            Self::List(_) => WidgetClass::List,
        }
    }

    /// The control state machine embedded in this kind, if any.
    pub fn control(&self) -> Option<&ControlState> {
        match self {
            Self::Control(c) => Some(c),
            Self::Button(b) => Some(&b.control),
            Self::Checkbox(c) => Some(&c.control),
            Self::Textbox(t) => Some(&t.control),
            Self::Window(w) => Some(&w.control),
            _ => None,
        }
    }

    pub fn control_mut(&mut self) -> Option<&mut ControlState> {
        match self {
            Self::Control(c) => Some(c),
            Self::Button(b) => Some(&mut b.control),
            Self::Checkbox(c) => Some(&mut c.control),
            Self::Textbox(t) => Some(&mut t.control),
            Self::Window(w) => Some(&mut w.control),
            _ => None,
        }
    }
}

/// A node of the widget tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub element: Element,
    pub kind: WidgetKind,
}

impl Widget {
    pub fn new(class: WidgetClass, transform: Transform, flags: u32) -> Self {
        Self {
            element: Element::new(transform, flags),
            kind: WidgetKind::new(class),
        }
    }

    pub fn class(&self) -> WidgetClass {
        self.kind.class()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class().name()
    }
}

/// Deliver a message to the handler of `id`'s kind.
pub(crate) fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(class) = gui.tree.get(id).map(Widget::class) else {
        return Reply::Unhandled;
    };
    match class {
        WidgetClass::Element => element::handle(gui, id, message),
        WidgetClass::Text => text::handle(gui, id, message),
        WidgetClass::Control => control::handle(gui, id, message),
        WidgetClass::Button => button::handle(gui, id, message),
        WidgetClass::Checkbox => checkbox::handle(gui, id, message),
        WidgetClass::Textbox => textbox::handle(gui, id, message),
        WidgetClass::Container => container::handle(gui, id, message),
        WidgetClass::Window => window::handle(gui, id, message),
        WidgetClass::List => list::handle(gui, id, message),
    }
}

/// True for messages a widget with a text sub-widget forwards to it.
///
/// Colors are among them, so a labelled widget has no fill of its own; skins
/// give it one with a background child element.
pub(crate) fn is_text_message(message: &Message) -> bool {
    use plume_core::MessageKind::*;
    matches!(
        message.kind,
        SetText
            | GetText
            | SetFont
            | GetFont
            | SetColor
            | GetColor
            | SetLineHeight
            | GetLineHeight
            | SetLetterSpacing
            | GetLetterSpacing
    )
}

/// The style messages that recreate a widget's current state.
///
/// Only values that differ from a fresh widget are included. Text and colors
/// held by a label or caption child are reported as the widget's own, since
/// replaying them on the widget forwards them back to that child.
pub(crate) fn snapshot<B: Backend>(gui: &Gui<B>, id: NodeId) -> Style {
    let mut style = Style::new();
    let Some(widget) = gui.widget(id) else {
        return style;
    };
    let e = &widget.element;
    let fresh = Element::new(e.transform, e.flags);

    if let Some(skin) = &e.skin {
        style.push(Message::text(MessageKind::SetSkin, Arc::clone(skin)));
    }
    if e.alpha != fresh.alpha {
        style.push(Message::float(MessageKind::SetAlpha, e.alpha));
    }
    if e.margin != fresh.margin {
        style.push(Message::rect(MessageKind::SetMargin, e.margin).with_subtype(e.margin_units));
    }
    if e.padding != fresh.padding {
        style.push(Message::rect(MessageKind::SetPadding, e.padding).with_subtype(e.padding_units));
    }
    // Widgets that show text route colors to it, leaving these at zero.
    if e.color != 0 {
        style.push(Message::color(subtype::COLOR_MAIN, e.color));
    }
    if e.edge_color != 0 {
        style.push(Message::color(subtype::COLOR_EDGE, e.edge_color));
    }
    if e.outline != fresh.outline {
        style.push(Message::float(MessageKind::SetOutline, e.outline));
    }
    if let Some(asset) = &e.asset {
        style.push(Message::text(MessageKind::SetAsset, Arc::clone(asset)));
    }
    if e.uv != fresh.uv {
        style.push(Message::crect(MessageKind::SetUv, e.uv));
    }
    if e.max_dim != fresh.max_dim {
        style.push(Message::floats(MessageKind::SetDim, e.max_dim.x, e.max_dim.y).with_subtype(subtype::DIM_MAX));
    }
    if e.min_dim != fresh.min_dim {
        style.push(Message::floats(MessageKind::SetDim, e.min_dim.x, e.min_dim.y).with_subtype(subtype::DIM_MIN));
    }
    for (key, value) in &e.user_data {
        style.push(Message::user_data(key.as_str(), value.as_str()));
    }

    if let Some(text) = text_state(gui, id) {
        if !text.text.is_empty() {
            style.push(Message::text(MessageKind::SetText, Arc::clone(&text.text)));
        }
        if !text.placeholder.is_empty() {
            style.push(Message::text(MessageKind::SetText, Arc::clone(&text.placeholder)).with_subtype(subtype::TEXT_PLACEHOLDER));
        }
        if let Some(font) = &text.font {
            style.push(Message::font(MessageKind::SetFont, FontDesc::clone(font)));
        }
        for (slot, &argb) in text.colors.iter().enumerate() {
            if argb != 0 {
                style.push(Message::color(slot as u16, argb));
            }
        }
        if text.line_height != 0.0 {
            style.push(Message::float(MessageKind::SetLineHeight, text.line_height));
        }
        if text.letter_spacing != 0.0 {
            style.push(Message::float(MessageKind::SetLetterSpacing, text.letter_spacing));
        }
    }

    match &widget.kind {
        WidgetKind::Textbox(state) => {
            if let Some(mask) = state.mask {
                style.push(Message::text(MessageKind::SetText, String::from(mask)).with_subtype(subtype::TEXT_MASK));
            }
        }
        WidgetKind::Checkbox(state) if state.value != 0 => {
            style.push(Message::int(MessageKind::SetValue, i64::from(state.value)).with_subtype(subtype::VALUE_INT));
        }
        WidgetKind::List(ListState { selected: Some(index) }) => {
            style.push(Message::int(MessageKind::SetValue, *index as i64).with_subtype(subtype::VALUE_INT));
        }
        _ => {}
    }
    style
}

/// The text state shown by a widget: its own, or its label's.
fn text_state<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<&TextState> {
    let label = match &gui.widget(id)?.kind {
        WidgetKind::Text(state) => return Some(state),
        WidgetKind::Textbox(state) => return Some(&state.text),
        WidgetKind::Button(state) => state.text,
        WidgetKind::Checkbox(state) => state.text,
        WidgetKind::Window(state) => state.caption,
        _ => None,
    }?;
    match &gui.widget(label)?.kind {
        WidgetKind::Text(state) => Some(state),
        _ => None,
    }
}
