//! The message protocol.
//!
//! Every interaction with a widget, whether it comes from platform input, from
//! another widget, or from a style being replayed, is a [`Message`] delivered
//! through a single dispatch entry point. A message is a small value type: an
//! operation code, a subtype, and one tagged [`Payload`]. Replies come back as a
//! [`Reply`], where [`Reply::Unhandled`] is the "not recognized" sentinel.

use std::collections::BTreeMap;
use std::sync::Arc;

use static_assertions::const_assert;

use crate::coord::{AbsRect, AbsVec, CRect};

/// Operation codes understood by widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MessageKind {
    /// Sent once after a node is inserted into the tree.
    Construct,
    /// Sent once before a node is removed, children first.
    Destroy,
    /// Draw the element into the resolved rectangle carried by the payload.
    Draw,
    /// Re-run layout of the element's children.
    Layout,

    MouseDown,
    MouseUp,
    MouseMove,
    MouseScroll,
    MouseLeave,
    MouseDoubleClick,
    KeyDown,
    KeyUp,
    KeyChar,
    GotFocus,
    LostFocus,

    /// Control state machine notifications.
    Neutral,
    Hover,
    Active,
    /// A completed click.
    Action,

    SetState,
    GetState,
    SetValue,
    GetValue,
    SetRange,
    GetRange,
    SetText,
    GetText,
    SetFont,
    GetFont,
    SetColor,
    GetColor,
    SetLineHeight,
    GetLineHeight,
    SetLetterSpacing,
    GetLetterSpacing,

    SetFlag,
    SetFlags,
    GetFlags,
    SetArea,
    GetArea,
    SetTransform,
    SetMargin,
    GetMargin,
    SetPadding,
    GetPadding,
    SetAlpha,
    GetAlpha,
    SetDim,
    GetDim,
    SetUv,
    SetAsset,
    SetOutline,
    SetUserData,
    GetUserData,
    SetSkin,
    GetSkin,
    SetStyle,
    GetStyle,
    GetClassName,
}

impl MessageKind {
    /// True for raw mouse input kinds.
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            Self::MouseDown
                | Self::MouseUp
                | Self::MouseMove
                | Self::MouseScroll
                | Self::MouseLeave
                | Self::MouseDoubleClick
        )
    }

    /// True for raw keyboard input kinds.
    pub fn is_key(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp | Self::KeyChar)
    }
}

/// Subtype constants, interpreted per [`MessageKind`].
pub mod subtype {
    /// `SetText`/`GetText`: the regular text.
    pub const TEXT: u16 = 0;
    /// `SetText`/`GetText`: the placeholder text shown when empty.
    pub const TEXT_PLACEHOLDER: u16 = 1;
    /// `SetText`/`GetText`: the mask character of a textbox, empty for none.
    pub const TEXT_MASK: u16 = 2;

    /// `SetValue`/`GetValue`: integer payload.
    pub const VALUE_INT: u16 = 0;
    /// `SetValue`/`GetValue`: float payload.
    pub const VALUE_FLOAT: u16 = 1;

    /// `SetDim`: maximum dimensions.
    pub const DIM_MAX: u16 = 0;
    /// `SetDim`: minimum dimensions.
    pub const DIM_MIN: u16 = 1;
    /// `GetDim`: measured size of the element's text.
    pub const DIM_TEXT: u16 = 2;

    /// `SetTransform`: rotation in radians, as a float.
    pub const TRANSFORM_ROTATION: u16 = 0;
    /// `SetTransform`: rotation center, carried in the left and top edges of a
    /// relative rectangle.
    pub const TRANSFORM_CENTER: u16 = 1;

    /// `SetColor`/`GetColor` slots.
    pub const COLOR_MAIN: u16 = 0;
    pub const COLOR_PLACEHOLDER: u16 = 1;
    pub const COLOR_CURSOR: u16 = 2;
    pub const COLOR_SELECT: u16 = 3;
    pub const COLOR_HOVER: u16 = 4;
    pub const COLOR_DRAG: u16 = 5;
    pub const COLOR_EDGE: u16 = 6;
    pub const COLOR_DIVIDER: u16 = 7;
    pub const COLOR_COLUMN_DIVIDER: u16 = 8;
    pub const COLOR_ROW_EVEN: u16 = 9;
    /// Number of color slots.
    pub const COLOR_SLOTS: usize = 10;
}

/// A font description as understood by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDesc {
    pub family: String,
    /// Point size.
    pub size: u32,
    /// CSS-style weight, 400 is regular.
    pub weight: u32,
    pub italic: bool,
}

impl FontDesc {
    /// A regular-weight, upright font.
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: 400,
            italic: false,
        }
    }
}

/// Mouse button bits.
pub mod buttons {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const MIDDLE: u8 = 1 << 2;
    pub const X1: u8 = 1 << 3;
    pub const X2: u8 = 1 << 4;
}

/// Modifier key bits.
pub mod modifiers {
    pub const SHIFT: u8 = 1 << 0;
    pub const CONTROL: u8 = 1 << 1;
    pub const ALT: u8 = 1 << 2;
    pub const SUPER: u8 = 1 << 3;
}

/// Payload of a spatial (mouse) event in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseEvent {
    pub x: f32,
    pub y: f32,
    /// The button that changed, for down/up events.
    pub button: u8,
    /// Every button currently held.
    pub all_buttons: u8,
    /// Scroll delta for scroll events, click count for double clicks.
    pub delta: i16,
}

/// Payload of a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// Platform-independent key code, see [`keys`].
    pub code: u16,
    /// Modifier bits, see [`modifiers`].
    pub modifiers: u8,
    /// The character produced, for `KeyChar`.
    pub character: Option<char>,
}

/// Key codes.
pub mod keys {
    pub const BACKSPACE: u16 = 0x08;
    pub const TAB: u16 = 0x09;
    pub const RETURN: u16 = 0x0D;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    pub const END: u16 = 0x23;
    pub const HOME: u16 = 0x24;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
    pub const DELETE: u16 = 0x2E;
}

/// The typed payload carried by a message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    None,
    Int(i64),
    Float(f32),
    Floats(f32, f32),
    Rect(AbsRect),
    CRect(Box<CRect>),
    Text(Arc<str>),
    Font(Arc<FontDesc>),
    Mouse(MouseEvent),
    Key(KeyEvent),
    /// Key/value pair for arbitrary user data.
    UserData(Arc<(String, String)>),
}

/// A message delivered to a widget handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub subtype: u16,
    pub payload: Payload,
}

// Messages are passed by value everywhere; keep them small.
const_assert!(std::mem::size_of::<Message>() <= 32);

impl Message {
    /// A message with no payload.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            subtype: 0,
            payload: Payload::None,
        }
    }

    pub fn with_payload(kind: MessageKind, payload: Payload) -> Self {
        Self {
            kind,
            subtype: 0,
            payload,
        }
    }

    pub fn int(kind: MessageKind, value: i64) -> Self {
        Self::with_payload(kind, Payload::Int(value))
    }

    pub fn float(kind: MessageKind, value: f32) -> Self {
        Self::with_payload(kind, Payload::Float(value))
    }

    pub fn floats(kind: MessageKind, a: f32, b: f32) -> Self {
        Self::with_payload(kind, Payload::Floats(a, b))
    }

    pub fn text(kind: MessageKind, text: impl Into<Arc<str>>) -> Self {
        Self::with_payload(kind, Payload::Text(text.into()))
    }

    pub fn rect(kind: MessageKind, rect: AbsRect) -> Self {
        Self::with_payload(kind, Payload::Rect(rect))
    }

    pub fn crect(kind: MessageKind, rect: CRect) -> Self {
        Self::with_payload(kind, Payload::CRect(Box::new(rect)))
    }

    pub fn font(kind: MessageKind, font: FontDesc) -> Self {
        Self::with_payload(kind, Payload::Font(Arc::new(font)))
    }

    pub fn user_data(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_payload(
            MessageKind::SetUserData,
            Payload::UserData(Arc::new((key.into(), value.into()))),
        )
    }

    /// A `SetColor` message for the given color slot.
    pub fn color(slot: u16, argb: u32) -> Self {
        Self::int(MessageKind::SetColor, i64::from(argb)).with_subtype(slot)
    }

    /// A `SetFlag` message: `set` turns the flag bits on, otherwise off.
    pub fn set_flag(flag: u32, set: bool) -> Self {
        Self::with_payload(MessageKind::SetFlag, Payload::Int(i64::from(flag))).with_subtype(u16::from(set))
    }

    /// A mouse event.
    pub fn mouse(kind: MessageKind, x: f32, y: f32, button: u8, all_buttons: u8) -> Self {
        Self::with_payload(
            kind,
            Payload::Mouse(MouseEvent {
                x,
                y,
                button,
                all_buttons,
                delta: 0,
            }),
        )
    }

    /// A key down/up event.
    pub fn key(kind: MessageKind, code: u16, modifiers: u8) -> Self {
        Self::with_payload(
            kind,
            Payload::Key(KeyEvent {
                code,
                modifiers,
                character: None,
            }),
        )
    }

    /// A character input event.
    pub fn character(ch: char) -> Self {
        Self::with_payload(
            MessageKind::KeyChar,
            Payload::Key(KeyEvent {
                code: 0,
                modifiers: 0,
                character: Some(ch),
            }),
        )
    }

    /// Builder: set the subtype.
    pub fn with_subtype(mut self, subtype: u16) -> Self {
        self.subtype = subtype;
        self
    }

    // Payload accessors. Each returns `None` when the payload has another shape.

    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self.payload {
            Payload::Float(f) => Some(f),
            Payload::Int(i) => Some(i as f32),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<(f32, f32)> {
        match self.payload {
            Payload::Floats(a, b) => Some((a, b)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Arc<str>> {
        match &self.payload {
            Payload::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&AbsRect> {
        match &self.payload {
            Payload::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_crect(&self) -> Option<&CRect> {
        match &self.payload {
            Payload::CRect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Arc<FontDesc>> {
        match &self.payload {
            Payload::Font(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match &self.payload {
            Payload::Mouse(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match &self.payload {
            Payload::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_user_data(&self) -> Option<(&str, &str)> {
        match &self.payload {
            Payload::UserData(kv) => Some((kv.0.as_str(), kv.1.as_str())),
            _ => None,
        }
    }

    /// Position of a mouse event.
    pub fn position(&self) -> Option<AbsVec> {
        self.as_mouse().map(|m| AbsVec::new(m.x, m.y))
    }
}

/// The result of dispatching a message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reply {
    /// The target did not recognize the message. This is not an error.
    #[default]
    Unhandled,
    /// The message was processed and has no value to return.
    Handled,
    Int(i64),
    Float(f32),
    Floats(f32, f32),
    Text(Arc<str>),
    Rect(AbsRect),
    CRect(CRect),
    Font(Arc<FontDesc>),
    UserData(BTreeMap<String, String>),
}

impl Reply {
    /// True for anything except [`Reply::Unhandled`].
    #[inline]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Reply::Unhandled)
    }

    /// Convert a boolean "did something" into a reply.
    #[inline]
    pub fn from_handled(handled: bool) -> Self {
        if handled {
            Reply::Handled
        } else {
            Reply::Unhandled
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Reply::Float(f) => Some(*f),
            Reply::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<(f32, f32)> {
        match self {
            Reply::Floats(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<AbsRect> {
        match self {
            Reply::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_crect(&self) -> Option<CRect> {
        match self {
            Reply::CRect(r) => Some(*r),
            _ => None,
        }
    }
}

/// Anything messages can be delivered to.
///
/// Live widgets and style replay use the same entry point, so applying a stored
/// `SetColor` and receiving one from code are the identical code path.
pub trait Dispatcher {
    /// Deliver a message and return the handler's reply.
    fn dispatch(&mut self, message: &Message) -> Reply;
}

impl<F> Dispatcher for F
where
    F: FnMut(&Message) -> Reply,
{
    fn dispatch(&mut self, message: &Message) -> Reply {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_small() {
        assert!(std::mem::size_of::<Message>() <= 32);
    }

    #[test]
    fn test_payload_accessors() {
        let m = Message::color(subtype::COLOR_HOVER, 0xFF00FF00);
        assert_eq!(m.kind, MessageKind::SetColor);
        assert_eq!(m.subtype, subtype::COLOR_HOVER);
        assert_eq!(m.as_int(), Some(0xFF00FF00));
        assert_eq!(m.as_text(), None);

        let t = Message::text(MessageKind::SetText, "hello");
        assert_eq!(t.as_text().map(|s| &**s), Some("hello"));

        let u = Message::user_data("key", "value");
        assert_eq!(u.as_user_data(), Some(("key", "value")));
    }

    #[test]
    fn test_mouse_position() {
        let m = Message::mouse(MessageKind::MouseDown, 3.0, 4.0, buttons::LEFT, buttons::LEFT);
        assert_eq!(m.position(), Some(AbsVec::new(3.0, 4.0)));
        assert!(m.kind.is_mouse());
        assert!(!m.kind.is_key());
    }

    #[test]
    fn test_reply_sentinel() {
        assert!(!Reply::Unhandled.is_handled());
        assert!(Reply::Handled.is_handled());
        assert!(Reply::Int(0).is_handled());
        assert_eq!(Reply::default(), Reply::Unhandled);
    }

    #[test]
    fn test_closure_dispatcher() {
        let mut seen = Vec::new();
        let mut d = |m: &Message| {
            seen.push(m.kind);
            Reply::Handled
        };
        assert!(d.dispatch(&Message::new(MessageKind::Action)).is_handled());
        assert_eq!(seen, vec![MessageKind::Action]);
    }
}
