//! Transient mouse and keyboard state.
//!
//! One [`InputState`] lives as long as the toolkit context. It is written only
//! by the dispatch loop in response to input messages and may be read by any
//! handler during the same synchronous call.

use crate::coord::AbsVec;
use crate::message::{Message, MessageKind, Payload};

/// Mouse state bits.
pub mod mouse_state {
    /// The pointer is over the window.
    pub const HOVER: u8 = 1 << 0;
    /// A button went down and has not been released yet.
    pub const INSIDE: u8 = 1 << 1;
    /// A drag operation is in progress.
    pub const DRAG: u8 = 1 << 2;
}

/// Process-wide input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub x: f32,
    pub y: f32,
    /// Buttons currently held.
    pub buttons: u8,
    /// [`mouse_state`] bits.
    pub state: u8,
    /// Modifier keys currently held.
    pub modifiers: u8,
    /// Whether a drag is currently in progress.
    pub dragging: bool,
}

impl InputState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pointer position.
    pub fn position(&self) -> AbsVec {
        AbsVec::new(self.x, self.y)
    }

    /// True if the state bit is set.
    pub fn has(&self, bit: u8) -> bool {
        self.state & bit != 0
    }

    /// Fold an input message into the state.
    ///
    /// Non-input messages are ignored. Returns true if the state was updated.
    pub fn update(&mut self, message: &Message) -> bool {
        if let Payload::Key(key) = &message.payload {
            if message.kind.is_key() {
                self.modifiers = key.modifiers;
                return true;
            }
        }

        let Some(mouse) = message.as_mouse() else {
            return false;
        };
        match message.kind {
            MessageKind::MouseDown => {
                self.state |= mouse_state::HOVER | mouse_state::INSIDE;
            }
            MessageKind::MouseUp => {
                self.state |= mouse_state::HOVER;
                self.state &= !mouse_state::INSIDE;
            }
            MessageKind::MouseMove | MessageKind::MouseScroll | MessageKind::MouseDoubleClick => {
                self.state |= mouse_state::HOVER;
            }
            MessageKind::MouseLeave => {
                self.state &= !mouse_state::HOVER;
            }
            _ => return false,
        }

        self.x = mouse.x;
        self.y = mouse.y;
        self.buttons = mouse.all_buttons;
        if self.dragging {
            self.state |= mouse_state::DRAG;
        }
        if message.kind == MessageKind::MouseLeave {
            self.state &= !mouse_state::DRAG;
        }
        true
    }
}
