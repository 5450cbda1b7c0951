//! The control state machine shared by interactive widgets.
//!
//! ```text
//!            mouse enters              mouse down
//!  Neutral ---------------> Hover ----------------> Active
//!     ^                      |  ^                     |
//!     |     mouse leaves     |  |  mouse up inside,   |
//!     +----------------------+  +--- fires Action ----+
//!     ^                                               |
//!     +------------ mouse leaves / up outside --------+
//! ```
//!
//! Each transition applies the style of the same name ("neutral", "hover",
//! "active") and is itself a message (`Neutral`, `Hover`, `Active`), so
//! listeners can observe it and code can force a state.

use plume_core::flags::element;
use plume_core::message::buttons;
use plume_core::{Backend, Message, MessageKind, NodeId, Reply};

use crate::gui::Gui;
use crate::widget::element as base;

/// Interaction state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlPhase {
    #[default]
    Neutral,
    Hover,
    Active,
}

impl ControlPhase {
    /// The style name applied on entering this phase.
    pub fn style_name(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Hover => "hover",
            Self::Active => "active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub phase: ControlPhase,
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(phase) = phase(gui, id) else {
        return base::handle(gui, id, message);
    };
    let disabled = gui
        .widget(id)
        .is_some_and(|w| w.element.has(element::DISABLE));

    match message.kind {
        MessageKind::Construct => {
            gui.send(id, MessageKind::Neutral);
            Reply::Handled
        }
        MessageKind::Neutral => enter(gui, id, ControlPhase::Neutral),
        MessageKind::Hover => enter(gui, id, ControlPhase::Hover),
        MessageKind::Active => enter(gui, id, ControlPhase::Active),
        MessageKind::Action => Reply::Handled,
        _ if disabled && (message.kind.is_mouse() || message.kind.is_key()) => Reply::Unhandled,
        MessageKind::MouseMove => {
            if phase == ControlPhase::Neutral && contains(gui, id, message) {
                gui.send(id, MessageKind::Hover);
            }
            Reply::Handled
        }
        MessageKind::MouseDown => {
            let left = message.as_mouse().is_some_and(|m| m.button & buttons::LEFT != 0);
            if !left {
                return Reply::Unhandled;
            }
            if phase == ControlPhase::Neutral {
                // A press with no prior move enters through Hover.
                if !contains(gui, id, message) {
                    return Reply::Unhandled;
                }
                gui.send(id, MessageKind::Hover);
            }
            if phase != ControlPhase::Active {
                gui.send(id, MessageKind::Active);
            }
            Reply::Handled
        }
        MessageKind::MouseUp => {
            if phase != ControlPhase::Active {
                return Reply::from_handled(phase == ControlPhase::Hover);
            }
            if contains(gui, id, message) {
                gui.send(id, MessageKind::Action);
                gui.send(id, MessageKind::Hover);
            } else {
                gui.send(id, MessageKind::Neutral);
            }
            Reply::Handled
        }
        MessageKind::MouseLeave => {
            if phase != ControlPhase::Neutral {
                gui.send(id, MessageKind::Neutral);
            }
            Reply::Handled
        }
        _ => base::handle(gui, id, message),
    }
}

fn phase<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<ControlPhase> {
    gui.widget(id)?.kind.control().map(|c| c.phase)
}

/// True if the message's pointer position is inside the widget.
fn contains<B: Backend>(gui: &Gui<B>, id: NodeId, message: &Message) -> bool {
    match (message.position(), gui.resolve(id)) {
        (Some(p), Some(resolved)) => resolved.contains(p.x, p.y),
        _ => false,
    }
}

fn enter<B: Backend>(gui: &mut Gui<B>, id: NodeId, phase: ControlPhase) -> Reply {
    let Some(control) = gui.widget_mut(id).and_then(|w| w.kind.control_mut()) else {
        return Reply::Unhandled;
    };
    control.phase = phase;
    gui.set_style(id, phase.style_name());
    Reply::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuiConfig;
    use plume_core::{CRect, NullBackend, Transform};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> (Gui<NullBackend>, NodeId) {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let area = Transform::with_area(CRect::from_abs(0.0, 0.0, 100.0, 40.0));
        let id = gui.create(None, "Control", "c", area).unwrap();
        (gui, id)
    }

    fn current(gui: &Gui<NullBackend>, id: NodeId) -> ControlPhase {
        phase(gui, id).unwrap()
    }

    #[test]
    fn test_construct_applies_neutral() {
        let (gui, id) = setup();
        assert_eq!(current(&gui, id), ControlPhase::Neutral);
        assert_eq!(gui.style(id), gui.style_names().get("neutral").unwrap());
    }

    #[test]
    fn test_click_inside_fires_one_action() {
        let (mut gui, id) = setup();
        let actions = Rc::new(Cell::new(0));
        let counter = actions.clone();
        gui.add_listener(id, MessageKind::Action, move |_, _| counter.set(counter.get() + 1));

        gui.inject(&Message::mouse(MessageKind::MouseMove, 10.0, 10.0, 0, 0));
        assert_eq!(current(&gui, id), ControlPhase::Hover);
        gui.inject(&Message::mouse(MessageKind::MouseDown, 10.0, 10.0, buttons::LEFT, buttons::LEFT));
        assert_eq!(current(&gui, id), ControlPhase::Active);
        gui.inject(&Message::mouse(MessageKind::MouseUp, 10.0, 10.0, buttons::LEFT, 0));
        assert_eq!(current(&gui, id), ControlPhase::Hover);
        assert_eq!(actions.get(), 1);
    }

    #[test]
    fn test_press_without_move_passes_through_hover() {
        let (mut gui, id) = setup();
        let hovers = Rc::new(Cell::new(0));
        let counter = hovers.clone();
        gui.add_listener(id, MessageKind::Hover, move |_, _| counter.set(counter.get() + 1));

        let outside = Message::mouse(MessageKind::MouseDown, 300.0, 10.0, buttons::LEFT, buttons::LEFT);
        assert!(!gui.dispatch(id, &outside).is_handled());
        assert_eq!(current(&gui, id), ControlPhase::Neutral);

        gui.inject(&Message::mouse(MessageKind::MouseDown, 10.0, 10.0, buttons::LEFT, buttons::LEFT));
        assert_eq!(hovers.get(), 1);
        assert_eq!(current(&gui, id), ControlPhase::Active);
        assert_eq!(gui.style(id), gui.style_names().get("active").unwrap());
        gui.inject(&Message::mouse(MessageKind::MouseUp, 10.0, 10.0, buttons::LEFT, 0));
        assert_eq!(current(&gui, id), ControlPhase::Hover);
        assert_eq!(hovers.get(), 2);
    }

    #[test]
    fn test_leave_while_active_cancels() {
        let (mut gui, id) = setup();
        let actions = Rc::new(Cell::new(0));
        let counter = actions.clone();
        gui.add_listener(id, MessageKind::Action, move |_, _| counter.set(counter.get() + 1));

        gui.inject(&Message::mouse(MessageKind::MouseMove, 10.0, 10.0, 0, 0));
        gui.inject(&Message::mouse(MessageKind::MouseDown, 10.0, 10.0, buttons::LEFT, buttons::LEFT));
        gui.inject(&Message::mouse(MessageKind::MouseLeave, 10.0, 10.0, 0, buttons::LEFT));
        assert_eq!(current(&gui, id), ControlPhase::Neutral);
        gui.inject(&Message::mouse(MessageKind::MouseUp, 10.0, 10.0, buttons::LEFT, 0));
        assert_eq!(actions.get(), 0);
    }

    #[test]
    fn test_release_outside_returns_to_neutral() {
        let (mut gui, id) = setup();
        gui.inject(&Message::mouse(MessageKind::MouseMove, 10.0, 10.0, 0, 0));
        gui.inject(&Message::mouse(MessageKind::MouseDown, 10.0, 10.0, buttons::LEFT, buttons::LEFT));
        gui.inject(&Message::mouse(MessageKind::MouseUp, 300.0, 300.0, buttons::LEFT, 0));
        assert_eq!(current(&gui, id), ControlPhase::Neutral);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let (mut gui, id) = setup();
        gui.set_flag(id, element::DISABLE, true);
        let disabled = gui.style_names().get(base::DISABLED_STYLE).unwrap();
        assert_ne!(gui.style(id) & disabled, 0);

        gui.inject(&Message::mouse(MessageKind::MouseMove, 10.0, 10.0, 0, 0));
        assert_eq!(current(&gui, id), ControlPhase::Neutral);

        gui.set_flag(id, element::DISABLE, false);
        assert_eq!(gui.style(id) & disabled, 0);
    }
}
