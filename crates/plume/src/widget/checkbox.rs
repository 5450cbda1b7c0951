//! Checkbox: a control with a tri-state value.
//!
//! The value is 0 (clear), 1 (checked) or 2 (indeterminate). Two internal
//! overlay elements, `check` and `indeterminate`, are shown for the matching
//! value, and the `checked` style name is applied while the value is 1.
//! `Action` toggles between clear and checked; an indeterminate box becomes
//! clear.

use plume_core::flags::element;
use plume_core::logging::targets;
use plume_core::{Backend, Message, MessageKind, NodeId, Reply, Transform};

use crate::gui::Gui;
use crate::widget::button::{create_label, LABEL_NAME};
use crate::widget::{control, is_text_message, ControlState, Origin, WidgetClass, WidgetKind};

/// Style name applied while the box is checked.
pub const CHECKED_STYLE: &str = "checked";

pub const CLEAR: u8 = 0;
pub const CHECKED: u8 = 1;
pub const INDETERMINATE: u8 = 2;

const OVERLAY_FLAGS: u32 = element::BACKGROUND | element::IGNORE | element::HIDDEN | element::NOHITTEST;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckboxState {
    pub control: ControlState,
    pub value: u8,
    pub check: Option<NodeId>,
    pub indeterminate: Option<NodeId>,
    pub text: Option<NodeId>,
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(state) = state(gui, id) else {
        return control::handle(gui, id, message);
    };
    match message.kind {
        MessageKind::Construct => {
            let check = overlay(gui, id, "check");
            let indeterminate = overlay(gui, id, "indeterminate");
            let text = create_label(gui, id, LABEL_NAME);
            if let Some(WidgetKind::Checkbox(state)) = gui.widget_mut(id).map(|w| &mut w.kind) {
                state.check = check;
                state.indeterminate = indeterminate;
                state.text = text;
            }
            control::handle(gui, id, message);
            gui.dispatch(id, &Message::int(MessageKind::SetState, i64::from(CLEAR)))
        }
        MessageKind::Action => {
            let next = if state.value == CLEAR { CHECKED } else { CLEAR };
            gui.dispatch(id, &Message::int(MessageKind::SetState, i64::from(next)));
            Reply::Handled
        }
        MessageKind::SetState | MessageKind::SetValue => match message.as_int() {
            Some(value @ 0..=2) => set_value(gui, id, state, value as u8),
            _ => Reply::Unhandled,
        },
        MessageKind::GetState | MessageKind::GetValue => Reply::Int(i64::from(state.value)),
        _ if is_text_message(message) => match state.text {
            Some(text) => gui.dispatch(text, message),
            None => Reply::Unhandled,
        },
        _ => control::handle(gui, id, message),
    }
}

fn state<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<CheckboxState> {
    match &gui.widget(id)?.kind {
        WidgetKind::Checkbox(state) => Some(*state),
        _ => None,
    }
}

fn overlay<B: Backend>(gui: &mut Gui<B>, parent: NodeId, name: &str) -> Option<NodeId> {
    gui.create_owned(parent, WidgetClass::Element, name, Transform::FILL, OVERLAY_FLAGS, Origin::Internal)
        .inspect_err(|err| tracing::warn!(target: targets::TREE, name, error = %err, "could not create overlay"))
        .ok()
}

fn set_value<B: Backend>(gui: &mut Gui<B>, id: NodeId, state: CheckboxState, value: u8) -> Reply {
    if let Some(WidgetKind::Checkbox(s)) = gui.widget_mut(id).map(|w| &mut w.kind) {
        s.value = value;
    }
    if let Some(check) = state.check {
        gui.set_flag(check, element::HIDDEN, value != CHECKED);
    }
    if let Some(indeterminate) = state.indeterminate {
        gui.set_flag(indeterminate, element::HIDDEN, value != INDETERMINATE);
    }

    if let Some(bit) = gui.style_names_mut().get_or_insert(CHECKED_STYLE) {
        let current = gui.style(id);
        let mask = if value == CHECKED { current | bit } else { current & !bit };
        if mask != current {
            gui.dispatch(id, &Message::int(MessageKind::SetStyle, i64::from(mask)));
        }
    }
    Reply::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuiConfig;
    use plume_core::message::subtype;
    use plume_core::NullBackend;

    fn hidden(gui: &mut Gui<NullBackend>, id: NodeId, name: &str) -> bool {
        let child = gui.child(id, name).unwrap();
        gui.flags(child).unwrap() & element::HIDDEN != 0
    }

    #[test]
    fn test_action_toggles() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let cb = gui.create(None, "Checkbox", "cb", Transform::FILL).unwrap();
        assert_eq!(gui.state(cb), Some(0));
        assert!(hidden(&mut gui, cb, "check"));

        gui.send(cb, MessageKind::Action);
        assert_eq!(gui.state(cb), Some(1));
        assert!(!hidden(&mut gui, cb, "check"));
        let checked = gui.style_names().get(CHECKED_STYLE).unwrap();
        assert_ne!(gui.style(cb) & checked, 0);

        gui.send(cb, MessageKind::Action);
        assert_eq!(gui.state(cb), Some(0));
        assert_eq!(gui.style(cb) & checked, 0);
    }

    #[test]
    fn test_indeterminate_clears_on_action() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let cb = gui.create(None, "Checkbox", "cb", Transform::FILL).unwrap();
        gui.dispatch(cb, &Message::int(MessageKind::SetState, 2));
        assert!(!hidden(&mut gui, cb, "indeterminate"));
        assert!(hidden(&mut gui, cb, "check"));

        gui.send(cb, MessageKind::Action);
        assert_eq!(gui.value(cb), Some(0));
        assert!(hidden(&mut gui, cb, "indeterminate"));
    }

    #[test]
    fn test_out_of_range_state_is_rejected() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let cb = gui.create(None, "Checkbox", "cb", Transform::FILL).unwrap();
        assert!(!gui.dispatch(cb, &Message::int(MessageKind::SetState, 3)).is_handled());
        assert_eq!(gui.state(cb), Some(0));
    }

    #[test]
    fn test_checked_survives_hover() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let cb = gui.create(None, "Checkbox", "cb", Transform::FILL).unwrap();
        gui.send(cb, MessageKind::Action);
        gui.send(cb, MessageKind::Hover);
        let checked = gui.style_names().get(CHECKED_STYLE).unwrap();
        let hover = gui.style_names().get("hover").unwrap();
        assert_eq!(gui.style(cb), checked | hover);
    }

    #[test]
    fn test_color_goes_to_label() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let cb = gui.create(None, "Checkbox", "cb", Transform::FILL).unwrap();
        assert!(gui.dispatch(cb, &Message::color(subtype::COLOR_MAIN, 0xFF112233)).is_handled());

        let label = gui.child(cb, LABEL_NAME).unwrap();
        let get = Message::new(MessageKind::GetColor).with_subtype(subtype::COLOR_MAIN);
        assert_eq!(gui.dispatch(label, &get).as_int(), Some(0xFF112233));
        assert_eq!(gui.dispatch(cb, &get).as_int(), Some(0xFF112233));
        assert_eq!(gui.widget(cb).unwrap().element.color, 0);
    }
}
