//! Push button: a control with a text label.

use plume_core::flags::element;
use plume_core::logging::targets;
use plume_core::{Backend, Message, MessageKind, NodeId, Reply, Transform};

use crate::gui::Gui;
use crate::widget::{control, is_text_message, ControlState, Origin, WidgetClass, WidgetKind};

/// Name of the label child created by buttons, checkboxes and windows.
pub const LABEL_NAME: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub control: ControlState,
    /// The label child.
    pub text: Option<NodeId>,
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    match message.kind {
        MessageKind::Construct => {
            let label = create_label(gui, id, LABEL_NAME);
            if let Some(WidgetKind::Button(state)) = gui.widget_mut(id).map(|w| &mut w.kind) {
                state.text = label;
            }
            control::handle(gui, id, message)
        }
        _ if is_text_message(message) => match label(gui, id) {
            Some(text) => gui.dispatch(text, message),
            None => Reply::Unhandled,
        },
        _ => control::handle(gui, id, message),
    }
}

fn label<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<NodeId> {
    match &gui.widget(id)?.kind {
        WidgetKind::Button(state) => state.text,
        _ => None,
    }
}

/// Create the internal text child that fills its parent and ignores the mouse.
pub(crate) fn create_label<B: Backend>(gui: &mut Gui<B>, parent: NodeId, name: &str) -> Option<NodeId> {
    let flags = gui.flag_table().default_flags(WidgetClass::Text.name()) | element::NOHITTEST;
    match gui.create_owned(parent, WidgetClass::Text, name, Transform::FILL, flags, Origin::Internal) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::warn!(target: targets::TREE, parent = parent.as_raw(), error = %err, "could not create label");
            None
        }
    }
}
