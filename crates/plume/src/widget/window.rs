//! Top-level window: a control with a caption that can be dragged.

use plume_core::flags::{element, window};
use plume_core::logging::targets;
use plume_core::message::buttons;
use plume_core::{AbsVec, Backend, CRect, Coord, Message, MessageKind, NodeId, Reply, Transform};

use crate::gui::Gui;
use crate::widget::{control, is_text_message, ControlState, Origin, WidgetClass, WidgetKind};

pub const CAPTION_NAME: &str = "caption";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowState {
    pub control: ControlState,
    pub caption: Option<NodeId>,
    /// Pointer position at the last drag step, while dragging.
    pub drag: Option<AbsVec>,
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(state) = state(gui, id) else {
        return control::handle(gui, id, message);
    };
    match message.kind {
        MessageKind::Construct => {
            let caption = create_caption(gui, id);
            if let Some(WidgetKind::Window(state)) = gui.widget_mut(id).map(|w| &mut w.kind) {
                state.caption = caption;
            }
            control::handle(gui, id, message)
        }
        _ if is_text_message(message) => match state.caption {
            Some(caption) => gui.dispatch(caption, message),
            None => Reply::Unhandled,
        },
        MessageKind::MouseDown => {
            let reply = control::handle(gui, id, message);
            let left = message.as_mouse().is_some_and(|m| m.button & buttons::LEFT != 0);
            if let (true, Some(p)) = (left, message.position()) {
                if on_caption(gui, id, p) {
                    set_drag(gui, id, Some(p));
                    return Reply::Handled;
                }
            }
            reply
        }
        MessageKind::MouseMove if state.drag.is_some() => {
            let (Some(last), Some(p)) = (state.drag, message.position()) else {
                return Reply::Unhandled;
            };
            let Some(area) = gui.widget(id).map(|w| w.element.transform.area) else {
                return Reply::Unhandled;
            };
            let to = AbsVec::new(area.left.abs + p.x - last.x, area.top.abs + p.y - last.y);
            gui.dispatch(id, &Message::crect(MessageKind::SetArea, area.moved_to(to)));
            set_drag(gui, id, Some(p));
            Reply::Handled
        }
        MessageKind::MouseUp | MessageKind::MouseLeave if state.drag.is_some() => {
            set_drag(gui, id, None);
            control::handle(gui, id, message);
            Reply::Handled
        }
        _ => control::handle(gui, id, message),
    }
}

fn state<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<WindowState> {
    match &gui.widget(id)?.kind {
        WidgetKind::Window(state) => Some(*state),
        _ => None,
    }
}

fn set_drag<B: Backend>(gui: &mut Gui<B>, id: NodeId, drag: Option<AbsVec>) {
    if let Some(WidgetKind::Window(state)) = gui.widget_mut(id).map(|w| &mut w.kind) {
        state.drag = drag;
    }
    gui.input.dragging = drag.is_some();
    tracing::trace!(target: targets::INPUT, id = id.as_raw(), dragging = drag.is_some(), "window drag");
}

fn on_caption<B: Backend>(gui: &Gui<B>, id: NodeId, p: AbsVec) -> bool {
    let Some(widget) = gui.widget(id) else {
        return false;
    };
    if widget.element.has(window::NOCAPTION) || widget.element.has(element::DISABLE) {
        return false;
    }
    let Some(resolved) = gui.resolve(id) else {
        return false;
    };
    let p = resolved.unrotate(p);
    resolved.rect.contains(p.x, p.y) && p.y < resolved.rect.top + gui.config().caption_height
}

fn create_caption<B: Backend>(gui: &mut Gui<B>, id: NodeId) -> Option<NodeId> {
    let height = gui.config().caption_height;
    let area = CRect::new(Coord::ZERO, Coord::ZERO, Coord::rel(1.0), Coord::abs(height));
    let mut flags = gui.flag_table().default_flags(WidgetClass::Text.name()) | element::NOHITTEST;
    if gui.widget(id).is_some_and(|w| w.element.has(window::NOCAPTION)) {
        flags |= element::HIDDEN;
    }
    gui.create_owned(id, WidgetClass::Text, CAPTION_NAME, Transform::with_area(area), flags, Origin::Internal)
        .inspect_err(|err| tracing::warn!(target: targets::TREE, error = %err, "could not create caption"))
        .ok()
}
