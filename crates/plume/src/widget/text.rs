//! Static text.

use std::sync::Arc;

use plume_core::message::subtype;
use plume_core::{Backend, FontDesc, Message, MessageKind, NodeId, Reply};

use crate::gui::Gui;
use crate::widget::{element, WidgetKind};

#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    pub text: Arc<str>,
    pub placeholder: Arc<str>,
    pub font: Option<Arc<FontDesc>>,
    /// Colors by slot, see [`subtype`].
    pub colors: [u32; subtype::COLOR_SLOTS],
    /// Line height multiplier; zero uses the font's own.
    pub line_height: f32,
    pub letter_spacing: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            text: Arc::from(""),
            placeholder: Arc::from(""),
            font: None,
            colors: [0; subtype::COLOR_SLOTS],
            line_height: 0.0,
            letter_spacing: 0.0,
        }
    }
}

impl TextState {
    /// Handle the messages that only touch text state.
    pub(crate) fn handle(&mut self, message: &Message) -> Reply {
        match message.kind {
            MessageKind::SetText => match (message.subtype, message.as_text()) {
                (subtype::TEXT, Some(text)) => {
                    self.text = Arc::clone(text);
                    Reply::Handled
                }
                (subtype::TEXT_PLACEHOLDER, Some(text)) => {
                    self.placeholder = Arc::clone(text);
                    Reply::Handled
                }
                _ => Reply::Unhandled,
            },
            MessageKind::GetText => match message.subtype {
                subtype::TEXT => Reply::Text(Arc::clone(&self.text)),
                subtype::TEXT_PLACEHOLDER => Reply::Text(Arc::clone(&self.placeholder)),
                _ => Reply::Unhandled,
            },
            MessageKind::SetFont => match message.as_font() {
                Some(font) => {
                    self.font = Some(Arc::clone(font));
                    Reply::Handled
                }
                None => Reply::Unhandled,
            },
            MessageKind::GetFont => self.font.clone().map_or(Reply::Unhandled, Reply::Font),
            MessageKind::SetColor => {
                let (Some(slot), Some(argb)) = (self.colors.get_mut(usize::from(message.subtype)), message.as_int())
                else {
                    return Reply::Unhandled;
                };
                *slot = argb as u32;
                Reply::Handled
            }
            MessageKind::GetColor => self
                .colors
                .get(usize::from(message.subtype))
                .map_or(Reply::Unhandled, |c| Reply::Int(i64::from(*c))),
            MessageKind::SetLineHeight => match message.as_float() {
                Some(h) => {
                    self.line_height = h;
                    Reply::Handled
                }
                None => Reply::Unhandled,
            },
            MessageKind::GetLineHeight => Reply::Float(self.line_height),
            MessageKind::SetLetterSpacing => match message.as_float() {
                Some(s) => {
                    self.letter_spacing = s;
                    Reply::Handled
                }
                None => Reply::Unhandled,
            },
            MessageKind::GetLetterSpacing => Reply::Float(self.letter_spacing),
            _ => Reply::Unhandled,
        }
    }

    /// The string to draw and the color slot to draw it with.
    pub(crate) fn visible(&self) -> (&str, u16) {
        if self.text.is_empty() && !self.placeholder.is_empty() {
            (&self.placeholder, subtype::COLOR_PLACEHOLDER)
        } else {
            (&self.text, subtype::COLOR_MAIN)
        }
    }
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    match message.kind {
        MessageKind::Draw => {
            element::handle(gui, id, message);
            draw(gui, id, message)
        }
        MessageKind::GetDim if message.subtype == subtype::DIM_TEXT => measure(gui, id),
        _ => {
            let reply = match gui.widget_mut(id).map(|w| &mut w.kind) {
                Some(WidgetKind::Text(state)) => state.handle(message),
                _ => Reply::Unhandled,
            };
            if reply.is_handled() {
                reply
            } else {
                element::handle(gui, id, message)
            }
        }
    }
}

fn draw<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(container) = message.as_rect() else {
        return Reply::Unhandled;
    };
    let Some(widget) = gui.widget(id) else {
        return Reply::Unhandled;
    };
    let WidgetKind::Text(state) = &widget.kind else {
        return Reply::Unhandled;
    };
    let (text, slot) = state.visible();
    if text.is_empty() {
        return Reply::Handled;
    }
    let text = text.to_string();
    let font = state.font.clone();
    let color = state.colors[usize::from(slot)];
    let resolved = widget.element.transform.resolve(container);
    gui.backend
        .draw_text(&text, font.as_deref(), color, &resolved.rect, &resolved);
    Reply::Handled
}

fn measure<B: Backend>(gui: &mut Gui<B>, id: NodeId) -> Reply {
    let Some(WidgetKind::Text(state)) = gui.widget(id).map(|w| &w.kind) else {
        return Reply::Unhandled;
    };
    let text = state.visible().0.to_string();
    let font = state.font.clone();
    let size = gui.backend.measure_text(&text, font.as_deref());
    Reply::Floats(size.x, size.y)
}
