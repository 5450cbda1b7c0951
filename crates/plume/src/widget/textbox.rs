//! Editable single- or multi-line text.
//!
//! Positions are character indexes. The selection runs between `anchor` and
//! `cursor`; when they are equal nothing is selected and typing inserts at the
//! cursor.

use std::sync::Arc;

use plume_core::flags::{element, textbox};
use plume_core::message::{keys, modifiers, subtype};
use plume_core::{AbsRect, Backend, DrawAttributes, Message, MessageKind, NodeId, Reply};

use crate::gui::Gui;
use crate::widget::text::TextState;
use crate::widget::{control, ControlState, WidgetKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextboxState {
    pub control: ControlState,
    pub text: TextState,
    /// Drawn in place of every character, for passwords.
    pub mask: Option<char>,
    pub anchor: usize,
    pub cursor: usize,
}

impl TextboxState {
    fn len(&self) -> usize {
        self.text.text.chars().count()
    }

    /// The selected character range, ordered.
    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    fn collapse(&mut self, at: usize) {
        let at = at.min(self.len());
        self.anchor = at;
        self.cursor = at;
    }

    fn move_cursor(&mut self, to: usize, extend: bool) {
        self.cursor = to.min(self.len());
        if !extend {
            self.anchor = self.cursor;
        }
    }

    /// Replace `[start, end)` with `insert` and put the cursor after it.
    fn splice(&mut self, start: usize, end: usize, insert: &str) {
        let text = &self.text.text;
        let (from, to) = (byte_index(text, start), byte_index(text, end));
        let mut edited = String::with_capacity(text.len() + insert.len());
        edited.push_str(&text[..from]);
        edited.push_str(insert);
        edited.push_str(&text[to..]);
        self.text.text = Arc::from(edited);
        self.collapse(start + insert.chars().count());
    }

    fn replace_selection(&mut self, insert: &str) {
        let (start, end) = self.selection();
        self.splice(start, end, insert);
    }

    /// The string as drawn: masked if a mask character is set.
    pub fn display(&self) -> String {
        match self.mask {
            Some(mask) => std::iter::repeat_n(mask, self.len()).collect(),
            None => self.text.text.to_string(),
        }
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(flags) = gui.widget(id).map(|w| w.element.flags) else {
        return Reply::Unhandled;
    };
    match message.kind {
        MessageKind::KeyChar | MessageKind::KeyDown if flags & element::DISABLE != 0 => Reply::Unhandled,
        MessageKind::KeyChar => match message.as_key().and_then(|k| k.character) {
            Some(ch) => type_char(gui, id, flags, ch),
            None => Reply::Unhandled,
        },
        MessageKind::KeyDown => match message.as_key() {
            Some(key) => key_down(gui, id, flags, key.code, key.modifiers & modifiers::SHIFT != 0),
            None => Reply::Unhandled,
        },
        MessageKind::GotFocus | MessageKind::LostFocus => Reply::Handled,
        MessageKind::Draw => {
            control::handle(gui, id, message);
            draw(gui, id, message)
        }
        MessageKind::GetDim if message.subtype == subtype::DIM_TEXT => {
            let Some((display, font)) = state(gui, id).map(|s| (s.display(), s.text.font.clone())) else {
                return Reply::Unhandled;
            };
            let size = gui.backend.measure_text(&display, font.as_deref());
            Reply::Floats(size.x, size.y)
        }
        _ => {
            let reply = edit(gui, id, |state| handle_state(state, message)).unwrap_or(Reply::Unhandled);
            if reply.is_handled() {
                reply
            } else {
                control::handle(gui, id, message)
            }
        }
    }
}

fn handle_state(state: &mut TextboxState, message: &Message) -> Reply {
    match message.kind {
        MessageKind::SetText if message.subtype == subtype::TEXT_MASK => match message.as_text() {
            Some(mask) => {
                state.mask = mask.chars().next();
                Reply::Handled
            }
            None => Reply::Unhandled,
        },
        MessageKind::GetText if message.subtype == subtype::TEXT_MASK => {
            Reply::Text(Arc::from(state.mask.map(String::from).unwrap_or_default()))
        }
        MessageKind::SetText => {
            let reply = state.text.handle(message);
            if reply.is_handled() && message.subtype == subtype::TEXT {
                let end = state.len();
                state.collapse(end);
            }
            reply
        }
        MessageKind::SetRange => match message.as_floats() {
            Some((start, end)) => {
                let len = state.len();
                state.anchor = (start.max(0.0) as usize).min(len);
                state.cursor = (end.max(0.0) as usize).min(len);
                Reply::Handled
            }
            None => Reply::Unhandled,
        },
        MessageKind::GetRange => Reply::Floats(state.anchor as f32, state.cursor as f32),
        MessageKind::SetValue => match message.as_int() {
            Some(at) => {
                state.collapse(at.max(0) as usize);
                Reply::Handled
            }
            None => Reply::Unhandled,
        },
        MessageKind::GetValue => Reply::Int(state.cursor as i64),
        _ => state.text.handle(message),
    }
}

fn state<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<&TextboxState> {
    match &gui.widget(id)?.kind {
        WidgetKind::Textbox(state) => Some(state),
        _ => None,
    }
}

fn edit<B: Backend, R>(gui: &mut Gui<B>, id: NodeId, f: impl FnOnce(&mut TextboxState) -> R) -> Option<R> {
    match &mut gui.widget_mut(id)?.kind {
        WidgetKind::Textbox(state) => Some(f(state)),
        _ => None,
    }
}

fn type_char<B: Backend>(gui: &mut Gui<B>, id: NodeId, flags: u32, ch: char) -> Reply {
    if ch == '\r' || ch == '\n' {
        if flags & textbox::ACTIONENTER != 0 {
            gui.send(id, MessageKind::Action);
            return Reply::Handled;
        }
        if flags & textbox::SINGLELINE != 0 {
            return Reply::Handled;
        }
    } else if ch.is_control() {
        return Reply::Unhandled;
    }
    if flags & textbox::READONLY != 0 {
        return Reply::Handled;
    }
    let ch = if ch == '\r' { '\n' } else { ch };
    let mut buf = [0; 4];
    let insert: &str = ch.encode_utf8(&mut buf);
    edit(gui, id, |state| state.replace_selection(insert));
    Reply::Handled
}

fn key_down<B: Backend>(gui: &mut Gui<B>, id: NodeId, flags: u32, code: u16, extend: bool) -> Reply {
    let readonly = flags & textbox::READONLY != 0;
    let handled = edit(gui, id, |state| {
        let (start, end) = state.selection();
        match code {
            keys::BACKSPACE if readonly => {}
            keys::BACKSPACE if start != end => state.splice(start, end, ""),
            keys::BACKSPACE if start > 0 => state.splice(start - 1, start, ""),
            keys::BACKSPACE => {}
            keys::DELETE if readonly => {}
            keys::DELETE if start != end => state.splice(start, end, ""),
            keys::DELETE if end < state.len() => state.splice(end, end + 1, ""),
            keys::DELETE => {}
            keys::LEFT if start != end && !extend => state.collapse(start),
            keys::LEFT => state.move_cursor(state.cursor.saturating_sub(1), extend),
            keys::RIGHT if start != end && !extend => state.collapse(end),
            keys::RIGHT => state.move_cursor(state.cursor + 1, extend),
            keys::HOME => state.move_cursor(0, extend),
            keys::END => state.move_cursor(state.len(), extend),
            _ => return false,
        }
        true
    });
    Reply::from_handled(handled.unwrap_or(false))
}

fn draw<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(container) = message.as_rect() else {
        return Reply::Unhandled;
    };
    let focused = gui.focused() == Some(id);
    let Some(widget) = gui.widget(id) else {
        return Reply::Unhandled;
    };
    let WidgetKind::Textbox(state) = &widget.kind else {
        return Reply::Unhandled;
    };
    let resolved = widget.element.transform.resolve(container);
    let font = state.text.font.clone();
    let colors = state.text.colors;
    let cursor = state.cursor;
    let placeholder = Arc::clone(&state.text.placeholder);
    let display = state.display();

    if display.is_empty() {
        if !placeholder.is_empty() {
            let color = colors[usize::from(subtype::COLOR_PLACEHOLDER)];
            gui.backend.draw_text(&placeholder, font.as_deref(), color, &resolved.rect, &resolved);
        }
    } else {
        let color = colors[usize::from(subtype::COLOR_MAIN)];
        gui.backend.draw_text(&display, font.as_deref(), color, &resolved.rect, &resolved);
    }

    if focused {
        let prefix: String = display.chars().take(cursor).collect();
        let offset = gui.backend.measure_text(&prefix, font.as_deref()).x;
        let x = resolved.rect.left + offset;
        let caret = AbsRect::new(x, resolved.rect.top, x + 1.0, resolved.rect.bottom);
        let attributes = DrawAttributes {
            color: colors[usize::from(subtype::COLOR_CURSOR)],
            ..DrawAttributes::default()
        };
        gui.backend.draw(&caret, &resolved, &attributes);
    }
    Reply::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuiConfig;
    use plume_core::{NullBackend, Transform};

    fn setup(flags: u32) -> (Gui<NullBackend>, NodeId) {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let id = gui.create_with_flags(None, "Textbox", "tb", Transform::FILL, flags).unwrap();
        gui.set_focus(Some(id));
        (gui, id)
    }

    fn type_str(gui: &mut Gui<NullBackend>, text: &str) {
        for ch in text.chars() {
            gui.inject(&Message::character(ch));
        }
    }

    fn key(gui: &mut Gui<NullBackend>, code: u16, mods: u8) {
        gui.inject(&Message::key(MessageKind::KeyDown, code, mods));
    }

    #[test]
    fn test_typing_and_backspace() {
        let (mut gui, id) = setup(0);
        type_str(&mut gui, "héllo");
        key(&mut gui, keys::BACKSPACE, 0);
        key(&mut gui, keys::HOME, 0);
        key(&mut gui, keys::DELETE, 0);
        assert_eq!(gui.text(id).as_deref(), Some("éll"));
        assert_eq!(gui.value(id), Some(0));
    }

    #[test]
    fn test_selection_is_replaced() {
        let (mut gui, id) = setup(0);
        gui.set_text(id, "hello world");
        gui.dispatch(id, &Message::floats(MessageKind::SetRange, 0.0, 5.0));
        type_str(&mut gui, "J");
        assert_eq!(gui.text(id).as_deref(), Some("J world"));
        assert_eq!(gui.value(id), Some(1));

        key(&mut gui, keys::END, 0);
        key(&mut gui, keys::LEFT, modifiers::SHIFT);
        key(&mut gui, keys::LEFT, modifiers::SHIFT);
        let range = gui.send(id, MessageKind::GetRange).as_floats();
        assert_eq!(range, Some((7.0, 5.0)));
        key(&mut gui, keys::DELETE, 0);
        assert_eq!(gui.text(id).as_deref(), Some("J wor"));
    }

    #[test]
    fn test_readonly_allows_navigation_only() {
        let (mut gui, id) = setup(textbox::READONLY);
        gui.set_text(id, "fixed");
        type_str(&mut gui, "x");
        key(&mut gui, keys::BACKSPACE, 0);
        key(&mut gui, keys::HOME, 0);
        assert_eq!(gui.text(id).as_deref(), Some("fixed"));
        assert_eq!(gui.value(id), Some(0));
    }

    #[test]
    fn test_enter_fires_action() {
        let (mut gui, id) = setup(textbox::SINGLELINE | textbox::ACTIONENTER);
        let fired = std::rc::Rc::new(std::cell::Cell::new(false));
        let flag = fired.clone();
        gui.add_listener(id, MessageKind::Action, move |_, _| flag.set(true));
        type_str(&mut gui, "go\r");
        assert!(fired.get());
        assert_eq!(gui.text(id).as_deref(), Some("go"));
    }

    #[test]
    fn test_multiline_keeps_newlines() {
        let (mut gui, id) = setup(0);
        type_str(&mut gui, "a\rb");
        assert_eq!(gui.text(id).as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_mask_hides_text() {
        let (mut gui, id) = setup(textbox::SINGLELINE);
        gui.dispatch(id, &Message::text(MessageKind::SetText, "*").with_subtype(subtype::TEXT_MASK));
        type_str(&mut gui, "pw");
        let reply = gui.dispatch(id, &Message::new(MessageKind::GetDim).with_subtype(subtype::DIM_TEXT));
        assert_eq!(reply.as_floats(), Some((14.0, 14.0)));
        assert_eq!(gui.text(id).as_deref(), Some("pw"));
    }
}
