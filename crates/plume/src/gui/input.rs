//! Input routing: hit-testing, hover tracking, mouse capture and focus.

use plume_core::flags::element;
use plume_core::logging::targets;
use plume_core::{AbsRect, Backend, Message, MessageKind, NodeId, Reply};

use super::Gui;

impl<B: Backend> Gui<B> {
    /// Feed a platform input message into the context.
    ///
    /// The input state is updated first. Mouse messages then go to the widget
    /// holding the mouse capture, or else to the topmost widget under the
    /// pointer; key messages go to the focused widget. Unhandled messages
    /// bubble up to the parent.
    pub fn inject(&mut self, message: &Message) -> Reply {
        self.input.update(message);

        if message.kind.is_mouse() {
            self.route_mouse(message)
        } else if message.kind.is_key() {
            match self.focused {
                Some(focused) => self.bubble(focused, message).0,
                None => Reply::Unhandled,
            }
        } else {
            Reply::Unhandled
        }
    }

    fn route_mouse(&mut self, message: &Message) -> Reply {
        if message.kind == MessageKind::MouseLeave {
            self.set_hovered(None);
            return match self.captured {
                Some(captured) => self.dispatch(captured, message),
                None => Reply::Unhandled,
            };
        }

        let Some(position) = message.position() else {
            return Reply::Unhandled;
        };
        let hit = self.hit_test(position.x, position.y);
        self.set_hovered(hit);

        if message.kind == MessageKind::MouseDown {
            if self.config.focus_on_click {
                self.set_focus(hit);
            }
            let Some(target) = hit else {
                return Reply::Unhandled;
            };
            let (reply, handler) = self.bubble(target, message);
            if reply.is_handled() {
                self.captured = handler;
            }
            return reply;
        }

        let target = self.captured.or(hit);
        if message.kind == MessageKind::MouseUp {
            self.captured = None;
        }
        match target {
            Some(target) => self.bubble(target, message).0,
            None => Reply::Unhandled,
        }
    }

    /// Dispatch to `id`, then to its ancestors until one handles the message.
    fn bubble(&mut self, id: NodeId, message: &Message) -> (Reply, Option<NodeId>) {
        let mut current = Some(id);
        while let Some(node) = current {
            let reply = self.dispatch(node, message);
            if reply.is_handled() {
                return (reply, Some(node));
            }
            current = self.parent(node);
        }
        (Reply::Unhandled, None)
    }

    fn set_hovered(&mut self, hit: Option<NodeId>) {
        if self.hovered == hit {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, hit);
        tracing::trace!(target: targets::INPUT, from = ?previous, to = ?hit, "hover changed");
        if let Some(previous) = previous {
            let leave = Message::mouse(MessageKind::MouseLeave, self.input.x, self.input.y, 0, self.input.buttons);
            self.dispatch(previous, &leave);
        }
    }

    /// The widget under the pointer, if any.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// The widget receiving key messages, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move keyboard focus, sending `LostFocus` and `GotFocus`.
    pub fn set_focus(&mut self, id: Option<NodeId>) {
        if self.focused == id {
            return;
        }
        let previous = std::mem::replace(&mut self.focused, id);
        tracing::trace!(target: targets::INPUT, from = ?previous, to = ?id, "focus changed");
        if let Some(previous) = previous {
            self.send(previous, MessageKind::LostFocus);
        }
        if let Some(id) = id {
            self.send(id, MessageKind::GotFocus);
        }
    }

    /// The topmost hit-testable widget containing the point.
    ///
    /// Later siblings are tested before earlier ones and children before
    /// their parent. Hidden widgets and their subtrees are skipped;
    /// `NOHITTEST` widgets are skipped but their children are still tested.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        let root = self.config.root_rect();
        self.roots
            .iter()
            .rev()
            .find_map(|&id| self.hit_node(id, &root, x, y))
    }

    fn hit_node(&self, id: NodeId, container: &AbsRect, x: f32, y: f32) -> Option<NodeId> {
        let widget = self.tree.get(id)?;
        let e = &widget.element;
        if e.has(element::HIDDEN) {
            return None;
        }
        let resolved = e.transform.resolve(container);
        let inside = resolved.contains(x, y);

        if inside || e.has(element::NOCLIP) {
            let content = resolved.rect.inset(&e.padding);
            let hit = self
                .paint_order(id)
                .into_iter()
                .rev()
                .find_map(|child| self.hit_node(child, &content, x, y));
            if hit.is_some() {
                return hit;
            }
        }
        (inside && !e.has(element::NOHITTEST)).then_some(id)
    }

    /// Children in drawing order: `BACKGROUND` children first, each group in
    /// sibling order.
    pub(crate) fn paint_order(&self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id);
        let is_background = |c: &NodeId| {
            self.tree
                .get(*c)
                .is_some_and(|w| w.element.has(element::BACKGROUND))
        };
        let (mut order, rest): (Vec<_>, Vec<_>) = children.into_iter().partition(is_background);
        order.extend(rest);
        order
    }
}

#[cfg(test)]
mod tests {
    use crate::GuiConfig;
    use crate::gui::Gui;
    use plume_core::flags::element;
    use plume_core::message::buttons;
    use plume_core::{CRect, InsertAt, Message, MessageKind, NullBackend, Transform};

    fn area(l: f32, t: f32, r: f32, b: f32) -> Transform {
        Transform::with_area(CRect::from_abs(l, t, r, b))
    }

    #[test]
    fn test_topmost_sibling_wins() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let root = gui.create(None, "Element", "root", Transform::FILL).unwrap();
        let a = gui.create(Some(InsertAt::Last(root)), "Element", "a", area(0.0, 0.0, 50.0, 50.0)).unwrap();
        let b = gui.create(Some(InsertAt::Last(root)), "Element", "b", area(25.0, 25.0, 75.0, 75.0)).unwrap();

        assert_eq!(gui.hit_test(30.0, 30.0), Some(b));
        assert_eq!(gui.hit_test(10.0, 10.0), Some(a));
        assert_eq!(gui.hit_test(100.0, 100.0), Some(root));

        gui.set_flag(b, element::HIDDEN, true);
        assert_eq!(gui.hit_test(30.0, 30.0), Some(a));
        gui.set_flag(a, element::NOHITTEST, true);
        assert_eq!(gui.hit_test(30.0, 30.0), Some(root));
    }

    #[test]
    fn test_half_open_edges() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let e = gui.create(None, "Element", "e", area(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(gui.hit_test(0.0, 0.0), Some(e));
        assert_eq!(gui.hit_test(10.0, 5.0), None);
    }

    #[test]
    fn test_focus_follows_mouse_down() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let a = gui.create(None, "Textbox", "a", area(0.0, 0.0, 50.0, 20.0)).unwrap();
        let b = gui.create(None, "Textbox", "b", area(0.0, 30.0, 50.0, 50.0)).unwrap();

        gui.inject(&Message::mouse(MessageKind::MouseDown, 5.0, 5.0, buttons::LEFT, buttons::LEFT));
        gui.inject(&Message::mouse(MessageKind::MouseUp, 5.0, 5.0, buttons::LEFT, 0));
        assert_eq!(gui.focused(), Some(a));
        gui.inject(&Message::character('x'));
        assert_eq!(gui.text(a).as_deref(), Some("x"));

        gui.inject(&Message::mouse(MessageKind::MouseDown, 5.0, 35.0, buttons::LEFT, buttons::LEFT));
        assert_eq!(gui.focused(), Some(b));
    }

    #[test]
    fn test_hover_moves_send_leave() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let a = gui.create(None, "Button", "a", area(0.0, 0.0, 50.0, 20.0)).unwrap();
        gui.inject(&Message::mouse(MessageKind::MouseMove, 5.0, 5.0, 0, 0));
        assert_eq!(gui.hovered(), Some(a));
        assert_eq!(gui.style(a) & gui.style_names().get("hover").unwrap_or(0), 2);

        gui.inject(&Message::mouse(MessageKind::MouseMove, 500.0, 500.0, 0, 0));
        assert_eq!(gui.hovered(), None);
        assert_eq!(gui.style(a), gui.style_names().get("neutral").unwrap_or(0));
    }
}
