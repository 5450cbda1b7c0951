//! Drawing and layout traversals.

use plume_core::flags::element;
use plume_core::logging::targets;
use plume_core::{AbsRect, Backend, Message, MessageKind, NodeId, PerfSpan};

use super::Gui;

impl<B: Backend> Gui<B> {
    /// Draw every top-level widget, back to front.
    ///
    /// Each visible widget receives `Draw` with its container rectangle as
    /// payload, then its children are drawn inside its content rectangle,
    /// clipped unless the widget has `NOCLIP`.
    pub fn draw(&mut self) {
        let _span = PerfSpan::new("draw");
        let root = self.config.root_rect();
        for id in self.roots.clone() {
            self.draw_node(id, root);
        }
    }

    /// Draw one subtree against an explicit container rectangle.
    pub fn draw_subtree(&mut self, id: NodeId) {
        let container = self.container(id);
        self.draw_node(id, container);
    }

    fn draw_node(&mut self, id: NodeId, container: AbsRect) {
        let Some(widget) = self.tree.get(id) else {
            return;
        };
        let e = &widget.element;
        if e.has(element::HIDDEN) {
            return;
        }
        let clip = !e.has(element::NOCLIP);
        let content = e.transform.area.resolve(&container).inset(&e.padding);

        tracing::trace!(target: targets::DRAW, id = id.as_raw(), "draw");
        self.dispatch(id, &Message::rect(MessageKind::Draw, container));

        let children = self.paint_order(id);
        if children.is_empty() {
            return;
        }
        if clip {
            self.backend.push_clip(&content);
        }
        for child in children {
            self.draw_node(child, content);
        }
        if clip {
            self.backend.pop_clip();
        }
    }

    /// Lay out a subtree, parents before children.
    pub fn layout(&mut self, id: NodeId) {
        let Ok(order) = self.tree.pre_order(id) else {
            return;
        };
        for node in order {
            self.send(node, MessageKind::Layout);
        }
    }

    /// Lay out every top-level widget.
    pub fn layout_all(&mut self) {
        let _span = PerfSpan::new("layout");
        for id in self.roots.clone() {
            self.layout(id);
        }
    }
}
