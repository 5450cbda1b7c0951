//! Container: a plain element that stretches its expanding children.

use plume_core::flags::element;
use plume_core::{Backend, Coord, Message, MessageKind, NodeId, Reply};

use crate::gui::Gui;
use crate::widget::element as base;

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    match message.kind {
        MessageKind::Layout => {
            layout(gui, id);
            Reply::Handled
        }
        _ => base::handle(gui, id, message),
    }
}

/// Children with `EXPANDX`/`EXPANDY` fill the content rectangle on that axis,
/// inset by their margins. `IGNORE` children are left alone.
fn layout<B: Backend>(gui: &mut Gui<B>, id: NodeId) {
    for child in gui.children(id) {
        let Some(widget) = gui.widget_mut(child) else {
            continue;
        };
        let e = &mut widget.element;
        if e.has(element::IGNORE) {
            continue;
        }
        if e.has(element::EXPANDX) {
            e.transform.area.left = Coord::abs(e.margin.left);
            e.transform.area.right = Coord::new(-e.margin.right, 1.0);
        }
        if e.has(element::EXPANDY) {
            e.transform.area.top = Coord::abs(e.margin.top);
            e.transform.area.bottom = Coord::new(-e.margin.bottom, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuiConfig;
    use plume_core::{AbsRect, CRect, InsertAt, NullBackend, Transform};

    #[test]
    fn test_expand_fills_content() {
        let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
        let area = Transform::with_area(CRect::from_abs(0.0, 0.0, 200.0, 100.0));
        let c = gui.create(None, "Container", "c", area).unwrap();
        gui.dispatch(c, &Message::rect(MessageKind::SetPadding, AbsRect::new(10.0, 10.0, 10.0, 10.0)));

        let small = Transform::with_area(CRect::from_abs(0.0, 0.0, 20.0, 20.0));
        let wide = gui
            .create_with_flags(Some(InsertAt::Last(c)), "Element", "wide", small, element::EXPANDX)
            .unwrap();
        gui.dispatch(wide, &Message::rect(MessageKind::SetMargin, AbsRect::new(5.0, 0.0, 5.0, 0.0)));
        let fixed = gui
            .create_with_flags(Some(InsertAt::Last(c)), "Element", "fixed", small, element::EXPANDX | element::IGNORE)
            .unwrap();

        gui.layout(c);
        assert_eq!(gui.resolve(wide).unwrap().rect, AbsRect::new(15.0, 10.0, 185.0, 30.0));
        assert_eq!(gui.resolve(fixed).unwrap().rect, AbsRect::new(10.0, 10.0, 30.0, 30.0));
    }
}
