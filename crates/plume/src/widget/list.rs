//! List: flows its children along one or both axes and tracks a selection.
//!
//! Items are the children that are neither `IGNORE` nor `BACKGROUND`. With
//! `TILEY` items stack top to bottom, with `TILEX` left to right, and with both
//! they fill rows left to right and wrap at the content width. An item's
//! margins become the spacing around it. Items rotated by an odd quarter turn
//! take up their transposed size.

use plume_core::flags::{element, list};
use plume_core::logging::targets;
use plume_core::message::buttons;
use plume_core::{AbsVec, Backend, Coord, Message, MessageKind, NodeId, Reply, ResolvedTransform};

use crate::gui::Gui;
use crate::widget::{element as base, WidgetKind};

/// Style name applied to the selected item.
pub const SELECTED_STYLE: &str = "selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListState {
    pub selected: Option<usize>,
}

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(flags) = gui.widget(id).map(|w| w.element.flags) else {
        return Reply::Unhandled;
    };
    match message.kind {
        MessageKind::Layout => {
            layout(gui, id, flags);
            Reply::Handled
        }
        MessageKind::MouseDown if flags & list::SELECT != 0 && flags & element::DISABLE == 0 => {
            let left = message.as_mouse().is_some_and(|m| m.button & buttons::LEFT != 0);
            let Some(p) = message.position().filter(|_| left) else {
                return Reply::Unhandled;
            };
            let hit = items(gui, id)
                .iter()
                .position(|&item| gui.resolve(item).is_some_and(|r| r.contains(p.x, p.y)));
            match hit {
                Some(index) => {
                    select(gui, id, Some(index));
                    gui.send(id, MessageKind::Action);
                    Reply::Handled
                }
                None => Reply::Unhandled,
            }
        }
        MessageKind::Action => Reply::Handled,
        MessageKind::SetValue => match message.as_int() {
            Some(index) if index < 0 => {
                select(gui, id, None);
                Reply::Handled
            }
            Some(index) if (index as usize) < items(gui, id).len() => {
                select(gui, id, Some(index as usize));
                Reply::Handled
            }
            _ => Reply::Unhandled,
        },
        MessageKind::GetValue => Reply::Int(selected(gui, id).map_or(-1, |i| i as i64)),
        _ => base::handle(gui, id, message),
    }
}

fn selected<B: Backend>(gui: &Gui<B>, id: NodeId) -> Option<usize> {
    match &gui.widget(id)?.kind {
        WidgetKind::List(state) => state.selected,
        _ => None,
    }
}

/// The children that take part in the flow, in sibling order.
fn items<B: Backend>(gui: &Gui<B>, id: NodeId) -> Vec<NodeId> {
    gui.children(id)
        .into_iter()
        .filter(|&c| {
            gui.widget(c)
                .is_some_and(|w| !w.element.has(element::IGNORE) && !w.element.has(element::BACKGROUND))
        })
        .collect()
}

fn select<B: Backend>(gui: &mut Gui<B>, id: NodeId, index: Option<usize>) {
    let previous = selected(gui, id);
    if let Some(WidgetKind::List(state)) = gui.widget_mut(id).map(|w| &mut w.kind) {
        state.selected = index;
    }
    if previous == index {
        return;
    }
    tracing::trace!(target: targets::INPUT, id = id.as_raw(), ?previous, ?index, "list selection");
    let Some(bit) = gui.style_names_mut().get_or_insert(SELECTED_STYLE) else {
        return;
    };
    let items = items(gui, id);
    for (i, on) in [(previous, false), (index, true)] {
        let Some(&item) = i.and_then(|i| items.get(i)) else {
            continue;
        };
        let mask = gui.style(item);
        let mask = if on { mask | bit } else { mask & !bit };
        gui.dispatch(item, &Message::int(MessageKind::SetStyle, i64::from(mask)));
    }
}

fn layout<B: Backend>(gui: &mut Gui<B>, id: NodeId, flags: u32) {
    let Some(content) = gui.content_rect(id) else {
        return;
    };
    let (tile_x, tile_y) = (flags & list::TILEX != 0, flags & list::TILEY != 0);
    if !tile_x && !tile_y {
        return;
    }
    let wrap = tile_x && tile_y;
    let mut cursor = AbsVec::ZERO;
    let mut row = 0.0f32;

    for item in items(gui, id) {
        let Some(widget) = gui.widget_mut(item) else {
            continue;
        };
        let e = &mut widget.element;
        let area = e.transform.area;
        let quarter = ResolvedTransform::is_quarter_turn(e.transform.rotation);
        let (w, h) = (area.abs_width(), area.abs_height());
        let (fw, fh) = if quarter { (h, w) } else { (w, h) };
        let (outer_w, outer_h) = (fw + e.margin.left + e.margin.right, fh + e.margin.top + e.margin.bottom);

        if wrap && cursor.x > 0.0 && cursor.x + outer_w > content.width() {
            cursor = AbsVec::new(0.0, cursor.y + row);
            row = 0.0;
        }
        let at = AbsVec::new(cursor.x + e.margin.left, cursor.y + e.margin.top);

        let mut placed = if quarter {
            // Center the rotated item on its transposed footprint.
            let footprint = area.moved_to_transposed(AbsVec::new(at.y, at.x));
            let center = AbsVec::new(footprint.left.abs + fw / 2.0, footprint.top.abs + fh / 2.0);
            area.moved_to(AbsVec::new(center.x - w / 2.0, center.y - h / 2.0))
        } else {
            area.moved_to(at)
        };
        if e.has(element::EXPANDX) && !tile_x {
            placed.left = Coord::abs(e.margin.left);
            placed.right = Coord::new(-e.margin.right, 1.0);
        }
        if e.has(element::EXPANDY) && !tile_y {
            placed.top = Coord::abs(e.margin.top);
            placed.bottom = Coord::new(-e.margin.bottom, 1.0);
        }
        e.transform.area = placed;

        if tile_x {
            cursor.x += outer_w;
            row = row.max(outer_h);
        } else {
            cursor.y += outer_h;
        }
    }
}
