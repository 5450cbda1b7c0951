//! The base behaviour shared by every widget.

use std::sync::Arc;

use plume_core::flags::element;
use plume_core::logging::targets;
use plume_core::message::subtype;
use plume_core::{AbsVec, Backend, DrawAttributes, Message, MessageKind, NodeId, Reply};

use crate::gui::Gui;

/// Style name applied while a widget has the `DISABLE` flag.
pub const DISABLED_STYLE: &str = "disabled";

pub fn handle<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    use MessageKind::*;

    match message.kind {
        Construct | Destroy => Reply::Handled,
        Draw => draw(gui, id, message),
        SetFlag | SetFlags => set_flags(gui, id, message),
        SetStyle => gui.apply_style_message(id, message),
        SetSkin => gui.apply_skin_message(id, message),
        _ => {
            let Some(widget) = gui.widget_mut(id) else {
                return Reply::Unhandled;
            };
            let class = widget.class_name();
            let e = &mut widget.element;
            match message.kind {
                GetFlags => Reply::Int(i64::from(e.flags)),
                SetArea => match message.as_crect() {
                    Some(area) => {
                        e.transform.area = *area;
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                GetArea => Reply::CRect(e.transform.area),
                SetTransform => match message.subtype {
                    subtype::TRANSFORM_ROTATION => match message.as_float() {
                        Some(rotation) => {
                            e.transform.rotation = rotation;
                            Reply::Handled
                        }
                        None => Reply::Unhandled,
                    },
                    subtype::TRANSFORM_CENTER => match message.as_crect() {
                        Some(r) => {
                            e.transform.center.x = r.left;
                            e.transform.center.y = r.top;
                            Reply::Handled
                        }
                        None => Reply::Unhandled,
                    },
                    _ => Reply::Unhandled,
                },
                SetMargin => match message.as_rect() {
                    Some(r) => {
                        e.margin = *r;
                        e.margin_units = message.subtype;
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                GetMargin => Reply::Rect(e.margin),
                SetPadding => match message.as_rect() {
                    Some(r) => {
                        e.padding = *r;
                        e.padding_units = message.subtype;
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                GetPadding => Reply::Rect(e.padding),
                SetAlpha => match message.as_float() {
                    Some(alpha) => {
                        e.alpha = alpha.clamp(0.0, 1.0);
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                GetAlpha => Reply::Float(e.alpha),
                SetColor => {
                    let slot = match message.subtype {
                        subtype::COLOR_MAIN => &mut e.color,
                        subtype::COLOR_EDGE => &mut e.edge_color,
                        _ => return Reply::Unhandled,
                    };
                    match message.as_int() {
                        Some(argb) => {
                            *slot = argb as u32;
                            Reply::Handled
                        }
                        None => Reply::Unhandled,
                    }
                }
                GetColor => match message.subtype {
                    subtype::COLOR_MAIN => Reply::Int(i64::from(e.color)),
                    subtype::COLOR_EDGE => Reply::Int(i64::from(e.edge_color)),
                    _ => Reply::Unhandled,
                },
                SetOutline => match message.as_float() {
                    Some(outline) => {
                        e.outline = outline;
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                SetAsset => match message.as_text() {
                    Some(asset) if asset.is_empty() => {
                        e.asset = None;
                        Reply::Handled
                    }
                    Some(asset) => {
                        e.asset = Some(Arc::clone(asset));
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                SetUv => match message.as_crect() {
                    Some(uv) => {
                        e.uv = *uv;
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                SetDim => match (message.subtype, message.as_floats()) {
                    (subtype::DIM_MAX, Some((w, h))) => {
                        e.max_dim = AbsVec::new(w, h);
                        Reply::Handled
                    }
                    (subtype::DIM_MIN, Some((w, h))) => {
                        e.min_dim = AbsVec::new(w, h);
                        Reply::Handled
                    }
                    _ => Reply::Unhandled,
                },
                GetDim => match message.subtype {
                    subtype::DIM_MAX => Reply::Floats(e.max_dim.x, e.max_dim.y),
                    subtype::DIM_MIN => Reply::Floats(e.min_dim.x, e.min_dim.y),
                    _ => Reply::Unhandled,
                },
                SetUserData => match message.as_user_data() {
                    Some((key, value)) => {
                        e.user_data.insert(key.to_string(), value.to_string());
                        Reply::Handled
                    }
                    None => Reply::Unhandled,
                },
                GetUserData => match message.as_text() {
                    Some(key) => e
                        .user_data
                        .get(&**key)
                        .map_or(Reply::Unhandled, |v| Reply::Text(Arc::from(v.as_str()))),
                    None => Reply::UserData(e.user_data.clone()),
                },
                GetSkin => e.skin.clone().map_or(Reply::Unhandled, Reply::Text),
                GetStyle => Reply::Int(i64::from(e.style)),
                GetClassName => Reply::Text(Arc::from(class)),
                _ => Reply::Unhandled,
            }
        }
    }
}

fn set_flags<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(value) = message.as_int() else {
        return Reply::Unhandled;
    };
    let Some(widget) = gui.widget_mut(id) else {
        return Reply::Unhandled;
    };
    let before = widget.element.flags;
    let after = match message.kind {
        MessageKind::SetFlag if message.subtype != 0 => before | value as u32,
        MessageKind::SetFlag => before & !(value as u32),
        _ => value as u32,
    };
    widget.element.flags = after;
    tracing::trace!(target: targets::DISPATCH, id = id.as_raw(), before, after, "flags changed");

    if (before ^ after) & element::DISABLE != 0 {
        let Some(bit) = gui.style_names_mut().get_or_insert(DISABLED_STYLE) else {
            return Reply::Handled;
        };
        let mask = gui.style(id);
        let mask = if after & element::DISABLE != 0 { mask | bit } else { mask & !bit };
        gui.dispatch(id, &Message::int(MessageKind::SetStyle, i64::from(mask)));
    }
    Reply::Handled
}

fn draw<B: Backend>(gui: &mut Gui<B>, id: NodeId, message: &Message) -> Reply {
    let Some(container) = message.as_rect() else {
        return Reply::Unhandled;
    };
    let Some(widget) = gui.widget(id) else {
        return Reply::Unhandled;
    };
    let e = &widget.element;
    if e.color == 0 && e.edge_color == 0 && e.asset.is_none() {
        return Reply::Handled;
    }
    let resolved = e.transform.resolve(container);
    let attributes = DrawAttributes {
        color: e.color,
        edge_color: e.edge_color,
        outline: e.outline,
        alpha: e.alpha,
        asset: e.asset.clone(),
        uv: e.uv,
        flags: e.flags,
    };
    gui.backend.draw(&resolved.rect, &resolved, &attributes);
    Reply::Handled
}
