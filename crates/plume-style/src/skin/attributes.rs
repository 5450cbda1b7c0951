//! Style messages as XML attributes, in both directions.

use plume_core::message::subtype;
use plume_core::{Message, MessageKind, Payload};

use crate::format;
use crate::style::Style;
use crate::xml::XmlElement;
use crate::{Error, Result};

/// Attribute names of the color slots, indexed by subtype.
pub(crate) const COLOR_ATTRIBUTES: [&str; subtype::COLOR_SLOTS] = [
    "color",
    "placecolor",
    "cursorcolor",
    "selectcolor",
    "hovercolor",
    "dragcolor",
    "edgecolor",
    "dividercolor",
    "columndividercolor",
    "rowevencolor",
];

/// Append one attribute per style entry, in style order.
///
/// Entries with no attribute form are skipped.
pub(crate) fn write_style(node: &mut XmlElement, style: &Style) {
    for message in style {
        write_message(node, message);
    }
}

fn write_message(node: &mut XmlElement, m: &Message) {
    let float = |m: &Message| m.as_float().map(format::float_string);
    match m.kind {
        MessageKind::SetSkin => {
            if let Some(name) = m.as_text() {
                node.add_attribute("skin", &**name);
            }
        }
        MessageKind::SetAlpha => add(node, "alpha", float(m)),
        MessageKind::SetMargin => add(node, "margin", m.as_rect().map(|r| format::abs_rect_string(r, m.subtype))),
        MessageKind::SetPadding => add(node, "padding", m.as_rect().map(|r| format::abs_rect_string(r, m.subtype))),
        MessageKind::SetText => {
            let name = match m.subtype {
                subtype::TEXT_PLACEHOLDER => "placeholder",
                subtype::TEXT_MASK => "mask",
                _ => "text",
            };
            add(node, name, m.as_text().map(|t| t.to_string()));
        }
        MessageKind::SetColor => {
            if let (Some(name), Some(value)) = (COLOR_ATTRIBUTES.get(usize::from(m.subtype)), m.as_int()) {
                let mut s = String::new();
                format::write_hex(&mut s, value as u32);
                node.add_attribute(*name, s);
            }
        }
        MessageKind::SetFont => add(node, "font", m.as_font().map(|f| format::font_string(f))),
        MessageKind::SetLineHeight => add(node, "lineheight", float(m)),
        MessageKind::SetLetterSpacing => add(node, "letterspacing", float(m)),
        MessageKind::SetValue => {
            let value = match (m.subtype, &m.payload) {
                (subtype::VALUE_FLOAT, _) => float(m),
                (_, Payload::Int(i)) => Some(i.to_string()),
                _ => None,
            };
            add(node, "value", value);
        }
        MessageKind::SetUv => add(node, "uv", m.as_crect().map(|r| format::crect_string(r, 0))),
        MessageKind::SetAsset => add(node, "asset", m.as_text().map(|t| t.to_string())),
        MessageKind::SetRange => add(node, "range", float(m)),
        MessageKind::SetOutline => add(node, "outline", float(m)),
        MessageKind::SetUserData => {
            if let Some((key, value)) = m.as_user_data() {
                node.add_attribute(key, value);
            }
        }
        MessageKind::SetDim => {
            let names = match m.subtype {
                subtype::DIM_MAX => ("max-width", "max-height"),
                subtype::DIM_MIN => ("min-width", "min-height"),
                _ => return,
            };
            if let Some((w, h)) = m.as_floats() {
                node.add_attribute(names.0, format::float_string(w));
                node.add_attribute(names.1, format::float_string(h));
            }
        }
        _ => {}
    }
}

fn add(node: &mut XmlElement, name: &str, value: Option<String>) {
    if let Some(value) = value {
        node.add_attribute(name, value);
    }
}

/// Read every attribute of `node` not listed in `reserved` into a style.
///
/// Unrecognized names become user data.
pub(crate) fn read_style(node: &XmlElement, reserved: &[&str]) -> Result<Style> {
    let mut style = Style::new();
    let mut dims_done = [false; 2];

    for (name, value) in node.attributes() {
        if reserved.contains(&name) {
            continue;
        }
        let message = match name {
            "skin" => Message::text(MessageKind::SetSkin, value),
            "alpha" => Message::float(MessageKind::SetAlpha, float(name, value)?),
            "margin" | "padding" => {
                let (rect, units) = format::parse_abs_rect(value).ok_or_else(|| Error::invalid_value(name, value))?;
                let kind = if name == "margin" { MessageKind::SetMargin } else { MessageKind::SetPadding };
                Message::rect(kind, rect).with_subtype(units)
            }
            "text" => Message::text(MessageKind::SetText, value),
            "placeholder" => Message::text(MessageKind::SetText, value).with_subtype(subtype::TEXT_PLACEHOLDER),
            "mask" => Message::text(MessageKind::SetText, value).with_subtype(subtype::TEXT_MASK),
            "font" => Message::font(
                MessageKind::SetFont,
                format::parse_font(value).ok_or_else(|| Error::invalid_value(name, value))?,
            ),
            "lineheight" => Message::float(MessageKind::SetLineHeight, float(name, value)?),
            "letterspacing" => Message::float(MessageKind::SetLetterSpacing, float(name, value)?),
            "value" => match format::parse_int(value) {
                Some(i) => Message::int(MessageKind::SetValue, i).with_subtype(subtype::VALUE_INT),
                None => Message::float(MessageKind::SetValue, float(name, value)?).with_subtype(subtype::VALUE_FLOAT),
            },
            "uv" => {
                let (rect, _) = format::parse_crect(value).ok_or_else(|| Error::invalid_value(name, value))?;
                Message::crect(MessageKind::SetUv, rect)
            }
            "asset" => Message::text(MessageKind::SetAsset, value),
            "range" => Message::float(MessageKind::SetRange, float(name, value)?),
            "outline" => Message::float(MessageKind::SetOutline, float(name, value)?),
            "max-width" | "max-height" | "min-width" | "min-height" => {
                let (slot, width, height, fallback) = if name.starts_with("max") {
                    (subtype::DIM_MAX, "max-width", "max-height", -1.0)
                } else {
                    (subtype::DIM_MIN, "min-width", "min-height", 0.0)
                };
                if std::mem::replace(&mut dims_done[usize::from(slot)], true) {
                    continue;
                }
                let w = node.attribute(width).map(|v| float(width, v)).transpose()?.unwrap_or(fallback);
                let h = node.attribute(height).map(|v| float(height, v)).transpose()?.unwrap_or(fallback);
                Message::floats(MessageKind::SetDim, w, h).with_subtype(slot)
            }
            _ => match COLOR_ATTRIBUTES.iter().position(|c| *c == name) {
                Some(slot) => Message::color(
                    slot as u16,
                    format::parse_hex(value).ok_or_else(|| Error::invalid_value(name, value))?,
                ),
                None => Message::user_data(name, value),
            },
        };
        style.push(message);
    }
    Ok(style)
}

fn float(name: &str, value: &str) -> Result<f32> {
    format::parse_float(value).ok_or_else(|| Error::invalid_value(name, value))
}

/// Parse a coordinate attribute that also carries units.
pub(crate) fn crect_attribute(name: &str, value: &str) -> Result<(plume_core::CRect, u16)> {
    format::parse_crect(value).ok_or_else(|| Error::invalid_value(name, value))
}

pub(crate) fn cvec_attribute(name: &str, value: &str) -> Result<(plume_core::CVec, u16)> {
    format::parse_cvec(value).ok_or_else(|| Error::invalid_value(name, value))
}

pub(crate) fn float_attribute(name: &str, value: &str) -> Result<f32> {
    float(name, value)
}
