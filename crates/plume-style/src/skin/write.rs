use plume_core::logging::targets;
use plume_core::{CRect, CVec, Transform};

use super::attributes::write_style;
use super::{Skin, SkinElement, SkinTree};
use crate::flags::FlagTable;
use crate::format;
use crate::names::StyleIndex;
use crate::xml::XmlElement;

/// Serializes skins to XML.
///
/// Attribute order is fixed: on a skin `inherit`, `name`, then its base style;
/// on an element `name`, `order`, `flags`, its style, then `area`, `rotation`
/// and `center`. Nested skins come before style blocks, which come before
/// child elements.
#[derive(Debug, Clone, Copy)]
pub struct SkinWriter<'a> {
    flags: &'a FlagTable,
    names: &'a StyleIndex,
}

impl<'a> SkinWriter<'a> {
    pub fn new(flags: &'a FlagTable, names: &'a StyleIndex) -> Self {
        Self { flags, names }
    }

    /// Write a skin as an indented XML document.
    pub fn write(&self, skin: &Skin) -> String {
        let _span = plume_core::PerfSpan::new("skin_write");
        let text = self.to_xml(skin).to_string_pretty();
        tracing::debug!(target: targets::SKIN, skin = %skin.name, bytes = text.len(), "wrote skin");
        text
    }

    /// Build the XML element for a skin.
    pub fn to_xml(&self, skin: &Skin) -> XmlElement {
        let mut node = XmlElement::new("Skin");
        if let Some(inherit) = &skin.inherit {
            node.add_attribute("inherit", inherit.as_str());
        }
        if !skin.name.is_empty() {
            node.add_attribute("name", skin.name.as_str());
        }
        write_style(&mut node, &skin.style);

        for nested in &skin.skins {
            node.add_child(self.to_xml(nested));
        }
        self.write_tree(&mut node, &skin.tree);
        node
    }

    /// Build the XML element for a single skin element and its subtree.
    pub fn element_to_xml(&self, element: &SkinElement) -> XmlElement {
        let mut node = XmlElement::new(element.type_name.as_str());
        if !element.name.is_empty() {
            node.add_attribute("name", element.name.as_str());
        }
        if element.order != 0 {
            node.add_attribute("order", element.order.to_string());
        }
        let flags = self.flags.encode_diff(&element.type_name, element.flags);
        if !flags.is_empty() {
            node.add_attribute("flags", flags);
        }
        write_style(&mut node, &element.style);
        write_transform(&mut node, &element.transform, element.units);

        self.write_tree(&mut node, &element.tree);
        node
    }

    fn write_tree(&self, node: &mut XmlElement, tree: &SkinTree) {
        for entry in &tree.styles {
            let mut style = XmlElement::new("Style");
            style.add_attribute("name", self.names.write_mask(entry.mask));
            write_style(&mut style, &entry.style);
            node.add_child(style);
        }
        for child in &tree.children {
            node.add_child(self.element_to_xml(child));
        }
    }
}

fn write_transform(node: &mut XmlElement, transform: &Transform, units: u16) {
    if transform.area != CRect::EMPTY {
        node.add_attribute("area", format::crect_string(&transform.area, units));
    }
    if transform.rotation != 0.0 {
        node.add_attribute("rotation", format::float_string(transform.rotation));
    }
    if transform.center != CVec::ZERO {
        node.add_attribute("center", format::cvec_string(&transform.center, units));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Unit, UnitSlot};
    use crate::style::Style;
    use plume_core::flags::{class, element};
    use plume_core::message::subtype;
    use plume_core::{Coord, Message};

    #[test]
    fn element_attribute_order() {
        let flags = FlagTable::standard();
        let names = StyleIndex::new();
        let writer = SkinWriter::new(&flags, &names);

        let mut e = SkinElement::new(class::TEXT)
            .with_name("label")
            .with_flags(element::NOHITTEST | element::EXPAND)
            .with_transform(Transform {
                area: CRect::new(Coord::abs(2.0), Coord::ZERO, Coord::rel(1.0), Coord::rel(1.0)),
                rotation: 0.5,
                center: CVec::new(Coord::rel(0.5), Coord::rel(0.5)),
            });
        e.order = 3;
        e.units = Unit::Px.packed(UnitSlot::Left);
        e.style = Style::new().with(Message::color(subtype::COLOR_MAIN, 0xFF000000));

        let xml = writer.element_to_xml(&e);
        let attrs: Vec<_> = xml.attributes().collect();
        assert_eq!(
            attrs,
            vec![
                ("name", "label"),
                ("order", "3"),
                ("flags", "expand"),
                ("color", "FF000000"),
                ("area", "2px 0 100% 100%"),
                ("rotation", "0.5"),
                ("center", "50% 50%"),
            ]
        );
    }

    #[test]
    fn empty_transform_is_omitted() {
        let flags = FlagTable::standard();
        let names = StyleIndex::new();
        let writer = SkinWriter::new(&flags, &names);
        let xml = writer.element_to_xml(&SkinElement::new(class::BUTTON));
        assert_eq!(xml.attribute_count(), 0);
    }

    #[test]
    fn skin_layout() {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let hover = names.mask_of("hover");

        let mut skin = Skin::new("button").inheriting("control");
        skin.style.push(Message::float(plume_core::MessageKind::SetAlpha, 1.0));
        skin.skins.push(Skin::new("inner"));
        skin.tree.style_mut(hover).push(Message::color(subtype::COLOR_MAIN, 1));
        skin.tree.add_child(SkinElement::new(class::TEXT));

        let xml = SkinWriter::new(&flags, &names).to_xml(&skin);
        let attrs: Vec<_> = xml.attributes().collect();
        assert_eq!(attrs, vec![("inherit", "control"), ("name", "button"), ("alpha", "1")]);
        let children: Vec<_> = xml.children().iter().map(|c| c.name()).collect();
        assert_eq!(children, vec!["Skin", "Style", "Text"]);
        assert_eq!(xml.children()[1].attribute("name"), Some("hover"));
        assert_eq!(xml.children()[1].attribute("color"), Some("00000001"));
    }
}
