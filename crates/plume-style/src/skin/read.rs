use plume_core::logging::targets;
use plume_core::{CRect, Transform};

use super::attributes::{crect_attribute, cvec_attribute, float_attribute, read_style};
use super::{Skin, SkinElement, SkinTree, StyleEntry};
use crate::flags::FlagTable;
use crate::names::StyleIndex;
use crate::xml::{parse_xml, XmlElement};
use crate::{Error, Result};

const SKIN: &str = "Skin";
const STYLE: &str = "Style";

const SKIN_RESERVED: &[&str] = &["name", "inherit"];
const STYLE_RESERVED: &[&str] = &["name"];
const ELEMENT_RESERVED: &[&str] = &["name", "order", "flags", "area", "rotation", "center"];

/// Parses skins from XML.
///
/// Style names found in `<Style name="...">` blocks are registered in the
/// [`StyleIndex`] as they are read.
#[derive(Debug)]
pub struct SkinReader<'a> {
    flags: &'a FlagTable,
    names: &'a mut StyleIndex,
}

impl<'a> SkinReader<'a> {
    pub fn new(flags: &'a FlagTable, names: &'a mut StyleIndex) -> Self {
        Self { flags, names }
    }

    /// Parse a skin document.
    pub fn read_str(&mut self, text: &str) -> Result<Skin> {
        let _span = plume_core::PerfSpan::new("skin_read");
        let root = parse_xml(text)?;
        self.read(&root)
    }

    /// Read a skin from a parsed `<Skin>` element.
    pub fn read(&mut self, root: &XmlElement) -> Result<Skin> {
        if root.name() != SKIN {
            return Err(Error::MissingRoot);
        }
        let skin = self.read_skin(root)?;
        tracing::debug!(
            target: targets::SKIN,
            skin = %skin.name,
            styles = skin.tree.styles.len(),
            elements = skin.tree.children.len(),
            "read skin"
        );
        Ok(skin)
    }

    fn read_skin(&mut self, node: &XmlElement) -> Result<Skin> {
        let mut skin = Skin {
            name: node.attribute("name").unwrap_or_default().to_string(),
            inherit: node.attribute("inherit").map(str::to_string),
            style: read_style(node, SKIN_RESERVED)?,
            ..Default::default()
        };

        for child in node.children() {
            if child.name() == SKIN {
                skin.skins.push(self.read_skin(child)?);
            } else {
                self.read_tree_child(child, &mut skin.tree)?;
            }
        }
        Ok(skin)
    }

    fn read_tree_child(&mut self, node: &XmlElement, tree: &mut SkinTree) -> Result<()> {
        match node.name() {
            STYLE => {
                let name = node
                    .attribute("name")
                    .ok_or_else(|| Error::invalid_value("name", ""))?;
                if let Some(child) = node.children().first() {
                    return Err(Error::unexpected_element(child.name(), STYLE));
                }
                let mask = self.names.mask_of(name);
                tree.styles.push(StyleEntry {
                    mask,
                    style: read_style(node, STYLE_RESERVED)?,
                });
            }
            _ => tree.children.push(self.read_element(node)?),
        }
        Ok(())
    }

    fn read_element(&mut self, node: &XmlElement) -> Result<SkinElement> {
        let type_name = node.name();
        let mut element = SkinElement::new(type_name);
        element.name = node.attribute("name").unwrap_or_default().to_string();
        if let Some(order) = node.attribute("order") {
            element.order = order
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value("order", order))?;
        }
        element.flags = match node.attribute("flags") {
            Some(diff) => self.flags.decode_diff(type_name, diff),
            None => self.flags.default_flags(type_name),
        };

        let mut transform = Transform::with_area(CRect::EMPTY);
        let mut area_units = None;
        let mut center_units = None;
        if let Some(area) = node.attribute("area") {
            let (rect, units) = crect_attribute("area", area)?;
            transform.area = rect;
            area_units = Some(units);
        }
        if let Some(rotation) = node.attribute("rotation") {
            transform.rotation = float_attribute("rotation", rotation)?;
        }
        if let Some(center) = node.attribute("center") {
            let (vec, units) = cvec_attribute("center", center)?;
            transform.center = vec;
            center_units = Some(units);
        }
        element.transform = transform;
        // Area and center share one unit set; the area's units take precedence.
        element.units = area_units.or(center_units).unwrap_or(0);
        element.style = read_style(node, ELEMENT_RESERVED)?;

        for child in node.children() {
            if child.name() == SKIN {
                return Err(Error::unexpected_element(SKIN, type_name));
            }
            self.read_tree_child(child, &mut element.tree)?;
        }
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::SkinWriter;
    use plume_core::flags::{class, element, list};
    use plume_core::{Coord, MessageKind};

    const CHECKBOX: &str = r#"<Skin inherit="control" name="checkbox" color="FF202020" margin="2px 2px 2px 2px">
  <Skin name="compact" padding="1 1 1 1"/>
  <Style name="neutral" color="FF202020"/>
  <Style name="hover" color="FF404040"/>
  <Style name="checked+hover" edgecolor="FF0000FF"/>
  <Element name="check" flags="background|ignore|hidden|expand" area="0 0 100% 100%"/>
  <List name="items" order="2" flags="tilex|-tiley" area="4px 4px -4:1 -4:1">
    <Style name="active" alpha="0.5"/>
    <Text text="first" font="12 700 Mono" center="50% 50%"/>
  </List>
</Skin>"#;

    fn read(text: &str) -> (Skin, StyleIndex) {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let skin = SkinReader::new(&flags, &mut names).read_str(text).unwrap();
        (skin, names)
    }

    #[test]
    fn reads_structure() {
        let (skin, names) = read(CHECKBOX);
        assert_eq!(skin.name, "checkbox");
        assert_eq!(skin.inherit.as_deref(), Some("control"));
        assert_eq!(skin.style.len(), 2);
        assert_eq!(skin.skins.len(), 1);
        assert_eq!(skin.tree.styles.len(), 3);
        assert_eq!(skin.tree.children.len(), 2);

        let hover_checked = names.get("hover").unwrap() | names.get("checked").unwrap();
        assert!(skin.tree.style(hover_checked).is_some());

        let check = &skin.tree.children[0];
        assert_eq!(check.type_name, class::ELEMENT);
        assert_eq!(check.name, "check");
        assert_eq!(
            check.flags,
            element::BACKGROUND | element::IGNORE | element::HIDDEN | element::EXPAND
        );
        assert_eq!(check.transform.area, CRect::FILL);

        let items = &skin.tree.children[1];
        assert_eq!(items.order, 2);
        assert_eq!(items.flags, list::TILEX);
        assert_eq!(items.transform.area.right, Coord::new(-4.0, 1.0));
        assert_eq!(items.tree.styles.len(), 1);
        let text = &items.tree.children[0];
        assert_eq!(text.flags, element::NOHITTEST);
        assert_eq!(text.style.messages()[0].kind, MessageKind::SetText);
        assert_eq!(text.style.messages()[1].as_font().unwrap().weight, 700);
    }

    #[test]
    fn canonical_text_round_trips_byte_for_byte() {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let skin = SkinReader::new(&flags, &mut names).read_str(CHECKBOX).unwrap();
        let written = SkinWriter::new(&flags, &names).write(&skin);

        let again = SkinReader::new(&flags, &mut names).read_str(&written).unwrap();
        assert_eq!(again, skin);
        assert_eq!(SkinWriter::new(&flags, &names).write(&again), written);
    }

    #[test]
    fn unknown_flags_are_dropped() {
        let (skin, _) = read(r#"<Skin><Button flags="hidden|sparkly"/></Skin>"#);
        assert_eq!(skin.tree.children[0].flags, element::HIDDEN);
    }

    #[test]
    fn root_must_be_a_skin() {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let result = SkinReader::new(&flags, &mut names).read_str("<Theme/>");
        assert!(matches!(result, Err(Error::MissingRoot)));
    }

    #[test]
    fn skins_cannot_nest_in_elements() {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let result = SkinReader::new(&flags, &mut names).read_str("<Skin><Button><Skin/></Button></Skin>");
        assert!(matches!(result, Err(Error::UnexpectedElement { .. })));
    }

    #[test]
    fn bad_order_is_an_error() {
        let flags = FlagTable::standard();
        let mut names = StyleIndex::new();
        let result = SkinReader::new(&flags, &mut names).read_str(r#"<Skin><Button order="first"/></Skin>"#);
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }
}
