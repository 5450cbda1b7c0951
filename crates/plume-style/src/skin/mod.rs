//! Skins: named, inheritable bundles of styles and sub-elements.
//!
//! A [`Skin`] carries a base [`Style`] applied whenever the skin is set on a
//! widget, and a [`SkinTree`] holding
//!
//! - style blocks keyed by a mask of style names (`<Style name="hover">`), and
//! - [`SkinElement`]s: sub-widgets the skin creates inside the widget, each
//!   with its own transform, flags, style and nested tree.
//!
//! Skins are read from and written to an XML format:
//!
//! ```xml
//! <Skin name="checkbox" inherit="control" color="FF202020">
//!   <Style name="hover" color="FF404040"/>
//!   <Element name="check" flags="background|ignore|hidden|expand" area="0 0 100% 100%"/>
//! </Skin>
//! ```
//!
//! Inheritance is only recorded here; [`SkinLibrary`](crate::SkinLibrary)
//! resolves it.

mod attributes;
mod read;
mod write;

pub use read::SkinReader;
pub use write::SkinWriter;

use plume_core::{CRect, Transform};

use crate::style::Style;

/// A style block stored under a mask of style names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleEntry {
    pub mask: u32,
    pub style: Style,
}

/// Style blocks and sub-elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkinTree {
    pub styles: Vec<StyleEntry>,
    pub children: Vec<SkinElement>,
}

impl SkinTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// The style stored under exactly `mask`.
    pub fn style(&self, mask: u32) -> Option<&Style> {
        self.styles.iter().find(|e| e.mask == mask).map(|e| &e.style)
    }

    /// The style stored under exactly `mask`, created empty if missing.
    pub fn style_mut(&mut self, mask: u32) -> &mut Style {
        let index = match self.styles.iter().position(|e| e.mask == mask) {
            Some(index) => index,
            None => {
                self.styles.push(StyleEntry {
                    mask,
                    style: Style::new(),
                });
                self.styles.len() - 1
            }
        };
        &mut self.styles[index].style
    }

    /// Style blocks that apply when the current style mask is `current`:
    /// every non-empty block whose names are all active, in declaration order.
    pub fn matching(&self, current: u32) -> impl Iterator<Item = &StyleEntry> {
        self.styles
            .iter()
            .filter(move |e| e.mask != 0 && e.mask & !current == 0)
    }

    pub fn add_child(&mut self, element: SkinElement) -> &mut SkinElement {
        self.children.push(element);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.children.is_empty()
    }
}

/// A sub-element a skin creates inside its widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinElement {
    /// Widget class to instantiate, also the XML element name.
    pub type_name: String,
    /// Instance name; empty for anonymous elements.
    pub name: String,
    /// Layout order among siblings.
    pub order: i32,
    pub flags: u32,
    pub transform: Transform,
    /// Packed units for the transform's area and center.
    pub units: u16,
    pub style: Style,
    pub tree: SkinTree,
}

impl SkinElement {
    /// An element with an empty area and no flags.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: String::new(),
            order: 0,
            flags: 0,
            transform: Transform::with_area(CRect::EMPTY),
            units: 0,
            style: Style::new(),
            tree: SkinTree::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// A named skin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skin {
    pub name: String,
    /// Name of the skin this one inherits from.
    pub inherit: Option<String>,
    /// Applied whenever the skin is set on a widget.
    pub style: Style,
    /// Skins nested inside this one, addressable by name.
    pub skins: Vec<Skin>,
    pub tree: SkinTree,
}

impl Skin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn inheriting(mut self, parent: impl Into<String>) -> Self {
        self.inherit = Some(parent.into());
        self
    }

    /// Find a nested skin by name, searching depth-first.
    pub fn find_skin(&self, name: &str) -> Option<&Skin> {
        self.skins
            .iter()
            .find_map(|s| if s.name == name { Some(s) } else { s.find_skin(name) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::{Message, MessageKind};

    #[test]
    fn style_mut_reuses_entries() {
        let mut tree = SkinTree::new();
        tree.style_mut(0b10).push(Message::float(MessageKind::SetAlpha, 0.5));
        tree.style_mut(0b10).push(Message::float(MessageKind::SetAlpha, 0.7));
        tree.style_mut(0b01);
        assert_eq!(tree.styles.len(), 2);
        assert_eq!(tree.style(0b10).map(Style::len), Some(2));
        assert!(tree.style(0b100).is_none());
    }

    #[test]
    fn matching_requires_every_name() {
        let mut tree = SkinTree::new();
        tree.style_mut(0b001);
        tree.style_mut(0b011);
        tree.style_mut(0b100);
        tree.style_mut(0);

        let masks: Vec<u32> = tree.matching(0b011).map(|e| e.mask).collect();
        assert_eq!(masks, vec![0b001, 0b011]);
        let masks: Vec<u32> = tree.matching(0b001).map(|e| e.mask).collect();
        assert_eq!(masks, vec![0b001]);
    }

    #[test]
    fn nested_skins_are_found() {
        let mut root = Skin::new("root");
        let mut mid = Skin::new("mid");
        mid.skins.push(Skin::new("leaf").inheriting("mid"));
        root.skins.push(mid);

        let leaf = root.find_skin("leaf").unwrap();
        assert_eq!(leaf.inherit.as_deref(), Some("mid"));
        assert!(root.find_skin("root").is_none());
    }
}
