//! Style masks, skin application and layout capture.

use std::sync::Arc;

use plume_core::logging::targets;
use plume_core::{Backend, InsertAt, Message, MessageKind, NodeId, PerfSpan, Reply};
use plume_style::{Skin, SkinElement, SkinTree, SkinWriter, Style};

use super::Gui;
use crate::error::GuiResult;
use crate::widget::{Origin, WidgetClass};

impl<B: Backend> Gui<B> {
    /// Parse a skin document and add it to the library.
    pub fn load_skin_str(&mut self, text: &str) -> GuiResult<()> {
        self.skins.load_str(text, &self.flags, &mut self.names)?;
        Ok(())
    }

    /// Add a skin to the library, replacing one with the same name.
    pub fn add_skin(&mut self, skin: Skin) {
        self.skins.add(skin);
    }

    pub fn skins(&self) -> &plume_style::SkinLibrary {
        &self.skins
    }

    /// Current style mask of a widget.
    pub fn style(&self, id: NodeId) -> u32 {
        self.tree.get(id).map_or(0, |w| w.element.style)
    }

    /// Apply `+`-joined style names to a widget.
    pub fn set_style(&mut self, id: NodeId, names: &str) -> Reply {
        self.dispatch(id, &Message::text(MessageKind::SetStyle, names))
    }

    /// Set a widget's skin by name.
    pub fn set_skin(&mut self, id: NodeId, name: &str) -> Reply {
        self.dispatch(id, &Message::text(MessageKind::SetSkin, name))
    }

    /// Handle `SetStyle`: update the mask, replay matching style blocks and
    /// pass the new mask on to skin-owned and internal children.
    pub(crate) fn apply_style_message(&mut self, id: NodeId, message: &Message) -> Reply {
        let Some(current) = self.tree.get(id).map(|w| w.element.style) else {
            return Reply::Unhandled;
        };
        let mask = match (message.as_text(), message.as_int()) {
            (Some(names), _) => self.names.apply_names(current, names),
            (None, Some(mask)) => mask as u32,
            _ => return Reply::Unhandled,
        };
        self.set_style_mask(id, mask);
        Reply::Handled
    }

    fn set_style_mask(&mut self, id: NodeId, mask: u32) {
        let Some(widget) = self.tree.get_mut(id) else {
            return;
        };
        widget.element.style = mask;
        let matching: Vec<Style> = widget
            .element
            .styles
            .iter()
            .filter(|e| e.mask != 0 && e.mask & !mask == 0)
            .map(|e| e.style.clone())
            .collect();

        for style in &matching {
            self.apply(id, style);
        }

        for child in self.children(id) {
            let owned = self
                .tree
                .get(child)
                .is_some_and(|w| w.element.origin != Origin::User);
            if owned {
                self.dispatch(child, &Message::int(MessageKind::SetStyle, i64::from(mask)));
            }
        }
    }

    /// Handle `SetSkin`: replay the skin's base style, rebuild its child
    /// elements and reapply the current style mask.
    pub(crate) fn apply_skin_message(&mut self, id: NodeId, message: &Message) -> Reply {
        let Some(name) = message.as_text().cloned() else {
            return Reply::Unhandled;
        };
        let Some(resolved) = self.skins.resolve(&name) else {
            tracing::warn!(target: targets::SKIN, skin = %name, "skin not found");
            return Reply::Unhandled;
        };
        let _span = PerfSpan::new("apply_skin");

        for child in self.children(id) {
            let skin_owned = self
                .tree
                .get(child)
                .is_some_and(|w| w.element.origin == Origin::Skin);
            if !skin_owned {
                continue;
            }
            // The child may already be gone if a Destroy handler removed it.
            if let Err(err) = self.destroy(child) {
                tracing::debug!(
                    target: targets::SKIN,
                    id = id.as_raw(),
                    child = child.as_raw(),
                    error = %err,
                    "skin element not destroyed"
                );
            }
        }

        let Some(widget) = self.tree.get_mut(id) else {
            return Reply::Unhandled;
        };
        widget.element.skin = Some(Arc::clone(&name));
        widget.element.styles = resolved.styles;

        for message in resolved.base.iter().filter(|m| m.kind != MessageKind::SetSkin) {
            self.dispatch(id, message);
        }

        let mut children = resolved.children;
        children.sort_by_key(|c| c.order);
        for element in &children {
            self.instantiate(id, element);
        }

        let mask = self.style(id);
        self.set_style_mask(id, mask);
        tracing::debug!(target: targets::SKIN, id = id.as_raw(), skin = %name, elements = children.len(), "applied skin");
        Reply::Handled
    }

    fn instantiate(&mut self, parent: NodeId, element: &SkinElement) {
        let Some(class) = WidgetClass::from_name(&element.type_name) else {
            tracing::warn!(target: targets::SKIN, class = %element.type_name, "unknown element type in skin");
            return;
        };
        let id = match self.create_owned(parent, class, &element.name, element.transform, element.flags, Origin::Skin) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(target: targets::SKIN, class = %element.type_name, error = %err, "could not create skin element");
                return;
            }
        };
        if let Some(widget) = self.tree.get_mut(id) {
            widget.element.units = element.units;
            widget.element.order = element.order;
            widget.element.styles = element.tree.styles.clone();
        }
        self.apply(id, &element.style);

        let mut children: Vec<&SkinElement> = element.tree.children.iter().collect();
        children.sort_by_key(|c| c.order);
        for child in children {
            self.instantiate(id, child);
        }
    }

    /// Capture a live subtree as a skin element.
    ///
    /// Children created by a skin or by a constructor are left out, since
    /// recreating the widget recreates them.
    pub fn capture_layout(&self, id: NodeId) -> Option<SkinElement> {
        let widget = self.tree.get(id)?;
        let e = &widget.element;
        let mut captured = SkinElement::new(widget.class_name())
            .with_name(self.name(id).unwrap_or_default())
            .with_flags(e.flags)
            .with_transform(e.transform);
        captured.order = e.order;
        captured.units = e.units;
        captured.style = crate::widget::snapshot(self, id);

        let mut tree = SkinTree::new();
        tree.styles = e.styles.clone();
        for child in self.children(id) {
            let user = self.tree.get(child).is_some_and(|w| w.element.origin == Origin::User);
            if user {
                if let Some(element) = self.capture_layout(child) {
                    tree.children.push(element);
                }
            }
        }
        captured.tree = tree;
        Some(captured)
    }

    /// Capture a subtree and write it as a skin document named `skin_name`.
    pub fn save_layout(&self, id: NodeId, skin_name: &str) -> Option<String> {
        let mut skin = Skin::new(skin_name);
        skin.tree.children.push(self.capture_layout(id)?);
        Some(SkinWriter::new(&self.flags, &self.names).write(&skin))
    }

    /// Recreate the widgets of a captured layout under `at`.
    pub fn restore_layout(&mut self, at: Option<InsertAt>, element: &SkinElement) -> GuiResult<NodeId> {
        let id = self.create_with_flags(at, &element.type_name, &element.name, element.transform, element.flags)?;
        if let Some(widget) = self.tree.get_mut(id) {
            widget.element.units = element.units;
            widget.element.order = element.order;
            widget.element.styles = element.tree.styles.clone();
        }
        self.apply(id, &element.style);
        for child in &element.tree.children {
            self.restore_layout(Some(InsertAt::Last(id)), child)?;
        }
        Ok(id)
    }
}
