//! Skin registry and inheritance resolution.

use plume_core::logging::targets;

use crate::flags::FlagTable;
use crate::names::StyleIndex;
use crate::skin::{Skin, SkinElement, SkinReader, StyleEntry};
use crate::style::Style;
use crate::Result;

/// A skin with its `inherit` chain flattened, ancestors first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSkin {
    /// Base styles of every skin in the chain, concatenated.
    pub base: Style,
    /// Style blocks of every skin in the chain, concatenated.
    pub styles: Vec<StyleEntry>,
    /// Child elements of every skin in the chain, concatenated.
    pub children: Vec<SkinElement>,
}

impl ResolvedSkin {
    /// Style blocks that apply under the current style mask, in replay order.
    pub fn matching(&self, current: u32) -> impl Iterator<Item = &StyleEntry> {
        self.styles
            .iter()
            .filter(move |e| e.mask != 0 && e.mask & !current == 0)
    }
}

/// Named skins, looked up by name including nested sub-skins.
#[derive(Debug, Clone, Default)]
pub struct SkinLibrary {
    skins: Vec<Skin>,
}

impl SkinLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skin, replacing any top-level skin with the same name.
    pub fn add(&mut self, skin: Skin) {
        match self.skins.iter_mut().find(|s| s.name == skin.name) {
            Some(existing) => {
                tracing::debug!(target: targets::SKIN, skin = %skin.name, "replacing skin");
                *existing = skin;
            }
            None => self.skins.push(skin),
        }
    }

    /// Parse a skin document and add it.
    pub fn load_str(&mut self, text: &str, flags: &FlagTable, names: &mut StyleIndex) -> Result<()> {
        let skin = SkinReader::new(flags, names).read_str(text)?;
        self.add(skin);
        Ok(())
    }

    /// Find a skin by name, searching nested skins after top-level ones.
    pub fn get(&self, name: &str) -> Option<&Skin> {
        self.skins
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.skins.iter().find_map(|s| s.find_skin(name)))
    }

    /// Remove a top-level skin.
    pub fn remove(&mut self, name: &str) -> Option<Skin> {
        let index = self.skins.iter().position(|s| s.name == name)?;
        Some(self.skins.remove(index))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skins.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }

    /// The inheritance chain of `name`, root ancestor first and `name` last.
    ///
    /// Missing ancestors end the chain. A cycle is logged and cut at the first
    /// repeated skin.
    pub fn chain(&self, name: &str) -> Vec<&Skin> {
        let mut chain: Vec<&Skin> = Vec::new();
        let mut next = Some(name);
        while let Some(current) = next {
            let Some(skin) = self.get(current) else {
                if !chain.is_empty() {
                    tracing::warn!(target: targets::SKIN, skin = current, "inherited skin not found");
                }
                break;
            };
            if chain.iter().any(|s| std::ptr::eq(*s, skin)) {
                tracing::warn!(target: targets::SKIN, skin = current, "skin inheritance cycle");
                break;
            }
            chain.push(skin);
            next = skin.inherit.as_deref();
        }
        chain.reverse();
        chain
    }

    /// The style block stored under exactly `mask` on `name`, falling back
    /// to its ancestors nearest first.
    pub fn find_style(&self, name: &str, mask: u32) -> Option<&Style> {
        self.chain(name)
            .into_iter()
            .rev()
            .find_map(|skin| skin.tree.style(mask))
    }

    /// Flatten `name` and its ancestors.
    pub fn resolve(&self, name: &str) -> Option<ResolvedSkin> {
        let chain = self.chain(name);
        if chain.is_empty() {
            return None;
        }
        let mut resolved = ResolvedSkin::default();
        for skin in chain {
            resolved.base.extend_from(&skin.style);
            resolved.styles.extend(skin.tree.styles.iter().cloned());
            resolved.children.extend(skin.tree.children.iter().cloned());
        }
        Some(resolved)
    }
}
