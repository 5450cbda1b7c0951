//! Style names and their bits.
//!
//! Every style name ("hover", "active", "checked", ...) is assigned one bit of
//! a `u32` the first time it is seen. A style block named `"hover+checked"` is
//! stored under the union of both bits, and a widget's current style is the
//! union of the names applied to it.
//!
//! Names can be grouped. Applying a name clears the other bits of its group,
//! which is how `neutral`, `hover` and `active` stay mutually exclusive.

use plume_core::logging::targets;

/// Maximum number of distinct style names.
pub const MAX_STYLE_NAMES: usize = 32;

/// Bidirectional map between style names and bits.
#[derive(Debug, Clone, Default)]
pub struct StyleIndex {
    names: Vec<String>,
    groups: Vec<u32>,
}

impl StyleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bit for `name`, registering it if needed.
    ///
    /// Returns `None` once all 32 bits are taken.
    pub fn get_or_insert(&mut self, name: &str) -> Option<u32> {
        if let Some(bit) = self.get(name) {
            return Some(bit);
        }
        if self.names.len() >= MAX_STYLE_NAMES {
            tracing::warn!(target: targets::STYLE, name, "style name table is full");
            return None;
        }
        self.names.push(name.to_string());
        Some(1 << (self.names.len() - 1))
    }

    /// The bit for `name` if it has been registered.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.iter().position(|n| n == name).map(|i| 1 << i)
    }

    /// The name registered for a single bit.
    pub fn name_of(&self, bit: u32) -> Option<&str> {
        if !bit.is_power_of_two() {
            return None;
        }
        self.names.get(bit.trailing_zeros() as usize).map(String::as_str)
    }

    /// The mask for a `+`-joined list of names, registering new names.
    pub fn mask_of(&mut self, names: &str) -> u32 {
        names
            .split('+')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .filter_map(|n| self.get_or_insert(n))
            .fold(0, |mask, bit| mask | bit)
    }

    /// Reconstruct a `+`-joined name from a mask, highest bit first.
    ///
    /// Bits with no registered name are skipped.
    pub fn write_mask(&self, mut mask: u32) -> String {
        let mut out = String::new();
        while mask != 0 {
            let bit = 1 << (u32::BITS - 1 - mask.leading_zeros());
            if let Some(name) = self.name_of(bit) {
                if !out.is_empty() {
                    out.push('+');
                }
                out.push_str(name);
            }
            mask ^= bit;
        }
        out
    }

    /// Register a group of mutually exclusive names. Returns the group mask.
    pub fn add_group(&mut self, names: &[&str]) -> u32 {
        let mask = names
            .iter()
            .filter_map(|n| self.get_or_insert(n))
            .fold(0, |mask, bit| mask | bit);
        self.groups.retain(|g| g & mask == 0);
        self.groups.push(mask);
        mask
    }

    /// The group containing `bit`, or `bit` itself when it is ungrouped.
    pub fn group_of(&self, bit: u32) -> u32 {
        self.groups
            .iter()
            .copied()
            .find(|g| g & bit != 0)
            .unwrap_or(bit)
    }

    /// Apply a `+`-joined list of names to a current style mask.
    ///
    /// Each name replaces the other members of its group.
    pub fn apply_names(&mut self, current: u32, names: &str) -> u32 {
        let mut mask = current;
        for name in names.split('+').map(str::trim).filter(|n| !n.is_empty()) {
            if let Some(bit) = self.get_or_insert(name) {
                mask = (mask & !self.group_of(bit)) | bit;
            }
        }
        mask
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
