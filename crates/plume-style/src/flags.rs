//! Flag names and the flag diff encoding.
//!
//! Skins store flags as the difference from a widget type's default flags:
//! `flags="hidden|expand|-tiley"` turns `hidden` and both `expand` bits on and
//! the default `tiley` bit off. Names are looked up per type first, then among
//! the names shared by every element.
//!
//! Encoding scans 3-bit windows from the low bit upward, each window starting
//! at the lowest bit not yet written. Within a window the widest set of bits
//! that has a name wins, so `SNAPX | SNAPY` is written as
//! `snap` rather than `snapx|snapy`. The output only depends on the mask and
//! the table.

use std::collections::HashMap;

use plume_core::flags::{class, element, list, text, textbox, window};
use plume_core::logging::targets;

const WINDOW_BITS: u32 = 3;

#[derive(Debug, Clone, Default)]
struct TypeFlags {
    default: u32,
    names: Vec<(String, u32)>,
}

/// Per-type flag names and default flags.
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    common: Vec<(String, u32)>,
    types: HashMap<String, TypeFlags>,
}

impl FlagTable {
    /// An empty table with no names.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for the built-in widget types.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.add_common(&[
            ("background", element::BACKGROUND),
            ("noclip", element::NOCLIP),
            ("ignore", element::IGNORE),
            ("hidden", element::HIDDEN),
            ("snapx", element::SNAPX),
            ("snapy", element::SNAPY),
            ("snap", element::SNAP),
            ("expandx", element::EXPANDX),
            ("expandy", element::EXPANDY),
            ("expand", element::EXPAND),
            ("disable", element::DISABLE),
            ("nohittest", element::NOHITTEST),
        ]);

        table.add_type(class::ELEMENT, 0, &[]);
        table.add_type(class::CONTROL, 0, &[]);
        table.add_type(class::BUTTON, 0, &[]);
        table.add_type(class::CHECKBOX, 0, &[]);
        table.add_type(class::CONTAINER, 0, &[]);
        table.add_type(
            class::TEXT,
            element::NOHITTEST,
            &[
                ("wordwrap", text::WORDWRAP),
                ("ellipses", text::ELLIPSES),
                ("rightalign", text::RIGHTALIGN),
                ("center", text::CENTER),
            ],
        );
        table.add_type(
            class::TEXTBOX,
            0,
            &[
                ("singleline", textbox::SINGLELINE),
                ("readonly", textbox::READONLY),
                ("actionenter", textbox::ACTIONENTER),
            ],
        );
        table.add_type(
            class::LIST,
            list::TILEY,
            &[
                ("tilex", list::TILEX),
                ("tiley", list::TILEY),
                ("tile", list::TILE),
                ("distributex", list::DISTRIBUTEX),
                ("distributey", list::DISTRIBUTEY),
                ("distribute", list::DISTRIBUTE),
                ("select", list::SELECT),
            ],
        );
        table.add_type(
            class::WINDOW,
            window::MINIMIZABLE | window::MAXIMIZABLE | window::RESIZABLE,
            &[
                ("minimizable", window::MINIMIZABLE),
                ("maximizable", window::MAXIMIZABLE),
                ("resizable", window::RESIZABLE),
                ("nocaption", window::NOCAPTION),
            ],
        );
        table
    }

    /// Register names shared by every type.
    pub fn add_common(&mut self, names: &[(&str, u32)]) {
        self.common
            .extend(names.iter().map(|&(n, bits)| (n.to_string(), bits)));
    }

    /// Register a type with its default flags and type-specific names.
    pub fn add_type(&mut self, type_name: &str, default: u32, names: &[(&str, u32)]) {
        let entry = self.types.entry(type_name.to_string()).or_default();
        entry.default = default;
        entry
            .names
            .extend(names.iter().map(|&(n, bits)| (n.to_string(), bits)));
    }

    /// Default flags for a type. Unknown types default to no flags.
    pub fn default_flags(&self, type_name: &str) -> u32 {
        self.types.get(type_name).map_or(0, |t| t.default)
    }

    /// The name for exactly `bits`, if there is one.
    pub fn name_for(&self, type_name: &str, bits: u32) -> Option<&str> {
        if bits == 0 {
            return None;
        }
        let specific = self
            .types
            .get(type_name)
            .into_iter()
            .flat_map(|t| t.names.iter());
        specific
            .chain(self.common.iter())
            .find(|(_, b)| *b == bits)
            .map(|(n, _)| n.as_str())
    }

    /// One past the highest bit any name for the type covers. Bits at or above
    /// it are never written.
    pub fn bit_end(&self, type_name: &str) -> u32 {
        let specific = self
            .types
            .get(type_name)
            .into_iter()
            .flat_map(|t| t.names.iter());
        specific
            .chain(self.common.iter())
            .map(|(_, bits)| u32::BITS - bits.leading_zeros())
            .max()
            .unwrap_or(0)
    }

    /// The bits for a name.
    pub fn value_of(&self, type_name: &str, name: &str) -> Option<u32> {
        let specific = self
            .types
            .get(type_name)
            .into_iter()
            .flat_map(|t| t.names.iter());
        specific
            .chain(self.common.iter())
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, b)| *b)
    }

    /// Append the names covering `flags` to `out`, each preceded by `divider`
    /// (and by `-` when `remove` is set).
    pub fn write_names(&self, type_name: &str, flags: u32, remove: bool, divider: &str, out: &mut String) {
        let end = self.bit_end(type_name);
        let mut index = 0u32;
        while index < end {
            if flags & (1 << index) == 0 {
                index += 1;
                continue;
            }
            let mut bits = flags & (0b111u32 << index);
            let mut next = index + 1;
            for i in (0..WINDOW_BITS).rev() {
                if let Some(name) = self.name_for(type_name, bits) {
                    out.push_str(divider);
                    if remove {
                        out.push('-');
                    }
                    out.push_str(name);
                    next = u32::BITS - bits.leading_zeros();
                    break;
                }
                bits &= !1u32.checked_shl(index + i).unwrap_or(0);
            }
            index = next;
        }
    }

    /// Encode `flags` as a diff against the type's default flags.
    ///
    /// Additions come first, then removals. An empty string means the flags
    /// equal the default.
    pub fn encode_diff(&self, type_name: &str, flags: u32) -> String {
        let default = self.default_flags(type_name);
        let add = !default & flags;
        let remove = default & !flags;

        let mut out = String::new();
        self.write_names(type_name, add, false, "|", &mut out);
        self.write_names(type_name, remove, true, "|", &mut out);
        if out.starts_with('|') {
            out.remove(0);
        }
        out
    }

    /// Decode a diff string into the full flag set for the type.
    ///
    /// Unknown names are dropped with a warning.
    pub fn decode_diff(&self, type_name: &str, diff: &str) -> u32 {
        let mut flags = self.default_flags(type_name);
        for token in diff.split('|').map(str::trim).filter(|t| !t.is_empty()) {
            let (remove, name) = match token.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, token),
            };
            match self.value_of(type_name, name) {
                Some(bits) if remove => flags &= !bits,
                Some(bits) => flags |= bits,
                None => {
                    tracing::warn!(target: targets::SKIN, type_name, flag = name, "unknown flag name dropped");
                }
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_encode_to_nothing() {
        let table = FlagTable::standard();
        assert_eq!(table.encode_diff(class::LIST, list::TILEY), "");
        assert_eq!(table.encode_diff(class::ELEMENT, 0), "");
        assert_eq!(table.encode_diff("Unknown", 0), "");
    }

    #[test]
    fn multi_bit_names_win() {
        let table = FlagTable::standard();
        assert_eq!(table.encode_diff(class::ELEMENT, element::SNAP), "snap");
        assert_eq!(table.encode_diff(class::ELEMENT, element::SNAPY), "snapy");
        assert_eq!(
            table.encode_diff(class::ELEMENT, element::SNAP | element::EXPANDX),
            "snap|expandx"
        );
        assert_eq!(
            table.encode_diff(class::ELEMENT, element::SNAPY | element::EXPAND),
            "snapy|expand"
        );
    }

    #[test]
    fn additions_then_removals() {
        let table = FlagTable::standard();
        let flags = element::HIDDEN | list::TILEX | list::SELECT;
        assert_eq!(table.encode_diff(class::LIST, flags), "hidden|tilex|select|-tiley");
    }

    #[test]
    fn type_names_shadow_common_names() {
        let table = FlagTable::standard();
        // Bit 10 means different things on different types.
        assert_eq!(table.name_for(class::TEXT, 1 << 10), Some("wordwrap"));
        assert_eq!(table.name_for(class::TEXTBOX, 1 << 10), Some("singleline"));
        assert_eq!(table.name_for(class::BUTTON, 1 << 10), None);
    }

    #[test]
    fn unknown_bits_are_skipped() {
        let table = FlagTable::standard();
        let flags = element::HIDDEN | (1 << 20) | (1 << 31);
        assert_eq!(table.encode_diff(class::ELEMENT, flags), "hidden");
    }

    #[test]
    fn scan_stops_at_the_highest_named_bit() {
        let mut table = FlagTable::new();
        table.add_common(&[("low", 1 << 0), ("pair", 0b110)]);
        table.add_type("Thing", 0, &[("mid", 1 << 4)]);
        assert_eq!(table.bit_end("Thing"), 5);
        assert_eq!(table.bit_end("Other"), 3);
        assert_eq!(FlagTable::new().bit_end("Thing"), 0);

        assert_eq!(table.encode_diff("Thing", 0b10111 | (1 << 29) | (1 << 31)), "low|pair|mid");
        assert_eq!(table.encode_diff("Other", (1 << 4) | 1), "low");

        let standard = FlagTable::standard();
        assert_eq!(standard.bit_end(class::ELEMENT), 10);
        assert_eq!(standard.bit_end(class::LIST), 16);
    }

    #[test]
    fn decode_drops_unknown_names() {
        let table = FlagTable::standard();
        let flags = table.decode_diff(class::ELEMENT, "hidden|bogus|expand");
        assert_eq!(flags, element::HIDDEN | element::EXPAND);
    }

    #[test]
    fn diff_is_idempotent() {
        let table = FlagTable::standard();
        let cases = [
            (class::WINDOW, "nocaption|-minimizable|-resizable"),
            (class::LIST, "ignore|tilex|distribute"),
            (class::TEXT, "wordwrap|center|-nohittest"),
            (class::CHECKBOX, "background|ignore|hidden|expand"),
        ];
        for (ty, diff) in cases {
            let flags = table.decode_diff(ty, diff);
            let encoded = table.encode_diff(ty, flags);
            assert_eq!(encoded, diff, "{ty}");
            assert_eq!(table.encode_diff(ty, flags), encoded);
        }
    }
}
