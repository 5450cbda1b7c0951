//! Element flag bits.
//!
//! The low ten bits are shared by every element. Bits from 10 upward are
//! interpreted per widget type, so the same bit can carry a different meaning
//! (and a different name when serialized) on a list and on a window.

/// Flags shared by all elements.
pub mod element {
    /// Drawn behind the parent's other children and excluded from layout flow.
    pub const BACKGROUND: u32 = 1 << 0;
    /// Children are not clipped to this element.
    pub const NOCLIP: u32 = 1 << 1;
    /// Ignored by the parent's layout.
    pub const IGNORE: u32 = 1 << 2;
    /// Not drawn and not hit-testable, including all descendants.
    pub const HIDDEN: u32 = 1 << 3;
    pub const SNAPX: u32 = 1 << 4;
    pub const SNAPY: u32 = 1 << 5;
    pub const SNAP: u32 = SNAPX | SNAPY;
    pub const EXPANDX: u32 = 1 << 6;
    pub const EXPANDY: u32 = 1 << 7;
    pub const EXPAND: u32 = EXPANDX | EXPANDY;
    /// Input is ignored and the disabled style applies.
    pub const DISABLE: u32 = 1 << 8;
    /// Never the target of a hit test; its children still can be.
    pub const NOHITTEST: u32 = 1 << 9;
}

/// Text flags.
pub mod text {
    pub const WORDWRAP: u32 = 1 << 10;
    pub const ELLIPSES: u32 = 1 << 11;
    pub const RIGHTALIGN: u32 = 1 << 12;
    pub const CENTER: u32 = 1 << 13;
}

/// Textbox flags.
pub mod textbox {
    pub const SINGLELINE: u32 = 1 << 10;
    pub const READONLY: u32 = 1 << 11;
    pub const ACTIONENTER: u32 = 1 << 12;
}

/// List flags.
pub mod list {
    pub const TILEX: u32 = 1 << 11;
    pub const TILEY: u32 = 1 << 12;
    pub const TILE: u32 = TILEX | TILEY;
    /// With both tile flags set, tiles expand along the X direction.
    pub const DISTRIBUTEX: u32 = 1 << 13;
    /// With both tile flags set, tiles expand along the Y direction.
    pub const DISTRIBUTEY: u32 = 1 << 14;
    pub const DISTRIBUTE: u32 = DISTRIBUTEX | DISTRIBUTEY;
    /// Clicking an item selects it.
    pub const SELECT: u32 = 1 << 15;
}

/// Window flags.
pub mod window {
    pub const MINIMIZABLE: u32 = 1 << 10;
    pub const MAXIMIZABLE: u32 = 1 << 11;
    pub const RESIZABLE: u32 = 1 << 12;
    pub const NOCAPTION: u32 = 1 << 13;
}

/// Widget class names, as reported by `GetClassName` and used as element
/// names in skin files.
pub mod class {
    pub const ELEMENT: &str = "Element";
    pub const TEXT: &str = "Text";
    pub const CONTROL: &str = "Control";
    pub const BUTTON: &str = "Button";
    pub const CHECKBOX: &str = "Checkbox";
    pub const TEXTBOX: &str = "Textbox";
    pub const CONTAINER: &str = "Container";
    pub const WINDOW: &str = "Window";
    pub const LIST: &str = "List";
}

/// True if every bit of `flag` is set in `flags`.
#[inline]
pub fn has(flags: u32, flag: u32) -> bool {
    flags & flag == flag
}
