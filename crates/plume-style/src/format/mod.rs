//! Text encoding of numbers, coordinates and fonts in skin attributes.
//!
//! Every coordinate edge may carry a unit. Units are packed two bits per edge
//! into a `u16`: left, top, right, bottom from the low bits up. Vectors use the
//! left slot for X and the top slot for Y.

mod read;
mod write;

pub use read::{
    parse_abs, parse_abs_rect, parse_coord, parse_crect, parse_cvec, parse_float, parse_font,
    parse_hex, parse_int,
};
pub use write::{
    abs_rect_string, crect_string, cvec_string, float_string, font_string, write_abs,
    write_coord, write_float, write_hex, write_int,
};

/// A length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum Unit {
    /// Device-independent pixels. Written without a suffix.
    #[default]
    Dp = 0,
    /// Physical pixels.
    Px = 1,
    /// Multiples of the font size.
    Em = 2,
    /// Scale-independent points.
    Sp = 3,
}

impl Unit {
    /// Decode two bits.
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            1 => Unit::Px,
            2 => Unit::Em,
            3 => Unit::Sp,
            _ => Unit::Dp,
        }
    }

    /// The written suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Dp => "",
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Sp => "sp",
        }
    }

    /// The unit for one slot of a packed unit set.
    pub fn at(units: u16, slot: UnitSlot) -> Self {
        Self::from_bits(units >> slot.shift())
    }

    /// Pack this unit into a slot.
    pub fn packed(self, slot: UnitSlot) -> u16 {
        (self as u16) << slot.shift()
    }
}

/// A slot in a packed unit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSlot {
    Left,
    Top,
    Right,
    Bottom,
}

impl UnitSlot {
    /// Slots of a rectangle, in written order.
    pub const RECT: [UnitSlot; 4] = [UnitSlot::Left, UnitSlot::Top, UnitSlot::Right, UnitSlot::Bottom];
    /// Slots of a vector, in written order.
    pub const VEC: [UnitSlot; 2] = [UnitSlot::Left, UnitSlot::Top];

    fn shift(self) -> u16 {
        match self {
            UnitSlot::Left => 0,
            UnitSlot::Top => 2,
            UnitSlot::Right => 4,
            UnitSlot::Bottom => 6,
        }
    }
}
