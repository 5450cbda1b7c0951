use std::fmt::Write as FmtWrite;

use plume_core::{AbsRect, CRect, CVec, Coord, FontDesc};

use super::{Unit, UnitSlot};

/// Write a float: integral values as integers, anything else with one decimal.
///
/// Rounding is half to even on the exact binary value, so `1.25` becomes
/// `"1.2"` and `1.35` (stored just above 1.35) becomes `"1.4"`. A value that
/// rounds to a whole number drops the `.0`.
pub fn write_float(out: &mut String, value: f32) {
    if value.fract() == 0.0 {
        write_int(out, value as i64);
        return;
    }
    let tenths = (f64::from(value) * 10.0).round_ties_even() as i64;
    if tenths % 10 == 0 {
        write_int(out, tenths / 10);
        return;
    }
    if tenths < 0 {
        out.push('-');
    }
    let t = tenths.unsigned_abs();
    let _ = write!(out, "{}.{}", t / 10, t % 10);
}

pub fn write_int(out: &mut String, value: i64) {
    let _ = write!(out, "{value}");
}

/// Eight upper-case hex digits, for colors.
pub fn write_hex(out: &mut String, value: u32) {
    let _ = write!(out, "{value:08X}");
}

/// An absolute length with its unit suffix. Zero is written bare.
pub fn write_abs(out: &mut String, value: f32, unit: Unit) {
    write_float(out, value);
    if value != 0.0 {
        out.push_str(unit.suffix());
    }
}

/// A coordinate: `abs[unit]`, `rel%` or `abs:rel`.
pub fn write_coord(out: &mut String, coord: Coord, unit: Unit) {
    if coord.rel == 0.0 {
        write_abs(out, coord.abs, unit);
    } else if coord.abs == 0.0 {
        write_float(out, coord.rel * 100.0);
        out.push('%');
    } else {
        write_float(out, coord.abs);
        out.push(':');
        write_float(out, coord.rel);
    }
}

pub fn float_string(value: f32) -> String {
    let mut out = String::new();
    write_float(&mut out, value);
    out
}

pub fn cvec_string(vec: &CVec, units: u16) -> String {
    let mut out = String::new();
    for (i, (coord, slot)) in [vec.x, vec.y].into_iter().zip(UnitSlot::VEC).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_coord(&mut out, coord, Unit::at(units, slot));
    }
    out
}

pub fn abs_rect_string(rect: &AbsRect, units: u16) -> String {
    let mut out = String::new();
    let edges = [rect.left, rect.top, rect.right, rect.bottom];
    for (i, (value, slot)) in edges.into_iter().zip(UnitSlot::RECT).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_abs(&mut out, value, Unit::at(units, slot));
    }
    out
}

pub fn crect_string(rect: &CRect, units: u16) -> String {
    let mut out = String::new();
    let edges = [rect.left, rect.top, rect.right, rect.bottom];
    for (i, (coord, slot)) in edges.into_iter().zip(UnitSlot::RECT).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_coord(&mut out, coord, Unit::at(units, slot));
    }
    out
}

/// `size [weight] [italic] family`; the weight is omitted when regular.
pub fn font_string(font: &FontDesc) -> String {
    let mut out = String::new();
    write_int(&mut out, i64::from(font.size));
    if font.weight != 400 {
        out.push(' ');
        write_int(&mut out, i64::from(font.weight));
    }
    if font.italic {
        out.push_str(" italic");
    }
    out.push(' ');
    out.push_str(&font.family);
    out
}
