use plume_core::{AbsRect, CRect, CVec, Coord, FontDesc};

use super::{Unit, UnitSlot};

pub fn parse_float(s: &str) -> Option<f32> {
    s.trim().parse().ok()
}

pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Parse a hex color. A leading `#` is accepted.
pub fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}

/// Parse an absolute length with an optional unit suffix.
pub fn parse_abs(s: &str) -> Option<(f32, Unit)> {
    let s = s.trim();
    let (number, unit) = [("px", Unit::Px), ("em", Unit::Em), ("sp", Unit::Sp), ("dp", Unit::Dp)]
        .into_iter()
        .find_map(|(suffix, unit)| s.strip_suffix(suffix).map(|n| (n, unit)))
        .unwrap_or((s, Unit::Dp));
    parse_float(number).map(|v| (v, unit))
}

/// Parse a coordinate in any of the `abs[unit]`, `rel%` and `abs:rel` forms.
pub fn parse_coord(s: &str) -> Option<(Coord, Unit)> {
    let s = s.trim();
    if let Some(percent) = s.strip_suffix('%') {
        return parse_float(percent).map(|p| (Coord::rel(p / 100.0), Unit::Dp));
    }
    if let Some((abs, rel)) = s.split_once(':') {
        let (abs, unit) = parse_abs(abs)?;
        return Some((Coord::new(abs, parse_float(rel)?), unit));
    }
    parse_abs(s).map(|(abs, unit)| (Coord::abs(abs), unit))
}

/// Split into exactly `N` whitespace-separated tokens.
fn tokens<const N: usize>(s: &str) -> Option<[&str; N]> {
    let mut out = [""; N];
    let mut iter = s.split_whitespace();
    for slot in &mut out {
        *slot = iter.next()?;
    }
    iter.next().is_none().then_some(out)
}

pub fn parse_cvec(s: &str) -> Option<(CVec, u16)> {
    let [x, y] = tokens::<2>(s)?;
    let (x, ux) = parse_coord(x)?;
    let (y, uy) = parse_coord(y)?;
    let units = ux.packed(UnitSlot::Left) | uy.packed(UnitSlot::Top);
    Some((CVec::new(x, y), units))
}

pub fn parse_abs_rect(s: &str) -> Option<(AbsRect, u16)> {
    let parts = tokens::<4>(s)?;
    let mut values = [0.0f32; 4];
    let mut units = 0;
    for ((part, value), slot) in parts.into_iter().zip(&mut values).zip(UnitSlot::RECT) {
        let (v, unit) = parse_abs(part)?;
        *value = v;
        units |= unit.packed(slot);
    }
    let [left, top, right, bottom] = values;
    Some((AbsRect::new(left, top, right, bottom), units))
}

pub fn parse_crect(s: &str) -> Option<(CRect, u16)> {
    let parts = tokens::<4>(s)?;
    let mut coords = [Coord::ZERO; 4];
    let mut units = 0;
    for ((part, coord), slot) in parts.into_iter().zip(&mut coords).zip(UnitSlot::RECT) {
        let (c, unit) = parse_coord(part)?;
        *coord = c;
        units |= unit.packed(slot);
    }
    let [left, top, right, bottom] = coords;
    Some((CRect::new(left, top, right, bottom), units))
}

/// Parse `size [weight] [italic] family`.
pub fn parse_font(s: &str) -> Option<FontDesc> {
    let (size, mut rest) = split_token(s.trim_start())?;
    let mut font = FontDesc::new("", size.parse().ok()?);

    if let Some((token, after)) = split_token(rest) {
        if let Ok(weight) = token.parse() {
            font.weight = weight;
            rest = after;
        }
    }
    if let Some((token, after)) = split_token(rest) {
        if token.eq_ignore_ascii_case("italic") {
            font.italic = true;
            rest = after;
        }
    }
    font.family = rest.trim().to_string();
    Some(font)
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    })
}
