//! Coordinate model for Plume.
//!
//! Every element's geometry is expressed relative to its parent: each edge is
//! an absolute pixel offset plus a fraction of the parent's extent. Resolving a
//! relative rectangle against an already resolved parent rectangle is a pure
//! function, so layout is a single top-down tree walk.
//!
//! # Key Types
//!
//! - [`Coord`] - One relative+absolute coordinate
//! - [`CVec`] / [`CRect`] - Relative vectors and rectangles
//! - [`AbsVec`] / [`AbsRect`] - Resolved pixel-space vectors and rectangles
//! - [`Transform`] - An element's area, rotation and rotation center
//! - [`ChangeBits`] - Which geometric categories differ between two values

use std::fmt;
use std::ops::{Add, BitOr, BitOrAssign, Sub};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A single coordinate: an absolute offset plus a fraction of the container's extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    /// Absolute offset in pixels.
    pub abs: f32,
    /// Fraction of the container extent (0.0 = min edge, 1.0 = max edge).
    pub rel: f32,
}

impl Coord {
    /// A coordinate of zero.
    pub const ZERO: Self = Self { abs: 0.0, rel: 0.0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(abs: f32, rel: f32) -> Self {
        Self { abs, rel }
    }

    /// A purely absolute coordinate.
    #[inline]
    pub const fn abs(abs: f32) -> Self {
        Self { abs, rel: 0.0 }
    }

    /// A purely relative coordinate.
    #[inline]
    pub const fn rel(rel: f32) -> Self {
        Self { abs: 0.0, rel }
    }

    /// Resolve against the `[min, max]` extent of a container.
    #[inline]
    pub fn resolve(self, min: f32, max: f32) -> f32 {
        self.abs + lerp(min, max, self.rel)
    }
}

/// A resolved point or extent in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AbsVec {
    pub x: f32,
    pub y: f32,
}

impl AbsVec {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for AbsVec {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for AbsVec {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A relative vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CVec {
    pub x: Coord,
    pub y: Coord,
}

impl CVec {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: Coord::ZERO,
        y: Coord::ZERO,
    };

    /// Create a new relative vector.
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Resolve this vector against a container rectangle.
    ///
    /// The absolute position is `abs + lerp(min_edge, max_edge, rel)` per axis.
    #[inline]
    pub fn resolve(&self, container: &AbsRect) -> AbsVec {
        AbsVec {
            x: self.x.resolve(container.left, container.right),
            y: self.y.resolve(container.top, container.bottom),
        }
    }
}

/// A rectangle in pixel space.
///
/// `left <= right` and `top <= bottom` are not enforced. Hit-testing treats the
/// rectangle as half-open: the minimum edges are inside, the maximum edges are not.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AbsRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl AbsRect {
    /// An empty rectangle at the origin.
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Create a new rectangle from its edges.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// The top-left corner.
    #[inline]
    pub fn origin(&self) -> AbsVec {
        AbsVec::new(self.left, self.top)
    }

    /// True iff `x ∈ [left, right)` and `y ∈ [top, bottom)`.
    ///
    /// Adjacent rectangles never both claim a shared boundary pixel.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x < self.right && x >= self.left && y < self.bottom && y >= self.top
    }

    /// Shrink the rectangle by the given per-edge insets.
    #[inline]
    pub fn inset(&self, by: &AbsRect) -> AbsRect {
        AbsRect {
            left: self.left + by.left,
            top: self.top + by.top,
            right: self.right - by.right,
            bottom: self.bottom - by.bottom,
        }
    }

    /// Swap edges so that `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> AbsRect {
        AbsRect {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    /// Compare two rectangles.
    ///
    /// Size bits are set when the extent along an axis differs, position bits when
    /// either edge along that axis differs.
    pub fn compare(&self, other: &AbsRect) -> ChangeBits {
        let mut bits = ChangeBits::NONE;
        if (self.left - other.left) != (self.right - other.right) {
            bits |= ChangeBits::WIDTH;
        }
        if (self.top - other.top) != (self.bottom - other.bottom) {
            bits |= ChangeBits::HEIGHT;
        }
        if self.left != other.left || self.right != other.right {
            bits |= ChangeBits::X;
        }
        if self.top != other.top || self.bottom != other.bottom {
            bits |= ChangeBits::Y;
        }
        bits
    }

    /// Convert to integer pixel edges, truncating toward zero.
    pub fn to_i32_truncated(&self) -> [i32; 4] {
        [
            self.left as i32,
            self.top as i32,
            self.right as i32,
            self.bottom as i32,
        ]
    }

    /// Convert to wide integer pixel edges, rounding to nearest (ties to even).
    pub fn to_i64_rounded(&self) -> [i64; 4] {
        [
            self.left.round_ties_even() as i64,
            self.top.round_ties_even() as i64,
            self.right.round_ties_even() as i64,
            self.bottom.round_ties_even() as i64,
        ]
    }
}

/// A rectangle whose edges are relative to a parent rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CRect {
    pub left: Coord,
    pub top: Coord,
    pub right: Coord,
    pub bottom: Coord,
}

impl CRect {
    /// All edges zero.
    pub const EMPTY: Self = Self {
        left: Coord::ZERO,
        top: Coord::ZERO,
        right: Coord::ZERO,
        bottom: Coord::ZERO,
    };

    /// Fills the parent rectangle completely.
    pub const FILL: Self = Self {
        left: Coord::ZERO,
        top: Coord::ZERO,
        right: Coord::rel(1.0),
        bottom: Coord::rel(1.0),
    };

    /// Create a new relative rectangle.
    #[inline]
    pub const fn new(left: Coord, top: Coord, right: Coord, bottom: Coord) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A purely absolute rectangle.
    pub const fn from_abs(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: Coord::abs(left),
            top: Coord::abs(top),
            right: Coord::abs(right),
            bottom: Coord::abs(bottom),
        }
    }

    /// Resolve against an absolute container rectangle.
    pub fn resolve(&self, container: &AbsRect) -> AbsRect {
        AbsRect {
            left: self.left.resolve(container.left, container.right),
            top: self.top.resolve(container.top, container.bottom),
            right: self.right.resolve(container.left, container.right),
            bottom: self.bottom.resolve(container.top, container.bottom),
        }
    }

    /// Absolute width component (ignores the relative parts).
    #[inline]
    pub fn abs_width(&self) -> f32 {
        self.right.abs - self.left.abs
    }

    /// Absolute height component (ignores the relative parts).
    #[inline]
    pub fn abs_height(&self) -> f32 {
        self.bottom.abs - self.top.abs
    }

    /// Compare two relative rectangles, reporting absolute and relative changes separately.
    pub fn compare(&self, other: &CRect) -> ChangeBits {
        let mut bits = ChangeBits::NONE;
        let (l, r) = (self, other);

        if (l.left.abs - r.left.abs) != (l.right.abs - r.right.abs) {
            bits |= ChangeBits::WIDTH;
        }
        if (l.top.abs - r.top.abs) != (l.bottom.abs - r.bottom.abs) {
            bits |= ChangeBits::HEIGHT;
        }
        if l.left.abs != r.left.abs || l.right.abs != r.right.abs {
            bits |= ChangeBits::X;
        }
        if l.top.abs != r.top.abs || l.bottom.abs != r.bottom.abs {
            bits |= ChangeBits::Y;
        }

        if (l.left.rel - r.left.rel) != (l.right.rel - r.right.rel) {
            bits |= ChangeBits::REL_WIDTH;
        }
        if (l.top.rel - r.top.rel) != (l.bottom.rel - r.bottom.rel) {
            bits |= ChangeBits::REL_HEIGHT;
        }
        if l.left.rel != r.left.rel || l.right.rel != r.right.rel {
            bits |= ChangeBits::REL_X;
        }
        if l.top.rel != r.top.rel || l.bottom.rel != r.bottom.rel {
            bits |= ChangeBits::REL_Y;
        }
        bits
    }

    /// Move the absolute origin to `to`, preserving absolute width and height.
    pub fn moved_to(&self, to: AbsVec) -> CRect {
        let (w, h) = (self.abs_width(), self.abs_height());
        let mut r = *self;
        r.left.abs = to.x;
        r.top.abs = to.y;
        r.right.abs = to.x + w;
        r.bottom.abs = to.y + h;
        r
    }

    /// Like [`moved_to`](Self::moved_to) but with the axes transposed.
    ///
    /// The point's `y` becomes the left edge and `x` the top edge, and the width
    /// and height are swapped. Used when flowing quarter-turn rotated items.
    pub fn moved_to_transposed(&self, to: AbsVec) -> CRect {
        let (w, h) = (self.abs_height(), self.abs_width());
        let mut r = *self;
        r.left.abs = to.y;
        r.top.abs = to.x;
        r.right.abs = to.y + w;
        r.bottom.abs = to.x + h;
        r
    }
}

/// Categories of geometric change reported by the `compare` functions.
///
/// Callers can skip re-layout when only a non-visual attribute changed, or skip
/// a redraw of children when only the position moved.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChangeBits(u16);

impl ChangeBits {
    pub const NONE: Self = Self(0);
    /// Absolute horizontal extent changed.
    pub const WIDTH: Self = Self(1 << 0);
    /// Absolute vertical extent changed.
    pub const HEIGHT: Self = Self(1 << 1);
    /// Absolute horizontal position changed.
    pub const X: Self = Self(1 << 2);
    /// Absolute vertical position changed.
    pub const Y: Self = Self(1 << 3);
    /// Relative horizontal extent changed.
    pub const REL_WIDTH: Self = Self(1 << 4);
    /// Relative vertical extent changed.
    pub const REL_HEIGHT: Self = Self(1 << 5);
    /// Relative horizontal position changed.
    pub const REL_X: Self = Self(1 << 6);
    /// Relative vertical position changed.
    pub const REL_Y: Self = Self(1 << 7);
    /// Horizontal rotation center changed.
    pub const CENTER_X: Self = Self(1 << 8);
    /// Vertical rotation center changed.
    pub const CENTER_Y: Self = Self(1 << 9);
    /// Rotation changed.
    pub const ROTATION: Self = Self(1 << 10);

    /// Any size change, absolute or relative.
    pub const SIZE: Self = Self(Self::WIDTH.0 | Self::HEIGHT.0 | Self::REL_WIDTH.0 | Self::REL_HEIGHT.0);
    /// Any position change, absolute or relative.
    pub const POSITION: Self = Self(Self::X.0 | Self::Y.0 | Self::REL_X.0 | Self::REL_Y.0);

    /// Raw bit representation.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True if no bit is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit in `other` is set.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ChangeBits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeBits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ChangeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 11] = [
            "WIDTH", "HEIGHT", "X", "Y", "REL_WIDTH", "REL_HEIGHT", "REL_X", "REL_Y", "CENTER_X",
            "CENTER_Y", "ROTATION",
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        write!(f, "ChangeBits({})", set.join(" | "))
    }
}

/// The geometry of an element: area, rotation and rotation center.
///
/// Rotation (radians) is applied around `center`, which is itself relative to the
/// resolved area, not the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub area: CRect,
    pub rotation: f32,
    pub center: CVec,
}

impl Transform {
    /// Fill the parent, no rotation.
    pub const FILL: Self = Self {
        area: CRect::FILL,
        rotation: 0.0,
        center: CVec::ZERO,
    };

    /// A zero-sized area anchored at the parent's center, rotating around its own center.
    pub const CENTER: Self = Self {
        area: CRect {
            left: Coord::rel(0.5),
            top: Coord::rel(0.5),
            right: Coord::rel(0.5),
            bottom: Coord::rel(0.5),
        },
        rotation: 0.0,
        center: CVec {
            x: Coord::rel(0.5),
            y: Coord::rel(0.5),
        },
    };

    /// A transform with the given area and no rotation.
    pub const fn with_area(area: CRect) -> Self {
        Self {
            area,
            rotation: 0.0,
            center: CVec::ZERO,
        }
    }

    /// Resolve against the parent's absolute rectangle.
    pub fn resolve(&self, container: &AbsRect) -> ResolvedTransform {
        let rect = self.area.resolve(container);
        let center = self.center.resolve(&rect);
        ResolvedTransform {
            rect,
            rotation: self.rotation,
            center,
        }
    }

    /// Compare two transforms: area bits plus center and rotation bits.
    pub fn compare(&self, other: &Transform) -> ChangeBits {
        let mut bits = self.area.compare(&other.area);
        if self.center.x != other.center.x {
            bits |= ChangeBits::CENTER_X;
        }
        if self.center.y != other.center.y {
            bits |= ChangeBits::CENTER_Y;
        }
        if self.rotation != other.rotation {
            bits |= ChangeBits::ROTATION;
        }
        bits
    }
}

/// A transform resolved to pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedTransform {
    /// The unrotated absolute rectangle.
    pub rect: AbsRect,
    /// Rotation in radians around `center`.
    pub rotation: f32,
    /// Absolute rotation center.
    pub center: AbsVec,
}

impl ResolvedTransform {
    /// Rotation-aware hit test.
    ///
    /// The point is rotated by `-rotation` around the center and then tested
    /// against the unrotated rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        if self.rotation == 0.0 {
            return self.rect.contains(x, y);
        }
        let p = self.unrotate(AbsVec::new(x, y));
        self.rect.contains(p.x, p.y)
    }

    /// Map a point from screen space into the unrotated space of the rectangle.
    pub fn unrotate(&self, p: AbsVec) -> AbsVec {
        let (sin, cos) = (-self.rotation).sin_cos();
        let d = p - self.center;
        AbsVec::new(
            self.center.x + d.x * cos - d.y * sin,
            self.center.y + d.x * sin + d.y * cos,
        )
    }

    /// True if the rotation is an odd multiple of a quarter turn.
    pub fn is_quarter_turn(rotation: f32) -> bool {
        let turns = rotation / std::f32::consts::FRAC_PI_2;
        let nearest = turns.round();
        (turns - nearest).abs() < 1e-4 && (nearest as i64) % 2 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> AbsRect {
        AbsRect::new(10.0, 20.0, 110.0, 220.0)
    }

    #[test]
    fn test_resolve_vec() {
        let v = CVec::new(Coord::new(5.0, 0.5), Coord::new(-2.0, 0.25));
        let r = v.resolve(&parent());
        assert_eq!(r, AbsVec::new(65.0, 68.0));
    }

    #[test]
    fn test_resolve_vec_translation_invariant_in_abs() {
        let container = parent();
        for &(a, da, t) in &[(0.0f32, 4.0f32, 0.0f32), (3.0, -8.0, 0.5), (-16.0, 2.0, 1.0)] {
            let base = CVec::new(Coord::new(a, t), Coord::new(a, t)).resolve(&container);
            let moved = CVec::new(Coord::new(a + da, t), Coord::new(a + da, t)).resolve(&container);
            assert_eq!(moved, base + AbsVec::new(da, da));
        }
    }

    #[test]
    fn test_resolve_vec_affine_in_rel() {
        let container = parent();
        let at = |t: f32| CVec::new(Coord::rel(t), Coord::rel(t)).resolve(&container);
        let (p0, p1, half) = (at(0.0), at(1.0), at(0.5));
        assert_eq!(p0, AbsVec::new(10.0, 20.0));
        assert_eq!(p1, AbsVec::new(110.0, 220.0));
        assert_eq!(half, AbsVec::new(60.0, 120.0));
    }

    #[test]
    fn test_resolve_crect() {
        let r = CRect::new(
            Coord::abs(5.0),
            Coord::rel(0.5),
            Coord::new(-5.0, 1.0),
            Coord::rel(1.0),
        )
        .resolve(&parent());
        assert_eq!(r, AbsRect::new(15.0, 120.0, 105.0, 220.0));
    }

    #[test]
    fn test_hit_test_half_open() {
        let r = AbsRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.999, 9.999));
        assert!(!r.contains(10.0, 5.0));
        assert!(!r.contains(5.0, 10.0));
        assert!(!r.contains(-0.001, 5.0));

        // Adjacent rectangles never both claim the boundary.
        let right = AbsRect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!r.contains(10.0, 5.0) || !right.contains(10.0, 5.0));
        assert!(right.contains(10.0, 5.0));
    }

    #[test]
    fn test_compare_self_is_empty() {
        let a = AbsRect::new(1.0, 2.0, 3.0, 4.0);
        assert!(a.compare(&a).is_empty());

        let c = CRect::new(Coord::new(1.0, 0.1), Coord::abs(2.0), Coord::rel(1.0), Coord::new(3.0, 0.5));
        assert!(c.compare(&c).is_empty());

        let t = Transform {
            area: c,
            rotation: 0.7,
            center: CVec::new(Coord::rel(0.5), Coord::abs(3.0)),
        };
        assert!(t.compare(&t).is_empty());
    }

    #[test]
    fn test_compare_abs_categories() {
        let a = AbsRect::new(0.0, 0.0, 10.0, 10.0);

        let moved = AbsRect::new(5.0, 0.0, 15.0, 10.0);
        assert_eq!(a.compare(&moved), ChangeBits::X);

        let wider = AbsRect::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(a.compare(&wider), ChangeBits::WIDTH | ChangeBits::X);

        let taller = AbsRect::new(0.0, 0.0, 10.0, 12.0);
        assert_eq!(a.compare(&taller), ChangeBits::HEIGHT | ChangeBits::Y);
    }

    #[test]
    fn test_compare_relative_separately() {
        let a = CRect::FILL;
        let mut b = a;
        b.left.rel = 0.25;
        b.right.rel = 1.25;
        let bits = a.compare(&b);
        assert_eq!(bits, ChangeBits::REL_X);
        assert!(!bits.intersects(ChangeBits::SIZE));
    }

    #[test]
    fn test_compare_transform_rotation_and_center() {
        let a = Transform::FILL;
        let mut b = a;
        b.rotation = 1.0;
        b.center.y = Coord::rel(0.5);
        assert_eq!(a.compare(&b), ChangeBits::ROTATION | ChangeBits::CENTER_Y);
    }

    #[test]
    fn test_moved_to_preserves_size() {
        let r = CRect::from_abs(10.0, 10.0, 40.0, 30.0);
        let m = r.moved_to(AbsVec::new(100.0, 50.0));
        assert_eq!(m, CRect::from_abs(100.0, 50.0, 130.0, 70.0));
    }

    #[test]
    fn test_moved_to_transposed_swaps_size() {
        let r = CRect::from_abs(0.0, 0.0, 30.0, 20.0);
        let m = r.moved_to_transposed(AbsVec::new(5.0, 7.0));
        assert_eq!(m, CRect::from_abs(7.0, 5.0, 27.0, 35.0));
    }

    #[test]
    fn test_integer_conversion() {
        let r = AbsRect::new(1.7, -1.7, 2.5, 3.5);
        assert_eq!(r.to_i32_truncated(), [1, -1, 2, 3]);
        assert_eq!(r.to_i64_rounded(), [2, -2, 2, 4]);
    }

    #[test]
    fn test_rotated_hit_test() {
        let t = Transform {
            area: CRect::from_abs(0.0, 0.0, 100.0, 10.0),
            rotation: std::f32::consts::FRAC_PI_2,
            center: CVec::new(Coord::rel(0.5), Coord::rel(0.5)),
        };
        let resolved = t.resolve(&AbsRect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(resolved.center, AbsVec::new(50.0, 5.0));
        // The bar now stands vertically through its center.
        assert!(resolved.contains(50.0, 40.0));
        assert!(!resolved.contains(90.0, 5.0));
    }

    #[test]
    fn test_quarter_turn_detection() {
        use std::f32::consts::{FRAC_PI_2, PI};
        assert!(ResolvedTransform::is_quarter_turn(FRAC_PI_2));
        assert!(ResolvedTransform::is_quarter_turn(-FRAC_PI_2));
        assert!(!ResolvedTransform::is_quarter_turn(PI));
        assert!(!ResolvedTransform::is_quarter_turn(0.0));
    }
}
