//! The rendering backend boundary.
//!
//! The core never draws pixels itself. It resolves geometry and hands the
//! result to a [`Backend`], which may be a GPU renderer, a software rasterizer
//! or a recorder in tests.

use std::sync::Arc;

use crate::coord::{AbsRect, AbsVec, CRect, ResolvedTransform};
use crate::message::FontDesc;

/// Opaque handle to a backend-owned resource (texture, font atlas, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

/// Style attributes passed along with a draw request.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawAttributes {
    /// Fill color as 0xAARRGGBB.
    pub color: u32,
    /// Edge (outline) color as 0xAARRGGBB.
    pub edge_color: u32,
    /// Outline thickness in pixels.
    pub outline: f32,
    /// Opacity multiplier in `[0, 1]`.
    pub alpha: f32,
    /// Texture to draw, if any.
    pub asset: Option<Arc<str>>,
    /// Texture coordinates.
    pub uv: CRect,
    /// Element flags at draw time.
    pub flags: u32,
}

impl Default for DrawAttributes {
    fn default() -> Self {
        Self {
            color: 0,
            edge_color: 0,
            outline: 0.0,
            alpha: 1.0,
            asset: None,
            uv: CRect::FILL,
            flags: 0,
        }
    }
}

/// Everything the core needs from a renderer.
pub trait Backend {
    /// Draw an element's box with already resolved geometry.
    fn draw(&mut self, rect: &AbsRect, transform: &ResolvedTransform, attributes: &DrawAttributes);

    /// Draw a run of text inside `rect`.
    fn draw_text(
        &mut self,
        text: &str,
        font: Option<&FontDesc>,
        color: u32,
        rect: &AbsRect,
        transform: &ResolvedTransform,
    );

    /// Measure a run of text.
    fn measure_text(&mut self, text: &str, font: Option<&FontDesc>) -> AbsVec;

    /// Load a resource from raw bytes.
    fn load_resource(&mut self, bytes: &[u8]) -> ResourceHandle;

    /// Release a resource previously returned by [`load_resource`](Self::load_resource).
    fn release_resource(&mut self, handle: ResourceHandle);

    /// Push a clip rectangle. Default: no clipping.
    fn push_clip(&mut self, _rect: &AbsRect) {}

    /// Pop the last clip rectangle.
    fn pop_clip(&mut self) {}
}

/// A backend that draws nothing and measures text as fixed-width glyphs.
///
/// Useful for headless hosts and for driving the widget tree without a renderer.
#[derive(Debug, Default)]
pub struct NullBackend {
    next_handle: u64,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for NullBackend {
    fn draw(&mut self, _rect: &AbsRect, _transform: &ResolvedTransform, _attributes: &DrawAttributes) {}

    fn draw_text(
        &mut self,
        _text: &str,
        _font: Option<&FontDesc>,
        _color: u32,
        _rect: &AbsRect,
        _transform: &ResolvedTransform,
    ) {
    }

    fn measure_text(&mut self, text: &str, font: Option<&FontDesc>) -> AbsVec {
        let size = font.map_or(14.0, |f| f.size as f32);
        AbsVec::new(text.chars().count() as f32 * size * 0.5, size)
    }

    fn load_resource(&mut self, _bytes: &[u8]) -> ResourceHandle {
        self.next_handle += 1;
        ResourceHandle(self.next_handle)
    }

    fn release_resource(&mut self, _handle: ResourceHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backend_measures_fixed_width() {
        let mut backend = NullBackend::new();
        let font = FontDesc::new("Mono", 10);
        assert_eq!(backend.measure_text("abcd", Some(&font)), AbsVec::new(20.0, 10.0));
    }

    #[test]
    fn test_null_backend_handles_are_unique() {
        let mut backend = NullBackend::new();
        let a = backend.load_resource(b"a");
        let b = backend.load_resource(b"b");
        assert_ne!(a, b);
        backend.release_resource(a);
    }
}
