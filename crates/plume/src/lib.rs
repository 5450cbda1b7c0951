//! Plume - a small retained-mode GUI toolkit core.
//!
//! This is the main crate. It ties the coordinate model, message protocol and
//! element tree of `plume-core` to the skins of `plume-style`, and implements
//! the widget kinds on top of them.
//!
//! Widgets are nodes of a tree owned by a [`Gui`] context. All behaviour is
//! driven by [`Message`](plume_core::Message)s: input, drawing, layout and
//! every property change are messages handled synchronously by the widget's
//! handler. Skins are ordered lists of the same messages, so restyling a
//! widget is replaying a list.
//!
//! # Example
//!
//! ```
//! use plume::{Gui, GuiConfig};
//! use plume::core::{CRect, InsertAt, Message, MessageKind, NullBackend, Transform};
//! use plume::core::message::buttons;
//!
//! let mut gui = Gui::new(NullBackend::new(), GuiConfig::default());
//! let window = gui.create(None, "Window", "main", Transform::FILL)?;
//! let ok = gui.create(
//!     Some(InsertAt::Last(window)),
//!     "Button",
//!     "ok",
//!     Transform::with_area(CRect::from_abs(10.0, 40.0, 90.0, 70.0)),
//! )?;
//! gui.set_text(ok, "OK");
//!
//! gui.inject(&Message::mouse(MessageKind::MouseDown, 20.0, 50.0, buttons::LEFT, buttons::LEFT));
//! gui.inject(&Message::mouse(MessageKind::MouseUp, 20.0, 50.0, buttons::LEFT, 0));
//! assert_eq!(gui.focused(), Some(ok));
//! # Ok::<(), plume::GuiError>(())
//! ```

pub mod config;
pub mod error;
pub mod gui;
pub mod widget;

pub use config::GuiConfig;
pub use error::{GuiError, GuiResult};
pub use gui::{Gui, ListenerId, CONTROL_STYLES};
pub use widget::{Element, Origin, Widget, WidgetClass, WidgetKind};

/// Coordinates, messages, the element tree and the backend trait.
pub mod core {
    pub use plume_core::*;
}

/// Styles, flag names and skins.
pub mod style {
    pub use plume_style::*;
}
