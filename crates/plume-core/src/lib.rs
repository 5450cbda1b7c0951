//! Core systems for Plume.
//!
//! This crate provides the foundational pieces of the Plume GUI toolkit:
//!
//! - **Coordinate Model**: relative + absolute rectangles, resolution,
//!   comparison and rotation-aware hit-testing
//! - **Message Protocol**: the typed messages and replies every widget handler
//!   speaks, plus the [`Dispatcher`] seam used for style replay
//! - **Element Tree**: an arena of nodes with ordered children
//! - **Input State**: the mouse/keyboard snapshot updated by input messages
//! - **Backend**: the narrow trait through which pixels are produced
//!
//! # Example
//!
//! ```
//! use plume_core::{AbsRect, Coord, CRect};
//!
//! let parent = AbsRect::new(0.0, 0.0, 200.0, 100.0);
//! let area = CRect::new(Coord::abs(10.0), Coord::rel(0.5), Coord::new(-10.0, 1.0), Coord::rel(1.0));
//! let rect = area.resolve(&parent);
//!
//! assert_eq!(rect, AbsRect::new(10.0, 50.0, 190.0, 100.0));
//! assert!(rect.contains(10.0, 50.0));
//! assert!(!rect.contains(190.0, 50.0));
//! ```

pub mod backend;
pub mod coord;
pub mod flags;
pub mod input;
pub mod logging;
pub mod message;
pub mod tree;

pub use backend::{Backend, DrawAttributes, NullBackend, ResourceHandle};
pub use coord::{lerp, AbsRect, AbsVec, CRect, CVec, ChangeBits, Coord, ResolvedTransform, Transform};
pub use input::InputState;
pub use logging::{ElementTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use message::{Dispatcher, FontDesc, KeyEvent, Message, MessageKind, MouseEvent, Payload, Reply};
pub use tree::{InsertAt, NodeId, Tree, TreeError, TreeResult};
