//! Styles and skins for Plume.
//!
//! This crate provides the data side of widget styling:
//!
//! - **Styles**: ordered lists of messages replayed into a widget through a
//!   [`Dispatcher`](plume_core::Dispatcher)
//! - **Style Names**: the bit index behind `hover`, `active`, `checked`, ...
//! - **Flag Names**: per-type flag names and the diff encoding against type
//!   defaults
//! - **Skins**: XML documents of base styles, style blocks and sub-elements,
//!   read and written with a byte-stable format
//! - **Library**: named skins with inheritance resolution
//!
//! # Example
//!
//! ```
//! use plume_style::{FlagTable, SkinReader, SkinWriter, StyleIndex};
//!
//! let text = r#"<Skin name="button" color="FF202020">
//!   <Style name="hover" color="FF404040"/>
//!   <Text name="label" area="0 0 100% 100%"/>
//! </Skin>"#;
//!
//! let flags = FlagTable::standard();
//! let mut names = StyleIndex::new();
//! let skin = SkinReader::new(&flags, &mut names).read_str(text)?;
//! assert_eq!(skin.tree.children[0].name, "label");
//!
//! let written = SkinWriter::new(&flags, &names).write(&skin);
//! assert_eq!(written, text);
//! # Ok::<(), plume_style::Error>(())
//! ```

pub mod flags;
pub mod format;
pub mod library;
pub mod names;
pub mod skin;
pub mod style;
pub mod xml;

mod error;

pub use error::{Error, Result};
pub use flags::FlagTable;
pub use library::{ResolvedSkin, SkinLibrary};
pub use names::{StyleIndex, MAX_STYLE_NAMES};
pub use skin::{Skin, SkinElement, SkinReader, SkinTree, SkinWriter, StyleEntry};
pub use style::Style;
pub use xml::{parse_xml, XmlElement};
