//! # blockpad-engine
//!
//! The editing core of blockpad: a single plain-text document split into
//! language-tagged blocks by header lines.
//!
//! - [`delimiter`] encodes and decodes header lines, [`language`] holds the
//!   token registry.
//! - [`parsing`] turns text into the block list, [`index`] keeps that list
//!   (with stable block ids) in step with the text.
//! - [`editing`] is the transaction model and every block-aware operation.
//! - [`detection`] guesses languages for auto blocks.
//! - [`io`] loads and saves the document file.
//!
//! ```
//! use blockpad_engine::{Document, editing::blocks};
//!
//! let mut doc = Document::new("\n∞∞∞text\nhello");
//! assert!(doc.run(blocks::add_block_after_current(&doc)));
//! assert_eq!(doc.blocks().len(), 2);
//! ```

pub mod delimiter;
pub mod detection;
pub mod editing;
pub mod index;
pub mod io;
pub mod language;
pub mod parsing;

pub use detection::{Detection, DetectionBackend, DetectionService, LanguageDetector};
pub use editing::{Document, EditError, Origin, Patch, Selection, Splice, Transaction};
pub use index::{BlockId, BlockIndex};
pub use io::{DEFAULT_DOCUMENT, IoError, load_document, save_document};
pub use parsing::{Block, BlockLanguage, Span};
