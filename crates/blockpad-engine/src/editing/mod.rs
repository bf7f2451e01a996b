/*!
 * # Editing Core
 *
 * One rope, one block list, one selection, and a single synchronous path
 * that changes them.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the rope
 * - The whole document lives in a **`ropey::Rope`**, indexed by char
 * - Saving writes the rope verbatim; block headers are plain text in it
 *
 * ### 2. Transactions
 * - Every edit is a **`Transaction`**: sorted splices in pre-edit
 *   coordinates, an optional resulting selection and an **`Origin`**
 * - Operations never touch the rope. They read the document and return
 *   `Option<Transaction>`; `None` means there is nothing to do
 * - `Document::dispatch` is the only mutator
 *
 * ### 3. Boundary rules
 * - Headers are atomic: partial header edits are widened, insertions inside
 *   a header are refused
 * - The first header only changes through structural operations
 * - Selections never rest inside a header and never cross from one block
 *   into another
 *
 * ### 4. Stable block ids
 * - The block list is rebuilt after every text change and block ids are
 *   carried across by mapping each old header through the **`ChangeSet`**
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` with the rope, the index and `dispatch`
 * - **`transaction`**: `Splice`, `Origin`, `Selection`, `Transaction`, `EditError`
 * - **`changes`**: `ChangeSet` position mapping
 * - **`boundary`**: header guards and selection rules
 * - **`blocks`**, **`lines`**, **`navigation`**: editing operations
 * - **`clipboard`**: copy, cut and paste
 * - **`format`**: the `Formatter` seam
 * - **`commands`**: named commands and their default keys
 * - **`patch`**: what a dispatch reports back
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockpad_engine::editing::{Document, blocks};
 *
 * let mut doc = Document::new("\n∞∞∞text\nhello");
 *
 * assert!(doc.run(blocks::add_block_after_current(&doc)));
 * assert_eq!(doc.text(), "\n∞∞∞text\nhello\n∞∞∞text-a\n");
 * assert_eq!(doc.blocks().len(), 2);
 *
 * // The only block left cannot be deleted.
 * assert!(doc.run(blocks::delete_block(&doc, 1)));
 * assert!(!doc.run(blocks::delete_block(&doc, 0)));
 * ```
 */

pub mod blocks;
pub mod boundary;
pub mod changes;
pub mod clipboard;
pub mod commands;
pub mod document;
pub mod format;
pub mod lines;
pub mod navigation;
pub mod patch;
pub mod transaction;

pub use changes::{Assoc, ChangeSet};
pub use document::Document;
pub use patch::Patch;
pub use transaction::{EditError, Origin, Selection, SelectionRange, Splice, Transaction};
