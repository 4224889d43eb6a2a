//! # Block Parsing
//!
//! Line-by-line construction of the block tree.
//!
//! ## Per-line algorithm
//!
//! 1. **Continuation**: every open block from the root down is asked whether
//!    the line continues it, possibly moving the cursor past its marker
//! 2. **Block starts**: while the deepest matched block can hold new blocks,
//!    the factories are tried in resolved order; containers loop so that
//!    `> - item` opens both blocks on one line
//! 3. **Lazy continuation**: a non-blank line that failed to continue some
//!    containers still extends their open paragraph
//! 4. **Content**: the rest of the line goes to the open leaf, or opens a
//!    new paragraph
//!
//! ## Modules
//!
//! - **`cursor`**: `LineCursor` with tab-stop column math
//! - **`content`**: `BlockLine` and `JoinedContent` for leaf content
//! - **`types`**: the `BlockParser`/`BlockParserFactory` protocol
//! - **`kinds`**: built-in block kinds, one module each
//! - **`open`**: the enabled built-in factories for a set of options
//! - **`builder`**: `BlockBuilder`, the state machine itself
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in block quotes in lists, etc.)
//! - Fenced code blocks are raw zones: no block or inline parsing inside
//! - Every block node stores a byte span into the source

pub(crate) mod builder;
pub mod content;
pub mod cursor;
pub mod kinds;
pub mod open;
pub mod types;

pub use content::{BlockLine, JoinedContent};
pub use cursor::{LineCursor, TAB_STOP};
pub use open::builtin_block_factories;
pub use types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, CloseContext, MatchedBlock,
    ParserState, Reposition, StartedBlock,
};
