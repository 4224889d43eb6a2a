//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`normalize`**: renders a `Document` as a stable indented outline for
//!   `insta` snapshots
//! - **`invariants`**: structural checks every parsed tree must pass
//!   (parent links, spans in bounds and nested, sibling order)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::outline;
