//! sidediff: a side-by-side text comparison engine.
//!
//! This crate compares two textual documents and produces a structured
//! description of their differences suitable for a side-by-side
//! presentation:
//! - per-line marker instructions (added, removed, changed, moved
//!   begin/mid/end, locally matched) emitted through a [`DocumentView`],
//! - in-line change spans for lines that are similar but not identical,
//! - an alignment table pairing line indices so corresponding sections sit
//!   on the same visual row.
//!
//! # Quick start
//!
//! ```
//! use sidediff::{compare_documents, CompareConfig, CompareStatus, TextBuffer};
//!
//! let mut old = TextBuffer::from_str("fn main() {}\n");
//! let mut new = TextBuffer::from_str("fn main() { run(); }\n");
//! let cmp = compare_documents(&mut old, &mut new, &CompareConfig::default()).unwrap();
//! assert_eq!(cmp.status, CompareStatus::Mismatch);
//! ```

mod align;
mod blocks;
mod config;
mod document;
mod engine;
mod find_unique;
pub(crate) mod hashing;
pub(crate) mod lcs;
mod moves;
mod pairing;
mod progress;
pub(crate) mod words;

pub use align::AlignmentRow;
pub use config::{CompareConfig, DocSide};
pub use document::{marker, DocumentView, Section, TextBuffer};
pub use engine::{
    compare, compare_documents, CompareError, CompareMode, CompareStatus, Comparison,
};
pub use progress::{NoProgress, ProgressMonitor};
