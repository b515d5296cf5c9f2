//! Required-vs-actual project tree comparison.
//!
//! The canonical tree is the statically declared layout a submission must
//! match; the actual tree is scanned from disk. Both are tagged file/directory
//! variants, and [`diff`] reports every required node missing from the actual
//! tree without descending into absent subtrees.

mod actual;
mod canonical;
mod diff;

pub use actual::{ActualNode, ScanError, scan};
pub use canonical::CanonicalNode;
pub use diff::diff;
