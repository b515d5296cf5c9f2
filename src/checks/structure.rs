use std::path::Path;

use crate::report::CheckError;
use crate::structure::{ActualNode, CanonicalNode, ScanError, diff, scan};

/// The structural gate: scans the submission and diffs it against the
/// required layout. Synchronous by contract; it runs before any page or
/// external service is touched.
pub fn check_structure(
    canonical: &[CanonicalNode],
    root: &Path,
) -> Result<Vec<CheckError>, ScanError> {
    let actual = scan(root)?;
    let children = match &actual {
        ActualNode::Directory { children, .. } => children.as_slice(),
        ActualNode::File { .. } => &[],
    };
    Ok(diff(canonical, children))
}
