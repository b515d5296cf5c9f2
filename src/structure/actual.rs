use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::report::NodeKind;

/// One node of the scanned submission layout.
///
/// Child order is whatever the filesystem enumeration yields; the differ
/// never relies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActualNode {
    File {
        name: String,
    },
    Directory {
        name: String,
        children: Vec<ActualNode>,
    },
}

impl ActualNode {
    pub fn file(name: impl Into<String>) -> Self {
        ActualNode::File { name: name.into() }
    }

    pub fn directory(name: impl Into<String>, children: Vec<ActualNode>) -> Self {
        ActualNode::Directory {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ActualNode::File { name } | ActualNode::Directory { name, .. } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ActualNode::File { .. } => NodeKind::File,
            ActualNode::Directory { .. } => NodeKind::Directory,
        }
    }
}

/// Scans `root` into a directory node.
///
/// Synchronous on purpose: the structural gate runs before any page or
/// external service is touched. Entries that are neither files nor
/// directories (sockets, broken symlinks) are skipped.
pub fn scan(root: &Path) -> Result<ActualNode, ScanError> {
    debug!("Scanning submission tree at {}", root.best_effort_path_display());
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let children = scan_children(root)?;
    Ok(ActualNode::Directory { name, children })
}

fn scan_children(dir: &Path) -> Result<Vec<ActualNode>, ScanError> {
    let mut children = Vec::new();

    let entries = fs::read_dir(dir).context(ReadDirSnafu {
        path: dir.to_path_buf(),
    })?;
    for entry in entries {
        let entry = entry.context(ReadDirSnafu {
            path: dir.to_path_buf(),
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type().context(ReadDirSnafu {
            path: dir.to_path_buf(),
        })?;

        if file_type.is_dir() {
            children.push(ActualNode::Directory {
                name,
                children: scan_children(&entry.path())?,
            });
        } else if file_type.is_file() {
            children.push(ActualNode::File { name });
        } else {
            debug!("Skipping non-file entry '{}'", name);
        }
    }

    Ok(children)
}

#[derive(Debug, Snafu)]
pub enum ScanError {
    #[snafu(display("Failed to read directory {}", path.best_effort_path_display()))]
    ReadDirError {
        path: PathBuf,
        source: std::io::Error,
    },
}
