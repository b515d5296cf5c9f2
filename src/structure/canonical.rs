use crate::report::NodeKind;

/// One node of the required project layout.
///
/// Built once per run from configuration and never mutated afterwards.
/// Child order is the declaration order and drives the order of structural
/// errors in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalNode {
    File {
        name: String,
    },
    Directory {
        name: String,
        children: Vec<CanonicalNode>,
    },
}

impl CanonicalNode {
    pub fn file(name: impl Into<String>) -> Self {
        CanonicalNode::File { name: name.into() }
    }

    pub fn directory(name: impl Into<String>, children: Vec<CanonicalNode>) -> Self {
        CanonicalNode::Directory {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CanonicalNode::File { name } | CanonicalNode::Directory { name, .. } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            CanonicalNode::File { .. } => NodeKind::File,
            CanonicalNode::Directory { .. } => NodeKind::Directory,
        }
    }
}
